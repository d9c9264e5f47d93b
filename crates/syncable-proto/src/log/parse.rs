//! Operation log parser.
//!
//! An explicit line scanner: each step reads one entry (a main line plus an
//! optional patch block) starting at a byte offset and reports where it
//! ended, so the same code serves whole-text parsing, incremental parsing of
//! stream buffers and the framing codec.

use crate::error::{LogParseError, ProtocolError, Result};
use crate::op::Op;
use crate::spec::{tokenize, Spec};

use super::policy::{NoDiffOps, PatchPolicy};

const TAB: char = '\t';
const LF: char = '\n';

/// Whether the input may still grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mode {
    /// The input is everything there is.
    Complete,
    /// More bytes may follow; an unfinished entry is not an error.
    Partial,
}

/// Outcome of reading one entry.
#[derive(Debug)]
pub(crate) enum Step {
    /// A whole entry, the byte offset after it and the number of lines it used.
    Entry(Op, usize, usize),
    /// The entry starting here is not finished yet.
    Incomplete,
    /// No input left.
    End,
}

/// Result of [`parse_partial`]: complete entries plus the unparsed tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partial<'a> {
    /// Entries parsed so far.
    pub ops: Vec<Op>,
    /// Bytes of the first unfinished entry onward, verbatim.
    pub remainder: &'a str,
}

impl Partial<'_> {
    /// Bytes consumed from the input.
    pub fn consumed(&self, input: &str) -> usize {
        input.len() - self.remainder.len()
    }
}

/// A parser bound to a patch policy.
///
/// # Example
///
/// ```
/// use syncable_proto::log::{DiffOps, LogParser};
///
/// let parser = LogParser::new(DiffOps::new(["on"]));
/// let ops = parser.parse("/Model#other!stamp.on\t\n\n").unwrap();
/// assert_eq!(ops[0].patch, Some(vec![]));
///
/// // `on` without its block is rejected under this policy.
/// assert!(parser.parse("/Model#other!stamp.on\t\n").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct LogParser<P = NoDiffOps> {
    policy: P,
}

impl<P: PatchPolicy> LogParser<P> {
    /// Create a parser with the given policy.
    pub fn new(policy: P) -> Self {
        LogParser { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Parse a complete log text.
    pub fn parse(&self, text: &str) -> Result<Vec<Op>> {
        parse_with(text, &self.policy)
    }

    /// Parse the complete entries of a growing buffer.
    pub fn parse_partial<'a>(&self, text: &'a str) -> Result<Partial<'a>> {
        parse_partial(text, &self.policy)
    }
}

/// Parse a complete log text, recognizing patch blocks by framing only.
///
/// ```
/// use syncable_proto::log;
///
/// let ops = log::parse("/Model#id!stamp.set\t{\"x\":\"y\"}\n").unwrap();
/// assert_eq!(ops[0].value, "{\"x\":\"y\"}");
/// assert!(ops[0].patch.is_none());
/// ```
pub fn parse(text: &str) -> Result<Vec<Op>> {
    parse_with(text, &NoDiffOps)
}

/// Parse a complete log text under a patch policy.
///
/// Every entry must be finished: a trailing line without LF or a patch
/// block cut off by end of input is an error.
pub fn parse_with<P: PatchPolicy + ?Sized>(text: &str, policy: &P) -> Result<Vec<Op>> {
    let mut ops = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    loop {
        match read_entry(text, pos, line, policy, Mode::Complete)? {
            Step::Entry(op, next, used) => {
                ops.push(op);
                pos = next;
                line += used;
            }
            Step::End => return Ok(ops),
            // Not produced in complete mode.
            Step::Incomplete => {
                return Err(ProtocolError::entry(
                    line,
                    first_line(&text[pos..]),
                    LogParseError::UnterminatedPatch,
                ))
            }
        }
    }
}

/// Parse the finished entries of a buffer that may still grow.
///
/// The last entry is held back until the byte after it is known, since a
/// patch block may still follow a main line. Malformed finished lines are
/// still errors. Line numbers are relative to `text`.
pub fn parse_partial<'a, P: PatchPolicy + ?Sized>(
    text: &'a str,
    policy: &P,
) -> Result<Partial<'a>> {
    let mut ops = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    loop {
        match read_entry(text, pos, line, policy, Mode::Partial)? {
            Step::Entry(op, next, used) => {
                ops.push(op);
                pos = next;
                line += used;
            }
            Step::End | Step::Incomplete => {
                return Ok(Partial {
                    ops,
                    remainder: &text[pos..],
                })
            }
        }
    }
}

/// The line starting at `pos`, without its LF, and the offset after the LF.
fn take_line(text: &str, pos: usize) -> Option<(&str, usize)> {
    let rest = &text[pos..];
    rest.find(LF).map(|i| (&rest[..i], pos + i + 1))
}

fn first_line(rest: &str) -> &str {
    rest.split(LF).next().unwrap_or("")
}

/// Split `spec TAB value` and parse the spec.
fn split_line(line: &str) -> std::result::Result<(Spec, &str), LogParseError> {
    let (spec, value) = line.split_once(TAB).ok_or(LogParseError::MissingTab)?;
    let tokens = tokenize(spec).map_err(LogParseError::InvalidSpec)?;
    Ok((Spec::from_tokens(tokens), value))
}

/// Read one entry starting at byte `pos`, which is on line `line`.
pub(crate) fn read_entry<P: PatchPolicy + ?Sized>(
    text: &str,
    pos: usize,
    line: usize,
    policy: &P,
    mode: Mode,
) -> Result<Step> {
    if pos >= text.len() {
        return Ok(Step::End);
    }

    let Some((main, mut next)) = take_line(text, pos) else {
        return match mode {
            Mode::Partial => Ok(Step::Incomplete),
            Mode::Complete => Err(ProtocolError::entry(
                line,
                &text[pos..],
                LogParseError::UnterminatedLine,
            )),
        };
    };

    let fail = |at: usize, src: &str, cause: LogParseError| ProtocolError::entry(at, src, cause);

    if main.is_empty() {
        return Err(fail(line, main, LogParseError::UnexpectedBlankLine));
    }
    if main.starts_with(TAB) {
        return Err(fail(line, main, LogParseError::OrphanPatchLine));
    }

    let (spec, value) = split_line(main).map_err(|cause| fail(line, main, cause))?;
    if !spec.is_address() {
        return Err(fail(
            line,
            main,
            LogParseError::IncompleteSpec(spec.to_string()),
        ));
    }

    let expects = policy.expects_patch(spec.op());
    let mut op = Op::new(spec, value);
    let mut used = 1;

    let opens_block = match text[next..].chars().next() {
        Some(c) => c == TAB || c == LF,
        None if mode == Mode::Partial => return Ok(Step::Incomplete),
        None => false,
    };

    if !opens_block {
        if expects {
            return Err(fail(
                line,
                main,
                LogParseError::MissingPatchBlock(op.name().to_owned()),
            ));
        }
        return Ok(Step::Entry(op, next, used));
    }

    let mut patch = Vec::new();
    loop {
        let at = line + used;
        let Some((sub_line, after)) = take_line(text, next) else {
            return match mode {
                Mode::Partial => Ok(Step::Incomplete),
                Mode::Complete => Err(fail(
                    at,
                    &text[next..],
                    LogParseError::UnterminatedPatch,
                )),
            };
        };
        next = after;
        used += 1;

        if sub_line.is_empty() {
            break;
        }
        let Some(body) = sub_line.strip_prefix(TAB) else {
            return Err(fail(at, sub_line, LogParseError::UnterminatedPatch));
        };

        let (sub_spec, sub_value) = split_line(body).map_err(|cause| fail(at, sub_line, cause))?;
        if !sub_spec.is_sub_spec() {
            return Err(fail(
                at,
                sub_line,
                LogParseError::InvalidSubSpec(sub_spec.to_string()),
            ));
        }
        patch.push(Op::new(sub_spec, sub_value));
    }

    op.patch = Some(patch);
    Ok(Step::Entry(op, next, used))
}
