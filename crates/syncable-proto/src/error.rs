//! Error types for the specifier grammar and the operation log format.
//!
//! Every parse failure is reported to the caller. Nothing here recovers
//! partially: a half-parsed specifier would carry the wrong object identity
//! into replicated state.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error while framing a stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A specifier string could not be parsed.
    #[error("malformed specifier {string:?}")]
    MalformedSpecifier {
        /// The offending specifier text.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: SpecParseError,
    },

    /// An operation log entry could not be parsed.
    #[error("malformed log entry at line {line}: {text:?}")]
    MalformedLogEntry {
        /// 1-based line number of the offending line.
        line: usize,
        /// The offending line, without its terminator.
        text: String,
        /// The underlying parse error.
        #[source]
        cause: LogParseError,
    },

    /// A `has`/`fits` fragment is not a usable filter.
    #[error("invalid filter fragment {fragment:?}")]
    FilterFragment {
        /// The fragment as given.
        fragment: String,
        /// Why it was rejected.
        #[source]
        cause: FilterError,
    },

    /// An operation cannot be written without breaking log framing.
    #[error("cannot frame {spec:?}: {reason}")]
    Unframeable {
        /// The operation's specifier.
        spec: String,
        /// What would break the framing.
        reason: &'static str,
    },

    /// A single log entry exceeded the codec's framing limit.
    #[error("log entry too long: {actual} bytes (limit: {limit})")]
    EntryTooLong {
        /// Bytes buffered so far for the entry.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },
}

impl ProtocolError {
    pub(crate) fn spec(string: &str, cause: SpecParseError) -> Self {
        ProtocolError::MalformedSpecifier {
            string: string.to_owned(),
            cause,
        }
    }

    pub(crate) fn entry(line: usize, text: &str, cause: LogParseError) -> Self {
        ProtocolError::MalformedLogEntry {
            line,
            text: text.to_owned(),
            cause,
        }
    }

    pub(crate) fn filter(fragment: &str, cause: FilterError) -> Self {
        ProtocolError::FilterFragment {
            fragment: fragment.to_owned(),
            cause,
        }
    }
}

/// Errors encountered when parsing a specifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpecParseError {
    /// Body characters appeared before any quant marker.
    #[error("body text before any quant at position {position}")]
    MissingQuant {
        /// Byte offset of the stray body text.
        position: usize,
    },

    /// A character that may not appear in a specifier at all.
    #[error("invalid character {ch:?} at position {position}")]
    InvalidCharacterAt {
        /// The rejected character.
        ch: char,
        /// Byte offset of the character.
        position: usize,
    },

    /// The version body does not follow `stamp[+author[~session]]`.
    #[error("malformed version {body:?}: {reason}")]
    MalformedVersion {
        /// The version token body.
        body: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Errors encountered when parsing an operation log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LogParseError {
    /// The line has no TAB between specifier and value.
    #[error("missing tab separator")]
    MissingTab,

    /// The last line of input is not newline-terminated.
    #[error("line is not newline-terminated")]
    UnterminatedLine,

    /// The specifier part of the line failed to parse.
    #[error("invalid specifier: {0}")]
    InvalidSpec(#[source] SpecParseError),

    /// A main line specifier is not a full `/type#id!version.op` address.
    #[error("specifier is not a full address: {0:?}")]
    IncompleteSpec(String),

    /// A patch line specifier is not exactly `!version.op`.
    #[error("patch specifier must be a version followed by an operation: {0:?}")]
    InvalidSubSpec(String),

    /// The policy requires a patch block for this operation but none follows.
    #[error("operation {0:?} requires a patch block")]
    MissingPatchBlock(String),

    /// Input ended inside a patch block.
    #[error("unterminated patch block")]
    UnterminatedPatch,

    /// A blank line where a main line was expected.
    #[error("unexpected blank line")]
    UnexpectedBlankLine,

    /// A tab-indented patch line with no main line to attach to.
    #[error("patch line without a preceding operation")]
    OrphanPatchLine,
}

/// Reasons a `has`/`fits` fragment is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterError {
    /// The fragment is not a valid specifier.
    #[error("fragment does not parse: {0}")]
    Parse(#[source] SpecParseError),

    /// `has` takes exactly one token.
    #[error("expected exactly one token, got {0}")]
    TokenCount(usize),
}
