//! Operation log codec for tokio.
//!
//! Frames whole log entries, patch blocks included, out of a byte stream.

use std::io;

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

use crate::error::{self, ProtocolError};
use crate::op::Op;

use super::parse::{read_entry, Mode, Step};
use super::policy::{NoDiffOps, PatchPolicy};

/// Default limit on a single buffered entry, patch block included.
pub const DEFAULT_MAX_ENTRY_LEN: usize = 1 << 20;

/// Codec yielding one [`Op`] per log entry.
///
/// An entry is only emitted once the byte after it is known, because a main
/// line may still be followed by a patch block. At end of stream the held
/// entry is flushed by [`Decoder::decode_eof`].
///
/// # Example
///
/// ```
/// use bytes::BytesMut;
/// use syncable_proto::log::{DiffOps, OpCodec};
/// use tokio_util::codec::Decoder;
///
/// let mut codec = OpCodec::new(DiffOps::new(["on"]));
/// let mut buf = BytesMut::from("/M#i!1.on\t\n\t!0.set\t1\n\n/M#i!2.set\t3\n");
///
/// let diff = codec.decode(&mut buf).unwrap().unwrap();
/// assert_eq!(diff.patch.as_ref().map(Vec::len), Some(1));
///
/// // The trailing plain entry waits for end of stream.
/// assert!(codec.decode(&mut buf).unwrap().is_none());
/// let last = codec.decode_eof(&mut buf).unwrap().unwrap();
/// assert_eq!(last.value, "3");
/// ```
#[derive(Debug)]
pub struct OpCodec<P = NoDiffOps> {
    policy: P,
    max_len: usize,
    /// Line number of the first byte still in the buffer.
    line: usize,
}

impl Default for OpCodec {
    fn default() -> Self {
        OpCodec::new(NoDiffOps)
    }
}

impl<P: PatchPolicy> OpCodec<P> {
    /// Create a codec with the default entry length limit.
    pub fn new(policy: P) -> Self {
        Self::with_max_len(policy, DEFAULT_MAX_ENTRY_LEN)
    }

    /// Create a codec with a custom entry length limit.
    pub fn with_max_len(policy: P, max_len: usize) -> Self {
        OpCodec {
            policy,
            max_len,
            line: 1,
        }
    }

    /// The patch policy in use.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Maximum bytes one entry may occupy.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn decode_entry(&mut self, src: &mut BytesMut, mode: Mode) -> error::Result<Option<Op>> {
        let text = match std::str::from_utf8(&src[..]) {
            Ok(text) => text,
            // A multi-byte character split across reads.
            Err(e) if e.error_len().is_none() && mode == Mode::Partial => {
                std::str::from_utf8(&src[..e.valid_up_to()]).map_err(invalid_data)?
            }
            Err(e) => return Err(invalid_data(e)),
        };

        match read_entry(text, 0, self.line, &self.policy, mode) {
            Ok(Step::Entry(op, next, used)) => {
                if next > self.max_len {
                    return Err(ProtocolError::EntryTooLong {
                        actual: next,
                        limit: self.max_len,
                    });
                }
                let _ = src.split_to(next);
                trace!(line = self.line, spec = %op.spec, "decoded log entry");
                self.line += used;
                Ok(Some(op))
            }
            Ok(Step::Incomplete) | Ok(Step::End) => {
                if src.len() > self.max_len {
                    return Err(ProtocolError::EntryTooLong {
                        actual: src.len(),
                        limit: self.max_len,
                    });
                }
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "rejecting malformed log entry");
                Err(e)
            }
        }
    }

    /// Reject operations whose serialized form would not parse back.
    fn check_framing(&self, op: &Op) -> error::Result<()> {
        op.check_framing()?;
        if op.patch.is_none() && self.policy.expects_patch(op.name()) {
            return Err(ProtocolError::Unframeable {
                spec: op.spec.to_string(),
                reason: "operation requires a patch block",
            });
        }
        Ok(())
    }
}

fn invalid_data(e: std::str::Utf8Error) -> ProtocolError {
    ProtocolError::Io(io::Error::new(io::ErrorKind::InvalidData, e))
}

impl<P: PatchPolicy> Decoder for OpCodec<P> {
    type Item = Op;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Op>> {
        self.decode_entry(src, Mode::Partial)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Op>> {
        if src.is_empty() {
            return Ok(None);
        }
        self.decode_entry(src, Mode::Complete)
    }
}

impl<'a, P: PatchPolicy> Encoder<&'a Op> for OpCodec<P> {
    type Error = ProtocolError;

    fn encode(&mut self, op: &'a Op, dst: &mut BytesMut) -> error::Result<()> {
        self.check_framing(op)?;
        dst.extend_from_slice(op.to_string().as_bytes());
        Ok(())
    }
}

impl<P: PatchPolicy> Encoder<Op> for OpCodec<P> {
    type Error = ProtocolError;

    fn encode(&mut self, op: Op, dst: &mut BytesMut) -> error::Result<()> {
        <Self as Encoder<&Op>>::encode(self, &op, dst)
    }
}
