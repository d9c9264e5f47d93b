//! Streams one operation log through the codec.
//!
//! Each entry is decoded, counted, optionally re-encoded and compared
//! against the bytes it came from, and printed if it fits the input's
//! filter.

use anyhow::Context;
use bytes::BytesMut;
use futures_util::StreamExt;
use syncable_proto::Op;
use syncable_proto::log::{DiffOps, OpCodec};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{Encoder, FramedRead};
use tracing::{debug, warn};

use crate::config::{InputConfig, OutputConfig, ProtocolConfig};

/// What one input contained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Bytes read.
    pub bytes: usize,
    /// Entries decoded.
    pub entries: usize,
    /// Entries carrying a patch block.
    pub diffs: usize,
    /// Patch lines across all diffs.
    pub patch_entries: usize,
    /// Entries that fit the filter.
    pub matched: usize,
    /// Round-trip outcome; `None` when verification is off.
    pub round_trip: Option<bool>,
}

impl Report {
    /// True unless verification ran and failed.
    pub fn is_ok(&self) -> bool {
        self.round_trip != Some(false)
    }
}

/// Inspect one input, writing matched entries to `out`.
pub async fn inspect<W>(
    input: &InputConfig,
    protocol: &ProtocolConfig,
    output: &OutputConfig,
    out: &mut W,
) -> anyhow::Result<Report>
where
    W: AsyncWrite + Unpin,
{
    let path = input.path.display();
    let original = tokio::fs::read(&input.path)
        .await
        .with_context(|| format!("failed to read {path}"))?;
    let filter = input
        .filter_spec()
        .with_context(|| format!("invalid filter for {path}"))?;

    let policy = protocol.policy();
    let mut frames = FramedRead::new(
        &original[..],
        OpCodec::with_max_len(policy.clone(), protocol.max_entry_len),
    );
    let mut encoder = OpCodec::with_max_len(policy, protocol.max_entry_len);

    let mut report = Report {
        bytes: original.len(),
        round_trip: input.verify.then_some(true),
        ..Report::default()
    };
    let mut offset = 0;
    let mut scratch = BytesMut::new();

    while let Some(op) = frames.next().await {
        let op = op.with_context(|| format!("{path}: malformed operation log"))?;
        report.entries += 1;
        if let Some(ref patch) = op.patch {
            report.diffs += 1;
            report.patch_entries += patch.len();
        }

        if input.verify {
            scratch.clear();
            encoder.encode(&op, &mut scratch)?;
            let end = offset + scratch.len();
            if report.round_trip == Some(true) && original.get(offset..end) != Some(&scratch[..]) {
                warn!(path = %path, offset, spec = %op.spec, "Entry does not re-serialize to its source bytes");
                report.round_trip = Some(false);
            }
            offset = end;
        }

        if op.spec.fits_spec(&filter) {
            report.matched += 1;
            debug!(spec = %op.spec, "Entry matches filter");
            write_entry(&op, output, &mut encoder, out).await?;
        }
    }

    if report.round_trip == Some(true) && offset != original.len() {
        warn!(path = %path, offset, len = original.len(), "Trailing bytes not covered by any entry");
        report.round_trip = Some(false);
    }

    Ok(report)
}

async fn write_entry<W>(
    op: &Op,
    output: &OutputConfig,
    encoder: &mut OpCodec<DiffOps>,
    out: &mut W,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if output.json {
        let mut line = serde_json::to_vec(op)?;
        line.push(b'\n');
        out.write_all(&line).await?;
    } else {
        let mut buf = BytesMut::new();
        encoder.encode(op, &mut buf)?;
        out.write_all(&buf).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const LOG: &str = "/Todo#list!1+a.on\t\n\
                       \t!0+a.set\t{\"title\":\"groceries\"}\n\
                       \n\
                       /Todo#item1!2+a~phone.set\t{\"done\":false}\n\
                       /Todo#item1!3+b.set\t{\"done\":true}\n";

    fn input(path: PathBuf, filter: Option<&str>) -> InputConfig {
        InputConfig {
            path,
            filter: filter.map(str::to_string),
            verify: true,
        }
    }

    fn log_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_counts_and_filters() {
        let file = log_file(LOG);
        let mut out = Vec::new();
        let report = inspect(
            &input(file.path().to_path_buf(), Some("#item1")),
            &ProtocolConfig::default(),
            &OutputConfig::default(),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(report.entries, 3);
        assert_eq!(report.diffs, 1);
        assert_eq!(report.patch_entries, 1);
        assert_eq!(report.matched, 2);
        assert_eq!(report.bytes, LOG.len());
        assert_eq!(report.round_trip, Some(true));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "/Todo#item1!2+a~phone.set\t{\"done\":false}\n\
             /Todo#item1!3+b.set\t{\"done\":true}\n"
        );
    }

    #[tokio::test]
    async fn test_json_output() {
        let file = log_file(LOG);
        let mut out = Vec::new();
        inspect(
            &input(file.path().to_path_buf(), Some(".on")),
            &ProtocolConfig::default(),
            &OutputConfig { json: true },
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["spec"], "/Todo#list!1+a.on");
        assert_eq!(value["patch"][0]["spec"], "!0+a.set");
    }

    #[tokio::test]
    async fn test_malformed_log_fails() {
        let file = log_file("/Todo#x!1.set\t1\nnot an entry\n");
        let mut out = Vec::new();
        let err = inspect(
            &input(file.path().to_path_buf(), None),
            &ProtocolConfig::default(),
            &OutputConfig::default(),
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(format!("{err:#}").contains("line 2"));
    }

    #[tokio::test]
    async fn test_missing_patch_block_under_policy() {
        let file = log_file("/Todo#x!1.on\t\n");
        let mut out = Vec::new();
        let result = inspect(
            &input(file.path().to_path_buf(), None),
            &ProtocolConfig::default(),
            &OutputConfig::default(),
            &mut out,
        )
        .await;
        assert!(result.is_err());

        let lenient = ProtocolConfig {
            diff_ops: vec![],
            ..ProtocolConfig::default()
        };
        let report = inspect(
            &input(file.path().to_path_buf(), None),
            &lenient,
            &OutputConfig::default(),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(report.entries, 1);
        assert!(report.is_ok());
    }
}
