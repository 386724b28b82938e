//! # tekfmt
//!
//! A canonical formatter for Tekton Task and Pipeline YAML resources.
//!
//! tekfmt rewrites a resource definition into a deterministic, stable form:
//!
//! - **Ranked key order**: each structural block (`metadata`, `spec`, step
//!   entries, ...) gets its fields reordered by a domain rank table; fields
//!   the table does not know sort last, alphabetically
//! - **Name-sorted lists**: `spec.params`, `spec.results`, `spec.volumes`,
//!   `spec.workspaces` and `spec.sidecars` are ordered by each element's
//!   `name` field
//! - **Canonical scripts**: a step's `script` holding valid shell is
//!   replaced by its canonical rendering; anything else is left untouched
//! - **Cleanup**: redundant scalar quoting is stripped, empty
//!   `computeResources` blocks and explicit-null `creationTimestamp` fields
//!   are removed
//!
//! Formatting is **idempotent**: running the formatter on its own output
//! produces byte-identical text, so a byte comparison doubles as a lint
//! check (`tekfmt -l`).
//!
//! ## Quick Start
//!
//! ```rust
//! use tekfmt::format_str;
//!
//! let input = "\
//! spec:
//!   steps:
//!     - name: b
//!       image: x
//!     - name: a
//!       image: y
//! metadata:
//!   name: n
//! ";
//!
//! let formatted = format_str(input).unwrap();
//! assert_eq!(format_str(&formatted).unwrap(), formatted);
//! ```
//!
//! ## Output settings
//!
//! Every document is re-encoded with an explicit `---` document start, LF
//! line breaks, 2-space indentation, and plain scalars wrapped at column 72.
//!
//! ## Error model
//!
//! A malformed document anywhere in the stream aborts the whole invocation
//! ([`Error::Decode`]); formatting is all-or-nothing per call. An embedded
//! script that fails to parse as shell is *not* an error: the field keeps
//! its original text.

pub mod cleanup;
pub mod emit;
pub mod error;
pub mod format;
pub mod node;
pub mod parse;
pub mod script;
pub mod sort;

pub use error::{Error, Result};
pub use format::{canonicalize, format_str};
pub use node::{Node, Scalar};
pub use sort::{RankTable, UNRANKED};

use std::io;

/// Formats a stream of documents given as raw bytes.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the bytes are not valid UTF-8 or not
/// well-formed YAML, [`Error::Encode`] on serialization failure.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_bytes(input: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(input)
        .map_err(|e| Error::decode(format!("input is not valid UTF-8: {e}")))?;
    format_str(text)
}

/// Reads a document stream from `reader`, formats it, and writes the result
/// to `writer`. Nothing is written when formatting fails.
///
/// # Errors
///
/// Returns [`Error::Io`] when reading or writing fails, plus the formatting
/// errors of [`format_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_to_writer<R, W>(mut reader: R, mut writer: W) -> Result<()>
where
    R: io::Read,
    W: io::Write,
{
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| Error::io(e.to_string()))?;
    let output = format_str(&input)?;
    writer
        .write_all(output.as_bytes())
        .map_err(|e| Error::io(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_and_stays_stable() {
        let input = "metadata:\n  labels: {}\n  name: n\n";
        let once = format_str(input).unwrap();
        assert_eq!(format_str(&once).unwrap(), once);
    }

    #[test]
    fn empty_stream_formats_to_nothing() {
        assert_eq!(format_str("").unwrap(), "");
    }

    #[test]
    fn bytes_must_be_utf8() {
        let err = format_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn writer_round_trip() {
        let mut out = Vec::new();
        format_to_writer("a: 1\n".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "---\na: 1\n");
    }

    #[test]
    fn nothing_is_written_on_decode_failure() {
        let mut out = Vec::new();
        let result = format_to_writer("a: [oops\n".as_bytes(), &mut out);
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
