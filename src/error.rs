// Error taxonomy shared by the codec, applier and verifier.
//
// Every failure kind is a distinct variant carrying its diagnostic payload,
// so callers can tell a wrong source file from a corrupted patch without
// parsing messages.

use thiserror::Error;

use crate::digest::Digest;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PatchError>;

/// Errors raised while creating, parsing, applying or verifying a patch.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The container does not start with the expected magic marker.
    #[error("not a supported patch format (magic was {})", hex::encode(found))]
    MalformedHeader {
        /// The leading bytes actually found (at most the magic length).
        found: Vec<u8>,
    },

    /// Declared counts/lengths disagree with the bytes actually present,
    /// or an entry breaks the container's structural rules.
    #[error("corrupted patch body: {0}")]
    MalformedBody(#[from] BodyDefect),

    /// The buffer handed to the applier is not the one the patch was built from.
    #[error("the patch does not fit this source file (expected SHA-1 {expected}, got {actual})")]
    SourceMismatch {
        /// Digest recorded in the patch.
        expected: Digest,
        /// Digest of the buffer that was supplied.
        actual: Digest,
    },

    /// The reconstructed output does not hash to the recorded target digest.
    #[error(
        "patch result is wrong, the patch may be corrupted (expected SHA-1 {expected}, got {actual})"
    )]
    ResultMismatch {
        /// Digest recorded in the patch.
        expected: Digest,
        /// Digest of the produced output.
        actual: Digest,
    },

    /// An input buffer is too long for the container's 32-bit fields.
    #[error("input of {len} bytes exceeds the 4 GiB container limit")]
    TooLarge {
        /// Offending length in bytes.
        len: u64,
    },

    /// Sink or file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What exactly is wrong with a container body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyDefect {
    /// Input ended while reading `field`.
    #[error("truncated {field}: need {needed} bytes, {available} available")]
    Truncated {
        field: &'static str,
        needed: u64,
        available: u64,
    },

    /// Bytes remain after the addition block.
    #[error("{extra} trailing bytes after addition block")]
    TrailingData { extra: u64 },

    /// A replacement entry carries no data.
    #[error("replacement #{index} at offset {offset} is empty")]
    EmptyReplacement { index: u32, offset: u32 },

    /// A replacement starts before the previous one ended.
    #[error("replacement #{index} at offset {offset} overlaps previous run ending at {previous_end}")]
    UnorderedReplacement {
        index: u32,
        offset: u32,
        previous_end: u64,
    },

    /// A replacement reaches past the declared target size.
    #[error("replacement #{index} ends at {end}, beyond target size {target_size}")]
    ReplacementOutOfRange {
        index: u32,
        end: u64,
        target_size: u32,
    },
}

impl PatchError {
    /// Process exit status the CLI reports for this error.
    ///
    /// `2` is left to clap's own usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::TooLarge { .. } => 1,
            Self::MalformedHeader { .. } => 3,
            Self::MalformedBody(_) => 4,
            Self::SourceMismatch { .. } => 5,
            Self::ResultMismatch { .. } => 6,
        }
    }
}
