// The patch value: replacement runs, trailing addition, digests and the
// final output length.
//
// A `Patch` is built once (by `diff::generate` or by the container decoder)
// and only read afterwards; fields are private and exposed through
// accessors.

use crate::container::header::{FIXED_HEADER_LEN, LEN_FIELD, REPLACEMENT_HEADER_LEN};
use crate::digest::Digest;

/// One contiguous run of differing bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    offset: u32,
    data: Vec<u8>,
}

impl Replacement {
    pub(crate) fn new(offset: u32, data: Vec<u8>) -> Self {
        Self { offset, data }
    }

    /// Position in the base buffer where the run starts.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Bytes written at `offset`.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Exclusive end of the overwritten range.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + self.data.len() as u64
    }
}

/// Description of how to turn one specific source buffer into one specific
/// target buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    target_size: u32,
    source_digest: Digest,
    target_digest: Digest,
    replacements: Vec<Replacement>,
    additions: Vec<u8>,
}

impl Patch {
    pub(crate) fn from_parts(
        target_size: u32,
        source_digest: Digest,
        target_digest: Digest,
        replacements: Vec<Replacement>,
        additions: Vec<u8>,
    ) -> Self {
        Self {
            target_size,
            source_digest,
            target_digest,
            replacements,
            additions,
        }
    }

    /// Exact length of the reconstructed output.
    pub fn target_size(&self) -> u32 {
        self.target_size
    }

    /// SHA-1 the source buffer must have.
    pub fn source_digest(&self) -> &Digest {
        &self.source_digest
    }

    /// SHA-1 the reconstructed output must have.
    pub fn target_digest(&self) -> &Digest {
        &self.target_digest
    }

    /// Replacement runs, ascending by offset.
    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Tail appended after the source when the target is longer.
    pub fn additions(&self) -> &[u8] {
        &self.additions
    }

    /// Number of bytes the container encoding of this patch occupies.
    pub fn serialized_len(&self) -> u64 {
        let runs: u64 = self
            .replacements
            .iter()
            .map(|r| (REPLACEMENT_HEADER_LEN + r.data.len()) as u64)
            .sum();
        (FIXED_HEADER_LEN + LEN_FIELD) as u64 + runs + self.additions.len() as u64
    }

    /// Aggregate figures for reporting.
    pub fn summary(&self) -> PatchSummary {
        PatchSummary {
            target_size: self.target_size,
            replacement_count: self.replacements.len(),
            replaced_bytes: self.replacements.iter().map(|r| r.data.len() as u64).sum(),
            addition_len: self.additions.len() as u64,
            serialized_len: self.serialized_len(),
        }
    }
}

/// Size statistics of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSummary {
    pub target_size: u32,
    pub replacement_count: usize,
    /// Sum of all replacement run lengths.
    pub replaced_bytes: u64,
    pub addition_len: u64,
    pub serialized_len: u64,
}
