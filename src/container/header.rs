// Fixed-size container prefix: magic, digests, target size and
// replacement count.
//
// All integers are little-endian u32.

use std::io::{self, Write};

use crate::digest::{DIGEST_LEN, Digest};
use crate::error::{PatchError, Result};

use super::decoder::Input;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Literal marker at the start of every container.
pub const MAGIC: [u8; 16] = *b"Simple Patch Fmt";

/// Width of every integer field.
pub const LEN_FIELD: usize = 4;

/// Magic + two digests + target size + replacement count.
pub const FIXED_HEADER_LEN: usize = MAGIC.len() + 2 * DIGEST_LEN + 2 * LEN_FIELD;

/// Per-entry prefix: offset + length.
pub const REPLACEMENT_HEADER_LEN: usize = 2 * LEN_FIELD;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Parsed fixed prefix of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub source_digest: Digest,
    pub target_digest: Digest,
    pub target_size: u32,
    pub replacement_count: u32,
}

impl FileHeader {
    /// Write the 64-byte prefix.
    pub fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(self.source_digest.as_bytes())?;
        w.write_all(self.target_digest.as_bytes())?;
        write_u32(w, self.target_size)?;
        write_u32(w, self.replacement_count)
    }

    /// Parse the prefix, checking the magic before anything else.
    pub(crate) fn decode(input: &mut Input<'_>) -> Result<Self> {
        let head = input.peek(MAGIC.len());
        if head != MAGIC {
            return Err(PatchError::MalformedHeader {
                found: head.to_vec(),
            });
        }
        input.skip(MAGIC.len());

        let source_digest = input.digest("source digest")?;
        let target_digest = input.digest("target digest")?;
        let target_size = input.u32("target size")?;
        let replacement_count = input.u32("replacement count")?;

        Ok(Self {
            source_digest,
            target_digest,
            target_size,
            replacement_count,
        })
    }
}

pub(crate) fn write_u32<W: Write>(w: &mut W, value: u32) -> io::Result<()> {
    w.write_all(&value.to_le_bytes())
}
