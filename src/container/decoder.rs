// Container deserialization.
//
// Parsing works on an in-memory slice so that every declared count or
// length can be checked against the bytes actually left before anything is
// allocated. A short read anywhere after the magic is a `MalformedBody`
// error naming the field that was cut off.

use std::io::Read;

use log::debug;

use crate::digest::{DIGEST_LEN, Digest};
use crate::error::{BodyDefect, Result};
use crate::patch::{Patch, Replacement};

use super::header::{FileHeader, REPLACEMENT_HEADER_LEN};

// ---------------------------------------------------------------------------
// Input cursor
// ---------------------------------------------------------------------------

/// Bounds-checked forward cursor over container bytes.
pub(crate) struct Input<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Input<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Up to `n` bytes from the current position, without consuming them.
    pub(crate) fn peek(&self, n: usize) -> &'a [u8] {
        let end = self.pos + n.min(self.remaining());
        &self.buf[self.pos..end]
    }

    pub(crate) fn skip(&mut self, n: usize) {
        self.pos += n.min(self.remaining());
    }

    pub(crate) fn take(&mut self, n: usize, field: &'static str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(BodyDefect::Truncated {
                field,
                needed: n as u64,
                available: self.remaining() as u64,
            }
            .into());
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn u32(&mut self, field: &'static str) -> Result<u32> {
        let bytes = self.take(4, field)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub(crate) fn digest(&mut self, field: &'static str) -> Result<Digest> {
        let mut raw = [0u8; DIGEST_LEN];
        raw.copy_from_slice(self.take(DIGEST_LEN, field)?);
        Ok(Digest::from_bytes(raw))
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parse a complete container.
///
/// The whole slice must be consumed; leftover bytes after the addition
/// block are reported as [`BodyDefect::TrailingData`].
pub fn deserialize(bytes: &[u8]) -> Result<Patch> {
    let mut input = Input::new(bytes);
    let header = FileHeader::decode(&mut input)?;

    // Each entry needs at least its 8-byte prefix plus one data byte.
    let plausible = input.remaining() / (REPLACEMENT_HEADER_LEN + 1);
    let mut replacements = Vec::with_capacity((header.replacement_count as usize).min(plausible));
    let mut previous_end = 0u64;

    for index in 0..header.replacement_count {
        let offset = input.u32("replacement offset")?;
        let len = input.u32("replacement length")?;
        let data = input.take(len as usize, "replacement data")?;

        if data.is_empty() {
            return Err(BodyDefect::EmptyReplacement { index, offset }.into());
        }
        if index > 0 && u64::from(offset) < previous_end {
            return Err(BodyDefect::UnorderedReplacement {
                index,
                offset,
                previous_end,
            }
            .into());
        }
        let end = u64::from(offset) + u64::from(len);
        if end > u64::from(header.target_size) {
            return Err(BodyDefect::ReplacementOutOfRange {
                index,
                end,
                target_size: header.target_size,
            }
            .into());
        }

        previous_end = end;
        replacements.push(Replacement::new(offset, data.to_vec()));
    }

    let additions_len = input.u32("additions length")?;
    let additions = input.take(additions_len as usize, "additions")?.to_vec();

    if input.remaining() > 0 {
        return Err(BodyDefect::TrailingData {
            extra: input.remaining() as u64,
        }
        .into());
    }

    debug!(
        "parsed patch: {} replacement runs, {} addition bytes, target size {}",
        replacements.len(),
        additions.len(),
        header.target_size
    );

    Ok(Patch::from_parts(
        header.target_size,
        header.source_digest,
        header.target_digest,
        replacements,
        additions,
    ))
}

/// Read a container from a stream until EOF, then parse it.
pub fn read_from<R: Read>(reader: &mut R) -> Result<Patch> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    deserialize(&bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
