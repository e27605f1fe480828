// Container serialization.

use std::io::{self, Write};

use crate::patch::Patch;

use super::header::{FileHeader, write_u32};

/// Write the container form of `patch` to `w`.
///
/// Lengths are emitted as u32; `Patch` values only come from
/// `diff::generate` or the decoder, both of which bound every length to
/// `u32::MAX`.
pub fn write_to<W: Write>(patch: &Patch, w: &mut W) -> io::Result<()> {
    FileHeader {
        source_digest: *patch.source_digest(),
        target_digest: *patch.target_digest(),
        target_size: patch.target_size(),
        replacement_count: patch.replacements().len() as u32,
    }
    .encode(w)?;

    for run in patch.replacements() {
        write_u32(w, run.offset())?;
        write_u32(w, run.data().len() as u32)?;
        w.write_all(run.data())?;
    }

    write_u32(w, patch.additions().len() as u32)?;
    w.write_all(patch.additions())
}

/// Serialize `patch` into a fresh buffer.
pub fn serialize(patch: &Patch) -> Vec<u8> {
    let mut out = Vec::with_capacity(patch.serialized_len() as usize);
    // Writing into a Vec cannot fail.
    let _ = write_to(patch, &mut out);
    out
}
