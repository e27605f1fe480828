// Patch application and result verification.
//
// Applying is "write the whole source, append the additions, overwrite the
// replacement ranges, cut to the target size". That needs an output that
// can seek back and shrink, which is what `PatchSink` describes. Callers
// holding only an append-only writer should go through `engine::patch`,
// which reconstructs in memory first.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use log::{debug, trace};

use crate::digest::{Hasher, digest};
use crate::error::{PatchError, Result};
use crate::patch::Patch;

/// Chunk size used when hashing a sink back.
const VERIFY_BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Sink abstraction
// ---------------------------------------------------------------------------

/// Random-access output that can also be truncated or extended.
pub trait PatchSink: Write + Seek {
    /// Set the total length to `len` bytes, zero-filling when growing.
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl PatchSink for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl PatchSink for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds usize"))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// Reconstruct the target described by `patch` into `sink`.
///
/// The source digest is checked before the first write; on
/// [`PatchError::SourceMismatch`] the sink is untouched. On success the
/// sink holds exactly `patch.target_size()` bytes and is positioned at its
/// end.
pub fn apply<S: PatchSink>(source: &[u8], patch: &Patch, sink: &mut S) -> Result<()> {
    let actual = digest(source);
    if actual != *patch.source_digest() {
        return Err(PatchError::SourceMismatch {
            expected: *patch.source_digest(),
            actual,
        });
    }

    sink.seek(SeekFrom::Start(0))?;
    sink.write_all(source)?;
    sink.write_all(patch.additions())?;

    for run in patch.replacements() {
        trace!("overwrite {} bytes at {}", run.data().len(), run.offset());
        sink.seek(SeekFrom::Start(u64::from(run.offset())))?;
        sink.write_all(run.data())?;
    }

    let target_size = u64::from(patch.target_size());
    sink.truncate(target_size)?;
    sink.seek(SeekFrom::Start(target_size))?;
    sink.flush()?;

    debug!(
        "applied {} replacement runs and {} addition bytes onto {} source bytes -> {target_size} bytes",
        patch.replacements().len(),
        patch.additions().len(),
        source.len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Verify
// ---------------------------------------------------------------------------

/// Hash the full contents of `sink` and compare with the patch's target
/// digest. Rewinds before reading; leaves the position at the end.
pub fn verify<R: Read + Seek>(sink: &mut R, patch: &Patch) -> Result<()> {
    sink.seek(SeekFrom::Start(0))?;

    let mut hasher = Hasher::new();
    let mut buf = vec![0u8; VERIFY_BUF_SIZE];
    loop {
        let n = match sink.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..n]);
    }

    let actual = hasher.finalize();
    if actual != *patch.target_digest() {
        return Err(PatchError::ResultMismatch {
            expected: *patch.target_digest(),
            actual,
        });
    }
    debug!("result verified: {actual}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
