// File-level helpers for creating and applying patches.
//
// Inputs are read fully into memory (patches target fixed-size images).
// The patch file goes through a `BufWriter`; the output of `apply_file` is
// opened read/write so it can be overwritten in place, truncated, and then
// read back for verification. A failed apply or verify removes the output
// file so a partial result is never left behind.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{info, warn};

use crate::apply::{apply, verify};
use crate::container::{deserialize, write_to};
use crate::diff::generate;
use crate::digest::Digest;
use crate::engine::ApplyOptions;
use crate::error::{PatchError, Result};

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `create_file()`.
#[derive(Debug, Clone)]
pub struct CreateStats {
    /// Source file size in bytes.
    pub source_size: u64,
    /// Target file size in bytes.
    pub target_size: u64,
    /// Patch file size in bytes.
    pub patch_size: u64,
    /// Number of replacement runs recorded.
    pub replacements: u64,
    /// Length of the addition block.
    pub addition_size: u64,
    pub source_sha1: Digest,
    pub target_sha1: Digest,
}

/// Statistics returned by `apply_file()`.
#[derive(Debug, Clone)]
pub struct ApplyStats {
    /// Source file size in bytes.
    pub source_size: u64,
    /// Patch file size in bytes.
    pub patch_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
    /// Number of replacement runs applied.
    pub replacements: u64,
    /// Whether the output was re-hashed against the target digest.
    pub verified: bool,
    /// SHA-1 recorded for the output.
    pub output_sha1: Digest,
}

// ---------------------------------------------------------------------------
// create_file
// ---------------------------------------------------------------------------

/// Diff `source_path` against `target_path`, writing the container to
/// `patch_path` (created or truncated).
pub fn create_file(source_path: &Path, target_path: &Path, patch_path: &Path) -> Result<CreateStats> {
    let source = std::fs::read(source_path)?;
    let target = std::fs::read(target_path)?;

    let patch = generate(&source, &target)?;

    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(patch_path)?);
    write_to(&patch, &mut writer)?;
    writer.flush()?;
    let patch_size = writer
        .into_inner()
        .map_err(|e| e.into_error())?
        .metadata()?
        .len();

    info!(
        "created {} ({patch_size} bytes) from {} -> {}",
        patch_path.display(),
        source_path.display(),
        target_path.display()
    );

    Ok(CreateStats {
        source_size: source.len() as u64,
        target_size: target.len() as u64,
        patch_size,
        replacements: patch.replacements().len() as u64,
        addition_size: patch.additions().len() as u64,
        source_sha1: *patch.source_digest(),
        target_sha1: *patch.target_digest(),
    })
}

// ---------------------------------------------------------------------------
// apply_file
// ---------------------------------------------------------------------------

/// Apply the patch at `patch_path` to `source_path`, writing the result to
/// `output_path`.
///
/// Parsing and the source digest check happen before the output file is
/// opened, so those failures never create or clobber it.
pub fn apply_file(
    source_path: &Path,
    patch_path: &Path,
    output_path: &Path,
    opts: &ApplyOptions,
) -> Result<ApplyStats> {
    let source = std::fs::read(source_path)?;
    let container = std::fs::read(patch_path)?;
    let patch = deserialize(&container)?;

    let actual = Digest::of(&source);
    if actual != *patch.source_digest() {
        return Err(PatchError::SourceMismatch {
            expected: *patch.source_digest(),
            actual,
        });
    }

    let mut output = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(output_path)?;

    let result = apply(&source, &patch, &mut output).and_then(|()| {
        if opts.verify {
            verify(&mut output, &patch)
        } else {
            Ok(())
        }
    });
    drop(output);

    if let Err(e) = result {
        if let Err(rm) = std::fs::remove_file(output_path) {
            warn!("could not remove failed output {}: {rm}", output_path.display());
        }
        return Err(e);
    }

    info!(
        "patched {} -> {} ({} bytes)",
        source_path.display(),
        output_path.display(),
        patch.target_size()
    );

    Ok(ApplyStats {
        source_size: source.len() as u64,
        patch_size: container.len() as u64,
        output_size: u64::from(patch.target_size()),
        replacements: patch.replacements().len() as u64,
        verified: opts.verify,
        output_sha1: *patch.target_digest(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
