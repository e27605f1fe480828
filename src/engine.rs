// In-memory entry points tying the generator, container codec, applier and
// verifier together.
//
//   create: source, target -> Patch -> container bytes
//   patch:  container bytes -> Patch; source + Patch -> output -> verified

use std::io::Cursor;

use crate::apply::{apply, verify};
use crate::container::{deserialize, serialize};
use crate::diff::generate;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Apply options
// ---------------------------------------------------------------------------

/// Configuration for applying a patch.
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Re-hash the output and compare against the recorded target digest.
    pub verify: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self { verify: true }
    }
}

// ---------------------------------------------------------------------------
// High-level create
// ---------------------------------------------------------------------------

/// Diff `source` against `target` and return the serialized container.
pub fn create(source: &[u8], target: &[u8]) -> Result<Vec<u8>> {
    let patch = generate(source, target)?;
    Ok(serialize(&patch))
}

// ---------------------------------------------------------------------------
// High-level apply
// ---------------------------------------------------------------------------

/// Parse `container`, apply it to `source` and return the verified target.
pub fn patch(source: &[u8], container: &[u8]) -> Result<Vec<u8>> {
    patch_with_options(source, container, &ApplyOptions::default())
}

/// Apply with custom options.
pub fn patch_with_options(source: &[u8], container: &[u8], opts: &ApplyOptions) -> Result<Vec<u8>> {
    let patch = deserialize(container)?;

    let mut sink = Cursor::new(Vec::with_capacity(source.len() + patch.additions().len()));
    apply(source, &patch, &mut sink)?;
    if opts.verify {
        verify(&mut sink, &patch)?;
    }
    Ok(sink.into_inner())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
