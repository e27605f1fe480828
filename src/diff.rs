// Delta generation: a single forward pass over the overlapping prefix of
// source and target.
//
// Positions are compared pairwise; there is no alignment search, so an
// inserted or removed byte turns the rest of the overlap into one long
// replacement run. Bytes past the end of the source become the addition
// block.

use log::{debug, trace};

use crate::digest::digest;
use crate::error::{PatchError, Result};
use crate::patch::{Patch, Replacement};

/// Scanner state for the run currently being built.
#[derive(Debug)]
enum RunState {
    Idle,
    Accumulating { start: u32, bytes: Vec<u8> },
}

impl RunState {
    /// Close the open run, if any, pushing it into `out`.
    fn close(&mut self, out: &mut Vec<Replacement>) {
        if let Self::Accumulating { start, bytes } = std::mem::replace(self, Self::Idle) {
            trace!("run at {start}: {} bytes", bytes.len());
            out.push(Replacement::new(start, bytes));
        }
    }
}

fn checked_len(buf: &[u8]) -> Result<u32> {
    u32::try_from(buf.len()).map_err(|_| PatchError::TooLarge {
        len: buf.len() as u64,
    })
}

/// Build the patch that turns `source` into `target`.
///
/// Fails only with [`PatchError::TooLarge`] when either buffer is longer
/// than the container's 32-bit offsets can address.
pub fn generate(source: &[u8], target: &[u8]) -> Result<Patch> {
    checked_len(source)?;
    let target_size = checked_len(target)?;

    let overlap = source.len().min(target.len());
    let mut replacements = Vec::new();
    let mut state = RunState::Idle;

    for (i, (&s, &t)) in source[..overlap].iter().zip(&target[..overlap]).enumerate() {
        if s == t {
            state.close(&mut replacements);
            continue;
        }
        match &mut state {
            RunState::Accumulating { bytes, .. } => bytes.push(t),
            RunState::Idle => {
                // `i < overlap <= u32::MAX`, checked above.
                state = RunState::Accumulating {
                    start: i as u32,
                    bytes: vec![t],
                };
            }
        }
    }
    state.close(&mut replacements);

    let additions = target.get(source.len()..).unwrap_or_default().to_vec();

    debug!(
        "generated patch: {} replacement runs, {} addition bytes, target size {target_size}",
        replacements.len(),
        additions.len()
    );

    Ok(Patch::from_parts(
        target_size,
        digest(source),
        digest(target),
        replacements,
        additions,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(p: &Patch) -> Vec<(u32, &[u8])> {
        p.replacements()
            .iter()
            .map(|r| (r.offset(), r.data()))
            .collect()
    }

    #[test]
    fn single_byte_change() {
        let p = generate(b"AAAA", b"ABAA").unwrap();
        assert_eq!(runs(&p), vec![(1, &b"B"[..])]);
        assert!(p.additions().is_empty());
        assert_eq!(p.target_size(), 4);
    }

    #[test]
    fn pure_extension() {
        let p = generate(b"AB", b"ABCD").unwrap();
        assert!(p.replacements().is_empty());
        assert_eq!(p.additions(), b"CD");
        assert_eq!(p.target_size(), 4);
    }

    #[test]
    fn pure_truncation() {
        let p = generate(b"ABCDEF", b"ABC").unwrap();
        assert!(p.replacements().is_empty());
        assert!(p.additions().is_empty());
        assert_eq!(p.target_size(), 3);
    }

    #[test]
    fn identity() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let p = generate(&data, &data).unwrap();
        assert!(p.replacements().is_empty());
        assert!(p.additions().is_empty());
        assert_eq!(p.source_digest(), p.target_digest());
    }

    #[test]
    fn empty_buffers() {
        let p = generate(b"", b"").unwrap();
        assert!(p.replacements().is_empty());
        assert!(p.additions().is_empty());
        assert_eq!(p.target_size(), 0);

        let p = generate(b"", b"new").unwrap();
        assert_eq!(p.additions(), b"new");

        let p = generate(b"old", b"").unwrap();
        assert_eq!(p.target_size(), 0);
        assert!(p.replacements().is_empty());
    }

    #[test]
    fn one_matching_byte_splits_runs() {
        let p = generate(b"000000", b"110110").unwrap();
        assert_eq!(runs(&p), vec![(0, &b"11"[..]), (3, &b"11"[..])]);
    }

    #[test]
    fn run_reaching_end_of_overlap_is_closed() {
        let p = generate(b"abcd", b"abXYZW").unwrap();
        assert_eq!(runs(&p), vec![(2, &b"XY"[..])]);
        assert_eq!(p.additions(), b"ZW");
    }

    #[test]
    fn shifted_content_becomes_one_run() {
        let source = b"0123456789";
        let target = b"x0123456789";
        let p = generate(source, target).unwrap();
        assert_eq!(runs(&p), vec![(0, &b"x012345678"[..])]);
        assert_eq!(p.additions(), b"9");
    }

    #[test]
    fn runs_stay_inside_overlap_and_ascend() {
        let source: Vec<u8> = (0..200u32).map(|i| (i * 7) as u8).collect();
        let target: Vec<u8> = (0..150u32).map(|i| (i * 7 + (i % 3 == 0) as u32) as u8).collect();
        let p = generate(&source, &target).unwrap();
        let mut prev_end = 0u64;
        for (i, r) in p.replacements().iter().enumerate() {
            assert!(!r.data().is_empty());
            if i > 0 {
                assert!(u64::from(r.offset()) > prev_end);
            }
            assert!(r.end() <= 150);
            prev_end = r.end();
        }
    }
}
