//! Binpatch: self-verifying binary patches for fixed-size images.
//!
//! The crate provides:
//! - A byte-run delta generator (`diff`)
//! - The binary patch container format (`container`)
//! - Checked application and result verification (`apply`)
//! - In-memory and file-oriented helpers (`engine`, `io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! let source = b"firmware v1.0 image";
//! let target = b"firmware v1.1 image!";
//!
//! let container = binpatch::engine::create(source, target).unwrap();
//! let rebuilt = binpatch::engine::patch(source, &container).unwrap();
//! assert_eq!(rebuilt, target);
//! ```

pub mod apply;
pub mod container;
pub mod diff;
pub mod digest;
pub mod engine;
pub mod error;
pub mod io;
pub mod patch;

#[cfg(feature = "cli")]
pub mod cli;

pub use apply::{PatchSink, apply, verify};
pub use container::{deserialize, serialize};
pub use diff::generate;
pub use digest::{Digest, digest};
pub use error::{BodyDefect, PatchError, Result};
pub use patch::{Patch, PatchSummary, Replacement};
