// SHA-1 content fingerprints for source and target buffers.
//
// The container stores raw 20-byte digests; `Digest` wraps them so they
// compare by value and print as lowercase hex in diagnostics.

use std::fmt;

use sha1::{Digest as _, Sha1};

/// Digest length in bytes (SHA-1).
pub const DIGEST_LEN: usize = 20;

/// Fixed-size content fingerprint of a byte buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Hash `data` in one shot.
    pub fn of(data: &[u8]) -> Self {
        let mut h = Hasher::new();
        h.update(data);
        h.finalize()
    }

    /// Wrap raw digest bytes read from a container.
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Incremental hasher, for contents that arrive in chunks (e.g. a sink
/// being read back).
#[derive(Clone, Default)]
pub struct Hasher {
    inner: Sha1,
}

impl Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(self) -> Digest {
        Digest(self.inner.finalize().into())
    }
}

/// Shorthand for [`Digest::of`].
pub fn digest(data: &[u8]) -> Digest {
    Digest::of(data)
}
