//! SHA-256 hashing for content addressing.
//!
//! [`ContentHasher`] accepts content in arbitrary chunks, so sequences that are
//! decoded on demand can be hashed window by window without holding the whole
//! content in memory.

use sha2::{Digest, Sha256};

/// Calculate the SHA-256 hash of in-memory data.
pub fn sha256(data: &[u8]) -> String {
    let mut hasher = ContentHasher::new();
    hasher.update(data);
    hasher.finish_hex()
}

/// Incremental SHA-256 over content delivered in chunks.
///
/// Feeding the same bytes in any chunking produces the same digest as
/// [`sha256`] over the concatenation.
#[derive(Clone, Default)]
pub struct ContentHasher {
    inner: Sha256,
    bytes: u64,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of content.
    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
        self.bytes += chunk.len() as u64;
    }

    /// Total number of bytes fed so far.
    pub fn bytes_hashed(&self) -> u64 {
        self.bytes
    }

    /// Consume the hasher and return the lowercase hex digest.
    pub fn finish_hex(self) -> String {
        hex::encode(self.inner.finalize())
    }
}
