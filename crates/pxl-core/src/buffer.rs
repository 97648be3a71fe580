//! Owned, 8-byte aligned byte storage behind images.

use crate::error::{Error, Result};

const WORD: usize = std::mem::size_of::<u64>();

/// Byte buffer backed by `u64` words so that any element type up to eight
/// bytes can be reinterpreted in place.
///
/// `len` may be smaller than the word capacity after a reuse; only the first
/// `len` bytes are exposed.
#[derive(Default)]
pub(crate) struct PixelBuffer {
    words: Vec<u64>,
    len: usize,
}

impl PixelBuffer {
    /// Allocates `len` zeroed bytes.
    pub(crate) fn zeroed(len: usize) -> Result<Self> {
        let mut buf = Self::default();
        buf.ensure(len)?;
        Ok(buf)
    }

    /// Makes the buffer hold `len` bytes.
    ///
    /// Existing storage is reused when it is large enough; the returned flag
    /// tells whether new memory was allocated. Reused bytes keep their old
    /// contents.
    pub(crate) fn ensure(&mut self, len: usize) -> Result<bool> {
        let words = len.div_ceil(WORD);
        if words <= self.words.len() {
            self.len = len;
            return Ok(false);
        }

        let mut fresh = Vec::new();
        fresh
            .try_reserve_exact(words)
            .map_err(|e| Error::allocation_failed(len, e.to_string()))?;
        fresh.resize(words, 0u64);
        self.words = fresh;
        self.len = len;
        Ok(true)
    }

    /// Marks the buffer empty, keeping its capacity for reuse.
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Bytes that can be exposed without reallocating.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.words.len() * WORD
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.len]
    }

    #[inline]
    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..self.len]
    }
}

impl Clone for PixelBuffer {
    fn clone(&self) -> Self {
        Self {
            words: self.words[..self.len.div_ceil(WORD)].to_vec(),
            len: self.len,
        }
    }
}
