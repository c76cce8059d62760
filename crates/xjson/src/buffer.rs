//! Growable byte sink used as the encoder's single output buffer.
//!
//! One [`Buffer`] is owned per `encode` call. Growth doubles from an initial
//! 64-byte capacity, with a minimum increment of the requested size so a
//! single large `push_bytes` never triggers more than one reallocation.
//! [`Buffer::finish`] keeps a trailing NUL sentinel byte in the allocation
//! (but outside the reported length) for callers that want to hand the
//! bytes to a C string API without another copy.

use alloc::vec::Vec;

const INITIAL_CAPACITY: usize = 64;

#[derive(Debug)]
pub(crate) struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    pub(crate) fn new() -> Self {
        Self {
            data: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    /// Guarantee at least `n` bytes of spare tail capacity.
    #[inline]
    pub(crate) fn reserve(&mut self, n: usize) {
        let spare = self.data.capacity() - self.data.len();
        if spare >= n {
            return;
        }
        let needed = n - spare;
        let doubled = self.data.capacity();
        self.data.reserve(needed.max(doubled));
    }

    #[inline]
    pub(crate) fn push_byte(&mut self, b: u8) {
        self.data.push(b);
    }

    #[inline]
    pub(crate) fn push_bytes(&mut self, s: &[u8]) {
        self.data.extend_from_slice(s);
    }

    #[inline]
    pub(crate) fn push_str(&mut self, s: &str) {
        self.push_bytes(s.as_bytes());
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the accumulated bytes. A zero sentinel
    /// is appended to the underlying allocation but excluded from the
    /// returned `Vec`'s reported length.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.data.reserve(1);
        let len = self.data.len();
        // SAFETY: capacity was just reserved for one more byte; writing the
        // sentinel past `len` and then restoring `len` keeps the Vec's
        // reported contents unchanged while the allocation itself carries a
        // trailing NUL.
        unsafe {
            let ptr = self.data.as_mut_ptr().add(len);
            ptr.write(0);
        }
        self.data
    }
}
