//! Reusable scratch buffers for encoding.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// Largest allocation a released buffer may keep and still be pooled.
///
/// Buffers that grew past this while encoding a large image are freed instead,
/// so idle memory stays bounded by `capacity * MAX_RETAINED_BYTES`.
pub const MAX_RETAINED_BYTES: usize = 4 * 1024 * 1024;

/// A thread-safe pool of encode buffers.
///
/// Buffers carry no payload data between uses: they are cleared before they
/// go back into the pool. A pool with capacity 0 never retains anything, which
/// behaves exactly like allocating per call.
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    capacity: usize,
}

impl BufferPool {
    /// Create a pool that keeps at most `capacity` idle buffers.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Take a buffer for exclusive use. It returns to the pool on drop.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buffer = self
            .buffers
            .lock()
            .ok()
            .and_then(|mut idle| idle.pop())
            .unwrap_or_default();
        PooledBuffer { pool: self, buffer }
    }

    /// Number of idle buffers currently held.
    pub fn idle(&self) -> usize {
        self.buffers.lock().map(|idle| idle.len()).unwrap_or(0)
    }

    /// Total bytes allocated by idle buffers.
    pub fn retained_bytes(&self) -> usize {
        self.buffers
            .lock()
            .map(|idle| idle.iter().map(Vec::capacity).sum())
            .unwrap_or(0)
    }

    fn release(&self, mut buffer: Vec<u8>) {
        if buffer.capacity() > MAX_RETAINED_BYTES {
            return;
        }
        buffer.clear();
        if let Ok(mut idle) = self.buffers.lock() {
            if idle.len() < self.capacity {
                idle.push(buffer);
            }
        }
    }
}

/// Exclusive handle to a pooled buffer.
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buffer: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buffer));
    }
}
