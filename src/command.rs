// ============================================================================
// src/command.rs – bounded NAME=value, command buffer
// ============================================================================

use crate::error::SoftapError;
use zeroize::Zeroizing;

/// Control-channel buffer size the Broadcom-style drivers accept.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Terminal token of every private command.
pub const SENTINEL: &str = "END";

/// Fixed-capacity command buffer. `cursor` is the byte length written so far;
/// the content is always a run of complete `NAME=value,` fields.
pub struct CommandBuffer {
    buf: Zeroizing<String>,
    capacity: usize,
}

impl CommandBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Zeroizing::new(String::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> usize {
        self.buf.len()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Write `name=value,` or fail without touching the buffer.
    pub fn append_field(&mut self, name: &str, value: &str) -> Result<usize, SoftapError> {
        let needed = self.cursor() + name.len() + 1 + value.len() + 1;
        if needed > self.capacity {
            return Err(SoftapError::BufferOverflow {
                needed,
                capacity: self.capacity,
            });
        }
        self.buf.push_str(name);
        self.buf.push('=');
        self.buf.push_str(value);
        self.buf.push(',');
        Ok(self.cursor())
    }

    /// Append the sentinel and hand out the finished command text.
    pub fn finish(mut self) -> Result<Zeroizing<String>, SoftapError> {
        let needed = self.cursor() + SENTINEL.len();
        if needed > self.capacity {
            return Err(SoftapError::BufferOverflow {
                needed,
                capacity: self.capacity,
            });
        }
        self.buf.push_str(SENTINEL);
        Ok(self.buf)
    }
}
