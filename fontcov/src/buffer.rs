// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading and writing of persisted coverage data.
//!
//! All values are big-endian. Arrays are prefixed with a `u32` element count.

use alloc::vec::Vec;
use read_fonts::{types::BigEndian, FontData, ReadError};

/// Forward-only cursor over a borrowed byte buffer.
///
/// Arrays returned by the reader are views into the buffer rather than
/// copies, so anything decoded from it borrows the buffer for `'a`.
#[derive(Clone, Debug)]
pub struct BufferReader<'a> {
    data: FontData<'a>,
    pos: usize,
}

impl<'a> BufferReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: FontData::new(data),
            pos: 0,
        }
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes that have not been consumed.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        let value = self.data.read_at::<u8>(self.pos)?;
        self.pos += 1;
        Ok(value)
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        let value = self.data.read_at::<u16>(self.pos)?;
        self.pos += 2;
        Ok(value)
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let value = self.data.read_at::<u32>(self.pos)?;
        self.pos += 4;
        Ok(value)
    }

    /// Reads a length-prefixed array of `u32` values without copying it.
    pub fn read_u32_array(&mut self) -> Result<&'a [BigEndian<u32>], ReadError> {
        let len = self.read_u32()? as usize;
        let end = len
            .checked_mul(4)
            .and_then(|byte_len| self.pos.checked_add(byte_len))
            .ok_or(ReadError::OutOfBounds)?;
        let array = self.data.read_array::<BigEndian<u32>>(self.pos..end)?;
        self.pos = end;
        Ok(array)
    }
}

/// Appending writer for persisted data.
///
/// A writer created with [`measure`](Self::measure) only counts bytes, which
/// is useful for sizing a destination before writing for real.
#[derive(Clone, Debug)]
pub struct BufferWriter {
    data: Option<Vec<u8>>,
    len: usize,
}

impl BufferWriter {
    /// Creates a writer that stores everything written to it.
    pub fn new() -> Self {
        Self {
            data: Some(Vec::new()),
            len: 0,
        }
    }

    /// Creates a writer that discards its input and only tracks the length.
    pub fn measure() -> Self {
        Self { data: None, len: 0 }
    }

    /// Returns the number of bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Consumes the writer and returns the written bytes.
    ///
    /// A measuring writer returns an empty vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data.unwrap_or_default()
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    /// Writes a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    /// Writes a length-prefixed array of `u32` values.
    pub fn write_u32_array(&mut self, values: impl ExactSizeIterator<Item = u32>) {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Persisted arrays are bounded by the coverage domain, far below u32::MAX."
        )]
        self.write_u32(values.len() as u32);
        for value in values {
            self.write_u32(value);
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        if let Some(data) = self.data.as_mut() {
            data.extend_from_slice(bytes);
        }
        self.len += bytes.len();
    }
}

impl Default for BufferWriter {
    fn default() -> Self {
        Self::new()
    }
}
