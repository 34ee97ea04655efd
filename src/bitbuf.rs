//! Bit-addressable buffering.
//!
//! [`BitBuffer`] owns a byte array and exposes it at bit granularity through
//! two independent cursors: an append-only write cursor and a read cursor
//! that trails it. Bulk transfers pick between a byte-granularity fast path
//! and a masked shift/OR path depending on cursor alignment.
//!
//! Bit `i` of the stream lives in byte `i >> 3` at intra-byte position
//! `i & 7`, counted from the least-significant bit. This ordering is the
//! wire contract; every read and write path preserves it.

use crate::error::{Error, Result};

/// Copies whole bytes between two byte-aligned bit offsets.
///
/// Both offsets must be byte-aligned and `bit_count` must cover at least one
/// byte; preconditions are checked in debug builds only. Copies
/// `bit_count / 8` bytes and returns the number of bits moved (always a
/// multiple of 8). Any trailing bits are the caller's problem.
pub(crate) fn aligned_bit_copy(
    dest: &mut [u8],
    dest_offset: usize,
    source: &[u8],
    source_offset: usize,
    bit_count: usize,
) -> usize {
    debug_assert_eq!(dest_offset & 7, 0);
    debug_assert_eq!(source_offset & 7, 0);
    debug_assert!(bit_count >= 8);

    let byte_count = bit_count >> 3;
    let dest_start = dest_offset >> 3;
    let source_start = source_offset >> 3;

    dest[dest_start..dest_start + byte_count]
        .copy_from_slice(&source[source_start..source_start + byte_count]);

    byte_count << 3
}

/// Copies exactly `bit_count` bits between arbitrary bit offsets.
///
/// Works one chunk at a time, where each chunk is the widest run that stays
/// inside a single source byte and a single destination byte. The target
/// window is cleared before the source window is shifted into place, so
/// stale bits in the destination never leak through.
pub(crate) fn unaligned_bit_copy(
    dest: &mut [u8],
    mut dest_offset: usize,
    source: &[u8],
    mut source_offset: usize,
    bit_count: usize,
) -> usize {
    debug_assert!(bit_count > 0);

    let source_limit = source_offset + bit_count;

    while source_offset < source_limit {
        let dest_byte = dest_offset >> 3;
        let dest_bit = dest_offset & 7;
        let source_byte = source_offset >> 3;
        let source_bit = source_offset & 7;
        let bits_left = source_limit - source_offset;

        let width = (8 - dest_bit).min(8 - source_bit).min(bits_left);
        let mask = ((1u16 << width) - 1) as u8;

        dest[dest_byte] &= !(mask << dest_bit);
        dest[dest_byte] |= ((source[source_byte] >> source_bit) & mask) << dest_bit;

        source_offset += width;
        dest_offset += width;
    }

    bit_count
}

fn alloc_bytes(byte_count: usize) -> Result<Vec<u8>> {
    let mut store = Vec::new();
    store
        .try_reserve_exact(byte_count)
        .map_err(|_| Error::OutOfMemory)?;
    store.resize(byte_count, 0);
    Ok(store)
}

/// An owned, bit-addressable byte buffer with independent read and write
/// cursors.
///
/// Writes append at the write cursor and fail closed with
/// [`Error::CapacityLimit`] when the buffer is full; the cursor never moves
/// on a failed write. Unit reads consume at the read cursor and underflow
/// with [`Error::InvalidResource`]; bulk reads degrade to short reads
/// instead. [`seek`](BitBuffer::seek) repositions the read cursor only —
/// there is deliberately no way to move the write cursor backwards.
#[derive(Clone, Debug, Default)]
pub struct BitBuffer {
    store: Vec<u8>,
    read_index: usize,
    write_index: usize,
}

impl BitBuffer {
    /// Create an empty buffer with no backing storage.
    pub fn new() -> Self {
        Self {
            store: Vec::new(),
            read_index: 0,
            write_index: 0,
        }
    }

    /// Create a buffer with at least `bits` bits of capacity, rounded up to
    /// a whole byte.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a zero bit count and `OutOfMemory` if the
    /// backing allocation fails.
    pub fn with_capacity(bits: usize) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.resize(bits)?;
        Ok(buffer)
    }

    /// Create a buffer holding a copy of `bytes`, with the write cursor
    /// placed after the last copied bit.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty slice and `OutOfMemory` if the
    /// backing allocation fails.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.assign(bytes)?;
        Ok(buffer)
    }

    /// Borrow the backing bytes covering every bit written so far.
    pub fn data(&self) -> &[u8] {
        &self.store[..self.write_index.div_ceil(8)]
    }

    /// Total capacity in bits.
    pub fn capacity_bits(&self) -> usize {
        self.store.len() << 3
    }

    /// Number of live (written but unread) bits.
    pub fn occupancy_bits(&self) -> usize {
        self.write_index - self.read_index
    }

    /// Number of bytes needed to hold the live bits.
    pub fn occupancy_bytes(&self) -> usize {
        self.occupancy_bits().div_ceil(8)
    }

    /// Discard the contents and reallocate for `bits` bits of capacity,
    /// rounded up to a whole byte. Both cursors return to zero.
    ///
    /// # Errors
    /// Returns `InvalidArg` for a zero bit count and `OutOfMemory` if the
    /// backing allocation fails.
    pub fn resize(&mut self, bits: usize) -> Result<()> {
        if bits == 0 {
            return Err(Error::InvalidArg("bit capacity must be nonzero"));
        }

        self.clear();
        self.store = alloc_bytes(bits.div_ceil(8))?;
        Ok(())
    }

    /// Replace the contents with a copy of `bytes` and mark all of them as
    /// written.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an empty slice and `OutOfMemory` if the
    /// backing allocation fails.
    pub fn assign(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Err(Error::InvalidArg("cannot assign an empty slice"));
        }

        self.clear();

        let mut store = alloc_bytes(bytes.len())?;
        store.copy_from_slice(bytes);

        self.store = store;
        self.write_index = bytes.len() << 3;
        Ok(())
    }

    /// Move the read cursor to `bit_offset`, clamped to the write cursor.
    pub fn seek(&mut self, bit_offset: usize) {
        self.read_index = bit_offset.min(self.write_index);
    }

    /// Release the backing storage and reset both cursors.
    pub fn clear(&mut self) {
        self.empty();
        self.store = Vec::new();
    }

    /// Reset both cursors without releasing storage.
    pub fn empty(&mut self) {
        self.read_index = 0;
        self.write_index = 0;
    }

    /// Whether every written bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.read_index == self.write_index
    }

    /// Whether the write cursor has reached capacity.
    pub fn is_full(&self) -> bool {
        self.write_index == self.capacity_bits()
    }

    /// Append a single bit (the low bit of `value`).
    ///
    /// # Errors
    /// Returns `CapacityLimit` when the buffer is full; the cursor does not
    /// move.
    pub fn write_bit(&mut self, value: u8) -> Result<()> {
        if self.write_index >= self.capacity_bits() {
            return Err(Error::CapacityLimit);
        }

        let byte = self.write_index >> 3;
        let bit = self.write_index & 7;

        // Unused storage is not guaranteed zero-filled by every path, so
        // clear the target bit before setting it.
        self.store[byte] = (self.store[byte] & !(1u8 << bit)) | ((value & 1) << bit);
        self.write_index += 1;

        Ok(())
    }

    /// Append a byte, least-significant bit first.
    ///
    /// # Errors
    /// Returns `CapacityLimit` when fewer than 8 bits of capacity remain;
    /// the cursor does not move.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        if self.write_index + 8 > self.capacity_bits() {
            return Err(Error::CapacityLimit);
        }

        if self.write_index & 7 == 0 {
            self.store[self.write_index >> 3] = value;
            self.write_index += 8;
        } else {
            for i in 0..8 {
                self.write_bit((value >> i) & 1)?;
            }
        }

        Ok(())
    }

    /// Append the first `bit_count` bits of `source`.
    ///
    /// Runs the byte-granularity fast path over as much of the transfer as
    /// the write cursor's alignment allows, then the masked path over the
    /// remainder. `bit_count` must be nonzero and within `source`; this is
    /// checked in debug builds only.
    ///
    /// # Errors
    /// Returns `CapacityLimit` when the bits would not fit; the cursor does
    /// not move.
    pub fn write_bits(&mut self, source: &[u8], bit_count: usize) -> Result<()> {
        debug_assert!(bit_count > 0);
        debug_assert!(bit_count <= source.len() << 3);

        if self.write_index + bit_count > self.capacity_bits() {
            return Err(Error::CapacityLimit);
        }

        let mut copied = 0;

        if self.write_index & 7 == 0 && bit_count >= 8 {
            copied = aligned_bit_copy(&mut self.store, self.write_index, source, 0, bit_count);
        }

        if copied < bit_count {
            copied += unaligned_bit_copy(
                &mut self.store,
                self.write_index + copied,
                source,
                copied,
                bit_count - copied,
            );
        }

        self.write_index += copied;
        Ok(())
    }

    /// Append every byte of `bytes`, which must be nonempty (checked in
    /// debug builds only).
    ///
    /// # Errors
    /// Returns `CapacityLimit` when the bytes would not fit; the cursor does
    /// not move.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_bits(bytes, bytes.len() << 3)
    }

    /// Consume and return a single bit.
    ///
    /// # Errors
    /// Returns `InvalidResource` when no unread bits remain.
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.read_index >= self.write_index {
            return Err(Error::InvalidResource("bit read past the write cursor"));
        }

        let byte = self.read_index >> 3;
        let bit = self.read_index & 7;
        self.read_index += 1;

        Ok((self.store[byte] >> bit) & 1)
    }

    /// Consume and return a byte, least-significant bit first.
    ///
    /// # Errors
    /// Returns `InvalidResource` when fewer than 8 unread bits remain.
    pub fn read_byte(&mut self) -> Result<u8> {
        if self.read_index + 8 > self.write_index {
            return Err(Error::InvalidResource("byte read past the write cursor"));
        }

        if self.read_index & 7 == 0 {
            let value = self.store[self.read_index >> 3];
            self.read_index += 8;
            Ok(value)
        } else {
            let mut value = 0;
            for i in 0..8 {
                value |= self.read_bit()? << i;
            }
            Ok(value)
        }
    }

    /// Consume up to `bit_count` bits into `dest`, returning the number
    /// actually read.
    ///
    /// Short reads at the end of the buffer are a success, not an error.
    /// `bit_count` must be nonzero and within `dest`; this is checked in
    /// debug builds only.
    pub fn read_bits(&mut self, dest: &mut [u8], bit_count: usize) -> Result<usize> {
        debug_assert!(bit_count > 0);
        debug_assert!(bit_count <= dest.len() << 3);

        let count = bit_count.min(self.write_index - self.read_index);
        if count == 0 {
            return Ok(0);
        }

        let mut copied = 0;

        if self.read_index & 7 == 0 && count >= 8 {
            copied = aligned_bit_copy(dest, 0, &self.store, self.read_index, count);
        }

        if copied < count {
            copied += unaligned_bit_copy(
                dest,
                copied,
                &self.store,
                self.read_index + copied,
                count - copied,
            );
        }

        self.read_index += copied;
        Ok(copied)
    }

    /// Consume up to `dest.len()` bytes into `dest` (nonempty, checked in
    /// debug builds only), returning the number of whole bytes read.
    ///
    /// The read cursor advances over every bit consumed, but the returned
    /// count is rounded down to whole bytes.
    pub fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        let bits_read = self.read_bits(dest, dest.len() << 3)?;
        Ok(bits_read >> 3)
    }
}
