//! Owned byte storage

use std::io::{self, Read, Write};

use crate::error::{ReadError, WriteError};

/// The size of the scratch buffer used for bulk and stream copies.
pub const COPY_CHUNK_LEN: usize = 8192;

/// A contiguous, bounds-checked buffer of bytes.
///
/// A store tracks two lengths: the *storage* length, which is its current
/// capacity, and the *filled* length, which is the extent that has been
/// written (or, for a store created from existing bytes, all of it). Only
/// filled bytes can be read.
///
/// A fixed store rejects writes past its storage length. A growable store
/// reallocates instead; views onto it address it by offset, so they remain
/// valid across growth.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ByteStore {
    bytes: Vec<u8>,
    filled_len: usize,
    growable: bool,
}

impl ByteStore {
    /// A fixed-capacity store of `storage_len` zeroed, unfilled bytes.
    pub fn fixed(storage_len: usize) -> Self {
        ByteStore {
            bytes: vec![0; storage_len],
            filled_len: 0,
            growable: false,
        }
    }

    /// A growable store with an initial capacity of `capacity_hint` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity_hint` is zero.
    pub fn growable(capacity_hint: usize) -> Self {
        assert!(
            capacity_hint > 0,
            "a growable store needs a non-zero initial capacity"
        );
        ByteStore {
            bytes: vec![0; capacity_hint],
            filled_len: 0,
            growable: true,
        }
    }

    /// A fixed store holding exactly these bytes, all of them filled.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        ByteStore {
            filled_len: bytes.len(),
            bytes,
            growable: false,
        }
    }

    /// The number of readable bytes.
    pub fn len(&self) -> usize {
        self.filled_len
    }

    pub fn is_empty(&self) -> bool {
        self.filled_len == 0
    }

    /// The current capacity of the store.
    pub fn storage_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_growable(&self) -> bool {
        self.growable
    }

    /// The filled bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.filled_len]
    }

    /// Read the byte at `index`.
    pub fn get(&self, index: usize) -> Result<u8, ReadError> {
        self.as_slice()
            .get(index)
            .copied()
            .ok_or(ReadError::OutOfBounds)
    }

    /// Copy bytes starting at `index` into `buf`, stopping at the filled length.
    ///
    /// Returns the number of bytes copied, which may be less than `buf.len()`.
    pub fn get_bytes(&self, index: usize, buf: &mut [u8]) -> usize {
        let available = self.as_slice().get(index..).unwrap_or_default();
        let len = available.len().min(buf.len());
        buf[..len].copy_from_slice(&available[..len]);
        len
    }

    /// Write a single byte at `index`.
    pub fn put(&mut self, index: usize, byte: u8) -> Result<(), WriteError> {
        self.put_bytes(index, &[byte])
    }

    /// Write `src` starting at `index`.
    ///
    /// Writes that end past the storage length grow a growable store and
    /// fail on a fixed one. The filled length is extended to cover the write.
    pub fn put_bytes(&mut self, index: usize, src: &[u8]) -> Result<(), WriteError> {
        let end = index.checked_add(src.len()).ok_or(WriteError::OutOfBounds)?;
        if end > self.bytes.len() {
            if !self.growable {
                return Err(WriteError::OutOfBounds);
            }
            let new_len = end.max(self.bytes.len().saturating_mul(2));
            log::trace!("growing store from {} to {new_len} bytes", self.bytes.len());
            self.bytes.resize(new_len, 0);
        }
        self.bytes[index..end].copy_from_slice(src);
        self.filled_len = self.filled_len.max(end);
        Ok(())
    }

    /// Copy up to `len` filled bytes starting at `src_offset` into `dest` at
    /// `dest_offset`.
    ///
    /// The copy is short if fewer than `len` bytes are filled. Returns the
    /// number of bytes copied.
    pub fn copy_to(
        &self,
        src_offset: usize,
        len: usize,
        dest: &mut ByteStore,
        dest_offset: usize,
    ) -> Result<usize, WriteError> {
        let mut buf = [0u8; COPY_CHUNK_LEN];
        let mut copied = 0;
        while copied < len {
            let want = (len - copied).min(COPY_CHUNK_LEN);
            let got = self.get_bytes(src_offset + copied, &mut buf[..want]);
            if got == 0 {
                break;
            }
            dest.put_bytes(dest_offset + copied, &buf[..got])?;
            copied += got;
        }
        Ok(copied)
    }

    /// Write up to `len` filled bytes starting at `offset` to a stream.
    pub fn copy_to_writer(
        &self,
        offset: usize,
        len: usize,
        writer: &mut impl Write,
    ) -> io::Result<usize> {
        let available = self.as_slice().get(offset..).unwrap_or_default();
        let available = &available[..len.min(available.len())];
        for chunk in available.chunks(COPY_CHUNK_LEN) {
            writer.write_all(chunk)?;
        }
        Ok(available.len())
    }

    /// Fill the store from a stream, starting at `offset`.
    ///
    /// Reads until end of stream, or until `len` bytes have been read if a
    /// length is given. Returns the number of bytes read.
    pub fn copy_from_reader(
        &mut self,
        offset: usize,
        reader: &mut impl Read,
        len: Option<usize>,
    ) -> io::Result<usize> {
        let mut buf = [0u8; COPY_CHUNK_LEN];
        let mut total = 0;
        loop {
            let want = match len {
                Some(len) if total >= len => break,
                Some(len) => (len - total).min(COPY_CHUNK_LEN),
                None => COPY_CHUNK_LEN,
            };
            let got = match reader.read(&mut buf[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.put_bytes(offset + total, &buf[..got])
                .map_err(|e| io::Error::new(io::ErrorKind::WriteZero, e))?;
            total += got;
        }
        Ok(total)
    }

    /// A hex dump of up to `len` filled bytes starting at `offset`, sixteen
    /// bytes per line.
    pub fn dump(&self, offset: usize, len: usize) -> String {
        use std::fmt::Write as _;
        let available = self.as_slice().get(offset..).unwrap_or_default();
        let available = &available[..len.min(available.len())];
        let mut out = String::new();
        for (i, line) in available.chunks(16).enumerate() {
            let _ = write!(out, "{:08x}:", offset + i * 16);
            for byte in line {
                let _ = write!(out, " {byte:02x}");
            }
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Debug for ByteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStore")
            .field("len", &self.filled_len)
            .field("storage_len", &self.bytes.len())
            .field("growable", &self.growable)
            .finish()
    }
}
