//! Bounds-checked random access over an in-memory MD3 blob
//!
//! Every offset in an MD3 file comes from the file itself, so nothing is
//! sliced out of the input without first checking `offset + size` against
//! the measured length of the data.

use crate::error::{Md3Error, Result};
use log::error;

/// Check that `size` bytes starting at `offset` fit inside `limit` bytes
pub fn check_bounds(offset: i64, size: u64, limit: u64) -> Result<()> {
    let out_of_bounds = Md3Error::OutOfBounds {
        offset,
        size,
        limit,
    };

    if offset < 0 {
        error!("Negative offset {} (size {})", offset, size);
        return Err(out_of_bounds);
    }

    match (offset as u64).checked_add(size) {
        Some(end) if end <= limit => Ok(()),
        _ => {
            error!(
                "Offset {} with size {} is out of bounds (limit {})",
                offset, size, limit
            );
            Err(out_of_bounds)
        }
    }
}

/// Size in bytes of `count` records of `record_size` bytes each
pub fn block_size(count: usize, record_size: usize) -> Result<u64> {
    (count as u64)
        .checked_mul(record_size as u64)
        .ok_or(Md3Error::OutOfBounds {
            offset: 0,
            size: u64::MAX,
            limit: 0,
        })
}

/// Reserve room for `count` decoded records without aborting on failure
pub fn try_vec<T>(what: &'static str, count: usize) -> Result<Vec<T>> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(count)
        .map_err(|source| Md3Error::Allocation {
            what,
            bytes: (count as u64).saturating_mul(std::mem::size_of::<T>() as u64),
            source,
        })?;
    Ok(values)
}

/// Read-only view over the whole input, with every access bounds checked
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    /// Wrap an input blob
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Measured length of the input
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the input is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `size` bytes at `offset`, failing if any of them lie outside
    /// the input
    pub fn read_at(&self, offset: i64, size: u64) -> Result<&'a [u8]> {
        check_bounds(offset, size, self.data.len() as u64)?;
        let start = offset as usize;
        Ok(&self.data[start..start + size as usize])
    }
}
