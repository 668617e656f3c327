//! Binary search over arrays embedded in table data

use crate::error::ReadError;
use crate::readable::ReadableData;

impl ReadableData {
    /// Find the range containing `key` in a pair of parallel `u16` arrays.
    ///
    /// The start of range `i` is at `start_offset + i * start_stride` and its
    /// (inclusive) end at `end_offset + i * end_stride`. Ranges must be sorted
    /// and disjoint. Returns the index of the matching range, or `None` if no
    /// range contains `key` (including when `count` is zero).
    pub fn search_u16_range(
        &self,
        start_offset: usize,
        start_stride: usize,
        end_offset: usize,
        end_stride: usize,
        count: usize,
        key: u16,
    ) -> Result<Option<usize>, ReadError> {
        search_ranges(count, key, |i| {
            Ok((
                self.read_at::<u16>(start_offset + i * start_stride)?,
                self.read_at::<u16>(end_offset + i * end_stride)?,
            ))
        })
    }

    /// As [`search_u16_range`], for arrays of `u32` values that must fit in
    /// an `i32`.
    ///
    /// [`search_u16_range`]: ReadableData::search_u16_range
    pub fn search_u32_range(
        &self,
        start_offset: usize,
        start_stride: usize,
        end_offset: usize,
        end_stride: usize,
        count: usize,
        key: i32,
    ) -> Result<Option<usize>, ReadError> {
        search_ranges(count, key, |i| {
            Ok((
                self.read_u32_as_i32(start_offset + i * start_stride)?,
                self.read_u32_as_i32(end_offset + i * end_stride)?,
            ))
        })
    }

    /// Find `key` in a sorted array of `u16` values.
    pub fn search_u16(
        &self,
        offset: usize,
        stride: usize,
        count: usize,
        key: u16,
    ) -> Result<Option<usize>, ReadError> {
        search_ranges(count, key, |i| {
            let value = self.read_at::<u16>(offset + i * stride)?;
            Ok((value, value))
        })
    }
}

fn search_ranges<T: Ord + Copy>(
    count: usize,
    key: T,
    mut range_at: impl FnMut(usize) -> Result<(T, T), ReadError>,
) -> Result<Option<usize>, ReadError> {
    let (mut lo, mut hi) = (0, count);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let (start, end) = range_at(mid)?;
        if key < start {
            hi = mid;
        } else if key > end {
            lo = mid + 1;
        } else {
            return Ok(Some(mid));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_data(values: &[u16]) -> ReadableData {
        values
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn empty_arrays_are_not_found() {
        let data = ReadableData::default();
        assert_eq!(data.search_u16(0, 2, 0, 5), Ok(None));
        assert_eq!(data.search_u16_range(0, 4, 2, 4, 0, 5), Ok(None));
        assert_eq!(data.search_u32_range(0, 8, 4, 8, 0, 5), Ok(None));
    }

    #[test]
    fn single_keys() {
        let data = u16_data(&[2, 4, 8, 16, 32]);
        assert_eq!(data.search_u16(0, 2, 5, 2), Ok(Some(0)));
        assert_eq!(data.search_u16(0, 2, 5, 32), Ok(Some(4)));
        assert_eq!(data.search_u16(0, 2, 5, 9), Ok(None));
        assert_eq!(data.search_u16(0, 2, 5, 0), Ok(None));
        // a count larger than the data fails loudly
        assert_eq!(data.search_u16(0, 2, 9, 100), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn interleaved_ranges() {
        // (start, end, payload) triples
        let data = u16_data(&[1, 2, 0, 4, 8, 2, 20, 20, 7]);
        let find = |key| data.search_u16_range(0, 6, 2, 6, 3, key).unwrap();
        assert_eq!(find(0), None);
        assert_eq!(find(1), Some(0));
        assert_eq!(find(3), None);
        assert_eq!(find(6), Some(1));
        assert_eq!(find(20), Some(2));
        assert_eq!(find(21), None);
    }

    #[test]
    fn parallel_u32_ranges() {
        // starts: [0, 100], ends: [10, 200]
        let bytes = [0u32, 100, 10, 200]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect::<Vec<_>>();
        let data = ReadableData::from(bytes);
        assert_eq!(data.search_u32_range(0, 4, 8, 4, 2, 150), Ok(Some(1)));
        assert_eq!(data.search_u32_range(0, 4, 8, 4, 2, 50), Ok(None));
        assert_eq!(data.search_u32_range(0, 4, 8, 4, 2, -1), Ok(None));
    }
}
