//! Table checksums

/// Sum the big-endian `u32` words of `bytes`, zero-padding a trailing
/// partial word.
pub(crate) fn sum_words(bytes: &[u8]) -> u32 {
    let mut chunks = bytes.chunks_exact(4);
    let mut sum = chunks
        .by_ref()
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .fold(0u32, u32::wrapping_add);
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut last = [0u8; 4];
        last[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

/// Checksum `bytes`, or only the given `(low, high)` ranges of it.
///
/// `ranges` is a flat list of boundaries: each pair is a half-open range,
/// and a lone trailing boundary runs to the end of the data. Boundaries past
/// the end of the data are clamped. Each range is summed independently, so
/// word alignment restarts at every `low`.
pub(crate) fn checksum(bytes: &[u8], ranges: &[usize]) -> u32 {
    if ranges.is_empty() {
        return sum_words(bytes);
    }
    ranges
        .chunks(2)
        .map(|pair| {
            let low = pair[0].min(bytes.len());
            let high = pair.get(1).copied().unwrap_or(bytes.len()).min(bytes.len());
            sum_words(bytes.get(low..high).unwrap_or_default())
        })
        .fold(0u32, u32::wrapping_add)
}
