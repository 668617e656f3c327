//! A set of glyph ids stored as disjoint ranges.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// A set of `u16` values stored as disjoint, non-adjacent inclusive ranges.
///
/// Overlapping and adjacent ranges are merged on insertion; removing values
/// from the middle of a range splits it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RangeSet {
    // ranges[a] = b means [a, b] is in the set
    ranges: BTreeMap<u16, u16>,
}

impl RangeSet {
    pub(crate) fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of values in the set.
    pub(crate) fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|(start, end)| (end - start) as usize + 1)
            .sum()
    }

    /// The number of ranges in the set.
    pub(crate) fn num_ranges(&self) -> usize {
        self.ranges.len()
    }

    pub(crate) fn contains(&self, value: u16) -> bool {
        self.ranges
            .range(..=value)
            .next_back()
            .is_some_and(|(_, end)| *end >= value)
    }

    pub(crate) fn insert(&mut self, range: RangeInclusive<u16>) {
        let (mut start, mut end) = (*range.start(), *range.end());
        if end < start {
            return;
        }
        // a preceding range that overlaps or touches
        if let Some((&prev_start, &prev_end)) = self.ranges.range(..start).next_back() {
            if prev_end as u32 + 1 >= start as u32 {
                if prev_end >= end {
                    return;
                }
                start = prev_start;
                self.ranges.remove(&prev_start);
            }
        }
        // any following ranges that overlap or touch
        while let Some((&next_start, &next_end)) = self.ranges.range(start..).next() {
            if next_start as u32 > end as u32 + 1 {
                break;
            }
            end = end.max(next_end);
            self.ranges.remove(&next_start);
        }
        self.ranges.insert(start, end);
    }

    pub(crate) fn remove(&mut self, range: RangeInclusive<u16>) {
        let (start, end) = (*range.start(), *range.end());
        if end < start {
            return;
        }
        let overlapping = self
            .ranges
            .range(..=end)
            .rev()
            .take_while(|(_, e)| **e >= start)
            .map(|(s, e)| (*s, *e))
            .collect::<Vec<_>>();
        for (s, e) in overlapping {
            self.ranges.remove(&s);
            if s < start {
                self.ranges.insert(s, start - 1);
            }
            if e > end {
                self.ranges.insert(end + 1, e);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.ranges.clear();
    }

    pub(crate) fn iter_ranges(&self) -> impl Iterator<Item = RangeInclusive<u16>> + '_ {
        self.ranges.iter().map(|(start, end)| *start..=*end)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.iter_ranges().flatten()
    }
}

impl FromIterator<u16> for RangeSet {
    fn from_iter<T: IntoIterator<Item = u16>>(iter: T) -> Self {
        let mut set = RangeSet::default();
        iter.into_iter().for_each(|v| set.insert(v..=v));
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(set: &RangeSet) -> Vec<RangeInclusive<u16>> {
        set.iter_ranges().collect()
    }

    #[test]
    fn merges_adjacent_and_overlapping() {
        let mut set = RangeSet::default();
        set.insert(5..=7);
        set.insert(1..=2);
        set.insert(3..=3);
        assert_eq!(ranges(&set), [1..=3, 5..=7]);
        set.insert(4..=4);
        assert_eq!(ranges(&set), [1..=7]);
        set.insert(10..=12);
        set.insert(0..=11);
        assert_eq!(ranges(&set), [0..=12]);
        set.insert(2..=5);
        assert_eq!(ranges(&set), [0..=12]);
        assert_eq!(set.len(), 13);
    }

    #[test]
    fn removal_splits() {
        let mut set = RangeSet::default();
        set.insert(1..=8);
        set.remove(3..=3);
        assert_eq!(ranges(&set), [1..=2, 4..=8]);
        set.remove(2..=5);
        assert_eq!(ranges(&set), [1..=1, 6..=8]);
        set.remove(0..=100);
        assert!(set.is_empty());
    }

    #[test]
    fn extremes() {
        let mut set = RangeSet::default();
        set.insert(u16::MAX - 1..=u16::MAX);
        set.insert(0..=0);
        assert!(set.contains(u16::MAX));
        assert!(!set.contains(1));
        set.remove(u16::MAX..=u16::MAX);
        set.remove(0..=0);
        assert_eq!(ranges(&set), [u16::MAX - 1..=u16::MAX - 1]);
        assert_eq!(set.iter().count(), 1);
    }
}
