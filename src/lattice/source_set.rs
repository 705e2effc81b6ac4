//! Compact sets of source indices.
//!
//! A `SourceSet` is the member-set of a source element, stored as a bitset
//! where bit i marks source i. Subset tests, unions and ordering are then
//! single word operations, which keeps the antichain enumeration and the
//! partial-order comparisons of the lattice cheap.

use std::cmp::Ordering;
use std::fmt;

use crate::error::PidError;

/// Set of source indices represented as a bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSet(u64);

impl SourceSet {
    /// Source indices must be below this.
    pub const CAPACITY: usize = 64;

    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set {0, 1, ..., n-1}.
    pub fn full(n: usize) -> Self {
        if n >= 64 {
            Self(u64::MAX)
        } else {
            Self((1u64 << n) - 1)
        }
    }

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// The set of `members`, or `None` if any index is `CAPACITY` or more.
    pub fn try_from_members(members: &[usize]) -> Option<Self> {
        let mut set = Self::empty();
        for &m in members {
            if !set.insert(m) {
                return None;
            }
        }
        Some(set)
    }

    pub fn contains(self, source: usize) -> bool {
        source < Self::CAPACITY && (self.0 >> source) & 1 != 0
    }

    /// Add `source`; returns false and leaves the set unchanged when the
    /// index does not fit.
    pub fn insert(&mut self, source: usize) -> bool {
        if source >= Self::CAPACITY {
            return false;
        }
        self.0 |= 1 << source;
        true
    }

    /// Population count.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Non-strict subset test: every member of `self` is in `other`.
    pub fn is_subset_of(self, other: SourceSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Neither set contains the other.
    pub fn is_incomparable_with(self, other: SourceSet) -> bool {
        !self.is_subset_of(other) && !other.is_subset_of(self)
    }

    pub fn union(self, other: SourceSet) -> SourceSet {
        Self(self.0 | other.0)
    }

    /// Highest source index in the set plus one (0 for the empty set).
    pub fn span(self) -> usize {
        64 - self.0.leading_zeros() as usize
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let bits = self.0;
        (0..64).filter(move |&i| (bits >> i) & 1 != 0)
    }

    pub fn members(self) -> Vec<usize> {
        self.iter().collect()
    }

    /// Canonical enumeration order: by size, then lexicographically by the
    /// ascending member list.
    pub fn canonical_cmp(&self, other: &SourceSet) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.iter().cmp(other.iter()))
    }
}

impl fmt::Display for SourceSet {
    /// Format as `{0,1,2}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, m) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", m)?;
        }
        write!(f, "}}")
    }
}

impl TryFrom<&[usize]> for SourceSet {
    type Error = PidError;

    fn try_from(members: &[usize]) -> Result<Self, Self::Error> {
        Self::try_from_members(members).ok_or_else(|| {
            let value = members.iter().copied().max().unwrap_or_default();
            PidError::ValueOutOfRange {
                what: "source index".to_string(),
                value,
                base: Self::CAPACITY,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_and_len() {
        let set = SourceSet::full(3);
        assert_eq!(set.len(), 3);
        assert_eq!(set.members(), vec![0, 1, 2]);
        assert!(SourceSet::empty().is_empty());
    }

    #[test]
    fn test_subset_relations() {
        let a = SourceSet::try_from_members(&[0]).unwrap();
        let ab = SourceSet::try_from_members(&[0, 1]).unwrap();
        let c = SourceSet::try_from_members(&[2]).unwrap();

        assert!(a.is_subset_of(ab));
        assert!(a.is_subset_of(a));
        assert!(!ab.is_subset_of(a));
        assert!(a.is_incomparable_with(c));
        assert!(!a.is_incomparable_with(ab));
    }

    #[test]
    fn test_canonical_order() {
        let mut sets: Vec<SourceSet> = (1..8).map(SourceSet::from_bits).collect();
        sets.sort_by(|a, b| a.canonical_cmp(b));
        let rendered: Vec<String> = sets.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["{0}", "{1}", "{2}", "{0,1}", "{0,2}", "{1,2}", "{0,1,2}"]
        );
    }

    #[test]
    fn test_indices_beyond_capacity_are_rejected() {
        let mut set = SourceSet::try_from_members(&[0, 63]).unwrap();
        assert!(!set.insert(64));
        assert!(!set.insert(usize::MAX));
        assert_eq!(set.members(), vec![0, 63]);

        assert_eq!(SourceSet::try_from_members(&[64]), None);
        assert_eq!(SourceSet::try_from_members(&[1, 65]), None);
        assert!(!SourceSet::empty().contains(64));

        let members: &[usize] = &[2, 70];
        assert!(matches!(
            SourceSet::try_from(members),
            Err(PidError::ValueOutOfRange { value: 70, base: 64, .. })
        ));
    }

    #[test]
    fn test_span() {
        assert_eq!(SourceSet::try_from_members(&[0, 3]).unwrap().span(), 4);
        assert_eq!(SourceSet::empty().span(), 0);
    }
}
