use alloc::vec::Vec;

use crate::{Group, IndexRange, MetadataError};

/// The logical index space of a dataset: a total item count plus sorted, non-overlapping groups.
///
/// Indices that fall between groups belong to no group and get no header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexSpace {
    total: usize,
    groups: Vec<Group>,
}

impl IndexSpace {
    /// Builds an index space, repairing inconsistent metadata instead of failing.
    ///
    /// Group ends are clamped to `total`; empty groups and groups that are unsorted or overlap
    /// the previous one are dropped.
    pub fn new(total: usize, groups: impl IntoIterator<Item = Group>) -> Self {
        let mut kept: Vec<Group> = Vec::new();
        for group in groups {
            let clamped = Group::new(group.begin, group.end.min(total));
            if clamped != group {
                vwarn!(begin = group.begin, end = group.end, total, "group clamped to total");
            }
            if clamped.is_empty() {
                vwarn!(begin = group.begin, "dropping empty group");
                continue;
            }
            if let Some(prev) = kept.last() {
                if clamped.begin < prev.end {
                    vwarn!(
                        begin = clamped.begin,
                        prev_end = prev.end,
                        "dropping unsorted or overlapping group"
                    );
                    continue;
                }
            }
            kept.push(clamped);
        }
        Self {
            total,
            groups: kept,
        }
    }

    /// Builds an index space, rejecting metadata that would need repair.
    pub fn try_new(
        total: usize,
        groups: impl IntoIterator<Item = Group>,
    ) -> Result<Self, MetadataError> {
        let groups: Vec<Group> = groups.into_iter().collect();
        for (position, group) in groups.iter().enumerate() {
            if group.is_empty() {
                return Err(MetadataError::EmptyGroup { position });
            }
            if group.end > total {
                return Err(MetadataError::OutOfBounds {
                    position,
                    end: group.end,
                    total,
                });
            }
            if position > 0 {
                let prev = groups[position - 1];
                if group.begin <= prev.begin {
                    return Err(MetadataError::Unsorted { position });
                }
                if group.begin < prev.end {
                    return Err(MetadataError::Overlapping { position });
                }
            }
        }
        Ok(Self { total, groups })
    }

    /// An index space without groups.
    pub fn ungrouped(total: usize) -> Self {
        Self {
            total,
            groups: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Returns the position (in [`Self::groups`]) of the group containing `index`.
    pub fn group_position(&self, index: usize) -> Option<usize> {
        // Number of groups whose begin is <= index; the candidate is the last of those.
        let after = self.groups.partition_point(|g| g.begin <= index);
        let position = after.checked_sub(1)?;
        self.groups[position].contains(index).then_some(position)
    }

    pub fn group_at(&self, index: usize) -> Option<Group> {
        self.group_position(index).map(|p| self.groups[p])
    }

    pub fn is_group_start(&self, index: usize) -> bool {
        self.groups
            .binary_search_by(|g| g.begin.cmp(&index))
            .is_ok()
    }

    /// Header pixels laid out before item `index`.
    ///
    /// Every group with `begin < index` contributes one `header_size`. That covers groups lying
    /// entirely before `index` and the header of `index`'s own group once `index` is past its
    /// first item. The header of a group whose first index *is* `index` is not included.
    pub fn header_overhead_before(&self, index: usize, header_size: u32) -> u64 {
        let passed = self.groups.partition_point(|g| g.begin < index);
        passed as u64 * header_size as u64
    }

    /// Iterates the groups that share at least one index with `range`.
    pub fn groups_intersecting(&self, range: IndexRange) -> impl Iterator<Item = &Group> + '_ {
        let first = self.groups.partition_point(|g| g.end <= range.start);
        self.groups[first..]
            .iter()
            .take_while(move |g| g.begin < range.end)
    }
}
