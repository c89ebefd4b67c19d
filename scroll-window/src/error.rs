use core::fmt;

/// Group metadata that does not describe a valid index space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataError {
    /// A group's `begin` is not strictly greater than the previous group's `begin`.
    Unsorted { position: usize },
    /// A group starts before the previous group ends.
    Overlapping { position: usize },
    /// A group is empty (`begin >= end`).
    EmptyGroup { position: usize },
    /// A group extends past the total item count.
    OutOfBounds { position: usize, end: usize, total: usize },
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsorted { position } => write!(f, "group #{position} is not sorted by begin"),
            Self::Overlapping { position } => {
                write!(f, "group #{position} overlaps the previous group")
            }
            Self::EmptyGroup { position } => write!(f, "group #{position} is empty"),
            Self::OutOfBounds {
                position,
                end,
                total,
            } => write!(
                f,
                "group #{position} ends at {end}, past the total item count {total}"
            ),
        }
    }
}

impl core::error::Error for MetadataError {}
