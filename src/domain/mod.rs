//! Domain logic - pure version rules independent of files and git

pub mod increment;
pub mod tag;
pub mod version;

pub use increment::{increment, IncrementTarget, Limits};
pub use tag::{resolve_highest, Resolution, TagFilter, TagResolver, DEFAULT_TAG_FILTER};
pub use version::{compare, compare_versions, highest, highest_version, Version};
