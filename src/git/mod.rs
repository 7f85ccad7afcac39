//! Git tag source abstraction
//!
//! The version logic never talks to git directly. It only consumes the list of
//! tag names produced by a [TagSource]. The concrete implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! ```rust
//! # use magikarp::git::TagSource;
//! # fn example<S: TagSource>(source: &S) -> magikarp::Result<()> {
//! source.fetch_tags()?;
//! for tag in source.list_tags()? {
//!     println!("Tag: {}", tag);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Provider of tag names for the current project
///
/// All implementors must be `Send + Sync`. Implementations map underlying
/// errors (like `git2::Error`) to [crate::error::MagikarpError] variants.
pub trait TagSource: Send + Sync {
    /// Refresh tags from the remote before listing
    ///
    /// # Returns
    /// * `Ok(())` - Tags are up to date
    /// * `Err` - If the remote doesn't exist or the fetch fails
    fn fetch_tags(&self) -> Result<()>;

    /// Get all tag names in the repository
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Tag names, in no particular order
    /// * `Err` - If there's a Git error
    fn list_tags(&self) -> Result<Vec<String>>;
}
