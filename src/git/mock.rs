use crate::error::{MagikarpError, Result};
use crate::git::TagSource;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock tag source for testing without actual git operations
pub struct MockRepository {
    tags: Vec<String>,
    fetch_error: Option<String>,
    fetch_count: AtomicUsize,
}

impl MockRepository {
    /// Create a new mock repository without tags
    pub fn new() -> Self {
        MockRepository {
            tags: Vec::new(),
            fetch_error: None,
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock repository holding the given tag names
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut repo = MockRepository::new();
        repo.tags = tags.into_iter().map(Into::into).collect();
        repo
    }

    /// Add a tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.push(name.into());
    }

    /// Make every fetch fail with `message`
    pub fn fail_fetch(&mut self, message: impl Into<String>) {
        self.fetch_error = Some(message.into());
    }

    /// Number of times `fetch_tags` was called
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TagSource for MockRepository {
    fn fetch_tags(&self) -> Result<()> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        match &self.fetch_error {
            Some(message) => Err(MagikarpError::Git(git2::Error::from_str(message))),
            None => Ok(()),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }
}
