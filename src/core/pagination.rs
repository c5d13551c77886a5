use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be 1 or greater")]
    InvalidPage,

    #[error("limit must be between 1 and {max}")]
    InvalidLimit { max: u32 },
}

/// One-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn validated(page: u32, limit: u32, max_limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage);
        }
        if !(1..=max_limit).contains(&limit) {
            return Err(PaginationError::InvalidLimit { max: max_limit });
        }
        Ok(Self { page, limit })
    }

    /// Number of items that precede this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.limit as usize
    }

    /// Slice this page out of a fully ranked list
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.limit as usize)
            .collect()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}
