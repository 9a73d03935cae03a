//! Offset/limit paging

use serde::Serialize;

/// Page size bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl PageLimits {
    pub fn new(default_limit: i64, max_limit: i64) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    /// Resolve raw query values: offset floors at 0, limit defaults and
    /// clamps to `1..=max_limit`
    pub fn resolve(&self, offset: Option<i64>, limit: Option<i64>) -> PageRequest {
        PageRequest {
            offset: offset.unwrap_or(0).max(0),
            limit: limit.unwrap_or(self.default_limit).clamp(1, self.max_limit),
        }
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self::new(10, 100)
    }
}

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Slice an already-sorted in-memory result
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let len = usize::try_from(self.limit).unwrap_or(0);
        items.iter().skip(start).take(len).cloned().collect()
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageLimits::default().resolve(None, None)
    }
}

/// One page of results plus the unpaged total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            offset: request.offset,
            limit: request.limit,
        }
    }

    pub fn has_more(&self) -> bool {
        self.offset + (self.items.len() as i64) < self.total
    }

    /// 1-based position of the first item, 0 when empty
    pub fn first(&self) -> i64 {
        if self.items.is_empty() {
            0
        } else {
            self.offset + 1
        }
    }

    /// 1-based position of the last item, 0 when empty
    pub fn last(&self) -> i64 {
        if self.items.is_empty() {
            0
        } else {
            self.offset + self.items.len() as i64
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        }
    }
}
