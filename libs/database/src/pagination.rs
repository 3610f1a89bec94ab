//! Zero-based offset pagination.

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u64 = 2000;

/// A window into an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// `size == 0` falls back to [`DEFAULT_PAGE_SIZE`]; larger sizes are
    /// clamped to [`MAX_PAGE_SIZE`].
    pub fn new(page: u64, size: u64) -> Self {
        let size = match size {
            0 => DEFAULT_PAGE_SIZE,
            s => s.min(MAX_PAGE_SIZE),
        };
        Self { page, size }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index
    pub number: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
            total_pages: total_elements.div_ceil(request.size()),
        }
    }

    /// Cut the requested window out of an already ordered, complete list.
    pub fn from_sorted(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let content = items
            .into_iter()
            .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
            .take(request.size() as usize)
            .collect();
        Self::new(content, request, total)
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
