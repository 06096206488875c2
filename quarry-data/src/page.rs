use serde::Serialize;

/// A page of results with pagination metadata.
///
/// `total` is the full live entity count, not the slice length;
/// `total_pages` is `total / items_per_page` rounded up.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, items_per_page: u64) -> Self {
        let total_pages = if items_per_page == 0 {
            0
        } else {
            (total + items_per_page - 1) / items_per_page
        };
        Self {
            data,
            total,
            total_pages,
        }
    }
}
