use crate::config::constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::enums::status_filter::StatusFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestQuery {
    pub page: u32,
    pub limit: u32,
    pub status: StatusFilter,
}

impl Default for RequestQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
            status: StatusFilter::All,
        }
    }
}

impl RequestQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(status) = self.status.as_status() {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}
