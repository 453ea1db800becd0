// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

// Parâmetros `page`/`perPage` das listagens.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * self.limit()
    }
}

// Envelope de resposta paginada.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    pub total_count: i64,
    pub current_page: u32,
    pub has_next_page: bool,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, total_count: i64, query: &PageQuery) -> Self {
        let current_page = query.page();
        let has_next_page = i64::from(current_page) * i64::from(query.per_page()) < total_count;
        Self {
            total_count,
            current_page,
            has_next_page,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(page: Option<u32>, per_page: Option<u32>) -> PageQuery {
        PageQuery { page, per_page }
    }

    #[test]
    fn defaults_and_clamps() {
        let query = q(None, None);
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 20);
        assert_eq!(query.offset(), 0);

        let query = q(Some(0), Some(1000));
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);
    }

    #[test]
    fn has_next_page_boundaries() {
        // 45 registros, 20 por página: páginas 1 e 2 têm próxima, a 3 não.
        let query = q(Some(2), None);
        let page = Page::new(vec![0u8; 20], 45, &query);
        assert!(page.has_next_page);

        let query = q(Some(3), None);
        let page = Page::new(vec![0u8; 5], 45, &query);
        assert!(!page.has_next_page);

        // Exatamente na borda: page * perPage == total -> sem próxima.
        let query = q(Some(2), None);
        let page = Page::new(vec![0u8; 20], 40, &query);
        assert!(!page.has_next_page);
    }

    #[test]
    fn offset_follows_page() {
        let query = q(Some(3), Some(25));
        assert_eq!(query.offset(), 50);
        assert_eq!(query.limit(), 25);
    }
}
