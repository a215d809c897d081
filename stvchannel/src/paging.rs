//! Arithmétique des pages partagée par les listings d'émissions et d'épisodes.
//!
//! L'API attend un intervalle d'items inclusif et indexé à partir de 1
//! (`page=1-50`) : la page `p` couvre `[(p-1)*PAGE_SIZE+1, p*PAGE_SIZE]`.
//! Les bornes sont calculées en `u64`, toute page `u32` est donc représentable.

use serde::Serialize;

/// Nombre d'items demandés par page
pub const PAGE_SIZE: u32 = 50;

/// Intervalle inclusif d'items d'une page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    /// Numéro de page (à partir de 1)
    pub page: u32,
    /// Premier item (inclus)
    pub start: u64,
    /// Dernier item (inclus)
    pub end: u64,
}

impl PageRange {
    /// Intervalle de la page `page`. La page 0 est traitée comme la page 1.
    pub fn for_page(page: u32) -> Self {
        let page = page.max(1);
        let size = u64::from(PAGE_SIZE);
        let end = u64::from(page) * size;
        Self {
            page,
            start: end - size + 1,
            end,
        }
    }

    /// Valeur du paramètre `page`, par exemple `51-100`
    pub fn query_value(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }

    /// Page suivante, `None` au-delà de la dernière page adressable
    pub fn next_page(&self) -> Option<u32> {
        self.page.checked_add(1)
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self::for_page(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_for_pages() {
        for p in 1..=20u64 {
            let range = PageRange::for_page(p as u32);
            assert_eq!(range.start, (p - 1) * 50 + 1);
            assert_eq!(range.end, p * 50);
        }
    }

    #[test]
    fn test_query_value() {
        assert_eq!(PageRange::for_page(1).query_value(), "1-50");
        assert_eq!(PageRange::for_page(3).query_value(), "101-150");
    }

    #[test]
    fn test_page_zero_is_first_page() {
        assert_eq!(PageRange::for_page(0), PageRange::default());
        assert_eq!(PageRange::for_page(0).next_page(), Some(2));
    }

    #[test]
    fn test_large_pages_do_not_overflow() {
        let range = PageRange::for_page(100_000_000);
        assert_eq!(range.start, 4_999_999_951);
        assert_eq!(range.end, 5_000_000_000);
        assert_eq!(range.query_value(), "4999999951-5000000000");

        let last = PageRange::for_page(u32::MAX);
        assert_eq!(last.end, u64::from(u32::MAX) * 50);
        assert_eq!(last.start, last.end - 49);
        assert_eq!(last.next_page(), None);
    }
}
