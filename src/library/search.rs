//! Diacritic-insensitive title search.
//!
//! Query and title go through the same [`normalize`] pass. A record is
//! visible when its normalized title contains the normalized query. There
//! is no scoring; results keep catalog order.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::library::catalog::Catalog;
use crate::library::model::CatalogRecord;

/// Fold text for comparison.
///
/// Trims, lowercases, decomposes to NFD and drops combining marks, then maps
/// `đ` to `d` (it has no decomposition, so mark stripping leaves it alone).
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| if c == 'đ' { 'd' } else { c })
        .collect()
}

/// Records whose title contains `query`, in catalog order.
///
/// An empty or whitespace-only query matches every record.
pub fn filter<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a CatalogRecord> {
    let needle = normalize(query);
    if needle.is_empty() {
        return catalog.iter().collect();
    }
    catalog
        .iter()
        .filter(|r| normalize(&r.title).contains(&needle))
        .collect()
}

/// The current query of a session. The visible set is derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query_text: String,
}

impl SearchState {
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn set_query(&mut self, query_text: impl Into<String>) {
        self.query_text = query_text.into();
    }

    pub fn clear(&mut self) {
        self.query_text.clear();
    }

    /// Recompute the visible subset of `catalog`.
    pub fn visible<'a>(&self, catalog: &'a Catalog) -> Vec<&'a CatalogRecord> {
        filter(catalog, &self.query_text)
    }
}

/// One page of a result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// 1-based page number.
    pub number: usize,
    /// Always at least 1, even for an empty list.
    pub total_pages: usize,
    pub total_items: usize,
    pub items: &'a [T],
}

/// Slice `items` into the 1-based page `number`.
///
/// Page 0 is treated as page 1. A page past the end is empty.
pub fn paginate<T>(items: &[T], number: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let number = number.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let start = (number - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    Page {
        number,
        total_pages,
        total_items: items.len(),
        items: &items[start..end],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::model::RecordId;

    fn catalog(titles: &[&str]) -> Catalog {
        Catalog::from_records(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| CatalogRecord {
                    id: RecordId::new(i as u64 + 1).unwrap(),
                    title: t.to_string(),
                    source_link: format!("http://x/{}", i + 1),
                })
                .collect(),
        )
    }

    fn titles<'a>(records: &[&'a CatalogRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn normalize_folds_vietnamese() {
        assert_eq!(normalize("  Đại Số Tuyến Tính "), "dai so tuyen tinh");
        assert_eq!(normalize("ĐẠI SỐ"), "dai so");
        assert_eq!(normalize("Vật Lý"), "vat ly");
        assert_eq!(normalize("Hóa học"), "hoa hoc");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for text in ["Đại Số", "  Toán A1 ", "Kỹ thuật Điện", "plain"] {
            let once = normalize(text);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn accent_and_case_insensitive_match() {
        let catalog = catalog(&["Giải Tích", "Đại Số Tuyến Tính", "Vật Lý"]);
        assert_eq!(titles(&filter(&catalog, "dai so")), vec!["Đại Số Tuyến Tính"]);
        assert_eq!(titles(&filter(&catalog, "ĐẠI SỐ")), vec!["Đại Số Tuyến Tính"]);
        assert_eq!(titles(&filter(&catalog, "  tuyến  ")), vec!["Đại Số Tuyến Tính"]);
    }

    #[test]
    fn empty_query_returns_whole_catalog() {
        let catalog = catalog(&["A", "B", "C"]);
        let all: Vec<&CatalogRecord> = catalog.iter().collect();
        assert_eq!(filter(&catalog, ""), all);
        assert_eq!(filter(&catalog, " \t "), all);
    }

    #[test]
    fn matches_keep_catalog_order() {
        let catalog = catalog(&["Toán A2", "Vật Lý", "Toán A1", "toan cao cap"]);
        assert_eq!(
            titles(&filter(&catalog, "toan")),
            vec!["Toán A2", "Toán A1", "toan cao cap"]
        );
    }

    #[test]
    fn substring_must_be_contiguous() {
        let catalog = catalog(&["Xác suất thống kê"]);
        assert!(filter(&catalog, "xac thong").is_empty());
        assert_eq!(filter(&catalog, "suat thong").len(), 1);
    }

    #[test]
    fn filter_is_deterministic_and_normalization_stable() {
        let catalog = catalog(&["Đại Số", "Điện tử", "Cơ học", "Dai so 2"]);
        for q in ["ĐẠI", "dien", " Cơ ", "so", "zzz"] {
            assert_eq!(filter(&catalog, q), filter(&catalog, q));
            assert_eq!(filter(&catalog, q), filter(&catalog, &normalize(q)));
        }
    }

    #[test]
    fn search_state_recomputes() {
        let catalog = catalog(&["Vật Lý", "Toán"]);
        let mut state = SearchState::default();
        assert_eq!(state.visible(&catalog).len(), 2);
        state.set_query("vat");
        assert_eq!(titles(&state.visible(&catalog)), vec!["Vật Lý"]);
        state.clear();
        assert_eq!(state.query_text(), "");
        assert_eq!(state.visible(&catalog).len(), 2);
    }

    #[test]
    fn paginate_slices_pages() {
        let items: Vec<u32> = (1..=32).collect();
        let first = paginate(&items, 1, 15);
        assert_eq!(first.items, &items[0..15]);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 32);

        let last = paginate(&items, 3, 15);
        assert_eq!(last.items, &[31, 32]);

        assert!(paginate(&items, 4, 15).items.is_empty());
        assert_eq!(paginate(&items, 0, 15).number, 1);
    }

    #[test]
    fn paginate_empty_list_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, 15);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }
}
