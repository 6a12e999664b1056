//! # List / filter / paginate
//!
//! Every list screen keeps a [`ListView`] next to its collection. The view holds
//! the predicates the user picked (search text, category selections, a date
//! range, an optional sort) and the current page. [`ListView::page_of`] turns a
//! collection into the [`Page`] to render without touching the collection.
//!
//! - Search is a case-insensitive substring match over `R::SEARCH_FIELDS`.
//! - Category filters are exact matches on one field each.
//! - The date range is inclusive and applies to `R::DATE_FIELD`; records without
//!   a parsable date are hidden while a range is active.
//! - Changing any predicate sends the view back to page 1.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::records::Record;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One rendered page of a filtered collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<R> {
    pub items: Vec<R>,
    /// Number of records matching all predicates.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
    /// Zero when nothing matches.
    pub total_pages: usize,
}

impl<R> Page<R> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based index range shown on this page, e.g. `(11, 20)`; `(0, 0)` when empty.
    pub fn range(&self) -> (usize, usize) {
        if self.items.is_empty() {
            return (0, 0);
        }
        let first = (self.page - 1) * self.page_size + 1;
        (first, first + self.items.len() - 1)
    }
}

/// Filter predicates and pagination cursor for one list screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ListView {
    search: String,
    categories: BTreeMap<String, String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    sort: Option<(String, SortDirection)>,
    page: usize,
    page_size: usize,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListView {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            categories: BTreeMap::new(),
            date_from: None,
            date_to: None,
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self, field: &str) -> Option<&str> {
        self.categories.get(field).map(String::as_str)
    }

    pub fn date_range(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.date_from, self.date_to)
    }

    pub fn sort(&self) -> Option<(&str, SortDirection)> {
        self.sort.as_ref().map(|(field, dir)| (field.as_str(), *dir))
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.search {
            self.search = text;
            self.page = 1;
        }
    }

    /// Select a category value; `None`, blank or `"all"` removes the filter.
    pub fn set_category(&mut self, field: &str, value: Option<&str>) {
        let value = value
            .map(str::trim)
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"));
        let changed = match value {
            Some(v) => self.categories.insert(field.to_string(), v.to_string()).as_deref() != Some(v),
            None => self.categories.remove(field).is_some(),
        };
        if changed {
            self.page = 1;
        }
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        if (from, to) != (self.date_from, self.date_to) {
            self.date_from = from;
            self.date_to = to;
            self.page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        self.set_search("");
        if !self.categories.is_empty() {
            self.categories.clear();
            self.page = 1;
        }
        self.set_date_range(None, None);
    }

    /// Sort by `field`; sorting again by the same field flips the direction.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = match self.sort.take() {
            Some((current, SortDirection::Ascending)) if current == field => {
                Some((current, SortDirection::Descending))
            }
            _ => Some((field.to_string(), SortDirection::Ascending)),
        };
    }

    /// Advance one page; no-op on the last page.
    pub fn next(&mut self, total_pages: usize) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    /// Go back one page; no-op on page 1.
    pub fn previous(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    pub fn go_to(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.matches_search(record) && self.matches_categories(record) && self.matches_dates(record)
    }

    fn matches_search<R: Record>(&self, record: &R) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        R::SEARCH_FIELDS.iter().any(|field| {
            record
                .field_text(field)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
    }

    fn matches_categories<R: Record>(&self, record: &R) -> bool {
        self.categories
            .iter()
            .all(|(field, value)| record.field_text(field).as_deref() == Some(value.as_str()))
    }

    fn matches_dates<R: Record>(&self, record: &R) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        let Some(date) = R::DATE_FIELD
            .and_then(|field| record.field_text(field))
            .and_then(|text| parse_date(&text))
        else {
            return false;
        };
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }

    /// Records matching every predicate, sorted if a sort is set. The input is not modified.
    pub fn filter<R: Record>(&self, records: &[R]) -> Vec<R> {
        let mut visible: Vec<R> = records.iter().filter(|r| self.matches(*r)).cloned().collect();
        if let Some((field, direction)) = &self.sort {
            visible.sort_by(|a, b| {
                let ordering = compare_fields(a.field_text(field), b.field_text(field));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }
        visible
    }

    pub fn page_of<R: Record>(&self, records: &[R]) -> Page<R> {
        let visible = self.filter(records);
        let total = visible.len();
        let total_pages = total.div_ceil(self.page_size);
        let page = self.page.clamp(1, total_pages.max(1));
        let items = visible
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .collect();
        Page {
            items,
            total,
            page,
            page_size: self.page_size,
            total_pages,
        }
    }
}

/// Parse the leading `YYYY-MM-DD` of a date or date-time string.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let head = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn compare_fields(a: Option<String>, b: Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (a.parse::<f64>(), b.parse::<f64>()) {
            (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => a.to_lowercase().cmp(&b.to_lowercase()),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::documents::{Document, DocumentStatus};

    fn doc(id: usize, title: &str, category: &str, updated_on: &str) -> Document {
        Document {
            id: format!("d{id}"),
            unit_id: "h1".into(),
            title: title.into(),
            category: category.into(),
            owner: "Qualidade".into(),
            version: "1.0".into(),
            status: DocumentStatus::Published,
            updated_on: NaiveDate::parse_from_str(updated_on, "%Y-%m-%d").unwrap(),
        }
    }

    fn docs(n: usize) -> Vec<Document> {
        (1..=n)
            .map(|i| {
                let category = if i % 2 == 0 { "POP" } else { "Protocolo" };
                doc(i, &format!("Documento {i}"), category, &format!("2026-01-{i:02}"))
            })
            .collect()
    }

    #[test]
    fn test_pagination_boundaries() {
        let records = docs(23);
        let mut view = ListView::new(10);

        let page = view.page_of(&records);
        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 10);
        assert!(!page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.range(), (1, 10));

        view.next(page.total_pages);
        view.next(page.total_pages);
        view.next(page.total_pages);
        let page = view.page_of(&records);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 3);
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.range(), (21, 23));

        view.previous();
        view.previous();
        view.previous();
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_no_match_yields_zero_pages() {
        let records = docs(5);
        let mut view = ListView::new(10);
        view.set_search("inexistente");
        let page = view.page_of(&records);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.page, 1);
        assert!(!page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.range(), (0, 0));
    }

    #[test]
    fn test_search_is_case_insensitive_and_pure() {
        let records = docs(12);
        let before = records.clone();
        let mut view = ListView::new(5);
        view.set_search("DOCUMENTO 1");
        let visible = view.filter(&records);
        // "Documento 1", "Documento 10", "Documento 11", "Documento 12"
        assert_eq!(visible.len(), 4);
        assert_eq!(view.filter(&records), visible);
        assert_eq!(records, before);
    }

    #[test]
    fn test_predicate_changes_reset_page() {
        let records = docs(30);
        let mut view = ListView::new(5);
        view.go_to(4, 6);
        assert_eq!(view.page(), 4);

        view.set_category("category", Some("POP"));
        assert_eq!(view.page(), 1);
        assert_eq!(view.page_of(&records).total, 15);

        view.next(3);
        // Same value again is not a change
        view.set_category("category", Some("POP"));
        assert_eq!(view.page(), 2);

        view.set_category("category", Some("all"));
        assert_eq!(view.page(), 1);
        assert_eq!(view.category("category"), None);

        view.next(6);
        view.set_date_range(NaiveDate::from_ymd_opt(2026, 1, 10), None);
        assert_eq!(view.page(), 1);

        view.next(6);
        view.set_search("x");
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_date_range_inclusive() {
        let records = docs(20);
        let mut view = ListView::new(50);
        view.set_date_range(
            NaiveDate::from_ymd_opt(2026, 1, 5),
            NaiveDate::from_ymd_opt(2026, 1, 8),
        );
        let ids: Vec<String> = view.filter(&records).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["d5", "d6", "d7", "d8"]);
    }

    #[test]
    fn test_sort_toggle() {
        let records = vec![
            doc(1, "Banana", "POP", "2026-01-01"),
            doc(2, "abacaxi", "POP", "2026-01-02"),
            doc(3, "Caju", "POP", "2026-01-03"),
        ];
        let mut view = ListView::default();
        view.toggle_sort("title");
        let titles: Vec<String> = view.filter(&records).into_iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["abacaxi", "Banana", "Caju"]);

        view.toggle_sort("title");
        assert_eq!(view.sort(), Some(("title", SortDirection::Descending)));
        let titles: Vec<String> = view.filter(&records).into_iter().map(|d| d.title).collect();
        assert_eq!(titles, vec!["Caju", "Banana", "abacaxi"]);
    }

    #[test]
    fn test_page_clamped_when_collection_shrinks() {
        let mut view = ListView::new(10);
        view.go_to(3, 3);
        let page = view.page_of(&docs(12));
        assert_eq!(page.page, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[test]
    fn test_parse_date_accepts_datetime_prefix() {
        assert_eq!(parse_date("2026-02-03T10:00:00Z"), NaiveDate::from_ymd_opt(2026, 2, 3));
        assert_eq!(parse_date("03/02/2026"), None);
    }
}
