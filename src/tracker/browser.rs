//! Paged, filterable view over meal records. Records are listed newest first.

use std::fmt::Display;

use chrono::NaiveDate;

use super::entities::{MealRecord, MealRecords};

pub const PAGE_SIZE: usize = 10;

/// Inclusive date range. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start.map_or(true, |start| *date >= start) && self.end.map_or(true, |end| *date <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(f, "{start} to {end}"),
            (Some(start), None) => write!(f, "From {start}"),
            (None, Some(end)) => write!(f, "Until {end}"),
            (None, None) => write!(f, "All records"),
        }
    }
}

/// Records inside `range`, most recent first.
pub fn filter_records(records: &MealRecords, range: &DateRange) -> Vec<(NaiveDate, MealRecord)> {
    records
        .iter()
        .rev()
        .filter(|(date, _)| range.contains(date))
        .map(|(date, record)| (*date, *record))
        .collect()
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

/// Slice for a 1-indexed page. Pages outside of the data are empty.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if page == 0 || start >= items.len() {
        return &[];
    }
    let end = usize::min(start + page_size, items.len());
    &items[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

/// Page numbers to display: first, last, current and its direct neighbours. Each run of hidden
/// pages collapses into a single [PageMarker::Ellipsis].
pub fn page_markers(current: usize, total: usize) -> Vec<PageMarker> {
    let mut markers = Vec::new();
    let mut previous = 0;
    for page in 1..=total {
        let visible = page == 1 || page == total || page.abs_diff(current) <= 1;
        if !visible {
            continue;
        }
        if page > previous + 1 && previous != 0 {
            markers.push(PageMarker::Ellipsis);
        }
        markers.push(PageMarker::Page(page));
        previous = page;
    }
    markers
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub entries: Vec<(NaiveDate, MealRecord)>,
    pub page: usize,
    pub total_pages: usize,
    /// Total number of records matching the filter.
    pub total: usize,
}

impl PageView {
    /// 1-indexed position of the first and last shown record, as in "Showing 11 to 20 of 25".
    pub fn bounds(&self) -> Option<(usize, usize)> {
        if self.entries.is_empty() {
            return None;
        }
        let first = (self.page - 1) * PAGE_SIZE + 1;
        Some((first, first + self.entries.len() - 1))
    }

    pub fn markers(&self) -> Vec<PageMarker> {
        page_markers(self.page, self.total_pages)
    }
}

/// Browsing state: which range is filtered and which page is shown. It never rests on an empty
/// page while earlier pages have records.
#[derive(Debug, Clone)]
pub struct RecordBrowser {
    range: DateRange,
    current_page: usize,
}

impl Default for RecordBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBrowser {
    pub fn new() -> Self {
        Self {
            range: DateRange::default(),
            current_page: 1,
        }
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn apply_filter(&mut self, range: DateRange) {
        self.range = range;
        self.current_page = 1;
    }

    pub fn clear_filter(&mut self) {
        self.apply_filter(DateRange::default());
    }

    pub fn total_pages(&self, records: &MealRecords) -> usize {
        let matching = records.keys().filter(|date| self.range.contains(date)).count();
        page_count(matching, PAGE_SIZE)
    }

    /// Moves to `page`, clamped to the pages that exist.
    pub fn go_to(&mut self, page: usize, records: &MealRecords) {
        let last = self.total_pages(records).max(1);
        self.current_page = page.clamp(1, last);
    }

    /// Must be called after records were removed so the view moves off a page that no longer
    /// exists.
    pub fn after_delete(&mut self, records: &MealRecords) {
        let total = self.total_pages(records);
        if self.current_page > total {
            self.current_page = total.max(1);
        }
    }

    pub fn view(&self, records: &MealRecords) -> PageView {
        let filtered = filter_records(records, &self.range);
        PageView {
            entries: page_slice(&filtered, self.current_page, PAGE_SIZE).to_vec(),
            page: self.current_page,
            total_pages: page_count(filtered.len(), PAGE_SIZE),
            total: filtered.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use crate::tracker::entities::{MealRecord, MealRecords};

    use super::{
        filter_records, page_count, page_markers, page_slice, DateRange, PageMarker,
        RecordBrowser, PAGE_SIZE,
    };

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn records(count: i64) -> MealRecords {
        (0..count)
            .map(|i| {
                (
                    start() + Duration::days(i),
                    MealRecord {
                        breakfast: i % 2 == 0,
                        lunch: true,
                        dinner: false,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_pagination_boundaries() {
        let records = records(25);
        let filtered = filter_records(&records, &DateRange::default());

        assert_eq!(page_count(filtered.len(), PAGE_SIZE), 3);
        assert_eq!(page_slice(&filtered, 1, PAGE_SIZE).len(), 10);
        assert_eq!(page_slice(&filtered, 2, PAGE_SIZE).len(), 10);
        assert_eq!(page_slice(&filtered, 3, PAGE_SIZE).len(), 5);
        assert!(page_slice(&filtered, 4, PAGE_SIZE).is_empty());
        assert!(page_slice(&filtered, 0, PAGE_SIZE).is_empty());
    }

    #[test]
    fn test_newest_first() {
        let records = records(3);
        let filtered = filter_records(&records, &DateRange::default());
        let dates = filtered.iter().map(|v| v.0).collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![start() + Duration::days(2), start() + Duration::days(1), start()]
        );
    }

    #[test]
    fn test_range_is_inclusive() {
        let records = records(10);
        let from = start() + Duration::days(2);
        let to = start() + Duration::days(5);

        let filtered = filter_records(&records, &DateRange::new(Some(from), Some(to)));
        assert_eq!(filtered.len(), 4);
        assert_eq!(filtered.first().map(|v| v.0), Some(to));
        assert_eq!(filtered.last().map(|v| v.0), Some(from));

        assert_eq!(filter_records(&records, &DateRange::new(Some(from), None)).len(), 8);
        assert_eq!(filter_records(&records, &DateRange::new(None, Some(to))).len(), 6);
    }

    #[test]
    fn test_deleting_last_page_clamps() {
        let mut records = records(25);
        let mut browser = RecordBrowser::new();
        browser.go_to(3, &records);
        assert_eq!(browser.current_page(), 3);

        let on_last_page = browser
            .view(&records)
            .entries
            .into_iter()
            .map(|v| v.0)
            .collect::<Vec<_>>();
        assert_eq!(on_last_page.len(), 5);

        for date in on_last_page {
            records.remove(&date);
            browser.after_delete(&records);
        }

        assert_eq!(browser.current_page(), 2);
        assert_eq!(browser.view(&records).entries.len(), 10);
    }

    #[test]
    fn test_go_to_clamps_into_range() {
        let records = records(25);
        let mut browser = RecordBrowser::new();

        browser.go_to(4, &records);
        assert_eq!(browser.current_page(), 3);

        browser.go_to(0, &records);
        assert_eq!(browser.current_page(), 1);

        browser.go_to(5, &MealRecords::new());
        assert_eq!(browser.current_page(), 1);
    }

    #[test]
    fn test_filter_resets_page() {
        let records = records(25);
        let mut browser = RecordBrowser::new();
        browser.go_to(2, &records);

        browser.apply_filter(DateRange::new(Some(start()), Some(start() + Duration::days(4))));
        assert_eq!(browser.current_page(), 1);
        let view = browser.view(&records);
        assert_eq!(view.total, 5);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.bounds(), Some((1, 5)));

        browser.clear_filter();
        assert!(browser.range().is_unbounded());
        assert_eq!(browser.view(&records).total, 25);
    }

    #[test]
    fn test_view_bounds() {
        let records = records(25);
        let mut browser = RecordBrowser::new();
        browser.go_to(3, &records);
        assert_eq!(browser.view(&records).bounds(), Some((21, 25)));
        assert_eq!(RecordBrowser::new().view(&MealRecords::new()).bounds(), None);
    }

    #[test]
    fn test_page_markers() {
        use PageMarker::{Ellipsis, Page};

        assert_eq!(page_markers(1, 1), vec![Page(1)]);
        assert_eq!(page_markers(1, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_markers(1, 10), vec![Page(1), Page(2), Ellipsis, Page(10)]);
        assert_eq!(
            page_markers(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_markers(10, 10),
            vec![Page(1), Ellipsis, Page(9), Page(10)]
        );
        assert_eq!(
            page_markers(3, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5)]
        );
        assert!(page_markers(1, 0).is_empty());
    }

    #[test]
    fn test_range_display() {
        let day = start();
        assert_eq!(DateRange::new(Some(day), Some(day)).to_string(), "2024-01-01 to 2024-01-01");
        assert_eq!(DateRange::new(Some(day), None).to_string(), "From 2024-01-01");
        assert_eq!(DateRange::new(None, Some(day)).to_string(), "Until 2024-01-01");
    }
}
