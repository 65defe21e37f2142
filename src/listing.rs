//! Filterable listings
//!
//! Every list screen narrows a fixed, ordered collection by a free-text query
//! and, optionally, by a status value. Filtering is a pure projection: the
//! result borrows from the input and keeps its order.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::errors::PortalError;

/// A record exposing the text fields a query is matched against
pub trait Searchable {
    fn searchable_fields(&self) -> Vec<&str>;
}

/// A record carrying a status drawn from a fixed enumeration
pub trait WithStatus {
    type Status: Copy + PartialEq;

    fn status(&self) -> Self::Status;
}

/// Status constraint of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: Copy + PartialEq> StatusFilter<S> {
    pub fn admits(&self, status: S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl<S: FromStr> FromStr for StatusFilter<S> {
    type Err = S::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Free text plus status constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query<S> {
    pub text: String,
    pub status: StatusFilter<S>,
}

impl<S> Default for Query<S> {
    fn default() -> Self {
        Self {
            text: String::new(),
            status: StatusFilter::All,
        }
    }
}

impl<S> Query<S> {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: StatusFilter::All,
        }
    }

    pub fn with_status(mut self, status: StatusFilter<S>) -> Self {
        self.status = status;
        self
    }
}

impl<S: fmt::Debug> fmt::Display for Query<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            StatusFilter::All => write!(f, "'{}'", self.text),
            StatusFilter::Only(status) => write!(f, "'{}' [{:?}]", self.text, status),
        }
    }
}

/// Case-insensitive substring match over the record's searchable fields
pub fn matches_text<R: Searchable + ?Sized>(record: &R, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    record
        .searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records matching `text`, in input order
pub fn search<'a, R: Searchable>(records: &'a [R], text: &str) -> Vec<&'a R> {
    let found: Vec<&R> = records.iter().filter(|r| matches_text(*r, text)).collect();
    debug!("search '{}' matched {}/{} records", text, found.len(), records.len());
    found
}

/// Records matching both the text and the status part of `query`, in input order
pub fn filter<'a, R>(records: &'a [R], query: &Query<R::Status>) -> Vec<&'a R>
where
    R: Searchable + WithStatus,
    R::Status: fmt::Debug,
{
    let found: Vec<&R> = records
        .iter()
        .filter(|r| query.status.admits(r.status()) && matches_text(*r, &query.text))
        .collect();
    debug!("filter {} matched {}/{} records", query, found.len(), records.len());
    found
}

/// Positions of `found` within `records`, for callers that keep a selection by index.
///
/// `found` must be an ordered subsequence of `records`, as returned by
/// [`search`] and [`filter`].
pub fn positions<R>(records: &[R], found: &[&R]) -> Vec<usize> {
    let mut next = 0;
    found
        .iter()
        .filter_map(|hit| {
            let offset = records[next..].iter().position(|r| std::ptr::eq(r, *hit))?;
            let index = next + offset;
            next = index + 1;
            Some(index)
        })
        .collect()
}

/// Parse a status filter from user input, naming the accepted values on failure
pub fn parse_status_filter<S>(input: &str) -> Result<StatusFilter<S>, PortalError>
where
    S: FromStr<Err = PortalError>,
{
    input.trim().parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        name: &'static str,
        note: &'static str,
        state: char,
    }

    impl Searchable for Row {
        fn searchable_fields(&self) -> Vec<&str> {
            vec![self.name, self.note]
        }
    }

    impl WithStatus for Row {
        type Status = char;

        fn status(&self) -> char {
            self.state
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Sarah Johnson", note: "Follow-up", state: 'a' },
            Row { name: "John Smith", note: "Annual check", state: 'b' },
            Row { name: "Mike Davis", note: "Skin check", state: 'a' },
        ]
    }

    fn names(found: &[&Row]) -> Vec<&'static str> {
        found.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let rows = rows();
        let found = filter(&rows, &Query::default());
        assert_eq!(names(&found), vec!["Sarah Johnson", "John Smith", "Mike Davis"]);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let rows = rows();
        assert_eq!(names(&search(&rows, "SARAH")), names(&search(&rows, "sarah")));
        assert_eq!(names(&search(&rows, "sArAh")), vec!["Sarah Johnson"]);
    }

    #[test]
    fn test_any_searchable_field_can_match() {
        let rows = rows();
        assert_eq!(names(&search(&rows, "check")), vec!["John Smith", "Mike Davis"]);
        // "John" appears in both a first and a last name
        assert_eq!(names(&search(&rows, "john")), vec!["Sarah Johnson", "John Smith"]);
    }

    #[test]
    fn test_longer_query_narrows_results() {
        let rows = rows();
        let queries = ["", "s", "sm", "smi", "smith", "smithy"];
        for pair in queries.windows(2) {
            let wide = search(&rows, pair[0]);
            let narrow = search(&rows, pair[1]);
            assert!(narrow.iter().all(|r| wide.iter().any(|w| std::ptr::eq(*w, *r))));
        }
    }

    #[test]
    fn test_status_filter_is_anded_with_text() {
        let rows = rows();
        let query = Query::text("check").with_status(StatusFilter::Only('a'));
        assert_eq!(names(&filter(&rows, &query)), vec!["Mike Davis"]);

        let all = Query::text("check").with_status(StatusFilter::All);
        assert_eq!(names(&filter(&rows, &all)), names(&search(&rows, "check")));
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let rows = rows();
        assert!(search(&rows, "zzz").is_empty());
        let query = Query::text("").with_status(StatusFilter::Only('z'));
        assert!(filter(&rows, &query).is_empty());
    }

    #[test]
    fn test_results_borrow_the_source_records() {
        let rows = rows();
        let found = search(&rows, "mike");
        assert!(std::ptr::eq(found[0], &rows[2]));
    }

    #[test]
    fn test_positions_follow_the_source() {
        let rows = rows();
        let found = search(&rows, "check");
        assert_eq!(positions(&rows, &found), vec![1, 2]);
        assert!(positions(&rows, &[]).is_empty());
    }

    #[test]
    fn test_status_filter_parsing() {
        use crate::models::AppointmentStatus;

        let all: StatusFilter<AppointmentStatus> = parse_status_filter(" ALL ").unwrap();
        assert_eq!(all, StatusFilter::All);
        let upcoming: StatusFilter<AppointmentStatus> = parse_status_filter("upcoming").unwrap();
        assert_eq!(upcoming, StatusFilter::Only(AppointmentStatus::Upcoming));
        assert!(parse_status_filter::<AppointmentStatus>("soon").is_err());
    }
}
