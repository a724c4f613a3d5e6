//! Filter criteria and their state transitions.
//!
//! Criteria are ephemeral state derived from user input. Every change
//! goes through [`FilterCriteria::apply`], an explicit transition
//! function independent of the UI dispatch mechanism.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The fixed set of selectable sites. The site filter always holds one
/// of these values.
pub const SITES: [&str; 2] = ["Minneapolis", "Colorado"];

/// Default site selection at startup.
pub const DEFAULT_SITE: &str = "Minneapolis";

/// The active filter selection.
///
/// `site` is always set; the remaining filters are optional. The date
/// range only takes effect when both endpoints are present and ordered
/// (see [`FilterCriteria::effective_range`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    /// Selected site; always a member of [`SITES`].
    pub site: String,
    /// Device name filter, `None` meaning all devices of the site.
    pub device_name: Option<String>,
    /// Range start, inclusive.
    pub start: Option<DateTime<Utc>>,
    /// Range end, inclusive.
    pub end: Option<DateTime<Utc>>,
    /// Fault code filter, matched exactly against the stringified code.
    pub code: Option<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::for_site(DEFAULT_SITE)
    }
}

impl FilterCriteria {
    /// Criteria with the given site and no other filters.
    pub fn for_site(site: &str) -> Self {
        Self {
            site: site.to_string(),
            device_name: None,
            start: None,
            end: None,
            code: None,
        }
    }

    /// The date range to filter by, if it is active.
    ///
    /// Returns `Some((start, end))` only when both endpoints are set and
    /// `start <= end`. An inverted range fails open: the filter is
    /// treated as unset rather than rejecting everything.
    pub fn effective_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    /// Apply a patch, producing the next criteria state.
    ///
    /// Changing the site clears the device selection, since device
    /// options are scoped to the selected site.
    pub fn apply(&self, patch: CriteriaPatch) -> Self {
        let mut next = self.clone();

        if let Some(site) = patch.site {
            if site != next.site {
                next.device_name = None;
            }
            next.site = site;
        }
        if let Some(device_name) = patch.device_name {
            next.device_name = device_name;
        }
        if let Some(start) = patch.start {
            next.start = start;
        }
        if let Some(end) = patch.end {
            next.end = end;
        }
        if let Some(code) = patch.code {
            next.code = code;
        }

        next
    }

    /// The site after `site` in the fixed site set, wrapping around.
    pub fn next_site(&self) -> &'static str {
        let position = SITES.iter().position(|s| *s == self.site).unwrap_or(0);
        SITES[(position + 1) % SITES.len()]
    }
}

/// A partial update to [`FilterCriteria`].
///
/// Outer `None` leaves the field untouched; `Some(None)` clears an
/// optional filter; `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default)]
pub struct CriteriaPatch {
    pub site: Option<String>,
    pub device_name: Option<Option<String>>,
    pub start: Option<Option<DateTime<Utc>>>,
    pub end: Option<Option<DateTime<Utc>>>,
    pub code: Option<Option<String>>,
}

impl CriteriaPatch {
    pub fn site(site: &str) -> Self {
        Self {
            site: Some(site.to_string()),
            ..Self::default()
        }
    }

    pub fn device(device_name: Option<String>) -> Self {
        Self {
            device_name: Some(device_name),
            ..Self::default()
        }
    }

    pub fn start(start: Option<DateTime<Utc>>) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }

    pub fn end(end: Option<DateTime<Utc>>) -> Self {
        Self {
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn code(code: Option<String>) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_site() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.site, "Minneapolis");
        assert!(criteria.device_name.is_none());
        assert!(criteria.code.is_none());
    }

    #[test]
    fn test_apply_is_pure() {
        let criteria = FilterCriteria::default();
        let next = criteria.apply(CriteriaPatch::code(Some("100".to_string())));

        assert!(criteria.code.is_none());
        assert_eq!(next.code.as_deref(), Some("100"));
        assert_eq!(next.site, criteria.site);
    }

    #[test]
    fn test_site_change_clears_device() {
        let criteria = FilterCriteria::default()
            .apply(CriteriaPatch::device(Some("T1".to_string())));
        assert_eq!(criteria.device_name.as_deref(), Some("T1"));

        let moved = criteria.apply(CriteriaPatch::site("Colorado"));
        assert_eq!(moved.site, "Colorado");
        assert!(moved.device_name.is_none());

        // Re-applying the same site keeps the selection.
        let same = criteria.apply(CriteriaPatch::site("Minneapolis"));
        assert_eq!(same.device_name.as_deref(), Some("T1"));
    }

    #[test]
    fn test_effective_range_requires_both_endpoints() {
        let mut criteria = FilterCriteria::default();
        assert!(criteria.effective_range().is_none());

        criteria.start = Some(ts("2024-01-01T00:00:00Z"));
        assert!(criteria.effective_range().is_none());

        criteria.end = Some(ts("2024-02-01T00:00:00Z"));
        assert!(criteria.effective_range().is_some());
    }

    #[test]
    fn test_inverted_range_fails_open() {
        let mut criteria = FilterCriteria::default();
        criteria.start = Some(ts("2024-02-01T00:00:00Z"));
        criteria.end = Some(ts("2024-01-01T00:00:00Z"));
        assert!(criteria.effective_range().is_none());
    }

    #[test]
    fn test_start_equal_end_is_active() {
        let instant = ts("2024-01-01T00:00:00Z");
        let mut criteria = FilterCriteria::default();
        criteria.start = Some(instant);
        criteria.end = Some(instant);
        assert_eq!(criteria.effective_range(), Some((instant, instant)));
    }

    #[test]
    fn test_next_site_cycles() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.next_site(), "Colorado");

        let criteria = criteria.apply(CriteriaPatch::site("Colorado"));
        assert_eq!(criteria.next_site(), "Minneapolis");
    }

    #[test]
    fn test_clear_patch() {
        let criteria = FilterCriteria::default()
            .apply(CriteriaPatch::code(Some("7".to_string())))
            .apply(CriteriaPatch::code(None));
        assert!(criteria.code.is_none());
    }
}
