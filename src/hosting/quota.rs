use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Read-only snapshot of the remaining hosting API call budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub remaining: u64,
    pub limit: u64,
    pub reset_at: Option<DateTime<Utc>>,
}

impl QuotaStatus {
    /// Build a snapshot, keeping `limit > 0` and `remaining <= limit`.
    #[must_use]
    pub fn new(remaining: u64, limit: u64, reset_at: Option<DateTime<Utc>>) -> Self {
        let limit = limit.max(1);
        Self {
            remaining: remaining.min(limit),
            limit,
            reset_at,
        }
    }

    #[must_use]
    pub const fn is_below(&self, floor: u64) -> bool {
        self.remaining < floor
    }
}

/// The single shared view of the call budget for one run.
///
/// Cloning yields another handle onto the same counter. Only the hosting client
/// writes to it; everyone else reads snapshots.
#[derive(Debug, Clone, Default)]
pub struct QuotaTracker {
    current: Arc<Mutex<Option<QuotaStatus>>>,
}

impl QuotaTracker {
    #[must_use]
    pub fn snapshot(&self) -> Option<QuotaStatus> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the snapshot with an authoritative reading.
    pub(super) fn replace(&self, status: QuotaStatus) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(status);
    }

    /// Fold in a reading taken from a response.
    ///
    /// Responses to concurrent requests can arrive out of order, so within one reset
    /// window the lowest remaining count wins. Readings from an older window are dropped.
    pub(super) fn observe(&self, observed: QuotaStatus) {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let merged = match *guard {
            Some(current) if current.reset_at == observed.reset_at => QuotaStatus {
                remaining: current.remaining.min(observed.remaining),
                ..observed
            },
            Some(current) if observed.reset_at < current.reset_at => current,
            _ => observed,
        };
        *guard = Some(merged);
    }

    /// Record that the host refused a call for quota reasons.
    pub(super) fn mark_exhausted(&self) {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let exhausted = guard.map_or_else(|| QuotaStatus::new(0, 1, None), |current| QuotaStatus { remaining: 0, ..current });
        *guard = Some(exhausted);
    }
}

/// Extract quota information from API response headers
pub(super) fn extract_quota_from_headers(headers: &HeaderMap) -> Option<QuotaStatus> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<u64>().ok()?;
    let limit = headers.get("x-ratelimit-limit")?.to_str().ok()?.parse::<u64>().ok()?;

    let reset_at = headers
        .get("x-ratelimit-reset")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|ts| DateTime::from_timestamp(ts, 0));

    Some(QuotaStatus::new(remaining, limit, reset_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn at(ts: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(ts, 0)
    }

    #[test]
    fn test_new_keeps_limit_positive() {
        let status = QuotaStatus::new(0, 0, None);
        assert_eq!(status.limit, 1);
        assert_eq!(status.remaining, 0);
    }

    #[test]
    fn test_new_caps_remaining_at_limit() {
        let status = QuotaStatus::new(70, 60, None);
        assert_eq!(status.remaining, 60);
    }

    #[test]
    fn test_is_below() {
        let status = QuotaStatus::new(9, 60, None);
        assert!(status.is_below(10));
        assert!(!status.is_below(9));
    }

    #[test]
    fn test_tracker_starts_empty() {
        assert!(QuotaTracker::default().snapshot().is_none());
    }

    #[test]
    fn test_observe_same_window_keeps_lowest() {
        let tracker = QuotaTracker::default();
        tracker.observe(QuotaStatus::new(4990, 5000, at(1_704_067_200)));
        tracker.observe(QuotaStatus::new(4995, 5000, at(1_704_067_200)));

        assert_eq!(tracker.snapshot().unwrap().remaining, 4990);
    }

    #[test]
    fn test_observe_newer_window_replaces() {
        let tracker = QuotaTracker::default();
        tracker.observe(QuotaStatus::new(3, 5000, at(1_704_067_200)));
        tracker.observe(QuotaStatus::new(4999, 5000, at(1_704_070_800)));

        assert_eq!(tracker.snapshot().unwrap().remaining, 4999);
    }

    #[test]
    fn test_observe_older_window_ignored() {
        let tracker = QuotaTracker::default();
        tracker.observe(QuotaStatus::new(4999, 5000, at(1_704_070_800)));
        tracker.observe(QuotaStatus::new(3, 5000, at(1_704_067_200)));

        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.remaining, 4999);
        assert_eq!(snapshot.reset_at, at(1_704_070_800));
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = QuotaTracker::default();
        let other = tracker.clone();
        tracker.replace(QuotaStatus::new(42, 60, None));

        assert_eq!(other.snapshot().unwrap().remaining, 42);
    }

    #[test]
    fn test_mark_exhausted_keeps_window() {
        let tracker = QuotaTracker::default();
        tracker.replace(QuotaStatus::new(42, 60, at(1_704_067_200)));
        tracker.mark_exhausted();

        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.remaining, 0);
        assert_eq!(snapshot.limit, 60);
        assert_eq!(snapshot.reset_at, at(1_704_067_200));
    }

    #[test]
    fn test_mark_exhausted_without_snapshot() {
        let tracker = QuotaTracker::default();
        tracker.mark_exhausted();
        assert_eq!(tracker.snapshot().unwrap().remaining, 0);
    }

    #[test]
    fn test_extract_quota_from_headers() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert("x-ratelimit-remaining", HeaderValue::from_static("4999"));
        let _ = headers.insert("x-ratelimit-limit", HeaderValue::from_static("5000"));
        let _ = headers.insert("x-ratelimit-reset", HeaderValue::from_static("1704067200"));

        let status = extract_quota_from_headers(&headers).unwrap();

        assert_eq!(status.remaining, 4999);
        assert_eq!(status.limit, 5000);
        assert_eq!(status.reset_at.unwrap().timestamp(), 1_704_067_200);
    }

    #[test]
    fn test_extract_quota_without_reset() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert("x-ratelimit-remaining", HeaderValue::from_static("12"));
        let _ = headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));

        let status = extract_quota_from_headers(&headers).unwrap();
        assert_eq!(status.remaining, 12);
        assert!(status.reset_at.is_none());
    }

    #[test]
    fn test_extract_quota_missing_headers() {
        assert!(extract_quota_from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_extract_quota_invalid_remaining() {
        let mut headers = HeaderMap::new();
        let _ = headers.insert("x-ratelimit-remaining", HeaderValue::from_static("invalid"));
        let _ = headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));

        assert!(extract_quota_from_headers(&headers).is_none());
    }
}
