// src/domain/analytics.rs

use time::{Duration, OffsetDateTime};

/// Trailing window used by deal thresholds.
pub const VIEW_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// The agent's public profile page.
    Profile,
    /// One of the agent's public property pages.
    Property,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Profile => "profile",
            ViewKind::Property => "property",
        }
    }
}

/// Views in the trailing window, recomputed per request. Not cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewCounts {
    pub profile_views_30d: i64,
    pub page_views_30d: i64,
}

/// Per-day view totals for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyViews {
    /// `YYYY-MM-DD`, UTC.
    pub day: String,
    pub profile: i64,
    pub property: i64,
}

/// First second (unix) counted by a `days`-long trailing window ending at `now`.
pub fn window_start(now: i64, days: i64) -> i64 {
    match OffsetDateTime::from_unix_timestamp(now) {
        Ok(dt) => (dt - Duration::days(days)).unix_timestamp(),
        Err(_) => now - days * 86_400,
    }
}
