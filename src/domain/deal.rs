// src/domain/deal.rs

use std::fmt;

use crate::domain::agent::AgentProfile;
use crate::domain::analytics::ViewCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealStatus {
    Draft,
    Active,
    Paused,
    Archived,
}

impl DealStatus {
    pub const ALL: [DealStatus; 4] = [
        DealStatus::Draft,
        DealStatus::Active,
        DealStatus::Paused,
        DealStatus::Archived,
    ];

    /// Stored form. Only `"Active"` deals are ever offered.
    pub fn as_str(self) -> &'static str {
        match self {
            DealStatus::Draft => "Draft",
            DealStatus::Active => "Active",
            DealStatus::Paused => "Paused",
            DealStatus::Archived => "Archived",
        }
    }

    /// Exact match on the stored form; no case folding.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s)
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a deal is offered to. An empty allow-list means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Targeting {
    pub allowed_agent_slugs: Vec<String>,
    pub excluded_agent_slugs: Vec<String>,
    pub allowed_cities: Vec<String>,
    pub excluded_cities: Vec<String>,
    pub allowed_areas: Vec<String>,
    pub excluded_areas: Vec<String>,
    pub min_profile_views_30d: Option<i64>,
    pub min_page_views_30d: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: DealStatus,
    pub targeting: Targeting,
    pub created_at: i64,
}

/// The agent attributes a deal can target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTarget {
    pub slug: String,
    pub city: Option<String>,
    pub area: Option<String>,
}

impl AgentTarget {
    /// Agents without a slug have not finished onboarding and are never targeted.
    pub fn from_profile(agent: &AgentProfile) -> Option<Self> {
        Some(Self {
            slug: agent.slug.clone()?,
            city: agent.city.clone(),
            area: agent.area.clone(),
        })
    }
}

/// One failed eligibility condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NotActive,
    SlugNotAllowed,
    SlugExcluded,
    CityNotAllowed,
    CityExcluded,
    AreaNotAllowed,
    AreaExcluded,
    TooFewProfileViews,
    TooFewPageViews,
}

impl Rejection {
    pub fn describe(self) -> &'static str {
        match self {
            Rejection::NotActive => "deal is not active",
            Rejection::SlugNotAllowed => "agent not on the allowed list",
            Rejection::SlugExcluded => "agent excluded",
            Rejection::CityNotAllowed => "city not allowed",
            Rejection::CityExcluded => "city excluded",
            Rejection::AreaNotAllowed => "area not allowed",
            Rejection::AreaExcluded => "area excluded",
            Rejection::TooFewProfileViews => "too few profile views (30d)",
            Rejection::TooFewPageViews => "too few property views (30d)",
        }
    }
}

fn contains(list: &[String], value: &str) -> bool {
    list.iter().any(|v| v == value)
}

/// Empty list admits everyone; a missing value never matches a non-empty list.
fn allows(list: &[String], value: Option<&str>) -> bool {
    list.is_empty() || value.is_some_and(|v| contains(list, v))
}

/// A missing value is never excluded.
fn excludes(list: &[String], value: Option<&str>) -> bool {
    value.is_some_and(|v| contains(list, v))
}

fn meets(threshold: Option<i64>, actual: i64) -> bool {
    threshold.map_or(true, |min| actual >= min)
}

/// Every condition the agent fails for this deal. Empty means eligible.
pub fn eligibility_failures(deal: &Deal, agent: &AgentTarget, views: &ViewCounts) -> Vec<Rejection> {
    let t = &deal.targeting;
    let slug = Some(agent.slug.as_str());
    let city = agent.city.as_deref();
    let area = agent.area.as_deref();

    let checks = [
        (deal.status == DealStatus::Active, Rejection::NotActive),
        (allows(&t.allowed_agent_slugs, slug), Rejection::SlugNotAllowed),
        (!excludes(&t.excluded_agent_slugs, slug), Rejection::SlugExcluded),
        (allows(&t.allowed_cities, city), Rejection::CityNotAllowed),
        (!excludes(&t.excluded_cities, city), Rejection::CityExcluded),
        (allows(&t.allowed_areas, area), Rejection::AreaNotAllowed),
        (!excludes(&t.excluded_areas, area), Rejection::AreaExcluded),
        (
            meets(t.min_profile_views_30d, views.profile_views_30d),
            Rejection::TooFewProfileViews,
        ),
        (
            meets(t.min_page_views_30d, views.page_views_30d),
            Rejection::TooFewPageViews,
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(passed, rejection)| (!passed).then_some(rejection))
        .collect()
}

/// Whether `deal` is offered to `agent`: the conjunction of every targeting
/// condition. Exclusion is its own condition, so it wins over inclusion.
pub fn is_eligible(deal: &Deal, agent: &AgentTarget, views: &ViewCounts) -> bool {
    let t = &deal.targeting;
    let slug = Some(agent.slug.as_str());
    let city = agent.city.as_deref();
    let area = agent.area.as_deref();

    deal.status == DealStatus::Active
        && allows(&t.allowed_agent_slugs, slug)
        && !excludes(&t.excluded_agent_slugs, slug)
        && allows(&t.allowed_cities, city)
        && !excludes(&t.excluded_cities, city)
        && allows(&t.allowed_areas, area)
        && !excludes(&t.excluded_areas, area)
        && meets(t.min_profile_views_30d, views.profile_views_30d)
        && meets(t.min_page_views_30d, views.page_views_30d)
}

/// Admin form lists: comma separated, trimmed, blanks dropped.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
