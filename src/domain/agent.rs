// src/domain/agent.rs

use crate::errors::ServerError;

/// An agent profile as stored in the `agents` table.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfile {
    pub id: i64,
    pub user_id: i64,
    pub display_name: String,
    pub slug: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub experience: Option<i64>,
    pub bio: Option<String>,
    pub template: ProfileTemplate,
    pub is_subscribed: bool,
    pub subscribed_plan: Option<String>,
}

impl AgentProfile {
    /// Experience, phone, city and slug are all filled in.
    ///
    /// Subscription is checked separately by the flow evaluator.
    pub fn has_complete_profile(&self) -> bool {
        self.experience.is_some()
            && self.phone.is_some()
            && self.city.is_some()
            && self.slug.is_some()
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id,
            slug: self.slug.clone(),
            display_name: self.display_name.clone(),
            is_subscribed: self.is_subscribed,
        }
    }
}

/// The slice of an agent handed back with a flow status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    pub id: i64,
    pub slug: Option<String>,
    pub display_name: String,
    pub is_subscribed: bool,
}

/// Public profile site layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTemplate {
    #[default]
    Classic,
    Modern,
    Minimal,
}

impl ProfileTemplate {
    pub const ALL: [ProfileTemplate; 3] = [
        ProfileTemplate::Classic,
        ProfileTemplate::Modern,
        ProfileTemplate::Minimal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileTemplate::Classic => "classic",
            ProfileTemplate::Modern => "modern",
            ProfileTemplate::Minimal => "minimal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileTemplate::Classic => "Classic",
            ProfileTemplate::Modern => "Modern",
            ProfileTemplate::Minimal => "Minimal",
        }
    }

    /// Unknown names fall back to classic.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "modern" => ProfileTemplate::Modern,
            "minimal" => ProfileTemplate::Minimal,
            _ => ProfileTemplate::Classic,
        }
    }
}

pub const MAX_SLUG_LEN: usize = 48;
pub const MAX_EXPERIENCE_YEARS: i64 = 80;

/// Lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// Validated onboarding wizard input.
#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingForm {
    pub display_name: String,
    pub phone: String,
    pub city: String,
    pub area: Option<String>,
    pub experience: i64,
    pub bio: Option<String>,
    /// Slug base, before uniqueness suffixes.
    pub slug_base: String,
}

/// Raw form fields, straight from the request body.
#[derive(Debug, Default, Clone)]
pub struct OnboardingInput {
    pub display_name: String,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub experience: String,
    pub bio: String,
    pub slug: String,
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

impl OnboardingInput {
    pub fn validate(&self) -> Result<OnboardingForm, ServerError> {
        let display_name = non_empty(&self.display_name)
            .ok_or_else(|| ServerError::BadRequest("Name is required.".into()))?;

        let phone = non_empty(&self.phone)
            .ok_or_else(|| ServerError::BadRequest("Phone is required.".into()))?;
        let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
        if digits < 7 || phone.chars().any(|c| !(c.is_ascii_digit() || "+-() ".contains(c))) {
            return Err(ServerError::BadRequest("Phone number looks invalid.".into()));
        }

        let city = non_empty(&self.city)
            .ok_or_else(|| ServerError::BadRequest("City is required.".into()))?;

        let experience = self
            .experience
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|y| (0..=MAX_EXPERIENCE_YEARS).contains(y))
            .ok_or_else(|| {
                ServerError::BadRequest(format!(
                    "Experience must be a whole number of years between 0 and {MAX_EXPERIENCE_YEARS}."
                ))
            })?;

        let slug_base = match non_empty(&self.slug) {
            Some(preferred) => slugify(&preferred),
            None => slugify(&display_name),
        };
        if slug_base.is_empty() {
            return Err(ServerError::BadRequest(
                "Choose a profile address with at least one letter or digit.".into(),
            ));
        }

        Ok(OnboardingForm {
            display_name,
            phone,
            city,
            area: non_empty(&self.area),
            experience,
            bio: non_empty(&self.bio),
            slug_base,
        })
    }
}
