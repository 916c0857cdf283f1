// src/domain/flow.rs

//! Where a signed-in (or not) visitor belongs in the agent lifecycle.
//!
//! `evaluate` is pure: the caller fetches the records and passes the bypass
//! flag in. `crate::db::flow::resolve_flow_status` does the fetching.

use crate::domain::agent::{AgentProfile, AgentSummary};

pub const LOGIN_PATH: &str = "/login";
pub const ONBOARDING_PATH: &str = "/onboarding";
pub const SUBSCRIBE_PATH: &str = "/subscribe";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthReason {
    /// The session points at a user row that no longer exists.
    SessionExpired,
}

impl UnauthReason {
    pub fn code(self) -> &'static str {
        match self {
            UnauthReason::SessionExpired => "session_expired",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            UnauthReason::SessionExpired => "Your session has expired. Please sign in again.",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "session_expired" => Some(UnauthReason::SessionExpired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Unauthenticated { reason: Option<UnauthReason> },
    NeedsOnboarding,
    NeedsSubscription,
    Ready,
}

impl FlowState {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowState::Unauthenticated { .. } => "unauthenticated",
            FlowState::NeedsOnboarding => "needs-onboarding",
            FlowState::NeedsSubscription => "needs-subscription",
            FlowState::Ready => "ready",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStatus {
    pub state: FlowState,
    pub redirect: String,
    pub agent: Option<AgentSummary>,
}

impl FlowStatus {
    fn new(state: FlowState, redirect: impl Into<String>, agent: Option<&AgentProfile>) -> Self {
        Self {
            state,
            redirect: redirect.into(),
            agent: agent.map(AgentProfile::summary),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == FlowState::Ready
    }
}

/// First match wins:
///
/// 1. no identity → unauthenticated
/// 2. identity without a user row → unauthenticated, `session_expired`
/// 3. no agent profile → onboarding
/// 4. not subscribed and no bypass → subscribe
/// 5. profile incomplete → onboarding
/// 6. ready
pub fn evaluate(
    identity: Option<i64>,
    user_exists: bool,
    agent: Option<&AgentProfile>,
    bypass_subscription: bool,
) -> FlowStatus {
    if identity.is_none() {
        return FlowStatus::new(FlowState::Unauthenticated { reason: None }, LOGIN_PATH, None);
    }

    if !user_exists {
        let reason = UnauthReason::SessionExpired;
        return FlowStatus::new(
            FlowState::Unauthenticated {
                reason: Some(reason),
            },
            format!("{LOGIN_PATH}?error={}", reason.code()),
            None,
        );
    }

    let Some(profile) = agent else {
        return FlowStatus::new(FlowState::NeedsOnboarding, ONBOARDING_PATH, None);
    };

    let subscribed = profile.is_subscribed || bypass_subscription;
    if !subscribed {
        return FlowStatus::new(FlowState::NeedsSubscription, SUBSCRIBE_PATH, Some(profile));
    }

    if !profile.has_complete_profile() {
        return FlowStatus::new(FlowState::NeedsOnboarding, ONBOARDING_PATH, Some(profile));
    }

    FlowStatus::new(FlowState::Ready, DASHBOARD_PATH, Some(profile))
}
