// src/domain/lead.rs

use crate::errors::ServerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadStatus {
    New,
    Contacted,
    Closed,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 3] = [LeadStatus::New, LeadStatus::Contacted, LeadStatus::Closed];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str() == s.trim())
    }
}

#[derive(Debug, Clone)]
pub struct Lead {
    pub id: i64,
    pub agent_id: i64,
    pub property_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub status: LeadStatus,
    pub created_at: i64,
}

/// A validated contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub property_id: Option<i64>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: String,
}

pub const MAX_MESSAGE_LEN: usize = 2000;

impl NewLead {
    pub fn from_form(
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
        property_id: Option<i64>,
    ) -> Result<Self, ServerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServerError::BadRequest("Please tell us your name.".into()));
        }

        let email = Some(email.trim().to_lowercase()).filter(|e| !e.is_empty());
        if let Some(e) = &email {
            if !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
                return Err(ServerError::BadRequest("That email address looks invalid.".into()));
            }
        }
        let phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());

        if email.is_none() && phone.is_none() {
            return Err(ServerError::BadRequest(
                "Leave an email or a phone number so the agent can reach you.".into(),
            ));
        }

        let message: String = message.trim().chars().take(MAX_MESSAGE_LEN).collect();

        Ok(Self {
            property_id,
            name: name.to_string(),
            email,
            phone,
            message,
        })
    }
}
