// src/domain/listing.rs

use crate::errors::ServerError;

/// A property an agent lists on their public site.
#[derive(Debug, Clone)]
pub struct PropertyListing {
    pub id: i64,
    pub agent_id: i64,
    pub title: String,
    pub city: Option<String>,
    pub area: Option<String>,
    pub price: i64,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub title: String,
    pub city: Option<String>,
    pub area: Option<String>,
    pub price: i64,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub description: Option<String>,
}

fn optional_text(s: &str) -> Option<String> {
    Some(s.trim().to_string()).filter(|s| !s.is_empty())
}

fn optional_count(field: &str, s: &str) -> Result<Option<i64>, ServerError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<i64>()
        .ok()
        .filter(|n| *n >= 0)
        .map(Some)
        .ok_or_else(|| ServerError::BadRequest(format!("{field} must be a non-negative number.")))
}

impl NewListing {
    pub fn from_form(
        title: &str,
        city: &str,
        area: &str,
        price: &str,
        bedrooms: &str,
        bathrooms: &str,
        description: &str,
    ) -> Result<Self, ServerError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ServerError::BadRequest("Title is required.".into()));
        }

        // Accept "45,00,000" and "4,500,000" alike.
        let digits: String = price.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
        let price = digits
            .parse::<i64>()
            .ok()
            .filter(|p| *p >= 0)
            .ok_or_else(|| ServerError::BadRequest("Price must be a non-negative number.".into()))?;

        Ok(Self {
            title: title.to_string(),
            city: optional_text(city),
            area: optional_text(area),
            price,
            bedrooms: optional_count("Bedrooms", bedrooms)?,
            bathrooms: optional_count("Bathrooms", bathrooms)?,
            description: optional_text(description),
        })
    }
}
