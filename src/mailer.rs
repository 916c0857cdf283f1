// src/mailer.rs

use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::MailConfig;
use crate::domain::lead::NewLead;

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
}

/// Transactional mail through Brevo.
pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: String,
}

impl BrevoMailer {
    pub fn new(cfg: &MailConfig) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        Ok(Self {
            api_key: cfg.api_key.clone(),
            sender_email: cfg.sender_email.clone(),
            sender_name: cfg.sender_name.clone(),
            client,
        })
    }

    fn send(&self, to: &str, subject: &str, html_content: String) -> Result<(), MailerError> {
        let payload = BrevoPayload {
            sender: BrevoSender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: vec![BrevoRecipient { email: to }],
            subject,
            html_content,
        };

        let resp = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailerError::ApiError(format!("{status} - {body}")));
        }

        tracing::debug!(subject, "mail sent");
        Ok(())
    }

    pub fn send_magic_link(&self, to: &str, magic_link: &str) -> Result<(), MailerError> {
        self.send(to, "Your sign-in link", magic_link_html(magic_link))
    }

    pub fn send_lead_notification(
        &self,
        to: &str,
        agent_name: &str,
        lead: &NewLead,
    ) -> Result<(), MailerError> {
        self.send(to, "New enquiry from your profile", lead_html(agent_name, lead))
    }
}

fn magic_link_html(link: &str) -> String {
    let link = maud::html! { (link) }.into_string();
    format!(
        r#"
        <h2>Sign in to your agent site</h2>
        <p>Click the link below to sign in. It expires in 15 minutes.</p>
        <p><a href="{link}">Sign in</a></p>
        <p style="font-size: 0.8em; color: #999;">If you did not request this link, you can safely ignore this email.</p>
        "#
    )
}

fn lead_html(agent_name: &str, lead: &NewLead) -> String {
    maud::html! {
        h2 { "Hi " (agent_name) ", you have a new enquiry" }
        p { strong { "Name: " } (lead.name) }
        @if let Some(email) = &lead.email { p { strong { "Email: " } (email) } }
        @if let Some(phone) = &lead.phone { p { strong { "Phone: " } (phone) } }
        @if !lead.message.is_empty() { p { (lead.message) } }
    }
    .into_string()
}
