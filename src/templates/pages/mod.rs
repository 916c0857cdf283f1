pub mod admin;
pub mod check_email;
pub mod dashboard;
pub mod deals;
pub mod home;
pub mod leads;
pub mod listings;
pub mod login;
pub mod onboarding;
pub mod profile;
pub mod public_site;
pub mod subscribe;

pub use admin::{admin_page, deal_preview_page, AdminVm, AgentRow, PreviewRow};
pub use check_email::{check_email_content, check_email_page};
pub use dashboard::{dashboard_page, DashboardVm};
pub use deals::deals_page;
pub use home::home_page;
pub use leads::leads_page;
pub use listings::listings_page;
pub use login::login_page;
pub use onboarding::onboarding_page;
pub use profile::profile_settings_page;
pub use public_site::{contact_thanks_page, property_page, public_profile_page};
pub use subscribe::subscribe_page;
