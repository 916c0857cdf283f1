mod admin_tests;
mod auth_flow_tests;
mod deals_tests;
mod flow_tests;
mod public_site_tests;
mod webhook_tests;
