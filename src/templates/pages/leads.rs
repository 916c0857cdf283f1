use crate::domain::lead::{Lead, LeadStatus};
use crate::templates::{components::date_label, desktop_layout, Viewer};
use maud::{html, Markup};

pub fn leads_page(leads: &[Lead]) -> Markup {
    desktop_layout(
        "Leads",
        Viewer::agent(),
        html! {
            main class="container" {
                div class="flex items-center justify-between" {
                    h1 { "Leads" }
                    @if !leads.is_empty() {
                        a class="button" href="/leads/export" { "Download .xlsx" }
                    }
                }

                @if leads.is_empty() {
                    p class="muted" { "No enquiries yet." }
                } @else {
                    table {
                        thead {
                            tr {
                                th { "Received" } th { "Name" } th { "Contact" }
                                th { "Message" } th { "Status" }
                            }
                        }
                        tbody {
                            @for lead in leads {
                                tr {
                                    td { (date_label(lead.created_at)) }
                                    td { (lead.name) }
                                    td {
                                        @if let Some(email) = &lead.email { a href=(format!("mailto:{email}")) { (email) } br; }
                                        @if let Some(phone) = &lead.phone { (phone) }
                                    }
                                    td { (lead.message) }
                                    td { (status_form(lead)) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn status_form(lead: &Lead) -> Markup {
    html! {
        form method="post" action=(format!("/leads/{}/status", lead.id)) class="inline" {
            select name="status" {
                @for st in LeadStatus::ALL {
                    option value=(st.as_str()) selected[st == lead.status] { (st.as_str()) }
                }
            }
            button type="submit" { "Save" }
        }
    }
}
