use crate::db::users::UserWithAgent;
use crate::domain::agent::AgentProfile;
use crate::domain::analytics::ViewCounts;
use crate::domain::deal::{Deal, DealStatus, Rejection};
use crate::templates::{
    components::{card, date_label, flash_error},
    desktop_layout, Viewer,
};
use maud::{html, Markup};

const ADMIN: Viewer = Viewer {
    signed_in: true,
    is_admin: true,
};

pub struct AgentRow {
    pub agent: AgentProfile,
    pub views: ViewCounts,
}

pub struct AdminVm {
    pub users: Vec<UserWithAgent>,
    pub agents: Vec<AgentRow>,
    pub deals: Vec<Deal>,
}

pub fn admin_page(vm: &AdminVm, error: Option<&str>) -> Markup {
    desktop_layout(
        "Admin",
        ADMIN,
        html! {
            main class="container" {
                h1 { "Admin" }
                (flash_error(error))

                (card("Deals", html! {
                    table {
                        thead { tr { th { "ID" } th { "Title" } th { "Status" } th { "Created" } th {} } }
                        tbody {
                            @for deal in &vm.deals {
                                tr {
                                    td { (deal.id) }
                                    td { (deal.title) }
                                    td {
                                        form method="post" action=(format!("/admin/deals/{}/status", deal.id)) class="inline" {
                                            select name="status" {
                                                @for st in DealStatus::ALL {
                                                    option value=(st.as_str()) selected[st == deal.status] { (st.as_str()) }
                                                }
                                            }
                                            button type="submit" { "Set" }
                                        }
                                    }
                                    td { (date_label(deal.created_at)) }
                                    td { a href=(format!("/admin/deals/{}/preview", deal.id)) { "Who sees this?" } }
                                }
                            }
                        }
                    }
                }))

                (card("New deal", new_deal_form()))

                (card("Agents", html! {
                    table {
                        thead {
                            tr {
                                th { "ID" } th { "Name" } th { "Slug" } th { "City / Area" }
                                th { "Profile views" } th { "Property views" } th { "Subscribed" }
                            }
                        }
                        tbody {
                            @for row in &vm.agents {
                                tr {
                                    td { (row.agent.id) }
                                    td { (row.agent.display_name) }
                                    td { (row.agent.slug.as_deref().unwrap_or("-")) }
                                    td {
                                        (row.agent.city.as_deref().unwrap_or("-")) " / "
                                        (row.agent.area.as_deref().unwrap_or("-"))
                                    }
                                    td { (row.views.profile_views_30d) }
                                    td { (row.views.page_views_30d) }
                                    td {
                                        form method="post"
                                            action=(format!("/admin/agents/{}/subscription", row.agent.id))
                                            class="inline" {
                                            input type="hidden" name="subscribed"
                                                value=(if row.agent.is_subscribed { "0" } else { "1" });
                                            @if row.agent.is_subscribed {
                                                "Yes " button type="submit" class="link danger" { "Revoke" }
                                            } @else {
                                                "No " button type="submit" class="link" { "Grant" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }))

                (card("Users", html! {
                    table {
                        thead { tr { th { "ID" } th { "Email" } th { "Role" } th { "Agent" } th { "Last login" } } }
                        tbody {
                            @for user in &vm.users {
                                tr {
                                    td { (user.id) }
                                    td { (user.email) }
                                    td { @if user.is_admin { span class="badge" { "Admin" } } @else { "User" } }
                                    td {
                                        @match (&user.agent_slug, user.agent_subscribed) {
                                            (Some(slug), Some(true)) => (format!("{slug} (subscribed)")),
                                            (Some(slug), _) => (slug),
                                            (None, Some(_)) => "onboarding",
                                            (None, None) => "-",
                                        }
                                    }
                                    td {
                                        @match user.last_login_at {
                                            Some(ts) => (date_label(ts)),
                                            None => "Never",
                                        }
                                    }
                                }
                            }
                        }
                    }
                }))
            }
        },
    )
}

fn new_deal_form() -> Markup {
    html! {
        form method="post" action="/admin/deals" class="stack" {
            label for="title" { "Title *" }
            input type="text" id="title" name="title" required;
            label for="description" { "Description" }
            textarea id="description" name="description" rows="3" {}
            label for="status" { "Status" }
            select id="status" name="status" {
                @for st in DealStatus::ALL {
                    option value=(st.as_str()) { (st.as_str()) }
                }
            }
            p class="muted" { "Lists are comma separated. Leave empty for no restriction." }
            @for (name, label) in LIST_FIELDS {
                label for=(name) { (label) }
                input type="text" id=(name) name=(name);
            }
            label for="min_profile_views_30d" { "Min profile views (30 days)" }
            input type="number" min="0" id="min_profile_views_30d" name="min_profile_views_30d";
            label for="min_page_views_30d" { "Min property views (30 days)" }
            input type="number" min="0" id="min_page_views_30d" name="min_page_views_30d";
            button type="submit" class="primary" { "Create deal" }
        }
    }
}

const LIST_FIELDS: [(&str, &str); 6] = [
    ("allowed_agent_slugs", "Only these agents (slugs)"),
    ("excluded_agent_slugs", "Never these agents (slugs)"),
    ("allowed_cities", "Only these cities"),
    ("excluded_cities", "Never these cities"),
    ("allowed_areas", "Only these areas"),
    ("excluded_areas", "Never these areas"),
];

pub struct PreviewRow {
    pub agent: AgentProfile,
    pub views: ViewCounts,
    pub failures: Vec<Rejection>,
}

/// Eligibility of every agent for one deal, with the reasons for each miss.
pub fn deal_preview_page(deal: &Deal, rows: &[PreviewRow]) -> Markup {
    let eligible = rows.iter().filter(|r| r.failures.is_empty()).count();

    desktop_layout(
        "Deal preview",
        ADMIN,
        html! {
            main class="container" {
                p { a href="/admin" { "← Admin" } }
                h1 { (deal.title) }
                p { "Status: " strong { (deal.status.as_str()) } ". " (eligible) " of " (rows.len()) " agents eligible." }

                table {
                    thead { tr { th { "Agent" } th { "City / Area" } th { "Views (30d)" } th { "Result" } } }
                    tbody {
                        @for row in rows {
                            tr {
                                td { (row.agent.slug.as_deref().unwrap_or("(no slug)")) }
                                td {
                                    (row.agent.city.as_deref().unwrap_or("-")) " / "
                                    (row.agent.area.as_deref().unwrap_or("-"))
                                }
                                td { (row.views.profile_views_30d) " / " (row.views.page_views_30d) }
                                td {
                                    @if row.failures.is_empty() {
                                        span class="badge ok" { "eligible" }
                                    } @else {
                                        ul {
                                            @for f in &row.failures { li { (f.describe()) } }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
