use crate::domain::agent::AgentProfile;
use crate::domain::analytics::{DailyViews, ViewCounts};
use crate::templates::{components::card, desktop_layout, Viewer};
use maud::{html, Markup};

pub struct DashboardVm {
    pub agent: AgentProfile,
    pub views: ViewCounts,
    pub daily: Vec<DailyViews>,
    pub new_leads: i64,
    pub listing_count: usize,
    pub eligible_deals: usize,
    pub is_admin: bool,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    let viewer = Viewer {
        signed_in: true,
        is_admin: vm.is_admin,
    };

    desktop_layout(
        "Dashboard",
        viewer,
        html! {
            main class="container" {
                h1 { "Welcome back, " (vm.agent.display_name) }
                @if let Some(slug) = &vm.agent.slug {
                    p { "Your site: " a href=(format!("/a/{slug}")) { "/a/" (slug) } }
                }

                div class="stats" {
                    (stat("Profile views (30 days)", vm.views.profile_views_30d))
                    (stat("Property views (30 days)", vm.views.page_views_30d))
                    (stat("New leads", vm.new_leads))
                    (stat("Listings", vm.listing_count as i64))
                }

                (card("Deals for you", html! {
                    @if vm.eligible_deals == 0 {
                        p class="muted" { "No offers match your profile right now." }
                    } @else {
                        p { (vm.eligible_deals) " offer(s) available. " a href="/deals" { "See deals" } }
                    }
                }))

                (card("Daily views", views_table(&vm.daily)))
            }
        },
    )
}

fn stat(label: &str, value: i64) -> Markup {
    html! {
        div class="stat" {
            span class="stat-value" { (value) }
            span class="stat-label" { (label) }
        }
    }
}

fn views_table(daily: &[DailyViews]) -> Markup {
    html! {
        @if daily.is_empty() {
            p class="muted" { "No visits yet. Share your link to get started." }
        } @else {
            table {
                thead { tr { th { "Day" } th { "Profile" } th { "Properties" } } }
                tbody {
                    @for d in daily {
                        tr { td { (d.day) } td { (d.profile) } td { (d.property) } }
                    }
                }
            }
        }
    }
}
