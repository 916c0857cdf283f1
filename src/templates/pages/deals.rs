use std::collections::HashSet;

use crate::domain::deal::Deal;
use crate::templates::{components::date_label, desktop_layout, Viewer};
use maud::{html, Markup};

/// Offers the agent currently qualifies for.
pub fn deals_page(deals: &[Deal], adopted: &HashSet<i64>) -> Markup {
    desktop_layout(
        "Deals",
        Viewer::agent(),
        html! {
            main class="container" {
                h1 { "Deals" }

                @if deals.is_empty() {
                    p class="muted" { "Nothing matches your profile yet. Check back soon." }
                }

                @for deal in deals {
                    section class="card" id=(format!("deal-{}", deal.id)) {
                        h3 { (deal.title) }
                        p { (deal.description) }
                        p class="muted" { "Posted " (date_label(deal.created_at)) }

                        @if adopted.contains(&deal.id) {
                            span class="badge ok" { "Adopted" }
                        } @else {
                            form method="post" action=(format!("/deals/{}/adopt", deal.id)) {
                                button type="submit" class="primary" { "Adopt this deal" }
                            }
                        }
                    }
                }
            }
        },
    )
}
