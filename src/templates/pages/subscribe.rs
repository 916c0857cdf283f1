use crate::db::plans::PlanInfo;
use crate::domain::agent::AgentProfile;
use crate::templates::{desktop_layout, Viewer};
use maud::{html, Markup};

pub fn subscribe_page(agent: &AgentProfile, plans: &[PlanInfo], bypass: bool) -> Markup {
    desktop_layout(
        "Subscribe",
        Viewer::agent(),
        html! {
            main class="container" {
                h1 { "Choose a plan" }

                @if agent.is_subscribed {
                    p class="flash ok" {
                        "You're subscribed"
                        @if let Some(plan) = &agent.subscribed_plan { " (" (plan) ")" }
                        ". " a href="/dashboard" { "Go to your dashboard" }
                    }
                } @else if bypass {
                    p class="flash ok" {
                        "Subscriptions are not enforced on this deployment. "
                        a href="/app" { "Continue" }
                    }
                }

                div class="plans" {
                    @for plan in plans {
                        section class="card plan" {
                            h3 { (plan.name) }
                            p class="price" { (plan.price_label()) }
                            @if !agent.is_subscribed {
                                // Checkout lives with the payment provider, which calls /webhooks/payment.
                                p class="muted" {
                                    "Pay with our payment partner and quote reference "
                                    code { "AGENT-" (agent.id) "-" (plan.code) }
                                    "."
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
