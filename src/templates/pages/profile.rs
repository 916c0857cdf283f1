use crate::domain::agent::{AgentProfile, ProfileTemplate};
use crate::templates::{components::card, desktop_layout, Viewer};
use maud::{html, Markup};

pub fn profile_settings_page(agent: &AgentProfile) -> Markup {
    desktop_layout(
        "Profile",
        Viewer::agent(),
        html! {
            main class="container" {
                h1 { "Profile" }

                (card("Details", html! {
                    dl {
                        dt { "Name" } dd { (agent.display_name) }
                        dt { "Phone" } dd { (agent.phone.as_deref().unwrap_or("-")) }
                        dt { "City" } dd { (agent.city.as_deref().unwrap_or("-")) }
                        dt { "Area" } dd { (agent.area.as_deref().unwrap_or("-")) }
                        dt { "Experience" } dd {
                            @if let Some(years) = agent.experience { (years) " years" } @else { "-" }
                        }
                    }
                    a href="/onboarding" { "Edit details" }
                }))

                (card("Site template", html! {
                    form method="post" action="/profile/template" class="stack" {
                        @for t in ProfileTemplate::ALL {
                            label {
                                input type="radio" name="template" value=(t.as_str())
                                    checked[t == agent.template];
                                " " (t.label())
                            }
                        }
                        button type="submit" class="primary" { "Save template" }
                    }
                    @if let Some(slug) = &agent.slug {
                        p { a href=(format!("/a/{slug}")) target="_blank" { "Preview your site" } }
                    }
                }))

                (card("Subscription", html! {
                    @if agent.is_subscribed {
                        p { "Active" @if let Some(plan) = &agent.subscribed_plan { " (" (plan) ")" } }
                    } @else {
                        p { "Not subscribed. " a href="/subscribe" { "See plans" } }
                    }
                }))
            }
        },
    )
}
