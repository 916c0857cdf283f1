//! Agents' public sites under `/a/{slug}`.

use crate::domain::agent::{AgentProfile, ProfileTemplate};
use crate::domain::listing::PropertyListing;
use crate::templates::components::{flash_error, price_label};
use maud::{html, Markup, DOCTYPE};

fn public_layout(title: &str, template: ProfileTemplate, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href="/static/main.css";
                link rel="stylesheet" href=(format!("/static/sites/{}.css", template.as_str()));
            }
            body class=(format!("site site-{}", template.as_str())) {
                (content)
                footer class="site-footer" { "Powered by Agent Sites" }
            }
        }
    }
}

fn site_path(agent: &AgentProfile) -> String {
    format!("/a/{}", agent.slug.as_deref().unwrap_or_default())
}

fn location(city: Option<&str>, area: Option<&str>) -> String {
    match (area, city) {
        (Some(a), Some(c)) => format!("{a}, {c}"),
        (Some(x), None) | (None, Some(x)) => x.to_string(),
        (None, None) => String::new(),
    }
}

fn contact_form(agent: &AgentProfile, property_id: Option<i64>, error: Option<&str>) -> Markup {
    html! {
        section class="contact" id="contact" {
            h2 { "Contact " (agent.display_name) }
            (flash_error(error))
            form method="post" action=(format!("{}/contact", site_path(agent))) class="stack" {
                @if let Some(pid) = property_id {
                    input type="hidden" name="property_id" value=(pid);
                }
                label for="name" { "Your name *" }
                input type="text" id="name" name="name" required;
                label for="email" { "Email" }
                input type="email" id="email" name="email";
                label for="phone" { "Phone" }
                input type="tel" id="phone" name="phone";
                label for="message" { "Message" }
                textarea id="message" name="message" rows="4" {}
                button type="submit" class="primary" { "Send" }
            }
        }
    }
}

fn listing_cards(agent: &AgentProfile, listings: &[PropertyListing]) -> Markup {
    html! {
        @if listings.is_empty() {
            p class="muted" { "No properties listed right now." }
        }
        div class="listings" {
            @for l in listings {
                a class="listing" href=(format!("{}/p/{}", site_path(agent), l.id)) {
                    h3 { (l.title) }
                    p { (location(l.city.as_deref(), l.area.as_deref())) }
                    p class="price" { (price_label(l.price)) }
                }
            }
        }
    }
}

fn about(agent: &AgentProfile) -> Markup {
    html! {
        @if let Some(years) = agent.experience {
            p { (years) " years in real estate" }
        }
        @if let Some(bio) = &agent.bio {
            p class="bio" { (bio) }
        }
        @if let Some(phone) = &agent.phone {
            p { "Call " a href=(format!("tel:{phone}")) { (phone) } }
        }
    }
}

pub fn public_profile_page(
    agent: &AgentProfile,
    listings: &[PropertyListing],
    error: Option<&str>,
) -> Markup {
    let where_ = location(agent.city.as_deref(), agent.area.as_deref());

    let body = match agent.template {
        ProfileTemplate::Classic => html! {
            header class="hero" {
                h1 { (agent.display_name) }
                p class="lead" { "Real estate agent · " (where_) }
            }
            main class="container" {
                (about(agent))
                h2 { "Properties" }
                (listing_cards(agent, listings))
                (contact_form(agent, None, error))
            }
        },
        ProfileTemplate::Modern => html! {
            main class="split" {
                aside {
                    h1 { (agent.display_name) }
                    p { (where_) }
                    (about(agent))
                    (contact_form(agent, None, error))
                }
                section {
                    h2 { "Featured properties" }
                    (listing_cards(agent, listings))
                }
            }
        },
        ProfileTemplate::Minimal => html! {
            main class="container narrow" {
                h1 { (agent.display_name) }
                p class="muted" { (where_) }
                (listing_cards(agent, listings))
                (contact_form(agent, None, error))
            }
        },
    };

    public_layout(&agent.display_name, agent.template, body)
}

pub fn property_page(agent: &AgentProfile, listing: &PropertyListing) -> Markup {
    public_layout(
        &listing.title,
        agent.template,
        html! {
            main class="container" {
                p { a href=(site_path(agent)) { "← " (agent.display_name) } }
                h1 { (listing.title) }
                p class="lead" { (location(listing.city.as_deref(), listing.area.as_deref())) }
                p class="price" { (price_label(listing.price)) }
                ul class="facts" {
                    @if let Some(b) = listing.bedrooms { li { (b) " bedrooms" } }
                    @if let Some(b) = listing.bathrooms { li { (b) " bathrooms" } }
                }
                @if let Some(desc) = &listing.description {
                    p { (desc) }
                }
                (contact_form(agent, Some(listing.id), None))
            }
        },
    )
}

pub fn contact_thanks_page(agent: &AgentProfile) -> Markup {
    public_layout(
        "Message sent",
        agent.template,
        html! {
            main class="container narrow" {
                h1 { "Thanks!" }
                p { (agent.display_name) " will get back to you soon." }
                p { a href=(site_path(agent)) { "Back to the site" } }
            }
        },
    )
}
