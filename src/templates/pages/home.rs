// templates/pages/home.rs

use crate::templates::{components::card, desktop_layout, Viewer};
use maud::{html, Markup};

pub fn home_page(viewer: Viewer) -> Markup {
    desktop_layout(
        "Home",
        viewer,
        html! {
            main class="container" {
                h1 { "Your own property site, ready in minutes" }
                p class="lead" {
                    "Publish a profile, list properties, capture enquiries and pick up partner deals."
                }

                @if viewer.signed_in {
                    a class="button primary" href="/app" { "Go to your dashboard" }
                } @else {
                    a class="button primary" href="/login" { "Get started" }
                }

                (card("How it works", html! {
                    ol {
                        li { "Sign in with your email." }
                        li { "Tell us about your practice and pick a site template." }
                        li { "Subscribe and share your link." }
                    }
                }))
            }
        },
    )
}
