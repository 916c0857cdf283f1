use crate::templates::{desktop_layout, Viewer};
use maud::{html, Markup};

/// Swapped into `#auth-result` on htmx requests.
pub fn check_email_content(email: &str, valid_for_mins: i64) -> Markup {
    html! {
        div class="card stack" role="status" {
            h3 { "Check your inbox" }
            p {
                "A sign-in link is on its way to "
                strong { (email) }
                "."
            }
            p class="muted" {
                "It can be used once and stops working after " (valid_for_mins) " minutes. "
                "Opening it on this device takes you straight to your dashboard."
            }
            p { a href="/login" class="link" { "Use a different address" } }
        }
    }
}

pub fn check_email_page(email: &str, valid_for_mins: i64) -> Markup {
    desktop_layout(
        "Check your inbox",
        Viewer::ANON,
        html! {
            main class="container narrow" {
                (check_email_content(email, valid_for_mins))
            }
        },
    )
}
