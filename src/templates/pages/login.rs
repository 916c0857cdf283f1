use crate::templates::{components::flash_error, desktop_layout, Viewer};
use maud::{html, Markup};

pub fn login_page(error: Option<&str>) -> Markup {
    desktop_layout(
        "Sign in",
        Viewer::ANON,
        html! {
            main class="container narrow" {
                h1 { "Agent sign in" }
                (flash_error(error))
                p class="lead" {
                    "Use the address your clients reach you at. "
                    "First time here? Signing in creates your account, "
                    "and we'll set up your profile site next."
                }
                (sign_in_form())
            }
        },
    )
}

/// Posts to `/auth/request-link`. With htmx the result replaces
/// `#auth-result` and the form stays put.
fn sign_in_form() -> Markup {
    html! {
        form class="stack"
            method="post"
            action="/auth/request-link"
            hx-post="/auth/request-link"
            hx-target="#auth-result"
            hx-disabled-elt="button"
        {
            label for="email" { "Work e-mail" }
            input type="email" id="email" name="email"
                autocomplete="email" placeholder="name@youragency.in" required;
            button type="submit" class="primary" { "Send my sign-in link" }
        }
        div id="auth-result" aria-live="polite" {}
    }
}
