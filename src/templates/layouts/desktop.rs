use maud::{html, Markup, DOCTYPE};

/// Who is looking at the page, for the nav bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer {
    pub signed_in: bool,
    pub is_admin: bool,
}

impl Viewer {
    pub const ANON: Viewer = Viewer {
        signed_in: false,
        is_admin: false,
    };

    pub fn agent() -> Self {
        Viewer {
            signed_in: true,
            is_admin: false,
        }
    }
}

pub fn desktop_layout(title: &str, viewer: Viewer, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Agent Sites" }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
                script src="/static/htmx.js" defer {};
            }
            body {
                header class="flex items-center justify-between px-6 py-3 shadow" {
                    a href="/" class="brand" { "Agent Sites" }
                    nav {
                        ul {
                            @if viewer.signed_in {
                                li { a href="/dashboard" { "Dashboard" } }
                                li { a href="/listings" { "Listings" } }
                                li { a href="/leads" { "Leads" } }
                                li { a href="/deals" { "Deals" } }
                                li { a href="/profile" { "Profile" } }
                            }
                            @if viewer.is_admin {
                                li { a href="/admin" { "Admin" } }
                            }
                        }
                    }

                    @if viewer.signed_in {
                        form method="post" action="/logout" class="inline" {
                            button type="submit" class="link" { "Sign out" }
                        }
                    } @else {
                        a href="/login" class="link" { "Sign in" }
                    }
                }
                (content)
            }
        }
    }
}
