use crate::domain::agent::OnboardingInput;
use crate::templates::{
    components::{flash_error, text_field},
    desktop_layout, Viewer,
};
use maud::{html, Markup};

pub fn onboarding_page(values: &OnboardingInput, error: Option<&str>) -> Markup {
    desktop_layout(
        "Set up your profile",
        Viewer::agent(),
        html! {
            main class="container narrow" {
                h1 { "Set up your profile" }
                p class="lead" { "This is what visitors see on your public site." }
                (flash_error(error))

                form method="post" action="/onboarding" class="stack" {
                    (text_field("display_name", "Full name", &values.display_name, true))
                    (text_field("phone", "Phone", &values.phone, true))
                    (text_field("city", "City", &values.city, true))
                    (text_field("area", "Area / locality", &values.area, false))

                    label for="experience" { "Years of experience *" }
                    input type="number" id="experience" name="experience" min="0" max="80"
                        value=(values.experience) required;

                    label for="slug" { "Profile address" }
                    div class="inline" {
                        span class="muted" { "/a/" }
                        input type="text" id="slug" name="slug" value=(values.slug)
                            placeholder="leave blank to use your name";
                    }

                    label for="bio" { "About you" }
                    textarea id="bio" name="bio" rows="4" { (values.bio) }

                    button type="submit" class="primary" { "Save and continue" }
                }
            }
        },
    )
}
