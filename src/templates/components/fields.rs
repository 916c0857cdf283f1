use maud::{html, Markup};

pub fn flash_error(message: Option<&str>) -> Markup {
    html! {
        @if let Some(msg) = message {
            p class="flash error" role="alert" { (msg) }
        }
    }
}

pub fn text_field(name: &str, label: &str, value: &str, required: bool) -> Markup {
    html! {
        label for=(name) { (label) @if required { " *" } }
        input type="text" id=(name) name=(name) value=(value) required[required];
    }
}

pub fn number_field(name: &str, label: &str, value: Option<i64>) -> Markup {
    html! {
        label for=(name) { (label) }
        input type="number" min="0" id=(name) name=(name) value=[value];
    }
}
