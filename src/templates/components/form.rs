use maud::{html, Markup};

pub fn text_field(name: &str, label: &str, input_type: &str, required: bool) -> Markup {
    html! {
        div class="form-field" {
            label for=(name) {
                (label)
                @if required { " *" }
            }
            input type=(input_type) id=(name) name=(name) required[required];
        }
    }
}

pub fn text_area(name: &str, label: &str, required: bool) -> Markup {
    html! {
        div class="form-field" {
            label for=(name) {
                (label)
                @if required { " *" }
            }
            textarea id=(name) name=(name) rows="4" required[required] {}
        }
    }
}

/// `options` are `(value, label)` pairs; an empty placeholder comes first.
pub fn select_field(name: &str, label: &str, options: &[(&str, &str)], required: bool) -> Markup {
    html! {
        div class="form-field" {
            label for=(name) {
                (label)
                @if required { " *" }
            }
            select id=(name) name=(name) required[required] {
                option value="" { "Choisir..." }
                @for (value, text) in options {
                    option value=(value) { (text) }
                }
            }
        }
    }
}
