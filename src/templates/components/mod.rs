use maud::{html, Markup};

use crate::domain::StatusBadge;

pub mod form;

pub use form::{select_field, text_area, text_field};

pub fn button(label: &str) -> Markup {
    html! {
        button type="submit" class="btn" { (label) }
    }
}

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Big number with a caption, used for the dashboard counters.
pub fn stat_card(label: &str, value: i64, class: &str) -> Markup {
    html! {
        div class={ "stat-card " (class) } {
            span class="stat-value" { (value) }
            span class="stat-label" { (label) }
        }
    }
}

pub fn status_badge(badge: &StatusBadge) -> Markup {
    html! {
        span class={ "status-badge status-" (badge.css_class) } { (badge.label) }
    }
}
