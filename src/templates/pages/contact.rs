use crate::templates::components::{button, text_area, text_field};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn contact_page() -> Markup {
    desktop_layout(
        "Contact",
        html! {
            h1 { "Nous contacter" }

            form method="post" action="/contact" class="stacked-form" {
                (text_field("nom", "Nom", "text", true))
                (text_field("email", "Email", "email", true))
                (text_field("telephone", "Téléphone", "tel", false))
                (text_field("sujet", "Sujet", "text", true))
                (text_area("message", "Message", true))
                (button("Envoyer"))
            }
        },
    )
}
