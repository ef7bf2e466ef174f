// templates/pages/home.rs

use crate::templates::{components::card, desktop_layout};
use maud::{html, Markup};

pub fn home_page() -> Markup {
    desktop_layout(
        "Accueil",
        html! {
            h1 { "Bienvenue" }

            (card("Inscriptions", html! {
                p { "Inscrivez votre enfant pour la prochaine rentrée scolaire." }
                a class="btn" href="/inscription" { "Formulaire d'inscription" }
            }))

            (card("Nous contacter", html! {
                p { "Une question sur l'école, les tarifs ou une visite ?" }
                a class="btn" href="/contact" { "Envoyer un message" }
            }))
        },
    )
}
