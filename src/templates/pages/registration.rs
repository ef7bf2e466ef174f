use crate::templates::components::{button, card, select_field, text_area, text_field};
use crate::templates::desktop_layout;
use maud::{html, Markup};

const CLASSES: &[(&str, &str)] = &[
    ("PS", "Petite section"),
    ("MS", "Moyenne section"),
    ("GS", "Grande section"),
    ("CP", "CP"),
    ("CE1", "CE1"),
    ("CE2", "CE2"),
    ("CM1", "CM1"),
    ("CM2", "CM2"),
];

pub fn registration_page() -> Markup {
    desktop_layout(
        "Inscription",
        html! {
            h1 { "Formulaire d'inscription" }

            form method="post" action="/inscription" class="stacked-form" {
                (card("L'enfant", html! {
                    (text_field("nomEnfant", "Nom", "text", true))
                    (text_field("prenomEnfant", "Prénom", "text", true))
                    (text_field("dateNaissance", "Date de naissance", "date", true))
                    (text_field("lieuNaissance", "Lieu de naissance", "text", true))
                    (select_field("sexe", "Sexe", &[("M", "Masculin"), ("F", "Féminin")], true))
                    (select_field("classe", "Classe demandée", CLASSES, true))
                    (text_field("ancienneEcole", "Ancienne école", "text", false))
                    (text_area("besoinsParticuliers", "Besoins particuliers", false))
                }))

                (card("Parent 1", html! {
                    (text_field("nomParent1", "Nom", "text", true))
                    (text_field("prenomParent1", "Prénom", "text", true))
                    (text_field("emailParent1", "Email", "email", true))
                    (text_field("telephoneParent1", "Téléphone", "tel", true))
                    (text_field("professionParent1", "Profession", "text", false))
                }))

                (card("Parent 2 (facultatif)", html! {
                    (text_field("nomParent2", "Nom", "text", false))
                    (text_field("prenomParent2", "Prénom", "text", false))
                    (text_field("emailParent2", "Email", "email", false))
                    (text_field("telephoneParent2", "Téléphone", "tel", false))
                    (text_field("professionParent2", "Profession", "text", false))
                }))

                (card("Adresse", html! {
                    (text_area("adresse", "Adresse complète", true))
                }))

                (button("Envoyer l'inscription"))
            }
        },
    )
}
