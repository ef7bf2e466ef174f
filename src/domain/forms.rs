// src/domain/forms.rs
//
// Validation for the two public forms. Every field is checked and all
// problems are reported together.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("static email pattern")
});

static CONTACT_PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{8,20}$").expect("static phone pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join(", "))]
pub struct ValidationErrors(pub Vec<String>);

/// Decoded form body, last value wins for repeated keys.
pub type FormFields = HashMap<String, String>;

/// Trim and drop NUL bytes. Escaping happens at render time.
pub fn clean_input(raw: &str) -> String {
    raw.trim().replace('\0', "")
}

fn field(fields: &FormFields, name: &str) -> String {
    fields.get(name).map(|v| clean_input(v)).unwrap_or_default()
}

fn optional(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_RE.is_match(email)
}

/// Registration phones: strip anything other than digits, `+`, `-`,
/// spaces and parentheses, then require 8 to 20 characters.
pub fn clean_registration_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
        .collect();
    (8..=20).contains(&cleaned.len()).then_some(cleaned)
}

pub fn is_valid_contact_phone(phone: &str) -> bool {
    CONTACT_PHONE_RE.is_match(phone)
}

/// `YYYY-MM-DD`, a real calendar date, year between 1900 and the current year.
pub fn parse_birth_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    if raw.len() != 10 {
        return None;
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    (1900..=today.year()).contains(&date.year()).then_some(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    M,
    F,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guardian {
    pub last_name: String,
    pub first_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub profession: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub child_last_name: String,
    pub child_first_name: String,
    pub birth_date: NaiveDate,
    pub birth_place: String,
    pub sex: Sex,
    pub class_name: String,
    pub previous_school: Option<String>,
    pub special_needs: Option<String>,
    pub parent1: Guardian,
    pub parent2: Option<Guardian>,
    pub address: String,
}

const REQUIRED_REGISTRATION_FIELDS: &[(&str, &str)] = &[
    ("nomEnfant", "Nom de l'enfant"),
    ("prenomEnfant", "Prénom de l'enfant"),
    ("dateNaissance", "Date de naissance"),
    ("lieuNaissance", "Lieu de naissance"),
    ("sexe", "Sexe"),
    ("classe", "Classe"),
    ("nomParent1", "Nom du parent"),
    ("prenomParent1", "Prénom du parent"),
    ("emailParent1", "Email du parent"),
    ("telephoneParent1", "Téléphone du parent"),
    ("adresse", "Adresse"),
];

impl RegistrationForm {
    pub fn from_fields(fields: &FormFields, today: NaiveDate) -> Result<Self, ValidationErrors> {
        let mut errors = Vec::new();

        for (name, label) in REQUIRED_REGISTRATION_FIELDS {
            if field(fields, name).is_empty() {
                errors.push(format!("{label} est requis"));
            }
        }

        let birth_raw = field(fields, "dateNaissance");
        let birth_date = parse_birth_date(&birth_raw, today);
        if !birth_raw.is_empty() && birth_date.is_none() {
            errors.push("Date de naissance invalide".to_string());
        }

        let sex_raw = field(fields, "sexe");
        let sex = match sex_raw.as_str() {
            "M" => Some(Sex::M),
            "F" => Some(Sex::F),
            _ => None,
        };
        if !sex_raw.is_empty() && sex.is_none() {
            errors.push("Sexe invalide".to_string());
        }

        let email1 = field(fields, "emailParent1");
        if !email1.is_empty() && !is_valid_email(&email1) {
            errors.push("Email du parent invalide".to_string());
        }

        let phone1_raw = field(fields, "telephoneParent1");
        let phone1 = clean_registration_phone(&phone1_raw);
        if !phone1_raw.is_empty() && phone1.is_none() {
            errors.push("Numéro de téléphone invalide".to_string());
        }

        let email2 = optional(field(fields, "emailParent2"));
        if matches!(&email2, Some(e) if !is_valid_email(e)) {
            errors.push("Email du parent 2 invalide".to_string());
        }

        let phone2_raw = optional(field(fields, "telephoneParent2"));
        let phone2 = phone2_raw.as_deref().and_then(clean_registration_phone);
        if phone2_raw.is_some() && phone2.is_none() {
            errors.push("Téléphone du parent 2 invalide".to_string());
        }

        let (Some(birth_date), Some(sex)) = (birth_date, sex) else {
            return Err(ValidationErrors(errors));
        };
        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        let parent2 = match (
            optional(field(fields, "nomParent2")),
            optional(field(fields, "prenomParent2")),
        ) {
            (Some(last_name), Some(first_name)) => Some(Guardian {
                last_name,
                first_name,
                email: email2,
                phone: phone2,
                profession: optional(field(fields, "professionParent2")),
            }),
            _ => None,
        };

        Ok(Self {
            child_last_name: field(fields, "nomEnfant"),
            child_first_name: field(fields, "prenomEnfant"),
            birth_date,
            birth_place: field(fields, "lieuNaissance"),
            sex,
            class_name: field(fields, "classe"),
            previous_school: optional(field(fields, "ancienneEcole")),
            special_needs: optional(field(fields, "besoinsParticuliers")),
            parent1: Guardian {
                last_name: field(fields, "nomParent1"),
                first_name: field(fields, "prenomParent1"),
                email: Some(email1),
                phone: phone1,
                profession: optional(field(fields, "professionParent1")),
            },
            parent2,
            address: field(fields, "adresse"),
        })
    }

    pub fn child_display_name(&self) -> String {
        format!("{} {}", self.child_first_name, self.child_last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn from_fields(fields: &FormFields) -> Result<Self, ValidationErrors> {
        let name = field(fields, "nom");
        let email = field(fields, "email");
        let phone = optional(field(fields, "telephone"));
        let subject = field(fields, "sujet");
        let message = field(fields, "message");

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push("Le nom est obligatoire".to_string());
        }
        if email.is_empty() {
            errors.push("L'email est obligatoire".to_string());
        }
        if subject.is_empty() {
            errors.push("Le sujet est obligatoire".to_string());
        }
        if message.is_empty() {
            errors.push("Le message est obligatoire".to_string());
        }
        if !email.is_empty() && !is_valid_email(&email) {
            errors.push("Format d'email invalide".to_string());
        }
        if matches!(&phone, Some(p) if !is_valid_contact_phone(p)) {
            errors.push("Format de téléphone invalide".to_string());
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(Self {
            name,
            email,
            phone,
            subject,
            message,
        })
    }
}
