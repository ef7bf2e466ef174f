use crate::domain::dates::{format_for_display, Period};
use crate::domain::{CanonicalStatus, DashboardStats, SchemaBinding};
use crate::services::dashboard::{ContactSummary, RegistrationFilter, RegistrationSummary};
use crate::templates::components::{card, stat_card, status_badge};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct AdminVm {
    pub stats: DashboardStats,
    pub registrations: Vec<RegistrationSummary>,
    pub contacts: Vec<ContactSummary>,
    pub filter: RegistrationFilter,
    /// Present when the page was requested with `?debug`.
    pub debug: Option<SchemaBinding>,
}

const PERIODS: &[(Period, &str)] = &[
    (Period::Today, "Aujourd'hui"),
    (Period::Week, "Cette semaine"),
    (Period::Month, "Ce mois"),
];

fn filters_form(filter: &RegistrationFilter) -> Markup {
    html! {
        form method="get" action="/admin" class="filters" {
            select name="statut" {
                option value="" { "Tous les statuts" }
                @for status in CanonicalStatus::ALL {
                    option value=(status.css_class()) selected[filter.status == Some(status)] {
                        (status.display_label())
                    }
                }
            }
            select name="periode" {
                option value="" { "Toutes les périodes" }
                @for (period, label) in PERIODS {
                    option value=(period.as_str()) selected[filter.period == Some(*period)] {
                        (label)
                    }
                }
            }
            button type="submit" class="btn" { "Filtrer" }
            @if filter.is_active() {
                a href="/admin" { "Réinitialiser" }
            }
        }
    }
}

fn status_form(row: &RegistrationSummary) -> Markup {
    html! {
        form method="post" action="/admin" class="status-form" {
            input type="hidden" name="action" value="update_status";
            input type="hidden" name="id" value=(row.id);
            input type="hidden" name="redirect" value="1";
            select name="status" {
                @for status in CanonicalStatus::ALL {
                    option value=(status.persisted_value()) selected[row.badge.status == Some(status)] {
                        (status.display_label())
                    }
                }
            }
            button type="submit" class="btn btn-small" { "Mettre à jour" }
        }
    }
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn registrations_table(rows: &[RegistrationSummary]) -> Markup {
    html! {
        @if rows.is_empty() {
            p class="empty" { "Aucune inscription." }
        } @else {
            div style="overflow-x: auto;" {
                table class="data-table" {
                    thead {
                        tr {
                            th { "ID" }
                            th { "Parent" }
                            th { "Enfant" }
                            th { "Classe" }
                            th { "Email" }
                            th { "Date" }
                            th { "Statut" }
                            th { "Action" }
                        }
                    }
                    tbody {
                        @for row in rows {
                            tr {
                                td { (row.id) }
                                td { (or_dash(&row.parent_name)) }
                                td { (or_dash(&row.child_name)) }
                                td { (or_dash(&row.class_name)) }
                                td { (or_dash(&row.email)) }
                                td { (format_for_display(row.created_at.as_deref())) }
                                td { (status_badge(&row.badge)) }
                                td { (status_form(row)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn contacts_table(rows: &[ContactSummary]) -> Markup {
    html! {
        @if rows.is_empty() {
            p class="empty" { "Aucun message." }
        } @else {
            div style="overflow-x: auto;" {
                table class="data-table" {
                    thead {
                        tr {
                            th { "Nom" }
                            th { "Email" }
                            th { "Sujet" }
                            th { "Message" }
                            th { "Date" }
                        }
                    }
                    tbody {
                        @for row in rows {
                            tr {
                                td { (or_dash(&row.name)) }
                                td { (or_dash(&row.email)) }
                                td { (or_dash(&row.subject)) }
                                td {
                                    (or_dash(&row.excerpt))
                                    @if row.truncated { "..." }
                                }
                                td { (format_for_display(row.created_at.as_deref())) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn debug_block(binding: &SchemaBinding, stats: &DashboardStats) -> Markup {
    let stats_json = serde_json::to_string_pretty(stats).unwrap_or_default();
    let registrations = binding.registrations.as_ref();

    html! {
        div class="card debug" {
            h3 { "Diagnostic" }
            p { "Tables trouvées : " (binding.tables.join(", ")) }
            p {
                "Table des inscriptions : "
                (registrations.map_or("aucune", |t| t.name.as_str()))
            }
            p {
                "Colonne de statut : "
                (registrations.and_then(|t| t.status_column().ok()).unwrap_or("aucune"))
            }
            p {
                "Table des contacts : "
                (binding.contacts.as_ref().map_or("aucune", |t| t.name.as_str()))
            }
            pre { (stats_json) }
        }
    }
}

pub fn admin_page(vm: &AdminVm) -> Markup {
    let s = &vm.stats;

    desktop_layout(
        "Tableau de bord",
        html! {
            h1 { "Tableau de bord" }

            div class="stats-grid" {
                (stat_card("Inscriptions", s.total_inscriptions, "total"))
                @for status in CanonicalStatus::ALL {
                    (stat_card(status.display_label(), s.statuses.get(status), status.css_class()))
                }
                (stat_card("Messages", s.total_contacts, "messages"))
                (stat_card("Nouvelles inscriptions", s.nouvelles_inscriptions, "new"))
                (stat_card("Nouveaux messages", s.nouveaux_messages, "new"))
            }

            (card("Inscriptions récentes", html! {
                (filters_form(&vm.filter))
                (registrations_table(&vm.registrations))
            }))

            (card("Messages récents", contacts_table(&vm.contacts)))

            @if let Some(binding) = &vm.debug {
                (debug_block(binding, s))
            }
        },
    )
}
