use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_json, body_string, init_test_app};
use astra::Body;
use http::{Method, Request};

/// Two children with their first parent: Selom pending (id 1), Koku refused (id 2).
fn seed_registrations(db: &Database) {
    db.with_conn(|conn| {
        conn.execute_batch(
            r#"
            insert into enfants (id, nom, prenom, date_naissance, lieu_naissance, sexe, classe, statut, date_inscription)
            values
              (1, 'Amouzou', 'Selom', '2018-05-04', 'Lomé', 'F', 'CE1', 'en_attente', datetime('now', 'localtime')),
              (2, 'Agbeko', 'Koku', '2016-01-10', 'Kara', 'M', 'CM1', 'refuse', '2024-01-05 09:00:00');
            insert into parents (enfant_id, nom, prenom, email, type_parent, date_creation)
            values
              (1, 'Amouzou', 'Komi', 'komi@example.tg', 'parent1', '2024-01-05 09:00:00'),
              (2, 'Agbeko', 'Yawa', 'yawa@example.tg', 'parent1', '2024-01-05 09:00:00');
            insert into contacts (nom, email, sujet, message, date_creation)
            values ('Ama', 'ama@example.com', 'Visite', 'Peut-on visiter ?', datetime('now', 'localtime'));
            "#,
        )
        .map_err(|e| ServerError::DbError(e.to_string()))
    })
    .expect("Failed to seed registrations");
}

fn stored_status(db: &Database, id: i64) -> String {
    db.with_conn(|conn| {
        conn.query_row("select statut from enfants where id = ?", [id], |r| r.get(0))
            .map_err(|e| ServerError::DbError(e.to_string()))
    })
    .unwrap()
}

fn post_admin(body: &str) -> astra::Request {
    Request::builder()
        .method(Method::POST)
        .uri("/admin")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> astra::Request {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[test]
fn admin_page_lists_registrations_and_contacts() {
    let t = init_test_app();
    seed_registrations(t.db());

    let resp = handle(get("/admin"), &t.app).expect("Handler failed");

    assert_eq!(resp.status(), 200, "Admin page should load");
    let body = body_string(resp);
    assert!(body.contains("Tableau de bord"));
    assert!(body.contains("Amouzou Selom"));
    assert!(body.contains("Amouzou Komi"));
    assert!(body.contains("komi@example.tg"));
    assert!(body.contains("status-canceled"));
    assert!(body.contains("Peut-on visiter ?"));
    assert!(!body.contains("Diagnostic"));
}

#[test]
fn admin_page_applies_status_filter() {
    let t = init_test_app();
    seed_registrations(t.db());

    let resp = handle(get("/admin?statut=canceled"), &t.app).expect("Handler failed");

    let body = body_string(resp);
    assert!(body.contains("Agbeko Koku"));
    assert!(!body.contains("Amouzou Selom"));
}

#[test]
fn admin_page_shows_diagnostics_on_request() {
    let t = init_test_app();

    let resp = handle(get("/admin?debug"), &t.app).expect("Handler failed");

    let body = body_string(resp);
    assert!(body.contains("Diagnostic"));
    assert!(body.contains("Table des inscriptions : enfants"));
    assert!(body.contains("Colonne de statut : statut"));
}

#[test]
fn update_status_returns_json_report() {
    let t = init_test_app();
    seed_registrations(t.db());

    let resp = handle(post_admin("action=update_status&id=1&status=confirme"), &t.app)
        .expect("Handler failed");

    assert_eq!(resp.status(), 200);
    let json = body_json(resp);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Statut mis à jour avec succès");
    assert_eq!(json["record_id"], 1);
    assert_eq!(json["old_status"], "en_attente");
    assert_eq!(json["new_status"], "accepte");
    assert_eq!(json["table"], "enfants");
    assert_eq!(json["column"], "statut");
    assert_eq!(json["no_change"], false);
    assert_eq!(json["stats"]["en_attente"], 0);
    assert_eq!(json["stats"]["confirmees"], 1);
    assert_eq!(json["stats"]["refusees"], 1);
    assert_eq!(json["stats"]["unmatched"], 0);

    assert_eq!(stored_status(t.db(), 1), "accepte");
}

#[test]
fn repeated_update_reports_no_change() {
    let t = init_test_app();
    seed_registrations(t.db());

    let resp = handle(post_admin("action=update_status&id=2&status=REJECTED"), &t.app)
        .expect("Handler failed");

    let json = body_json(resp);
    assert_eq!(json["success"], true);
    assert_eq!(json["no_change"], true);
    assert_eq!(json["message"], "Le statut était déjà à jour");
    assert_eq!(json["old_status"], "refuse");
}

#[test]
fn rejected_updates_leave_the_record_alone() {
    let t = init_test_app();
    seed_registrations(t.db());

    let cases = [
        ("action=update_status&id=1&status=archive", "Statut non autorisé : archive"),
        ("action=update_status&status=accepte", "Données manquantes : ID ou statut non fourni"),
        ("action=update_status&id=99&status=accepte", "Inscription avec l'ID 99 non trouvée"),
        ("action=delete&id=1", "Action non reconnue"),
    ];

    for (body, message) in cases {
        let resp = handle(post_admin(body), &t.app).expect("Handler failed");
        assert_eq!(resp.status(), 200);

        let json = body_json(resp);
        assert_eq!(json["success"], false, "{body}");
        assert_eq!(json["message"], message, "{body}");
        assert!(json.get("new_status").is_none());
    }

    assert_eq!(stored_status(t.db(), 1), "en_attente");
}

#[test]
fn form_post_redirects_back_to_dashboard() {
    let t = init_test_app();
    seed_registrations(t.db());

    let resp = handle(
        post_admin("action=update_status&id=1&status=refuse&redirect=1"),
        &t.app,
    )
    .expect("Handler failed");

    assert_eq!(resp.status(), 303, "Should redirect after update");
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/admin"
    );
    assert_eq!(stored_status(t.db(), 1), "refuse");
}

#[test]
fn stats_endpoint_returns_flat_counts() {
    let t = init_test_app();
    seed_registrations(t.db());

    let resp = handle(get("/admin/stats"), &t.app).expect("Handler failed");

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/json"
    );
    let json = body_json(resp);
    assert_eq!(json["total_inscriptions"], 2);
    assert_eq!(json["total_contacts"], 1);
    assert_eq!(json["en_attente"], 1);
    assert_eq!(json["confirmees"], 0);
    assert_eq!(json["refusees"], 1);
    assert_eq!(json["unmatched"], 0);
    assert_eq!(json["nouvelles_inscriptions"], 1);
    assert_eq!(json["nouveaux_messages"], 1);
}
