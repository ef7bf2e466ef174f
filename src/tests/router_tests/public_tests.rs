use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_json, body_string, init_test_app};
use astra::Body;
use http::{Method, Request};

fn request(method: Method, uri: &str, body: &str) -> astra::Request {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn count(t: &crate::tests::utils::TestApp, table: &str) -> i64 {
    t.db()
        .with_conn(|conn| {
            conn.query_row(&format!("select count(*) from {table}"), [], |r| r.get(0))
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap()
}

const REGISTRATION: &str = "nomEnfant=Amouzou&prenomEnfant=Selom&dateNaissance=2018-05-04\
    &lieuNaissance=Lom%C3%A9&sexe=F&classe=CE1\
    &nomParent1=Amouzou&prenomParent1=Komi&emailParent1=komi%40example.tg\
    &telephoneParent1=%2B228+90+00+00+00&adresse=Quartier+B%C3%A8";

#[test]
fn pages_render() {
    let t = init_test_app();

    for (uri, marker) in [
        ("/", "Bienvenue"),
        ("/inscription", "nomEnfant"),
        ("/contact", "sujet"),
    ] {
        let resp = handle(request(Method::GET, uri, ""), &t.app).expect("Handler failed");
        assert_eq!(resp.status(), 200, "{uri}");
        assert!(body_string(resp).contains(marker), "{uri}");
    }
}

#[test]
fn registration_is_stored_with_parent_and_address() {
    let t = init_test_app();

    let resp = handle(request(Method::POST, "/inscription", REGISTRATION), &t.app)
        .expect("Handler failed");

    assert_eq!(resp.status(), 200);
    let json = body_json(resp);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["enfant"], "Selom Amouzou");
    assert!(json["data"]["inscription_id"].as_i64().unwrap() > 0);

    assert_eq!(count(&t, "enfants"), 1);
    assert_eq!(count(&t, "parents"), 1);
    assert_eq!(count(&t, "adresses"), 1);
}

#[test]
fn invalid_registration_lists_every_error() {
    let t = init_test_app();
    let body = REGISTRATION
        .replace("komi%40example.tg", "komi")
        .replace("sexe=F", "sexe=X");

    let resp = handle(request(Method::POST, "/inscription", &body), &t.app)
        .expect("Handler failed");

    assert_eq!(resp.status(), 400);
    let json = body_json(resp);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Données invalides");
    assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    assert_eq!(count(&t, "enfants"), 0);
}

#[test]
fn contact_message_is_stored() {
    let t = init_test_app();

    let resp = handle(
        request(
            Method::POST,
            "/contact",
            "nom=Ama&email=ama%40example.com&sujet=Visite&message=Bonjour",
        ),
        &t.app,
    )
    .expect("Handler failed");

    assert_eq!(resp.status(), 200);
    let json = body_json(resp);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["contact_id"], 1);
    assert_eq!(count(&t, "contacts"), 1);
}

#[test]
fn contact_validation_errors_are_joined() {
    let t = init_test_app();

    let resp = handle(
        request(Method::POST, "/contact", "nom=Ama&email=nope&sujet=&message=Bonjour"),
        &t.app,
    )
    .expect("Handler failed");

    assert_eq!(resp.status(), 400);
    let json = body_json(resp);
    assert_eq!(json["message"], "Le sujet est obligatoire, Format d'email invalide");
    assert_eq!(count(&t, "contacts"), 0);
}

#[test]
fn unknown_paths_and_methods_are_rejected() {
    let t = init_test_app();

    let err = handle(request(Method::GET, "/nowhere", ""), &t.app)
        .err()
        .expect("Unknown path should fail");
    assert!(matches!(err, ServerError::NotFound));

    let err = handle(request(Method::DELETE, "/admin", ""), &t.app)
        .err()
        .expect("Wrong method should fail");
    assert!(matches!(err, ServerError::MethodNotAllowed));

    let resp = crate::responses::error_to_response(ServerError::NotFound);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Page introuvable"));
}
