#![cfg(feature = "web-interface")]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use navette::auth::hash_password;
use navette::config::{Config, Pricing};
use navette::models::{Role, UserAccount};
use navette::store::{DocumentStore, InMemoryDb, Repository};
use navette::web::{build_router, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        jwt_secret: "router-test-secret".to_string(),
        token_expiration_minutes: 10,
        admin_username: "admin".to_string(),
        admin_password: "admin".to_string(),
        redis_url: String::new(),
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        pricing_path: PathBuf::from("unused-pricing.toml"),
        pricing: Pricing::default(),
    }
}

/// Router over an in-memory store with one account per role
async fn app() -> Router {
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDb::new());
    let users: Repository<UserAccount> = Repository::new(Arc::clone(&store));
    let password_hash = hash_password("secret").unwrap();
    for (username, role) in [
        ("admin", Role::Administrator),
        ("compta", Role::Accounting),
        ("user", Role::StandardUser),
    ] {
        users
            .insert(UserAccount {
                id: None,
                username: username.to_string(),
                password_hash: password_hash.clone(),
                role,
            })
            .await
            .unwrap();
    }
    build_router(AppState::new(test_config(), store))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": username, "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let app = app().await;
    let (status, _) = send(&app, Method::GET, "/api/agents", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/agents", Some("nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_roles_gate_sections() {
    let app = app().await;
    let compta = login(&app, "compta").await;
    let user = login(&app, "user").await;

    let (status, _) = send(&app, Method::GET, "/api/affectations", Some(&compta), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(
        &app,
        Method::GET,
        "/api/affectations/validation",
        Some(&compta),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/rapports/financier",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::GET, "/api/users", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_planning_to_booking_flow() {
    let app = app().await;
    let token = login(&app, "user").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/agents",
        Some(&token),
        Some(json!({
            "nom": "Ali",
            "adresse": "Cité Ennasr",
            "telephone": "22111222",
            "societe": "Sotetel"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/planning",
        Some(&token),
        Some(json!([
            { "Salarie": "Ali", "Lundi": "22h-6h" },
            { "Salarie": "Mona", "Lundi": "6h-14h" }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lignes"], 2);
    assert_eq!(body["manquants"], json!(["Mona"]));

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/planning/dashboard?jour=Lundi&typeTransport=Ramassage",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["agentsFiltres"], 2);
    assert_eq!(body["stats"]["agentsSansInfos"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/planning/filtrer-agents",
        Some(&token),
        Some(json!({ "jour": "Lundi", "typeTransport": "Ramassage" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agents"][0]["nom"], "Ali");
    assert_eq!(body["agents"][0]["heureAffichage"], "22H");
    assert_eq!(body["heures"][0]["label"], "22H");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/affectations",
        Some(&token),
        Some(json!({
            "chauffeur": "Samir",
            "heure": "22",
            "vehicule": "Partner",
            "typeTransport": "Ramassage",
            "jour": "Lundi",
            "dateReelle": "10/03/2025",
            "agents": [{
                "agentNom": "Ali",
                "adresse": "Cité Ennasr",
                "telephone": "22111222",
                "societe": "Sotetel"
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["prixCourse"], 10.0);
    assert_eq!(body["statutPaiement"], "Non payé");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/affectations",
        Some(&token),
        Some(json!({
            "chauffeur": "Samir",
            "heure": "22",
            "typeTransport": "Ramassage",
            "jour": "Lundi",
            "agents": []
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_payment_validation_by_accounting() {
    let app = app().await;
    let user = login(&app, "user").await;
    let compta = login(&app, "compta").await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/affectations",
        Some(&user),
        Some(json!({
            "chauffeur": "Taxi Hedi",
            "heure": "3",
            "typeTransport": "Départ",
            "jour": "Mardi",
            "dateReelle": "11/03/2025",
            "agents": [{ "agentNom": "Mona", "societe": "Orange" }]
        })),
    )
    .await;
    assert_eq!(created["prixCourse"], 15.0);
    let id = created["_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/affectations/{}/paiement", id),
        Some(&compta),
        Some(json!({ "statutPaiement": "Payé" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statutPaiement"], "Payé");

    let (_, view) = send(
        &app,
        Method::GET,
        "/api/affectations/validation",
        Some(&compta),
        None,
    )
    .await;
    assert_eq!(view["resume"]["totalPaye"], 1);
    assert_eq!(view["resume"]["montantPaye"], 15.0);

    let (status, report) = send(
        &app,
        Method::GET,
        "/api/rapports/financier",
        Some(&compta),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["statistiques"]["prixTaxiTotal"], 15.0);
    assert_eq!(report["societesUniques"], json!(["Orange"]));
}

#[tokio::test]
async fn test_ride_edit_keeps_payment_and_booking_data() {
    let app = app().await;
    let user = login(&app, "user").await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/affectations",
        Some(&user),
        Some(json!({
            "chauffeur": "Samir",
            "heure": "6",
            "typeTransport": "Ramassage",
            "jour": "Lundi",
            "dateReelle": "10/03/2025",
            "agents": [{ "agentNom": "Ali", "societe": "Sotetel" }]
        })),
    )
    .await;
    let id = created["_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/affectations/{}/paiement", id),
        Some(&user),
        Some(json!({ "statutPaiement": "Payé" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/affectations/{}", id),
        Some(&user),
        Some(json!({
            "chauffeur": "Karim",
            "heure": "6",
            "typeTransport": "Ramassage",
            "jour": "Lundi",
            "dateReelle": "10/03/2025",
            "prixCourse": 10.0,
            "statutPaiement": "Payé",
            "agents": [{ "agentNom": "Ali", "societe": "Sotetel" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["chauffeur"], "Karim");
    assert_eq!(updated["statutPaiement"], "Non payé");
    assert_eq!(updated["dateAjout"], created["dateAjout"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (_, listed) = send(&app, Method::GET, "/api/affectations", Some(&user), None).await;
    assert_eq!(listed[0]["statutPaiement"], "Non payé");
}

#[tokio::test]
async fn test_deleted_account_loses_its_session() {
    let app = app().await;
    let admin = login(&app, "admin").await;
    let user = login(&app, "user").await;

    let (_, users) = send(&app, Method::GET, "/api/users", Some(&admin), None).await;
    let id = users
        .as_array()
        .unwrap()
        .iter()
        .find(|account| account["username"] == "user")
        .and_then(|account| account["_id"].as_str())
        .unwrap()
        .to_string();

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/users/{}", id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/api/agents", Some(&user), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
