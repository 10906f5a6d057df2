// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use bankdash::api::{ApiError, RequestOptions, GENERIC_ERROR_MESSAGE};
use bankdash::models::RegisterRequest;
use bankdash::storage::{MemoryStorage, Storage, AUTH_TOKEN_KEY, USER_KEY};
use common::{body_json, client, signed_in, FakeApi};
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::json;

fn login_reply(api: &FakeApi, token: &str) {
    api.on(
        Method::POST,
        "/auth/login",
        200,
        json!({"message": "Connexion réussie", "token": token,
               "user": {"id": 7, "username": "marie", "email": "marie@example.fr",
                        "first_name": "Marie", "last_name": "Curie"}}),
    );
}

#[test]
fn login_token_is_sent_as_bearer_on_next_call() {
    let api = FakeApi::new();
    login_reply(&api, "jwt-abc");
    api.with_dashboard_data();
    let mut c = client(&api, MemoryStorage::new());

    assert!(!c.is_authenticated());
    let resp = c.login("marie@example.fr", "s3cret!").unwrap();
    assert_eq!(resp.token.as_deref(), Some("jwt-abc"));
    assert!(c.is_authenticated());

    c.accounts().unwrap();
    assert_eq!(api.last().header("Authorization"), Some("Bearer jwt-abc"));
}

#[test]
fn login_persists_token_and_user() {
    let api = FakeApi::new();
    login_reply(&api, "jwt-abc");
    let mut c = client(&api, MemoryStorage::new());
    c.login("marie@example.fr", "pw").unwrap();

    let storage = c.session().storage();
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("jwt-abc"));
    let user = c.session().cached_user().unwrap().unwrap();
    assert_eq!(user.display_name(), "Marie Curie");
    assert!(storage.get(USER_KEY).unwrap().unwrap().contains("\"username\":\"marie\""));
}

#[test]
fn login_stores_the_user_exactly_as_sent() {
    let api = FakeApi::new();
    let user = json!({"id": 7, "username": "marie", "first_name": "Marie",
                      "last_name": "Curie", "role": "premium"});
    api.on(
        Method::POST,
        "/auth/login",
        200,
        json!({"message": "Connexion réussie", "token": "jwt", "user": user.clone()}),
    );
    let mut c = client(&api, MemoryStorage::new());
    c.login("marie@example.fr", "pw").unwrap();

    let stored = c.session().storage().get(USER_KEY).unwrap().unwrap();
    assert_eq!(stored, user.to_string());
    assert!(!stored.contains("phone_number"));
    assert_eq!(serde_json::from_str::<serde_json::Value>(&stored).unwrap(), user);
}

#[test]
fn auth_endpoints_never_carry_the_token() {
    let api = FakeApi::new();
    login_reply(&api, "fresh");
    let mut c = signed_in(&api);
    c.login("marie@example.fr", "pw").unwrap();
    let login_req = &api.requests()[0];
    assert_eq!(login_req.header("Authorization"), None);
    assert_eq!(login_req.header("Content-Type"), Some("application/json"));
    assert_eq!(
        body_json(login_req),
        json!({"email": "marie@example.fr", "password": "pw"})
    );
}

#[test]
fn login_without_token_keeps_previous_session() {
    let api = FakeApi::new();
    api.on(Method::POST, "/auth/login", 200, json!({"message": "ok"}));
    let mut c = signed_in(&api);
    c.login("a@b.fr", "pw").unwrap();
    assert_eq!(c.session().token(), Some("tok-123"));
}

#[test]
fn register_stores_token_and_whole_response() {
    let api = FakeApi::new();
    api.on(
        Method::POST,
        "/auth/register",
        201,
        json!({"message": "Inscription réussie", "user_id": 3, "token": "reg-tok", "username": "paul"}),
    );
    let mut c = client(&api, MemoryStorage::new());
    let req = RegisterRequest {
        email: "paul@example.fr".into(),
        username: "paul".into(),
        password: "Motdepasse1!".into(),
        first_name: "Paul".into(),
        last_name: "Martin".into(),
        ..Default::default()
    };
    let resp = c.register(&req).unwrap();
    assert_eq!(resp.user_id, Some(3));
    assert_eq!(c.session().token(), Some("reg-tok"));

    let sent = body_json(&api.last());
    assert_eq!(sent["first_name"], "Paul");
    assert!(sent.get("phone_number").is_none());
    assert_eq!(api.last().header("Authorization"), None);

    let cached = c.session().storage().get(USER_KEY).unwrap().unwrap();
    assert!(cached.contains("\"user_id\":3"));
}

#[test]
fn server_error_message_is_surfaced() {
    let api = FakeApi::new();
    api.on(
        Method::POST,
        "/transactions/deposit",
        400,
        json!({"error": "insufficient funds"}),
    );
    let c = signed_in(&api);
    let err = c.deposit(1, Decimal::new(50, 0), "").unwrap_err();
    assert_eq!(err.to_string(), "insufficient funds");
    assert_eq!(err.status(), Some(400));
}

#[test]
fn error_without_message_falls_back_to_generic() {
    let api = FakeApi::new();
    api.on(Method::GET, "/accounts/", 500, json!({"detail": "boom"}));
    api.on_raw(Method::GET, "/accounts/summary", 502, "<html>Bad gateway</html>");
    let c = signed_in(&api);

    let err = c.accounts().unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 500, .. }));
    assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);

    let err = c.summary().unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), GENERIC_ERROR_MESSAGE);
}

#[test]
fn network_failure_is_a_distinct_error() {
    let api = FakeApi::new();
    api.down(Method::GET, "/accounts/", "connection refused");
    let c = signed_in(&api);
    let err = c.accounts().unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);
    assert_eq!(err.to_string(), "connection refused");
    // no retry
    assert_eq!(api.count(Method::GET, "/accounts/"), 1);
}

#[test]
fn undecodable_success_body_is_a_decode_error() {
    let api = FakeApi::new();
    api.on(Method::GET, "/accounts/summary", 200, json!({"nothing": true}));
    let c = signed_in(&api);
    assert!(matches!(c.summary().unwrap_err(), ApiError::Decode(_)));
}

#[test]
fn transactions_query_carries_paging_and_account_filter() {
    let api = FakeApi::new();
    api.on(
        Method::GET,
        "/transactions/?page=2&per_page=20&account_id=4",
        200,
        json!({"transactions": [], "pagination": {"page": 2, "per_page": 20, "total": 21, "pages": 2}}),
    );
    let c = signed_in(&api);
    let page = c.transactions(2, 20, Some(4)).unwrap();
    assert!(page.transactions.is_empty());
    assert_eq!(page.pagination.unwrap().total, 21);
    assert_eq!(api.last().url, format!("{}/transactions/?page=2&per_page=20&account_id=4", common::BASE));
}

#[test]
fn account_detail_and_summary_decode() {
    let api = FakeApi::new();
    api.on(
        Method::GET,
        "/accounts/2",
        200,
        json!({"account": {"id": 2, "account_number": "98765432109", "account_type": "epargne",
                           "balance": 2500.0, "iban": "FR7630006000019876543210925",
                           "first_name": "Marie", "last_name": "Curie"}}),
    );
    api.on(
        Method::GET,
        "/accounts/summary",
        200,
        json!({"summary": {"total_balance": 10.5}}),
    );
    let c = signed_in(&api);
    let detail = c.account(2).unwrap();
    assert_eq!(detail.account.currency, "EUR");
    assert_eq!(detail.first_name.as_deref(), Some("Marie"));

    let s = c.summary().unwrap();
    assert_eq!(s.total_balance, Decimal::new(105, 1));
    assert_eq!(s.monthly_income, None);
}

#[test]
fn mutation_bodies_match_the_contract() {
    let api = FakeApi::new();
    let receipt = json!({"message": "ok", "reference": "TXN1", "new_balance": 10.0});
    for ep in [
        "/transactions/deposit",
        "/transactions/withdrawal",
        "/transactions/transfer",
        "/transactions/payment",
    ] {
        api.on(Method::POST, ep, 201, receipt.clone());
    }
    let c = signed_in(&api);
    let amount = Decimal::new(4250, 2);

    c.withdrawal(1, amount, "DAB").unwrap();
    let body = body_json(&api.last());
    assert_eq!(body["account_id"], 1);
    assert_eq!(body["amount"].as_f64(), Some(42.5));
    assert_eq!(body["description"], "DAB");

    let r = c
        .transfer(1, "FR76 3000 6000 0112 3456 7890 189", amount, "Loyer", "Bailleur")
        .unwrap();
    assert_eq!(r.reference.as_deref(), Some("TXN1"));
    let body = body_json(&api.last());
    assert_eq!(body["source_account_id"], 1);
    assert_eq!(body["recipient_iban"], "FR76 3000 6000 0112 3456 7890 189");
    assert_eq!(body["recipient_name"], "Bailleur");

    c.payment(2, "Boulangerie", amount, "alimentation").unwrap();
    let body = body_json(&api.last());
    assert_eq!(body["merchant"], "Boulangerie");
    assert_eq!(body["category"], "alimentation");
    assert_eq!(api.last().header("Authorization"), Some("Bearer tok-123"));
}

#[test]
fn caller_headers_override_defaults() {
    let api = FakeApi::new();
    api.on(Method::GET, "/accounts/", 200, json!({"accounts": []}));
    let c = signed_in(&api);
    let opts = RequestOptions {
        headers: vec![("content-type".into(), "application/vnd.bank+json".into())],
        ..RequestOptions::get()
    };
    c.request("/accounts/", opts).unwrap();
    let req = api.last();
    assert_eq!(req.header("Content-Type"), Some("application/vnd.bank+json"));
    assert_eq!(req.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("content-type")).count(), 1);
}

#[test]
fn logout_clears_memory_and_storage() {
    let api = FakeApi::new();
    let mut c = client(
        &api,
        MemoryStorage::new()
            .with_entry(AUTH_TOKEN_KEY, "tok")
            .with_entry(USER_KEY, "{}"),
    );
    assert!(c.is_authenticated());
    c.logout().unwrap();
    assert!(!c.is_authenticated());
    assert_eq!(c.session().storage().get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(c.session().storage().get(USER_KEY).unwrap(), None);
    assert!(api.requests().is_empty());
}
