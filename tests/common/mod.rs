// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use bankdash::api::{ApiClient, HttpRequest, HttpResponse, Transport, TransportError};
use bankdash::session::Session;
use bankdash::storage::{MemoryStorage, AUTH_TOKEN_KEY};
use bankdash::view::{
    AccountCard, Notification, SelectOption, SummaryPanel, TabSet, TransactionLine, View,
};
use reqwest::Method;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub const BASE: &str = "http://bank.test/api";

enum Reply {
    Http(HttpResponse),
    Down(String),
}

#[derive(Default)]
struct State {
    routes: HashMap<(Method, String), VecDeque<Reply>>,
    log: Vec<HttpRequest>,
}

/// Scripted API. Each route answers its queued replies in order and keeps
/// repeating the last one. Unknown routes answer 404.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Rc<RefCell<State>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: Method, endpoint: &str, reply: Reply) {
        self.state
            .borrow_mut()
            .routes
            .entry((method, endpoint.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn on(&self, method: Method, endpoint: &str, status: u16, body: Value) -> &Self {
        self.push(
            method,
            endpoint,
            Reply::Http(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn on_raw(&self, method: Method, endpoint: &str, status: u16, body: &str) -> &Self {
        self.push(
            method,
            endpoint,
            Reply::Http(HttpResponse {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    pub fn down(&self, method: Method, endpoint: &str, reason: &str) -> &Self {
        self.push(method, endpoint, Reply::Down(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().log.clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.state
            .borrow()
            .log
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn count(&self, method: Method, endpoint: &str) -> usize {
        let url = format!("{BASE}{endpoint}");
        self.state
            .borrow()
            .log
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }

    /// The standard dashboard data set: two accounts, a summary, two transactions.
    pub fn with_dashboard_data(&self) -> &Self {
        self.on(
            Method::GET,
            "/auth/profile",
            200,
            json!({"user": {"id": 1, "email": "marie@example.fr", "username": "marie",
                            "first_name": "Marie", "last_name": "Curie"}}),
        );
        self.on(Method::GET, "/accounts/", 200, accounts_body());
        self.on(
            Method::GET,
            "/accounts/summary",
            200,
            json!({"summary": {"total_accounts": 2, "total_balance": 3734.56,
                               "monthly_income": 2500.0, "monthly_expenses": 812.4}}),
        );
        self.on(
            Method::GET,
            "/transactions/?page=1&per_page=5",
            200,
            transactions_body(),
        );
        self
    }
}

impl Transport for FakeApi {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut state = self.state.borrow_mut();
        state.log.push(request.clone());
        let endpoint = request.url.strip_prefix(BASE).unwrap_or(&request.url).to_string();
        let key = (request.method.clone(), endpoint);
        let queue = match state.routes.get_mut(&key) {
            Some(q) if !q.is_empty() => q,
            _ => {
                return Ok(HttpResponse {
                    status: 404,
                    body: json!({"error": "Not Found"}).to_string(),
                })
            }
        };
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            None
        };
        let reply = reply.as_ref().or(queue.front()).expect("route queue");
        match reply {
            Reply::Http(r) => Ok(r.clone()),
            Reply::Down(reason) => Err(TransportError(reason.clone())),
        }
    }
}

pub fn accounts_body() -> Value {
    json!({"accounts": [
        {"id": 1, "account_number": "12345678901", "account_type": "courant",
         "balance": 1234.56, "currency": "EUR", "iban": "FR7630006000011234567890189",
         "status": "active", "overdraft_limit": 500.0, "interest_rate": 0.0},
        {"id": 2, "account_number": "98765432109", "account_type": "epargne",
         "balance": 2500.0, "currency": "EUR", "iban": "FR7630006000019876543210925",
         "status": "active", "overdraft_limit": 0.0, "interest_rate": 2.5}
    ]})
}

pub fn transactions_body() -> Value {
    json!({
        "transactions": [
            {"id": 10, "transaction_type": "deposit", "amount": 50.0,
             "description": "Salaire", "transaction_date": "2025-01-15T14:30:00"},
            {"id": 9, "transaction_type": "payment", "amount": 12.5,
             "description": "", "category": "alimentation",
             "transaction_date": "2025-01-14T09:05:00"}
        ],
        "pagination": {"page": 1, "per_page": 5, "total": 2, "pages": 1}
    })
}

pub fn client(api: &FakeApi, storage: MemoryStorage) -> ApiClient {
    let session = Session::open(Box::new(storage)).expect("memory storage");
    ApiClient::new(BASE, Box::new(api.clone()), session)
}

pub fn signed_in(api: &FakeApi) -> ApiClient {
    client(api, MemoryStorage::new().with_entry(AUTH_TOKEN_KEY, "tok-123"))
}

pub fn body_json(req: &HttpRequest) -> Value {
    serde_json::from_str(req.body.as_deref().expect("request body")).expect("json body")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    User(String),
    Accounts(Vec<AccountCard>),
    Options(Vec<SelectOption>),
    Summary(SummaryPanel),
    Transactions(Vec<TransactionLine>),
    Tabs(&'static str),
    Notify(Notification),
    RedirectToLogin,
}

#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<Event>,
}

impl RecordingView {
    pub fn notifications(&self) -> Vec<Notification> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Notify(n) => Some(n.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn redirected(&self) -> bool {
        self.events.contains(&Event::RedirectToLogin)
    }
}

impl View for RecordingView {
    fn show_user(&mut self, display_name: &str) {
        self.events.push(Event::User(display_name.to_string()));
    }

    fn show_accounts(&mut self, cards: &[AccountCard]) {
        self.events.push(Event::Accounts(cards.to_vec()));
    }

    fn show_account_options(&mut self, options: &[SelectOption]) {
        self.events.push(Event::Options(options.to_vec()));
    }

    fn show_summary(&mut self, panel: &SummaryPanel) {
        self.events.push(Event::Summary(panel.clone()));
    }

    fn show_transactions(&mut self, lines: &[TransactionLine]) {
        self.events.push(Event::Transactions(lines.to_vec()));
    }

    fn show_tabs(&mut self, tabs: &TabSet) {
        self.events.push(Event::Tabs(tabs.active().key));
    }

    fn notify(&mut self, notification: Notification) {
        self.events.push(Event::Notify(notification));
    }

    fn redirect_to_login(&mut self) {
        self.events.push(Event::RedirectToLogin);
    }
}
