// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Authenticated client for the banking REST API.

use crate::models::{
    AccountDetail, AccountEnvelope, AccountsEnvelope, Account, AuthResponse, ChangePasswordRequest,
    LoginRequest, MessageResponse, MovementRequest, PaymentRequest, Receipt, RegisterRequest,
    Summary, SummaryEnvelope, TransactionPage, TransferRequest, User, UserEnvelope,
};
use crate::session::Session;
use crate::storage::StorageError;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const GENERIC_ERROR_MESSAGE: &str = "Une erreur est survenue";

const LOGIN_ENDPOINT: &str = "/auth/login";
const REGISTER_ENDPOINT: &str = "/auth/register";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The wire seam. One call, one response; no retries.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (k, v) in &request.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let resp = builder
            .send()
            .map_err(|e| TransportError(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| TransportError(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post<B: Serialize>(body: &B) -> Result<Self, ApiError> {
        Ok(Self {
            method: Method::POST,
            body: Some(serde_json::to_value(body)?),
            headers: Vec::new(),
        })
    }
}

fn is_public_endpoint(endpoint: &str) -> bool {
    endpoint.contains(LOGIN_ENDPOINT) || endpoint.contains(REGISTER_ENDPOINT)
}

fn merge_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(slot) => slot.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

fn server_message(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(GENERIC_ERROR_MESSAGE)
        .to_string()
}

pub struct ApiClient {
    base_url: String,
    transport: Box<dyn Transport>,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Box<dyn Transport>, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Issues one call against `endpoint` (relative to the base URL) and returns the
    /// parsed JSON body.
    pub fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let mut headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ];
        for (k, v) in &options.headers {
            merge_header(&mut headers, k, v);
        }
        if let Some(token) = self.session.token() {
            if !is_public_endpoint(endpoint) {
                merge_header(&mut headers, "Authorization", &format!("Bearer {token}"));
            }
        }

        let request = HttpRequest {
            method: options.method.clone(),
            url: format!("{}{}", self.base_url, endpoint),
            headers,
            body: options.body.as_ref().map(Value::to_string),
        };
        tracing::debug!(method = %request.method, endpoint, "api request");

        let response = self.transport.send(&request).map_err(|e| {
            tracing::error!(endpoint, error = %e, "API Error");
            ApiError::Network(e.0)
        })?;

        if !response.is_success() {
            let message = serde_json::from_str::<Value>(&response.body)
                .map(|v| server_message(&v))
                .unwrap_or_else(|_| GENERIC_ERROR_MESSAGE.to_string());
            tracing::error!(endpoint, status = response.status, %message, "API Error");
            return Err(ApiError::Api {
                status: response.status,
                message,
            });
        }

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::error!(endpoint, error = %e, "API Error");
            ApiError::Decode(e)
        })
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let v = self.request(endpoint, RequestOptions::get())?;
        Ok(serde_json::from_value(v)?)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, ApiError> {
        let v = self.request(endpoint, RequestOptions::post(body)?)?;
        Ok(serde_json::from_value(v)?)
    }

    // ---- auth -------------------------------------------------------------

    pub fn register(&mut self, user: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let raw = self.request(REGISTER_ENDPOINT, RequestOptions::post(user)?)?;
        let data: AuthResponse = serde_json::from_value(raw.clone())?;
        if let Some(token) = &data.token {
            self.session.store(token, &raw.to_string())?;
            tracing::info!("registered; session token stored");
        }
        Ok(data)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let raw = self.request(
            LOGIN_ENDPOINT,
            RequestOptions::post(&LoginRequest { email, password })?,
        )?;
        let data: AuthResponse = serde_json::from_value(raw.clone())?;
        if let Some(token) = &data.token {
            let user = raw.get("user").unwrap_or(&Value::Null).to_string();
            self.session.store(token, &user)?;
            tracing::info!("logged in; session token stored");
        }
        Ok(data)
    }

    pub fn profile(&self) -> Result<User, ApiError> {
        let env: UserEnvelope = self.get("/auth/profile")?;
        Ok(env.user)
    }

    pub fn change_password(&self, current: &str, new: &str) -> Result<MessageResponse, ApiError> {
        self.post(
            "/auth/change-password",
            &ChangePasswordRequest {
                current_password: current,
                new_password: new,
            },
        )
    }

    /// Drops the token and the cached user. Navigation back to login is the
    /// caller's job.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        self.session.clear()?;
        tracing::info!("session cleared");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // ---- accounts ---------------------------------------------------------

    pub fn accounts(&self) -> Result<Vec<Account>, ApiError> {
        let env: AccountsEnvelope = self.get("/accounts/")?;
        Ok(env.accounts)
    }

    pub fn account(&self, account_id: i64) -> Result<AccountDetail, ApiError> {
        let env: AccountEnvelope = self.get(&format!("/accounts/{account_id}"))?;
        Ok(env.account)
    }

    pub fn summary(&self) -> Result<Summary, ApiError> {
        let env: SummaryEnvelope = self.get("/accounts/summary")?;
        Ok(env.summary)
    }

    // ---- transactions -----------------------------------------------------

    pub fn transactions(
        &self,
        page: u32,
        per_page: u32,
        account_id: Option<i64>,
    ) -> Result<TransactionPage, ApiError> {
        let mut endpoint = format!("/transactions/?page={page}&per_page={per_page}");
        if let Some(id) = account_id {
            endpoint.push_str(&format!("&account_id={id}"));
        }
        self.get(&endpoint)
    }

    pub fn deposit(
        &self,
        account_id: i64,
        amount: Decimal,
        description: &str,
    ) -> Result<Receipt, ApiError> {
        self.post(
            "/transactions/deposit",
            &MovementRequest {
                account_id,
                amount,
                description: description.to_string(),
            },
        )
    }

    pub fn withdrawal(
        &self,
        account_id: i64,
        amount: Decimal,
        description: &str,
    ) -> Result<Receipt, ApiError> {
        self.post(
            "/transactions/withdrawal",
            &MovementRequest {
                account_id,
                amount,
                description: description.to_string(),
            },
        )
    }

    pub fn transfer(
        &self,
        source_account_id: i64,
        recipient_iban: &str,
        amount: Decimal,
        description: &str,
        recipient_name: &str,
    ) -> Result<Receipt, ApiError> {
        self.post(
            "/transactions/transfer",
            &TransferRequest {
                source_account_id,
                recipient_iban: recipient_iban.to_string(),
                amount,
                description: description.to_string(),
                recipient_name: recipient_name.to_string(),
            },
        )
    }

    pub fn payment(
        &self,
        account_id: i64,
        merchant: &str,
        amount: Decimal,
        category: &str,
    ) -> Result<Receipt, ApiError> {
        self.post(
            "/transactions/payment",
            &PaymentRequest {
                account_id,
                merchant: merchant.to_string(),
                amount,
                category: category.to_string(),
            },
        )
    }
}
