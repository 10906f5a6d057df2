// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard controller: load sequence, refresh cycle, tabs and transaction forms.
//!
//! Every call is awaited in order; nothing runs concurrently. Failures become
//! notifications on the view and never abort the dashboard.

use crate::api::{ApiClient, ApiError};
use crate::models::{Account, Pagination, Receipt, Summary, Transaction, User};
use crate::utils::{parse_float_prefix, parse_int_prefix, validate_iban};
use crate::view::{
    account_options, AccountCard, Notification, SummaryPanel, TabSet, TransactionLine, View,
};
use rust_decimal::Decimal;
use thiserror::Error;

pub const RECENT_TRANSACTIONS: u32 = 5;
pub const INVALID_FORM_MESSAGE: &str = "Veuillez remplir tous les champs correctement";
pub const LOAD_ERROR_MESSAGE: &str = "Erreur lors du chargement des données";
pub const ACCOUNTS_ERROR_MESSAGE: &str = "Impossible de charger les comptes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    Profile,
    Accounts,
    Summary,
    Transactions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub failed: Vec<LoadStep>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed(&self, step: LoadStep) -> bool {
        self.failed.contains(&step)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    RedirectedToLogin,
    Loaded(LoadReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Deposit,
    Withdrawal,
    Transfer,
    Payment,
}

impl FormKind {
    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::Deposit => "Dépôt effectué avec succès !",
            FormKind::Withdrawal => "Retrait effectué avec succès !",
            FormKind::Transfer => "Virement effectué avec succès !",
            FormKind::Payment => "Paiement effectué avec succès !",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            FormKind::Deposit => "Erreur lors du dépôt",
            FormKind::Withdrawal => "Erreur lors du retrait",
            FormKind::Transfer => "Erreur lors du virement",
            FormKind::Payment => "Erreur lors du paiement",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no account selected")]
    MissingAccount,
    #[error("amount must be a positive number")]
    InvalidAmount,
    #[error("recipient IBAN is malformed")]
    InvalidIban,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected(ValidationError),
    /// The API refused or could not be reached. The form is left as typed.
    Failed { message: String },
    Completed { receipt: Receipt, refresh: LoadReport },
}

/// A validated, coerced form ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Deposit {
        account_id: i64,
        amount: Decimal,
        description: String,
    },
    Withdrawal {
        account_id: i64,
        amount: Decimal,
        description: String,
    },
    Transfer {
        source_account_id: i64,
        recipient_iban: String,
        amount: Decimal,
        description: String,
        recipient_name: String,
    },
    Payment {
        account_id: i64,
        merchant: String,
        amount: Decimal,
        category: String,
    },
}

fn coerce_account(raw: &str) -> Result<i64, ValidationError> {
    parse_int_prefix(raw)
        .filter(|id| *id != 0)
        .ok_or(ValidationError::MissingAccount)
}

fn coerce_amount(raw: &str) -> Result<Decimal, ValidationError> {
    parse_float_prefix(raw)
        .filter(|a| *a > Decimal::ZERO)
        .ok_or(ValidationError::InvalidAmount)
}

/// A transaction form holding field values exactly as typed.
pub trait TransactionForm {
    const KIND: FormKind;
    fn validate(&self) -> Result<Submission, ValidationError>;
    fn reset(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositForm {
    pub account: String,
    pub amount: String,
    pub description: String,
}

impl TransactionForm for DepositForm {
    const KIND: FormKind = FormKind::Deposit;

    fn validate(&self) -> Result<Submission, ValidationError> {
        Ok(Submission::Deposit {
            account_id: coerce_account(&self.account)?,
            amount: coerce_amount(&self.amount)?,
            description: self.description.clone(),
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithdrawalForm {
    pub account: String,
    pub amount: String,
    pub description: String,
}

impl TransactionForm for WithdrawalForm {
    const KIND: FormKind = FormKind::Withdrawal;

    fn validate(&self) -> Result<Submission, ValidationError> {
        Ok(Submission::Withdrawal {
            account_id: coerce_account(&self.account)?,
            amount: coerce_amount(&self.amount)?,
            description: self.description.clone(),
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub source_account: String,
    pub recipient_iban: String,
    pub recipient_name: String,
    pub amount: String,
    pub description: String,
}

impl TransactionForm for TransferForm {
    const KIND: FormKind = FormKind::Transfer;

    fn validate(&self) -> Result<Submission, ValidationError> {
        let source_account_id = coerce_account(&self.source_account)?;
        let amount = coerce_amount(&self.amount)?;
        if !validate_iban(&self.recipient_iban) {
            return Err(ValidationError::InvalidIban);
        }
        Ok(Submission::Transfer {
            source_account_id,
            recipient_iban: self.recipient_iban.clone(),
            amount,
            description: self.description.clone(),
            recipient_name: self.recipient_name.clone(),
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentForm {
    pub account: String,
    pub merchant: String,
    pub amount: String,
    pub category: String,
}

impl TransactionForm for PaymentForm {
    const KIND: FormKind = FormKind::Payment;

    fn validate(&self) -> Result<Submission, ValidationError> {
        Ok(Submission::Payment {
            account_id: coerce_account(&self.account)?,
            merchant: self.merchant.clone(),
            amount: coerce_amount(&self.amount)?,
            category: self.category.clone(),
        })
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct Dashboard<V: View> {
    api: ApiClient,
    view: V,
    tabs: TabSet,
    user: Option<User>,
    accounts: Vec<Account>,
    summary: Option<Summary>,
    transactions: Vec<Transaction>,
    pagination: Option<Pagination>,
}

impl<V: View> Dashboard<V> {
    pub fn new(api: ApiClient, view: V) -> Self {
        Self {
            api,
            view,
            tabs: TabSet::new(),
            user: None,
            accounts: Vec::new(),
            summary: None,
            transactions: Vec::new(),
            pagination: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut ApiClient {
        &mut self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (ApiClient, V) {
        (self.api, self.view)
    }

    pub fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Page entry point. Without a session the view is sent to login and no
    /// request is made.
    pub fn load(&mut self) -> LoadOutcome {
        if !self.api.is_authenticated() {
            tracing::info!("no session token; redirecting to login");
            self.view.redirect_to_login();
            return LoadOutcome::RedirectedToLogin;
        }

        let mut report = LoadReport::default();
        if let Err(e) = self.load_user_profile() {
            tracing::error!(error = %e, "failed to load profile");
            report.failed.push(LoadStep::Profile);
        }
        self.run_data_steps(&mut report);
        self.view.show_tabs(&self.tabs);
        self.notify_load_failures(&report);
        LoadOutcome::Loaded(report)
    }

    /// Re-fetches accounts, summary and transactions, once each.
    pub fn refresh(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        self.run_data_steps(&mut report);
        self.notify_load_failures(&report);
        report
    }

    fn run_data_steps(&mut self, report: &mut LoadReport) {
        if let Err(e) = self.load_accounts() {
            tracing::error!(error = %e, "failed to load accounts");
            report.failed.push(LoadStep::Accounts);
        }
        if let Err(e) = self.load_summary() {
            tracing::error!(error = %e, "failed to load summary");
            report.failed.push(LoadStep::Summary);
        }
        if let Err(e) = self.load_transactions() {
            tracing::error!(error = %e, "failed to load transactions");
            report.failed.push(LoadStep::Transactions);
        }
    }

    fn notify_load_failures(&mut self, report: &LoadReport) {
        if report.failed(LoadStep::Accounts) {
            self.view.notify(Notification::error(ACCOUNTS_ERROR_MESSAGE));
        } else if !report.is_clean() {
            self.view.notify(Notification::error(LOAD_ERROR_MESSAGE));
        }
    }

    fn load_user_profile(&mut self) -> Result<(), ApiError> {
        let user = self.api.profile()?;
        self.view.show_user(&user.display_name());
        self.user = Some(user);
        Ok(())
    }

    fn load_accounts(&mut self) -> Result<(), ApiError> {
        let accounts = self.api.accounts()?;
        let cards: Vec<AccountCard> = accounts.iter().map(AccountCard::from_account).collect();
        self.view.show_accounts(&cards);
        self.view.show_account_options(&account_options(&accounts));
        self.accounts = accounts;
        Ok(())
    }

    fn load_summary(&mut self) -> Result<(), ApiError> {
        let summary = self.api.summary()?;
        self.view.show_summary(&SummaryPanel::from_summary(&summary));
        self.summary = Some(summary);
        Ok(())
    }

    fn load_transactions(&mut self) -> Result<(), ApiError> {
        let page = self.api.transactions(1, RECENT_TRANSACTIONS, None)?;
        let lines: Vec<TransactionLine> = page
            .transactions
            .iter()
            .map(TransactionLine::from_transaction)
            .collect();
        self.view.show_transactions(&lines);
        self.transactions = page.transactions;
        self.pagination = page.pagination;
        Ok(())
    }

    /// Marks `key` active. Unknown keys are ignored and nothing is redrawn.
    pub fn switch_tab(&mut self, key: &str) -> bool {
        let switched = self.tabs.switch(key);
        if switched {
            self.view.show_tabs(&self.tabs);
        }
        switched
    }

    pub fn submit_deposit(&mut self, form: &mut DepositForm) -> SubmitOutcome {
        self.submit(form)
    }

    pub fn submit_withdrawal(&mut self, form: &mut WithdrawalForm) -> SubmitOutcome {
        self.submit(form)
    }

    pub fn submit_transfer(&mut self, form: &mut TransferForm) -> SubmitOutcome {
        self.submit(form)
    }

    pub fn submit_payment(&mut self, form: &mut PaymentForm) -> SubmitOutcome {
        self.submit(form)
    }

    /// Validate, send, notify, then reset and refresh on success only.
    pub fn submit<F: TransactionForm>(&mut self, form: &mut F) -> SubmitOutcome {
        let submission = match form.validate() {
            Ok(s) => s,
            Err(e) => {
                tracing::debug!(form = ?F::KIND, error = %e, "form rejected");
                self.view.notify(Notification::error(INVALID_FORM_MESSAGE));
                return SubmitOutcome::Rejected(e);
            }
        };

        match self.send(&submission) {
            Ok(receipt) => {
                tracing::info!(form = ?F::KIND, reference = ?receipt.reference, "submitted");
                self.view
                    .notify(Notification::success(F::KIND.success_message()));
                form.reset();
                let refresh = self.refresh();
                SubmitOutcome::Completed { receipt, refresh }
            }
            Err(e) => {
                let message = match e.to_string() {
                    m if m.is_empty() => F::KIND.failure_message().to_string(),
                    m => m,
                };
                self.view.notify(Notification::error(message.clone()));
                SubmitOutcome::Failed { message }
            }
        }
    }

    fn send(&self, submission: &Submission) -> Result<Receipt, ApiError> {
        match submission {
            Submission::Deposit {
                account_id,
                amount,
                description,
            } => self.api.deposit(*account_id, *amount, description),
            Submission::Withdrawal {
                account_id,
                amount,
                description,
            } => self.api.withdrawal(*account_id, *amount, description),
            Submission::Transfer {
                source_account_id,
                recipient_iban,
                amount,
                description,
                recipient_name,
            } => self.api.transfer(
                *source_account_id,
                recipient_iban,
                *amount,
                description,
                recipient_name,
            ),
            Submission::Payment {
                account_id,
                merchant,
                amount,
                category,
            } => self.api.payment(*account_id, merchant, *amount, category),
        }
    }

    /// Ends the session and sends the view back to login.
    pub fn logout(&mut self) {
        if let Err(e) = self.api.logout() {
            tracing::error!(error = %e, "failed to clear stored session");
        }
        self.view.redirect_to_login();
    }
}
