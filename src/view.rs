// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! What the dashboard shows, independent of where it is shown.

use crate::models::{Account, Summary, Transaction};
use crate::utils::{
    account_type_label, format_currency, format_date, format_eur, is_credit, mask_account_number,
    mask_iban, transaction_label, transaction_tone, Tone,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;

pub const NOTIFICATION_DURATION: Duration = Duration::from_millis(3000);
pub const ACCOUNT_PLACEHOLDER: &str = "Sélectionnez un compte";
pub const EMPTY_TRANSACTIONS: &str = "Aucune transaction";

/// Rendering sink for the dashboard controller.
pub trait View {
    fn show_user(&mut self, display_name: &str);
    fn show_accounts(&mut self, cards: &[AccountCard]);
    /// Replaces the options of every account selector.
    fn show_account_options(&mut self, options: &[SelectOption]);
    fn show_summary(&mut self, panel: &SummaryPanel);
    /// An empty slice renders [`EMPTY_TRANSACTIONS`].
    fn show_transactions(&mut self, lines: &[TransactionLine]);
    fn show_tabs(&mut self, tabs: &TabSet);
    fn notify(&mut self, notification: Notification);
    fn redirect_to_login(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A transient message; the view dismisses it after `duration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    #[serde(skip)]
    pub duration: Duration,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountCard {
    pub id: i64,
    pub type_label: String,
    pub masked_number: String,
    pub balance: String,
    pub masked_iban: String,
}

impl AccountCard {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id,
            type_label: account_type_label(&account.account_type).to_string(),
            masked_number: mask_account_number(&account.account_number),
            balance: format_currency(account.balance, &account.currency),
            masked_iban: mask_iban(&account.iban),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Placeholder first, then `<type> - <balance>` per account.
pub fn account_options(accounts: &[Account]) -> Vec<SelectOption> {
    let mut out = Vec::with_capacity(accounts.len() + 1);
    out.push(SelectOption {
        value: String::new(),
        label: ACCOUNT_PLACEHOLDER.to_string(),
    });
    out.extend(accounts.iter().map(|a| SelectOption {
        value: a.id.to_string(),
        label: format!(
            "{} - {}",
            account_type_label(&a.account_type),
            format_currency(a.balance, &a.currency)
        ),
    }));
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryPanel {
    pub total_balance: String,
    pub monthly_income: String,
    pub monthly_expenses: String,
}

impl SummaryPanel {
    pub fn from_summary(summary: &Summary) -> Self {
        Self {
            total_balance: format_eur(summary.total_balance),
            monthly_income: format_eur(summary.monthly_income.unwrap_or(Decimal::ZERO)),
            monthly_expenses: format_eur(summary.monthly_expenses.unwrap_or(Decimal::ZERO)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionLine {
    pub label: String,
    pub description: String,
    pub date: String,
    /// Signed and formatted, e.g. `+50,00 €`.
    pub amount: String,
    pub credit: bool,
    #[serde(skip)]
    pub tone: Tone,
}

impl TransactionLine {
    pub fn from_transaction(tx: &Transaction) -> Self {
        let credit = is_credit(&tx.transaction_type);
        let description = tx
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or("-")
            .to_string();
        Self {
            label: transaction_label(&tx.transaction_type).to_string(),
            description,
            date: tx.transaction_date.as_deref().map(format_date).unwrap_or_default(),
            amount: format!("{}{}", if credit { '+' } else { '-' }, format_eur(tx.amount)),
            credit,
            tone: transaction_tone(&tx.transaction_type),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub key: &'static str,
    pub title: &'static str,
}

pub const DEPOSIT_TAB: &str = "deposit";
pub const WITHDRAWAL_TAB: &str = "withdrawal";
pub const TRANSFER_TAB: &str = "transfer";
pub const PAYMENT_TAB: &str = "payment";

const TABS: [Tab; 4] = [
    Tab {
        key: DEPOSIT_TAB,
        title: "Dépôt",
    },
    Tab {
        key: WITHDRAWAL_TAB,
        title: "Retrait",
    },
    Tab {
        key: TRANSFER_TAB,
        title: "Virement",
    },
    Tab {
        key: PAYMENT_TAB,
        title: "Paiement",
    },
];

/// Tab buttons and their content panels. One index drives both, so exactly one
/// pair is active at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSet {
    active: usize,
}

impl TabSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys() -> impl Iterator<Item = &'static str> {
        TABS.iter().map(|t| t.key)
    }

    /// Activates the tab whose key matches. Unknown keys leave the selection alone.
    pub fn switch(&mut self, key: &str) -> bool {
        match TABS.iter().position(|t| t.key == key) {
            Some(idx) => {
                self.active = idx;
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Tab {
        TABS[self.active]
    }

    pub fn is_active(&self, key: &str) -> bool {
        TABS[self.active].key == key
    }

    /// Panels are keyed like the buttons.
    pub fn is_panel_active(&self, key: &str) -> bool {
        self.is_active(key)
    }

    pub fn tabs(&self) -> impl Iterator<Item = (Tab, bool)> + '_ {
        TABS.iter()
            .enumerate()
            .map(move |(i, t)| (*t, i == self.active))
    }
}
