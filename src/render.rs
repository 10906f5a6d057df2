// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{pretty_table, Tone};
use crate::view::{
    AccountCard, Notification, NotificationKind, SelectOption, SummaryPanel, TabSet,
    TransactionLine, View, DEPOSIT_TAB, EMPTY_TRANSACTIONS, PAYMENT_TAB, TRANSFER_TAB,
    WITHDRAWAL_TAB,
};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use std::fmt::Display;
use std::io::{self, Write};

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Success => Color::Green,
        Tone::Error => Color::Red,
        Tone::Info => Color::Cyan,
        Tone::Warning => Color::Yellow,
        Tone::Neutral => Color::Reset,
    }
}

fn panel_usage(key: &str) -> &'static str {
    match key {
        DEPOSIT_TAB => "bankdash tx deposit --account <id> --amount <montant> [--description <texte>]",
        WITHDRAWAL_TAB => {
            "bankdash tx withdraw --account <id> --amount <montant> [--description <texte>]"
        }
        TRANSFER_TAB => {
            "bankdash tx transfer --account <id> --iban <iban> --amount <montant> --description <texte> [--recipient-name <nom>]"
        }
        PAYMENT_TAB => {
            "bankdash tx pay --account <id> --merchant <marchand> --amount <montant> --category <catégorie>"
        }
        _ => "",
    }
}

/// Terminal rendering of the dashboard. Quiet mode drops the tables and moves
/// notifications to stderr, for callers that print JSON themselves.
pub struct TerminalView<W: Write> {
    out: W,
    quiet: bool,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, quiet: false }
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }

    fn notice(&mut self, text: impl Display) {
        if self.quiet {
            eprintln!("{text}");
        } else {
            self.emit(text);
        }
    }

    fn table(&mut self, table: Table) {
        if !self.quiet {
            self.emit(table);
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn show_user(&mut self, display_name: &str) {
        if !self.quiet {
            self.emit(format!("👤 {display_name}"));
        }
    }

    fn show_accounts(&mut self, cards: &[AccountCard]) {
        let rows = cards
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.type_label.clone(),
                    c.masked_number.clone(),
                    c.balance.clone(),
                    c.masked_iban.clone(),
                ]
            })
            .collect();
        self.table(pretty_table(
            &["ID", "Compte", "Numéro", "Solde", "IBAN"],
            rows,
        ));
    }

    fn show_account_options(&mut self, options: &[SelectOption]) {
        // Selectors only exist as CLI arguments; list what `--account` accepts.
        if self.quiet || options.len() <= 1 {
            return;
        }
        let listed = options
            .iter()
            .filter(|o| !o.value.is_empty())
            .map(|o| format!("{} = {}", o.value, o.label))
            .collect::<Vec<_>>()
            .join(" · ");
        self.emit(format!("--account : {listed}"));
    }

    fn show_summary(&mut self, panel: &SummaryPanel) {
        self.table(pretty_table(
            &["Solde total", "Revenus du mois", "Dépenses du mois"],
            vec![vec![
                panel.total_balance.clone(),
                panel.monthly_income.clone(),
                panel.monthly_expenses.clone(),
            ]],
        ));
    }

    fn show_transactions(&mut self, lines: &[TransactionLine]) {
        if self.quiet {
            return;
        }
        if lines.is_empty() {
            self.emit(EMPTY_TRANSACTIONS);
            return;
        }
        let mut t = Table::new();
        t.load_preset(UTF8_FULL);
        t.set_header(["Type", "Description", "Date", "Montant"].map(Cell::new));
        for l in lines {
            t.add_row(vec![
                Cell::new(&l.label),
                Cell::new(&l.description),
                Cell::new(&l.date),
                Cell::new(&l.amount).fg(tone_color(l.tone)),
            ]);
        }
        self.emit(t);
    }

    fn show_tabs(&mut self, tabs: &TabSet) {
        if self.quiet {
            return;
        }
        let bar = tabs
            .tabs()
            .map(|(tab, active)| {
                if active {
                    format!("[{}]", tab.title)
                } else {
                    format!(" {} ", tab.title)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        self.emit(bar);
        let usage = panel_usage(tabs.active().key);
        if !usage.is_empty() {
            self.emit(format!("  {usage}"));
        }
    }

    fn notify(&mut self, notification: Notification) {
        let icon = match notification.kind {
            NotificationKind::Success => "✅",
            NotificationKind::Error => "❌",
            NotificationKind::Info => "ℹ️",
        };
        self.notice(format!("{icon} {}", notification.message));
    }

    fn redirect_to_login(&mut self) {
        self.notice("🔒 Session absente. Connectez-vous avec `bankdash login`.");
    }
}
