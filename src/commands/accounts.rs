// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::commands::require_session;
use crate::utils::{
    account_type_label, format_currency, format_eur, format_short_date, mask_account_number,
    mask_iban, maybe_print_json, pretty_table,
};
use anyhow::{Context, Result};
use rust_decimal::Decimal;

pub fn handle(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    require_session(client)?;
    match m.subcommand() {
        Some(("list", sub)) => list(client, sub)?,
        Some(("show", sub)) => show(client, sub)?,
        Some(("summary", sub)) => summary(client, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = client.accounts().context("Impossible de charger les comptes")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
        let rows = accounts
            .iter()
            .map(|a| {
                vec![
                    a.id.to_string(),
                    account_type_label(&a.account_type).to_string(),
                    mask_account_number(&a.account_number),
                    format_currency(a.balance, &a.currency),
                    mask_iban(&a.iban),
                    a.status.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Type", "Numéro", "Solde", "IBAN", "Statut"], rows)
        );
    }
    Ok(())
}

fn show(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").context("missing account id")?;
    let detail = client
        .account(id)
        .with_context(|| format!("Account {} not found", id))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &detail)? {
        let a = &detail.account;
        let owner = [detail.first_name.as_deref(), detail.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let money = |d: Option<Decimal>| {
            d.map(|v| format_currency(v, &a.currency))
                .unwrap_or_else(|| "-".into())
        };
        let rows = vec![
            vec!["Type".into(), account_type_label(&a.account_type).to_string()],
            vec!["Titulaire".into(), owner],
            vec!["Numéro".into(), mask_account_number(&a.account_number)],
            vec!["IBAN".into(), mask_iban(&a.iban)],
            vec!["Solde".into(), format_currency(a.balance, &a.currency)],
            vec!["Découvert autorisé".into(), money(a.overdraft_limit)],
            vec![
                "Taux d'intérêt".into(),
                a.interest_rate
                    .map(|r| format!("{} %", r.normalize()))
                    .unwrap_or_else(|| "-".into()),
            ],
            vec!["Statut".into(), a.status.clone().unwrap_or_default()],
            vec![
                "Ouvert le".into(),
                a.created_at
                    .as_deref()
                    .map(format_short_date)
                    .unwrap_or_default(),
            ],
        ];
        println!("{}", pretty_table(&["Champ", "Valeur"], rows));
    }
    Ok(())
}

fn summary(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let s = client.summary().context("Could not load summary")?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let or_zero = |d: Option<Decimal>| format_eur(d.unwrap_or(Decimal::ZERO));
        let rows = vec![
            vec!["Solde total".into(), format_eur(s.total_balance)],
            vec!["Comptes courants".into(), or_zero(s.checking_balance)],
            vec!["Épargne".into(), or_zero(s.savings_balance)],
            vec!["Revenus du mois".into(), or_zero(s.monthly_income)],
            vec!["Dépenses du mois".into(), or_zero(s.monthly_expenses)],
            vec!["Épargne du mois".into(), or_zero(s.monthly_savings)],
        ];
        println!("{}", pretty_table(&["", "Montant"], rows));
    }
    Ok(())
}
