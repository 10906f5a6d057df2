// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::commands::{arg, require_session};
use crate::dashboard::{
    Dashboard, DepositForm, PaymentForm, SubmitOutcome, TransactionForm, TransferForm,
    WithdrawalForm,
};
use crate::models::TransactionPage;
use crate::render::TerminalView;
use crate::utils::{category_label, format_eur, format_short_date, maybe_print_json, pretty_table, transaction_label};
use anyhow::{bail, Context, Result};

pub fn handle(client: ApiClient, m: &clap::ArgMatches) -> Result<()> {
    require_session(&client)?;
    match m.subcommand() {
        Some(("list", sub)) => list(&client, sub)?,
        Some(("deposit", sub)) => submit(client, &mut deposit_form(sub))?,
        Some(("withdraw", sub)) => submit(client, &mut withdrawal_form(sub))?,
        Some(("transfer", sub)) => submit(client, &mut transfer_form(sub))?,
        Some(("pay", sub)) => submit(client, &mut payment_form(sub))?,
        _ => {}
    }
    Ok(())
}

pub fn deposit_form(sub: &clap::ArgMatches) -> DepositForm {
    DepositForm {
        account: arg(sub, "account"),
        amount: arg(sub, "amount"),
        description: arg(sub, "description"),
    }
}

pub fn withdrawal_form(sub: &clap::ArgMatches) -> WithdrawalForm {
    WithdrawalForm {
        account: arg(sub, "account"),
        amount: arg(sub, "amount"),
        description: arg(sub, "description"),
    }
}

pub fn transfer_form(sub: &clap::ArgMatches) -> TransferForm {
    TransferForm {
        source_account: arg(sub, "account"),
        recipient_iban: arg(sub, "iban"),
        recipient_name: arg(sub, "recipient-name"),
        amount: arg(sub, "amount"),
        description: arg(sub, "description"),
    }
}

pub fn payment_form(sub: &clap::ArgMatches) -> PaymentForm {
    PaymentForm {
        account: arg(sub, "account"),
        merchant: arg(sub, "merchant"),
        amount: arg(sub, "amount"),
        category: arg(sub, "category"),
    }
}

/// Runs the form through the dashboard so success re-renders fresh balances.
fn submit<F: TransactionForm>(client: ApiClient, form: &mut F) -> Result<()> {
    let mut dash = Dashboard::new(client, TerminalView::stdout());
    match dash.submit(form) {
        SubmitOutcome::Completed { receipt, .. } => {
            if let Some(reference) = receipt.reference {
                println!("Référence : {}", reference);
            }
            Ok(())
        }
        SubmitOutcome::Rejected(e) => bail!("{:?} not sent: {}", F::KIND, e),
        SubmitOutcome::Failed { message } => bail!("{:?} failed: {}", F::KIND, message),
    }
}

fn list(client: &ApiClient, sub: &clap::ArgMatches) -> Result<()> {
    let page = *sub.get_one::<u32>("page").unwrap_or(&1);
    let per_page = *sub.get_one::<u32>("per-page").unwrap_or(&10);
    let account = sub.get_one::<i64>("account").copied();
    let data = client
        .transactions(page, per_page, account)
        .context("Could not load transactions")?;

    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if json_flag {
        maybe_print_json(true, false, &data)?;
    } else if jsonl_flag {
        maybe_print_json(false, true, &data.transactions)?;
    } else {
        println!("{}", pretty_table(TABLE_HEADERS, table_rows(&data)));
        if let Some(p) = &data.pagination {
            println!("Page {}/{} · {} transaction(s)", p.page, p.pages.max(1), p.total);
        }
    }
    Ok(())
}

const TABLE_HEADERS: &[&str] = &[
    "Date",
    "Type",
    "Description",
    "Catégorie",
    "Montant",
    "Solde après",
    "Référence",
];

pub fn table_rows(page: &TransactionPage) -> Vec<Vec<String>> {
    page.transactions
        .iter()
        .map(|t| {
            vec![
                t.transaction_date
                    .as_deref()
                    .map(format_short_date)
                    .unwrap_or_default(),
                transaction_label(&t.transaction_type).to_string(),
                t.description.clone().unwrap_or_else(|| "-".into()),
                t.category
                    .as_deref()
                    .map(|c| category_label(c).to_string())
                    .unwrap_or_default(),
                format_eur(t.amount),
                t.balance_after.map(format_eur).unwrap_or_default(),
                t.reference_number.clone().unwrap_or_default(),
            ]
        })
        .collect()
}
