// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::dashboard::{Dashboard, LoadOutcome};
use crate::models::{Account, Summary, Transaction, User};
use crate::render::TerminalView;
use crate::utils::maybe_print_json;
use anyhow::{bail, Result};
use serde::Serialize;

#[derive(Serialize)]
pub struct Snapshot<'a> {
    pub user: Option<&'a User>,
    pub accounts: &'a [Account],
    pub summary: Option<&'a Summary>,
    pub transactions: &'a [Transaction],
}

pub fn handle(client: ApiClient, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let quiet = json_flag || jsonl_flag;

    let mut dash = Dashboard::new(client, TerminalView::stdout().quiet(quiet));
    if let Some(tab) = m.get_one::<String>("tab") {
        dash.switch_tab(tab);
    }
    match dash.load() {
        LoadOutcome::RedirectedToLogin => bail!("Not logged in"),
        LoadOutcome::Loaded(_) => {}
    }

    let snapshot = Snapshot {
        user: dash.user(),
        accounts: dash.accounts(),
        summary: dash.summary(),
        transactions: dash.transactions(),
    };
    maybe_print_json(json_flag, jsonl_flag, &snapshot)?;
    Ok(())
}
