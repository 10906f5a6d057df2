// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{reset_base_url, resolve_base_url, set_base_url};
use crate::storage::{Storage, AUTH_TOKEN_KEY};
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(storage: &mut dyn Storage, api_url_flag: Option<&str>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-url", sub)) => {
            let url = sub.get_one::<String>("url").map(String::as_str).unwrap_or_default();
            let stored = set_base_url(storage, url)?;
            println!("API URL set to {}", stored);
        }
        Some(("reset-url", _)) => {
            reset_base_url(storage)?;
            println!("API URL reset to default");
        }
        Some(("show", _)) | None => {
            let (url, source) = resolve_base_url(api_url_flag, storage)?;
            let session = if storage.get(AUTH_TOKEN_KEY)?.is_some() {
                "active"
            } else {
                "none"
            };
            let rows = vec![
                vec!["api_url".into(), url, source.as_str().into()],
                vec!["session".into(), session.into(), "stored".into()],
            ];
            println!("{}", pretty_table(&["Setting", "Value", "Source"], rows));
        }
        _ => {}
    }
    Ok(())
}
