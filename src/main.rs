// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use bankdash::storage::SqliteStorage;
use bankdash::{cli, commands, config, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    logging::init(matches.get_flag("verbose"));

    let api_url_flag = matches.get_one::<String>("api-url").map(String::as_str);
    let mut storage = SqliteStorage::new(db::open_or_init()?);

    if let Some(("config", sub)) = matches.subcommand() {
        return commands::config::handle(&mut storage, api_url_flag, sub);
    }

    let (base_url, source) = config::resolve_base_url(api_url_flag, &storage)?;
    tracing::debug!(%base_url, source = source.as_str(), "api base url");
    let mut client = commands::connect(&base_url, Box::new(storage))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("State database initialized at {}", db::db_path()?.display());
        }
        Some(("register", sub)) => commands::auth::register(&mut client, sub)?,
        Some(("login", sub)) => commands::auth::login(&mut client, sub)?,
        Some(("logout", _)) => commands::auth::logout(client)?,
        Some(("profile", sub)) => commands::auth::profile(&client, sub)?,
        Some(("password", sub)) => commands::auth::change_password(&client, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(client, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&client, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(client, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
