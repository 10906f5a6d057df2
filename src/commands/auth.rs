// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::commands::{arg, require_session};
use crate::dashboard::Dashboard;
use crate::models::RegisterRequest;
use crate::render::TerminalView;
use crate::utils::{format_short_date, maybe_print_json, pretty_table, validate_email};
use anyhow::{bail, Context, Result};

pub fn register(client: &mut ApiClient, m: &clap::ArgMatches) -> Result<()> {
    let req = RegisterRequest {
        email: arg(m, "email").trim().to_string(),
        username: arg(m, "username"),
        password: arg(m, "password"),
        first_name: arg(m, "first-name"),
        last_name: arg(m, "last-name"),
        phone_number: m.get_one::<String>("phone").cloned(),
        date_of_birth: m.get_one::<String>("date-of-birth").cloned(),
        address: m.get_one::<String>("address").cloned(),
    };
    if !validate_email(&req.email) {
        bail!("Format d'email invalide: '{}'", req.email);
    }
    let resp = client.register(&req).context("Registration failed")?;
    println!(
        "{} ({})",
        resp.message.as_deref().unwrap_or("Inscription réussie"),
        resp.username.as_deref().unwrap_or(&req.username)
    );
    Ok(())
}

pub fn login(client: &mut ApiClient, m: &clap::ArgMatches) -> Result<()> {
    let email = arg(m, "email");
    let password = arg(m, "password");
    let resp = client
        .login(email.trim(), &password)
        .context("Login failed")?;
    let name = resp
        .user
        .as_ref()
        .map(|u| u.display_name())
        .unwrap_or_else(|| email.clone());
    println!("Connecté en tant que {}", name);
    Ok(())
}

pub fn logout(client: ApiClient) -> Result<()> {
    let mut dash = Dashboard::new(client, TerminalView::stdout());
    dash.logout();
    Ok(())
}

pub fn profile(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    require_session(client)?;
    let user = client.profile().context("Could not load profile")?;
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &user)? {
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        let rows = vec![
            vec!["Nom".into(), user.display_name()],
            vec!["Email".into(), opt(&user.email)],
            vec!["Identifiant".into(), opt(&user.username)],
            vec!["Téléphone".into(), opt(&user.phone_number)],
            vec![
                "Né(e) le".into(),
                user.date_of_birth
                    .as_deref()
                    .map(format_short_date)
                    .unwrap_or_else(|| "-".into()),
            ],
            vec!["Adresse".into(), opt(&user.address)],
        ];
        println!("{}", pretty_table(&["Champ", "Valeur"], rows));
    }
    Ok(())
}

pub fn change_password(client: &ApiClient, m: &clap::ArgMatches) -> Result<()> {
    require_session(client)?;
    let resp = client
        .change_password(&arg(m, "current"), &arg(m, "new"))
        .context("Password change failed")?;
    println!(
        "{}",
        resp.message
            .as_deref()
            .unwrap_or("Mot de passe modifié avec succès")
    );
    Ok(())
}
