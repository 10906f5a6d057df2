// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod transactions;

use crate::api::{ApiClient, HttpTransport};
use crate::session::Session;
use crate::storage::Storage;
use crate::utils::http_client;
use anyhow::{bail, Result};

/// Builds the live client for `base_url` over the stored session.
pub fn connect(base_url: &str, storage: Box<dyn Storage>) -> Result<ApiClient> {
    let session = Session::open(storage)?;
    let transport = HttpTransport::new(http_client()?);
    Ok(ApiClient::new(base_url, Box::new(transport), session))
}

pub(crate) fn require_session(client: &ApiClient) -> Result<()> {
    if !client.is_authenticated() {
        bail!("Not logged in. Run `bankdash login --email <email> --password <password>` first");
    }
    Ok(())
}

/// String value of `name`, empty when the argument was not given.
pub(crate) fn arg(m: &clap::ArgMatches, name: &str) -> String {
    m.get_one::<String>(name).cloned().unwrap_or_default()
}
