// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::DEFAULT_BASE_URL;
use crate::storage::{Storage, API_URL_KEY};
use anyhow::{bail, Context, Result};

/// Where the base URL came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    Flag,
    Stored,
    Default,
}

impl UrlSource {
    pub fn as_str(self) -> &'static str {
        match self {
            UrlSource::Flag => "flag/env",
            UrlSource::Stored => "stored",
            UrlSource::Default => "default",
        }
    }
}

/// Precedence: `--api-url` (or `BANKDASH_API_URL`), then the stored setting, then the default.
pub fn resolve_base_url(flag: Option<&str>, storage: &dyn Storage) -> Result<(String, UrlSource)> {
    if let Some(url) = flag.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok((normalize(url)?, UrlSource::Flag));
    }
    if let Some(url) = storage.get(API_URL_KEY)? {
        return Ok((url, UrlSource::Stored));
    }
    Ok((DEFAULT_BASE_URL.to_string(), UrlSource::Default))
}

pub fn set_base_url(storage: &mut dyn Storage, url: &str) -> Result<String> {
    let url = normalize(url)?;
    storage.set(API_URL_KEY, &url)?;
    Ok(url)
}

pub fn reset_base_url(storage: &mut dyn Storage) -> Result<()> {
    storage.remove(API_URL_KEY)?;
    Ok(())
}

fn normalize(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    let parsed =
        reqwest::Url::parse(url).with_context(|| format!("Invalid API URL '{}'", url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("API URL must use http or https, got '{}'", parsed.scheme());
    }
    Ok(url.to_string())
}
