// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

const UA: &str = concat!(
    "bankdash/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/bankdash)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// ---------------------------------------------------------------------------
// Formatting (fr-FR)
// ---------------------------------------------------------------------------

const GROUP_SEP: char = '\u{202f}';
const SYMBOL_SEP: char = '\u{a0}';

const MONTHS_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

fn currency_symbol(code: &str) -> &str {
    match code {
        "EUR" => "€",
        "USD" => "$US",
        "GBP" => "£GB",
        other => other,
    }
}

/// Formats an amount the way a fr-FR currency formatter does: `1 234,56 €`.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEP);
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{sign}{grouped},{frac_part}{SYMBOL_SEP}{}",
        currency_symbol(&currency.to_uppercase())
    )
}

/// Format in euros, the dashboard's default currency.
pub fn format_eur(amount: Decimal) -> String {
    format_currency(amount, "EUR")
}

/// Parses the timestamp shapes the API emits: naive ISO date-times, RFC 3339,
/// RFC 2822 and bare dates (read as midnight).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `15 janvier 2025 à 14:30`; unparseable input comes back unchanged.
pub fn format_date(s: &str) -> String {
    match parse_timestamp(s) {
        Some(dt) => format!(
            "{} {} {} à {:02}:{:02}",
            dt.day(),
            MONTHS_FR[dt.month0() as usize],
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        None => s.to_string(),
    }
}

/// `15/01/2025`; unparseable input comes back unchanged.
pub fn format_short_date(s: &str) -> String {
    match parse_timestamp(s) {
        Some(dt) => format!("{:02}/{:02}/{}", dt.day(), dt.month(), dt.year()),
        None => s.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Masking
// ---------------------------------------------------------------------------

fn last_chars(s: &str, n: usize) -> &str {
    let count = s.chars().count();
    match s.char_indices().nth(count.saturating_sub(n)) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

fn first_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub fn mask_account_number(account_number: &str) -> String {
    if account_number.chars().count() < 4 {
        return account_number.to_string();
    }
    format!("**** **** {}", last_chars(account_number, 4))
}

pub fn mask_iban(iban: &str) -> String {
    if iban.chars().count() < 4 {
        return iban.to_string();
    }
    format!(
        "{} **** **** **** {}",
        first_chars(iban, 4),
        last_chars(iban, 4)
    )
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

pub fn account_type_label(account_type: &str) -> &str {
    match account_type {
        "courant" => "Compte Courant",
        "epargne" => "Compte Épargne",
        "joint" => "Compte Joint",
        other => other,
    }
}

pub fn transaction_label(transaction_type: &str) -> &str {
    match transaction_type {
        "deposit" => "Dépôt",
        "withdrawal" => "Retrait",
        "transfer_out" => "Virement envoyé",
        "transfer_in" => "Virement reçu",
        "payment" => "Paiement",
        "interest" => "Intérêts",
        "fee" => "Frais",
        other => other,
    }
}

pub fn category_label(category: &str) -> &str {
    match category {
        "alimentation" => "Alimentation",
        "logement" => "Logement",
        "transport" => "Transport",
        "loisirs" => "Loisirs",
        "sante" => "Santé",
        "shopping" => "Shopping",
        "services" => "Services",
        "salary" => "Salaire",
        "refund" => "Remboursement",
        "autres" => "Autres",
        other => other,
    }
}

/// Display tone of a transaction amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Info,
    Warning,
    Neutral,
}

pub fn transaction_tone(transaction_type: &str) -> Tone {
    match transaction_type {
        "deposit" | "transfer_in" => Tone::Success,
        "withdrawal" | "transfer_out" | "payment" => Tone::Error,
        "interest" => Tone::Info,
        "fee" => Tone::Warning,
        _ => Tone::Neutral,
    }
}

/// Money flowing into the account.
pub fn is_credit(transaction_type: &str) -> bool {
    matches!(transaction_type, "deposit" | "transfer_in")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static IBAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]+$").expect("iban regex"));
static FLOAT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([+-]?)([0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE]([+-]?[0-9]+))?").expect("float regex")
});
static INT_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+").expect("int regex"));

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn validate_iban(iban: &str) -> bool {
    let clean = strip_whitespace(iban);
    IBAN_RE.is_match(&clean) && clean.len() >= 15
}

// Decimal holds at most 29 significant digits and 28 fractional ones.
const MAX_DIGITS: usize = 29;
const MAX_SCALE: usize = 28;
const MAX_EXPONENT: i64 = 1_000_000;

/// Reads the leading decimal number of `s`, ignoring trailing garbage.
/// Returns `None` when no digits lead the string or the value overflows `Decimal`.
/// Values below `Decimal` precision read as zero.
pub fn parse_float_prefix(s: &str) -> Option<Decimal> {
    let caps = FLOAT_PREFIX_RE.captures(s.trim_start())?;
    let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
    let body = caps.get(2)?.as_str();
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    let exp = caps.get(3).map_or(0, |m| {
        let raw = m.as_str();
        raw.parse::<i64>()
            .unwrap_or(if raw.starts_with('-') { i64::MIN } else { i64::MAX })
            .clamp(-MAX_EXPONENT, MAX_EXPONENT)
    });

    let joined = format!("{int_part}{frac_part}");
    let significant = joined.trim_start_matches('0');
    let digits = significant.trim_end_matches('0');
    if digits.is_empty() {
        return Some(Decimal::ZERO);
    }
    let trailing_zeros = (significant.len() - digits.len()) as i64;
    let shift = exp - frac_part.len() as i64 + trailing_zeros;

    let text = if shift >= 0 {
        let zeros = shift as usize;
        if digits.len() + zeros > MAX_DIGITS {
            return None;
        }
        format!("{digits}{}", "0".repeat(zeros))
    } else {
        let mut scale = shift.unsigned_abs() as usize;
        let mut digits = digits;
        if scale > MAX_SCALE {
            let dropped = scale - MAX_SCALE;
            if dropped >= digits.len() {
                return Some(Decimal::ZERO);
            }
            digits = &digits[..digits.len() - dropped];
            scale = MAX_SCALE;
        }
        if digits.len() > scale {
            let (whole, frac) = digits.split_at(digits.len() - scale);
            format!("{whole}.{frac}")
        } else {
            format!("0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    };

    let mut value: Decimal = text.parse().ok()?;
    if negative {
        value.set_sign_negative(true);
    }
    Some(value)
}

/// Reads the leading integer of `s`, ignoring trailing garbage.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    INT_PREFIX_RE
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}

pub fn validate_amount(amount: &str) -> bool {
    parse_float_prefix(amount).is_some_and(|d| d > Decimal::ZERO)
}
