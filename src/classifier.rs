// src/classifier.rs
//! Input validation and query-type detection.
//!
//! Every query passes through [`validate`] before anything touches the
//! network. [`classify`] then picks the first matching type in a fixed order:
//! email, phone, domain, crypto, and finally social as the catch-all.

use crate::types::{OsintError, QueryType};
use crate::utils::{is_valid_domain, strip_phone_formatting};
use regex::Regex;
use std::sync::OnceLock;

pub const MAX_QUERY_LEN: usize = 100;

fn email_local_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._%+-]+$").expect("email regex"))
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[1-9]\d{6,14}$").expect("phone regex"))
}

fn btc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$").expect("btc regex"))
}

fn eth_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("eth regex"))
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-' | '+' | '(' | ')' | ' ')
}

/// Check length and character set. Returns the trimmed query.
///
/// The length limit applies to the input as received, surrounding
/// whitespace included.
pub fn validate(input: &str) -> Result<String, OsintError> {
    if input.chars().count() > MAX_QUERY_LEN {
        return Err(OsintError::ValidationError(format!(
            "Query must be at most {} characters",
            MAX_QUERY_LEN
        )));
    }

    let query = input.trim();
    if query.is_empty() {
        return Err(OsintError::ValidationError("Query must not be empty".to_string()));
    }
    if let Some(bad) = query.chars().find(|c| !is_allowed_char(*c)) {
        return Err(OsintError::ValidationError(format!(
            "Query contains a forbidden character: {:?}",
            bad
        )));
    }

    Ok(query.to_string())
}

pub fn is_email(query: &str) -> bool {
    match query.split_once('@') {
        Some((local, domain)) => email_local_re().is_match(local) && is_valid_domain(domain),
        None => false,
    }
}

pub fn is_phone(query: &str) -> bool {
    phone_re().is_match(&strip_phone_formatting(query))
}

pub fn is_domain(query: &str) -> bool {
    is_valid_domain(query)
}

pub fn is_bitcoin_address(query: &str) -> bool {
    btc_re().is_match(query)
}

pub fn is_ethereum_address(query: &str) -> bool {
    eth_re().is_match(query)
}

pub fn is_crypto_address(query: &str) -> bool {
    is_bitcoin_address(query) || is_ethereum_address(query)
}

/// Detection on an already validated query.
pub fn detect(query: &str) -> QueryType {
    if is_email(query) {
        QueryType::Email
    } else if is_phone(query) {
        QueryType::Phone
    } else if is_domain(query) {
        QueryType::Domain
    } else if is_crypto_address(query) {
        QueryType::Crypto
    } else {
        QueryType::Social
    }
}

pub fn classify(input: &str) -> Result<QueryType, OsintError> {
    let query = validate(input)?;
    Ok(detect(&query))
}

/// Validate the input and settle its type: an explicit request wins over
/// detection. Returns the trimmed query alongside the type.
pub fn resolve_type(input: &str, requested: Option<&str>) -> Result<(String, QueryType), OsintError> {
    let query = validate(input)?;
    let query_type = match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => name.parse::<QueryType>()?,
        None => detect(&query),
    };
    Ok((query, query_type))
}
