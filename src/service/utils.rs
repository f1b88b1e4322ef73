//! Shared helpers: threshold math, wallet/key selection, transaction signing
//! and the JSON result filter.

use super::FILTER_MAX_NEST;
use crate::cryptography::{ECPoint, KeyPair};
use crate::payloads::{get_sign_data, Transaction};
use crate::wallets::{Wallet, WalletAccount};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Smallest honest-majority size for a designated set of `n` oracles.
pub(crate) fn oracle_threshold(n: usize) -> usize {
    n - (n - 1) / 3
}

/// Signs the transaction's network-scoped sign data.
pub(crate) fn sign_transaction(tx: &Transaction, key: &KeyPair, network: u32) -> Vec<u8> {
    key.sign(&get_sign_data(tx, network))
}

/// Picks the first unlocked wallet key that is a designated oracle.
pub(crate) fn select_oracle_key(
    wallet: &dyn Wallet,
    oracle_nodes: &[ECPoint],
) -> Option<Arc<KeyPair>> {
    wallet
        .get_accounts()
        .into_iter()
        .filter(|account| account.has_key() && !account.is_locked())
        .filter_map(|account| account.get_key())
        .find(|key| oracle_nodes.iter().any(|p| p == key.public_key()))
}

/// Whether the wallet holds any designated oracle key.
pub(crate) fn wallet_has_oracle_account(wallet: &dyn Wallet, oracle_nodes: &[ECPoint]) -> bool {
    select_oracle_key(wallet, oracle_nodes).is_some()
}

#[derive(Debug, Error)]
pub(crate) enum FilterError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid filter expression: {0}")]
    Syntax(String),
    #[error("filter expression exceeds maximum nesting")]
    TooDeep,
    #[error("filter matched nothing")]
    NoMatch,
}

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Member(String),
    Index(usize),
    Wildcard,
}

/// Applies a JSON-path selector to a fetched body.
///
/// An empty or absent filter passes the body through unchanged. Otherwise
/// the body must parse as JSON; the matches are wrapped in a JSON array and
/// serialized compactly. Zero matches are an error so the response carries
/// an error code instead of a misleading empty result.
pub(crate) fn filter_json(input: &str, filter: Option<&str>) -> Result<Vec<u8>, FilterError> {
    let Some(path) = filter.filter(|f| !f.is_empty()) else {
        return Ok(input.as_bytes().to_vec());
    };

    let value: Value = serde_json::from_str(input)?;
    let segments = parse_path(path)?;
    if segments.len() > FILTER_MAX_NEST {
        return Err(FilterError::TooDeep);
    }

    let mut current: Vec<&Value> = vec![&value];
    for segment in &segments {
        let mut next = Vec::new();
        for item in current {
            match segment {
                Segment::Member(name) => {
                    if let Some(v) = item.get(name.as_str()) {
                        next.push(v);
                    }
                }
                Segment::Index(index) => {
                    if let Some(v) = item.get(index) {
                        next.push(v);
                    }
                }
                Segment::Wildcard => match item {
                    Value::Array(items) => next.extend(items.iter()),
                    Value::Object(map) => next.extend(map.values()),
                    _ => {}
                },
            }
        }
        current = next;
    }

    if current.is_empty() {
        return Err(FilterError::NoMatch);
    }

    let matches = Value::Array(current.into_iter().cloned().collect());
    Ok(serde_json::to_vec(&matches)?)
}

fn parse_path(path: &str) -> Result<Vec<Segment>, FilterError> {
    let mut chars = path.chars().peekable();
    if chars.next() != Some('$') {
        return Err(FilterError::Syntax(
            "selector must start with '$'".to_string(),
        ));
    }

    let mut segments = Vec::new();
    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    segments.push(Segment::Wildcard);
                    continue;
                }
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next == '.' || next == '[' {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(FilterError::Syntax("empty member name".to_string()));
                }
                segments.push(Segment::Member(name));
            }
            '[' => match chars.peek().copied() {
                Some('*') => {
                    chars.next();
                    if chars.next() != Some(']') {
                        return Err(FilterError::Syntax("expected ']'".to_string()));
                    }
                    segments.push(Segment::Wildcard);
                }
                Some(quote @ ('\'' | '"')) => {
                    chars.next();
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some(ch) if ch == quote => break,
                            Some(ch) => name.push(ch),
                            None => {
                                return Err(FilterError::Syntax(
                                    "unterminated string".to_string(),
                                ))
                            }
                        }
                    }
                    if chars.next() != Some(']') {
                        return Err(FilterError::Syntax("expected ']'".to_string()));
                    }
                    segments.push(Segment::Member(name));
                }
                _ => {
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(ch) => digits.push(ch),
                            None => {
                                return Err(FilterError::Syntax("expected ']'".to_string()))
                            }
                        }
                    }
                    let index = digits.trim().parse::<usize>().map_err(|_| {
                        FilterError::Syntax(format!("invalid index '{digits}'"))
                    })?;
                    segments.push(Segment::Index(index));
                }
            },
            _ => {
                return Err(FilterError::Syntax(format!(
                    "unexpected character '{c}'"
                )))
            }
        }
    }

    Ok(segments)
}
