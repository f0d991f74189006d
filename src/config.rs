// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Process-wide configuration.
//!
//! Values come from the environment first, then from the `settings` table,
//! then from built-in defaults:
//!
//! - `MONEYMATE_CURRENCY`: default currency for omitted-currency input
//! - `MONEYMATE_DB`: database path
//! - `MONEYMATE_CLASSIFIER_URL`: classifier endpoint (classifier disabled if unset)
//! - `MONEYMATE_CLASSIFIER_KEY`: bearer token for the classifier (optional)
//! - `MONEYMATE_CLASSIFIER_TIMEOUT_SECS`: classifier timeout (default 30)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, params};

use crate::db;
use crate::error::{LedgerError, Result};

pub const DEFAULT_CURRENCY: &str = "CNY";
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 30;

const ENV_CURRENCY: &str = "MONEYMATE_CURRENCY";
const ENV_DB: &str = "MONEYMATE_DB";
const ENV_CLASSIFIER_URL: &str = "MONEYMATE_CLASSIFIER_URL";
const ENV_CLASSIFIER_KEY: &str = "MONEYMATE_CLASSIFIER_KEY";
const ENV_CLASSIFIER_TIMEOUT: &str = "MONEYMATE_CLASSIFIER_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub default_currency: String,
    pub db_path: Option<PathBuf>,
    pub classifier: Option<ClassifierConfig>,
}

impl Config {
    pub fn new(default_currency: &str) -> Self {
        Self {
            default_currency: default_currency.trim().to_uppercase(),
            db_path: None,
            classifier: None,
        }
    }

    /// Database path from `MONEYMATE_DB`, falling back to the platform data dir.
    pub fn db_path_from_env() -> Result<PathBuf> {
        match env_var(ENV_DB) {
            Some(p) => Ok(PathBuf::from(p)),
            None => db::default_db_path(),
        }
    }

    /// Builds the configuration once the database is open.
    pub fn load(conn: &Connection, db_path: PathBuf) -> Result<Self> {
        let currency = match env_var(ENV_CURRENCY) {
            Some(c) => c,
            None => stored_base_currency(conn)?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        };
        let mut config = Config::new(&currency);
        config.db_path = Some(db_path);
        config.classifier = classifier_from_env()?;
        Ok(config)
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn classifier_from_env() -> Result<Option<ClassifierConfig>> {
    let Some(url) = env_var(ENV_CLASSIFIER_URL) else {
        return Ok(None);
    };
    let secs = match env_var(ENV_CLASSIFIER_TIMEOUT) {
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            LedgerError::InvalidData(format!(
                "{} must be whole seconds, got '{}'",
                ENV_CLASSIFIER_TIMEOUT, raw
            ))
        })?,
        None => DEFAULT_CLASSIFIER_TIMEOUT_SECS,
    };
    Ok(Some(ClassifierConfig {
        url,
        api_key: env_var(ENV_CLASSIFIER_KEY),
        timeout: Duration::from_secs(secs),
    }))
}

pub fn stored_base_currency(conn: &Connection) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='base_currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_base_currency(conn: &Connection, ccy: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('base_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy.trim().to_uppercase()],
    )?;
    Ok(())
}
