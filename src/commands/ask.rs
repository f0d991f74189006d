// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use crate::assistant;
use crate::classifier::{ClassifierInput, HttpClassifier, ReplayClassifier};
use crate::ledger::Ledger;
use crate::utils::image_mime;
use anyhow::{Context, Result, anyhow};

/// `ask <text> [--image <path>]`: classify live and apply.
pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    let cfg = ledger
        .config()
        .classifier
        .clone()
        .ok_or_else(|| anyhow!("No classifier configured (set MONEYMATE_CLASSIFIER_URL)"))?;
    let classifier = HttpClassifier::new(&cfg).context("Failed to build classifier client")?;
    let input = build_input(ledger, m)?;
    println!("{}", assistant::handle_input(ledger, &classifier, &input));
    Ok(())
}

/// `intent <file>`: run a saved classifier reply through the same pipeline.
pub fn handle_saved(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    let reply = replay(ledger, m)?;
    println!("{}", reply);
    Ok(())
}

pub fn replay(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<String> {
    let path = m.get_one::<PathBuf>("file").context("Missing reply file")?;
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let text = m.get_one::<String>("text").cloned().unwrap_or_default();
    let input = ClassifierInput::text(
        &text,
        ledger.now().date(),
        &ledger.config().default_currency,
    );
    let classifier = ReplayClassifier::new(&body);
    Ok(assistant::handle_input(ledger, &classifier, &input))
}

fn build_input(ledger: &Ledger, m: &clap::ArgMatches) -> Result<ClassifierInput> {
    let text = m
        .get_many::<String>("text")
        .map(|parts| parts.cloned().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let mut input = ClassifierInput::text(
        &text,
        ledger.now().date(),
        &ledger.config().default_currency,
    );
    if let Some(path) = m.get_one::<PathBuf>("image") {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?;
        input = input.with_image(bytes, image_mime(path));
    }
    Ok(input)
}
