// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The boundary to the external natural-language classifier.
//!
//! The classifier turns free-form text or a photo into an [`Intent`]. Prompting
//! and model choice live on the other side of this trait; the engine only
//! sends the input and parses the JSON that comes back.

use base64::Engine;
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::error::{LedgerError, Result};
use crate::intent::{self, Intent};

const USER_AGENT: &str = concat!("moneymate/", env!("CARGO_PKG_VERSION"));

/// An image attached to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Everything the classifier gets for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierInput {
    pub text: String,
    pub image: Option<ImageInput>,
    /// For resolving relative dates like "yesterday".
    pub current_date: NaiveDate,
    /// Filled in when the input names no currency.
    pub default_currency: String,
}

impl ClassifierInput {
    pub fn text(text: &str, current_date: NaiveDate, default_currency: &str) -> Self {
        Self {
            text: text.to_string(),
            image: None,
            current_date,
            default_currency: default_currency.to_string(),
        }
    }

    pub fn with_image(mut self, bytes: Vec<u8>, mime_type: &str) -> Self {
        self.image = Some(ImageInput {
            bytes,
            mime_type: mime_type.to_string(),
        });
        self
    }
}

pub trait Classifier {
    fn classify(&self, input: &ClassifierInput) -> Result<Intent>;
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
    current_date: String,
    default_currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_base64: Option<String>,
}

/// Classifier reached over HTTP. The endpoint receives a JSON body and answers
/// with the intent JSON, bare or wrapped in prose.
pub struct HttpClassifier {
    url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            url: config.url.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

impl Classifier for HttpClassifier {
    fn classify(&self, input: &ClassifierInput) -> Result<Intent> {
        let body = ClassifyRequest {
            text: &input.text,
            current_date: input.current_date.format("%Y-%m-%d").to_string(),
            default_currency: &input.default_currency,
            mime_type: input.image.as_ref().map(|i| i.mime_type.as_str()),
            image_base64: input
                .image
                .as_ref()
                .map(|i| base64::engine::general_purpose::STANDARD.encode(&i.bytes)),
        };

        let mut req = self.client.post(&self.url).json(&body);
        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }
        tracing::debug!(url = %self.url, has_image = input.image.is_some(), "calling classifier");
        let response = req.send()?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().unwrap_or_default();
            return Err(LedgerError::Classifier(format!(
                "classifier returned {}: {}",
                status, text
            )));
        }
        let text = response.text()?;
        intent::parse_reply(&text)
    }
}

/// Replays one fixed classifier reply. Used to run a saved reply through the
/// pipeline and in tests.
pub struct ReplayClassifier {
    reply: String,
}

impl ReplayClassifier {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

impl Classifier for ReplayClassifier {
    fn classify(&self, _input: &ClassifierInput) -> Result<Intent> {
        intent::parse_reply(&self.reply)
    }
}
