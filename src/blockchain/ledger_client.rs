// src/blockchain/ledger_client.rs
//! Ledger recording API client.
//!
//! The wizard does not talk to the chain directly. Entries are posted as JSON to
//! a recording API that writes them on-chain and answers with a URL where the
//! recorded entry can be inspected.
//!
//! # Wire format
//! Request: `POST <api_url>` with `{ "type": "CreateDIDEntry", "data": <document> }`
//!
//! Success (2xx): `{ "url": "<explorer url>" }`
//!
//! Failure (non-2xx): `{ "message": "<reason>" }`, body optional

use crate::error::{LedgerError, LEDGER_GENERIC_ERROR};
use crate::models::did::{DIDDocument, EntryType};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Proof that an entry was accepted by the ledger.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EntryReceipt {
    /// Where the recorded entry can be viewed
    pub url: String,
}

#[derive(Serialize)]
struct RecordEntryRequest<'a> {
    #[serde(rename = "type")]
    entry_type: EntryType,
    data: &'a DIDDocument,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// HTTP client for the ledger recording API.
#[derive(Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    api_url: String,
}

impl LedgerClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_url` - Endpoint entries are posted to
    /// * `timeout` - Upper bound for a whole request
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built (TLS backend
    /// initialization).
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: api_url.to_string(),
        })
    }

    /// Submits `document` as an entry of kind `entry_type`.
    ///
    /// # Returns
    /// The receipt of the recorded entry.
    ///
    /// # Errors
    /// - [`LedgerError::Rejected`] when the API answers with a non-success status;
    ///   carries the server's message when it sent one
    /// - [`LedgerError::Transport`] when no usable answer was received
    pub async fn record_entry(
        &self,
        entry_type: EntryType,
        document: &DIDDocument,
    ) -> Result<EntryReceipt, LedgerError> {
        let body = RecordEntryRequest {
            entry_type,
            data: document,
        };

        let response = self
            .http
            .post(&self.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::warn!("Ledger request to {} failed: {}", self.api_url, e);
                LedgerError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let receipt = response.json::<EntryReceipt>().await.map_err(|e| {
                log::warn!("Ledger returned an unreadable receipt: {}", e);
                LedgerError::Transport(e.to_string())
            })?;
            log::info!("{} recorded: {}", entry_type, receipt.url);
            return Ok(receipt);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| LEDGER_GENERIC_ERROR.to_string());
        log::warn!("Ledger rejected {} with {}: {}", entry_type, status, message);

        Err(LedgerError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
