//! Blockchain explorer client.
//!
//! Fetches verified contract source code and ABI from an Etherscan-style API
//! (`module=contract`, `action=getsourcecode` / `action=getabi`). The
//! explorer wraps everything in a `{status, message, result}` envelope where
//! `status == "1"` means success even when HTTP says 200; anything else is an
//! upstream failure whose `message` we propagate.

use crate::types::{AppError, ContractRecord, Result};
use crate::utils::config::ExplorerConfig;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// Client for an Etherscan-style contract API.
#[derive(Debug)]
pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExplorerClient {
    /// Create a client for the configured explorer.
    ///
    /// Fails with [`AppError::Configuration`] when no explorer API key is
    /// set; the offline indexing phase never constructs this client, so a
    /// missing key only surfaces when a query actually needs it.
    pub fn new(config: &ExplorerConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            AppError::Configuration("ETHERSCAN_API_KEY is not set in the environment".to_string())
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    async fn get(&self, action: &str, address: &str) -> Result<ExplorerEnvelope> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("module", "contract"),
                ("action", action),
                ("address", address),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteService {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ExplorerEnvelope = response.json().await?;
        if envelope.status != "1" {
            return Err(AppError::UpstreamLogic(format!(
                "explorer rejected {action} for {address}: {}",
                envelope.message
            )));
        }
        debug!(action, address, "explorer request succeeded");
        Ok(envelope)
    }

    /// Fetch a contract's verified source code and ABI in one request.
    ///
    /// The `getsourcecode` payload carries both fields; a missing field means
    /// the payload does not describe a verified contract and fails fast with
    /// [`AppError::UpstreamLogic`].
    pub async fn fetch_contract(&self, address: &str) -> Result<ContractRecord> {
        let envelope = self.get("getsourcecode", address).await?;

        let entry = envelope.result.get(0).ok_or_else(|| {
            AppError::UpstreamLogic(format!("explorer returned an empty result set for {address}"))
        })?;
        let source_code = required_str(entry, "SourceCode", address)?;
        let abi = required_str(entry, "ABI", address)?;

        Ok(ContractRecord {
            address: address.to_string(),
            source_code,
            abi,
        })
    }

    /// Fetch only the ABI via `action=getabi`.
    ///
    /// The `getabi` result is the ABI JSON as a plain string.
    pub async fn fetch_abi(&self, address: &str) -> Result<String> {
        let envelope = self.get("getabi", address).await?;
        envelope
            .result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::UpstreamLogic(format!(
                    "explorer getabi result for {address} was not a string"
                ))
            })
    }
}

fn required_str(entry: &serde_json::Value, field: &str, address: &str) -> Result<String> {
    entry
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::UpstreamLogic(format!(
                "explorer response for {address} is missing the {field} field"
            ))
        })
}
