// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for Google's attestation status list. The feed maps lowercase hex serial numbers to
//! status records; a serial is revoked when an entry for it exists, no matter what the record
//! says. Inspecting the record's contents would weaken the check.

use crate::errors::{ConfigurationError, Error, RevocationReason};
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::Mutex;
use std::time::Duration;

/// Where Google publishes the attestation status list.
pub const STATUS_LIST_URL: &str = "https://android.googleapis.com/attestation/status";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A snapshot of the status list: the set of revoked serial numbers, lowercase hex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevocationList {
    entries: HashSet<String>,
}

/// Shape of the feed. Only key presence matters; the value schema is ignored on purpose.
#[derive(Deserialize)]
struct StatusResponse {
    entries: HashMap<String, serde_json::Value>,
}

impl RevocationList {
    /// A list revoking nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a status list from a reader with the same JSON shape as the live feed.
    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        let response: StatusResponse =
            serde_json::from_reader(reader).map_err(|e| list_unavailable(e.to_string()))?;
        Ok(Self::from_serials(response.entries.into_keys()))
    }

    /// Build a list from serial numbers (hex, any case).
    pub fn from_serials(serials: impl IntoIterator<Item = impl Into<String>>) -> Self {
        RevocationList {
            entries: serials
                .into_iter()
                .map(|s| s.into().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_revoked(&self, serial_hex: &str) -> bool {
        self.entries.contains(&serial_hex.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a verification obtains its revocation snapshot. The engines only depend on this seam,
/// so tests (and replay against a captured snapshot) can run without the network.
pub trait StatusListSource: Send + Sync {
    fn fetch(&self) -> Result<RevocationList, Error>;
}

/// A fixed snapshot, for tests and offline replay.
pub struct FixedStatusList(pub RevocationList);

impl StatusListSource for FixedStatusList {
    fn fetch(&self) -> Result<RevocationList, Error> {
        Ok(self.0.clone())
    }
}

struct CacheEntry {
    etag: String,
    list: RevocationList,
}

/// HTTP client for the live feed with a small in-memory conditional-request cache. The client
/// is safe to share across concurrent verifications; the cache never outlives the client.
pub struct RevocationListClient {
    client: reqwest::blocking::Client,
    url: String,
    cache: Mutex<Option<CacheEntry>>,
}

impl RevocationListClient {
    /// Build a client against the live feed, optionally through a proxy.
    pub fn new(proxy: Option<&str>) -> Result<Self, ConfigurationError> {
        Self::with_url(STATUS_LIST_URL, proxy)
    }

    /// Build a client against a different endpoint (mock servers, mirrors).
    pub fn with_url(url: impl Into<String>, proxy: Option<&str>) -> Result<Self, ConfigurationError> {
        let mut builder = reqwest::blocking::ClientBuilder::new()
            .user_agent(concat!("droidtrust/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .connect_timeout(HTTP_TIMEOUT);
        if let Some(proxy) = proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy)
                    .map_err(|e| ConfigurationError::InvalidProxy(e.to_string()))?,
            );
        }
        let client = builder
            .build()
            .map_err(|e| ConfigurationError::HttpClient(e.to_string()))?;
        Ok(RevocationListClient {
            client,
            url: url.into(),
            cache: Mutex::new(None),
        })
    }

    fn fetch_list(&self) -> Result<RevocationList, Error> {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut request = self.client.get(&self.url);
        if let Some(entry) = cache.as_ref() {
            request = request.header(IF_NONE_MATCH, entry.etag.clone());
        }

        let response = request
            .send()
            .map_err(|e| list_unavailable(e.to_string()))?;
        match response.status() {
            StatusCode::OK => {
                let etag = response
                    .headers()
                    .get(ETAG)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let body = response.bytes().map_err(|e| list_unavailable(e.to_string()))?;
                let list = RevocationList::from_reader(body.as_ref())?;
                tracing::debug!(revoked = list.len(), "fetched attestation status list");
                if let Some(etag) = etag {
                    *cache = Some(CacheEntry { etag, list: list.clone() });
                }
                Ok(list)
            }
            StatusCode::NOT_MODIFIED => {
                tracing::trace!("attestation status list unchanged, serving cache");
                cache
                    .as_ref()
                    .map(|entry| entry.list.clone())
                    .ok_or_else(|| list_unavailable("304 response without a cached list".into()))
            }
            status => Err(list_unavailable(format!("unexpected status {status}"))),
        }
    }
}

impl StatusListSource for RevocationListClient {
    fn fetch(&self) -> Result<RevocationList, Error> {
        self.fetch_list()
    }
}

fn list_unavailable(detail: String) -> Error {
    Error::Revocation {
        reason: RevocationReason::ListUnavailable(detail),
        chain: None,
        certificate: None,
    }
}
