// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A replayable record of one verification: engine flavor, full policy, inputs. Given only the
//! serialized envelope, [`DebugEnvelope::replay`] reconstructs the engine and reruns the
//! verification, so a rejection seen in production can be debugged offline.

use crate::chain::CertificateChain;
use crate::config::AttestationConfig;
use crate::errors::Error;
use crate::key_description::KeyDescription;
use crate::revocation::{RevocationListClient, StatusListSource};
use crate::verifier::{Engine, EngineKind};
use serde::{Deserialize, Serialize};
use serde_with::base64::{Base64, UrlSafe};
use serde_with::formats::Padded;
use serde_with::serde_as;
use std::sync::Arc;
use time::OffsetDateTime;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugEnvelope {
    pub kind: EngineKind,
    pub configuration: AttestationConfig,
    /// UTC, millisecond precision.
    #[serde(with = "time::serde::rfc3339")]
    pub verification_time: OffsetDateTime,
    #[serde_as(as = "Base64<UrlSafe, Padded>")]
    pub challenge: Vec<u8>,
    /// The chain as PEM certificates, leaf first.
    pub attestation_statement: Vec<String>,
}

impl DebugEnvelope {
    /// Capture the inputs of a verification run on the given engine.
    pub fn capture(
        engine: &Engine,
        chain: &CertificateChain,
        verification_time: OffsetDateTime,
        challenge: &[u8],
    ) -> Self {
        let utc = verification_time.to_offset(time::UtcOffset::UTC);
        let millis = utc.nanosecond() / 1_000_000 * 1_000_000;
        DebugEnvelope {
            kind: engine.kind(),
            configuration: engine.config().clone(),
            verification_time: utc.replace_nanosecond(millis).unwrap_or(utc),
            challenge: challenge.to_vec(),
            attestation_statement: chain.to_pem_list(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rebuild the engine and rerun the captured verification against the live revocation list.
    pub fn replay(&self) -> Result<KeyDescription, Error> {
        let client = RevocationListClient::new(self.configuration.http_proxy.as_deref())?;
        self.replay_with_source(Arc::new(client))
    }

    /// Rerun the captured verification against a caller-supplied revocation snapshot, for fully
    /// deterministic replays.
    pub fn replay_with_source(
        &self,
        status: Arc<dyn StatusListSource>,
    ) -> Result<KeyDescription, Error> {
        let engine = Engine::new(self.kind, Arc::new(self.configuration.clone()), status)?;
        let chain = CertificateChain::from_pem_list(&self.attestation_statement)?;
        engine.verify(&chain, self.verification_time, &self.challenge)
    }
}
