// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The verification engines. All three flavors share one frame — decode, identify the calling
//! application, validate the chain, then apply the policy checks in a fixed order — and differ
//! only in which anchors they trust, which authorization list they consult, and what security
//! levels they accept.

use crate::anchors::TrustAnchor;
use crate::chain::{self, CertificateChain};
use crate::config::{AppData, AttestationConfig, YearMonth};
use crate::errors::{ConfigurationError, Error, ValueReason};
use crate::key_description::{self, KeyDescription, SecurityLevel, VerifiedBootState};
use crate::revocation::{RevocationListClient, StatusListSource};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;

/// The attestation flavor an engine verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineKind {
    /// Keys and attestation both live in a TEE or StrongBox.
    Hardware,
    /// Everything is software; only useful against emulators and for tests.
    Software,
    /// Devices shipped with Android 7: hardware-backed Keymaster, software attestation. The
    /// key attestation is trustworthy, the OS claims are not.
    NougatHybrid,
}

impl EngineKind {
    fn name(&self) -> &'static str {
        match self {
            EngineKind::Hardware => "hardware",
            EngineKind::Software => "software",
            EngineKind::NougatHybrid => "nougat-hybrid",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single-flavor verifier. Immutable after construction and safe to share across threads;
/// per-call state stays on the stack.
pub struct Engine {
    kind: EngineKind,
    config: Arc<AttestationConfig>,
    status: Arc<dyn StatusListSource>,
}

impl Engine {
    /// Construct an engine, enforcing the flavor's preconditions against the config.
    pub fn new(
        kind: EngineKind,
        config: Arc<AttestationConfig>,
        status: Arc<dyn StatusListSource>,
    ) -> Result<Self, ConfigurationError> {
        let flavor = kind.name();
        match kind {
            EngineKind::Hardware => {
                if config.disable_hardware_attestation {
                    return Err(ConfigurationError::FlavorDisabled { flavor });
                }
                if config.hardware_trust_anchors.is_empty() {
                    return Err(ConfigurationError::NoAnchorsForFlavor { flavor });
                }
            }
            EngineKind::Software => {
                if !config.enable_software_attestation {
                    return Err(ConfigurationError::FlavorDisabled { flavor });
                }
                if config.software_trust_anchors.is_empty() {
                    return Err(ConfigurationError::NoAnchorsForFlavor { flavor });
                }
            }
            EngineKind::NougatHybrid => {
                if !config.enable_nougat_attestation {
                    return Err(ConfigurationError::FlavorDisabled { flavor });
                }
                if config.hardware_trust_anchors.is_empty() {
                    return Err(ConfigurationError::NoAnchorsForFlavor { flavor });
                }
            }
        }
        Ok(Engine { kind, config, status })
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn config(&self) -> &AttestationConfig {
        &self.config
    }

    /// Verify an attestation chain against this engine's policy.
    ///
    /// The checks run in a fixed order and the first failure wins: application identity, chain
    /// (with revocation), challenge, statement age, security level, boot state, rollback
    /// resistance, Android version. On success the decoded record is handed back.
    pub fn verify(
        &self,
        chain: &CertificateChain,
        verification_time: OffsetDateTime,
        expected_challenge: &[u8],
    ) -> Result<KeyDescription, Error> {
        let adjusted = self.config.adjusted_time(verification_time);

        let key_description = key_description::decode_from_leaf(chain.leaf_der())
            .map_err(|cause| chain.failure(cause, Some(chain.leaf_der().to_vec())))?;

        let app = self.identify_application(&key_description)?;
        let anchors: &[TrustAnchor] = app
            .trust_anchor_overrides
            .as_deref()
            .unwrap_or_else(|| self.trust_anchors());

        chain::validate(
            chain,
            adjusted,
            anchors,
            self.config.ignore_leaf_validity,
            self.status.as_ref(),
        )?;

        self.verify_challenge(expected_challenge, &key_description)?;
        if self.kind != EngineKind::NougatHybrid {
            self.verify_attestation_time(&key_description, adjusted)?;
        }
        self.verify_security_level(&key_description)?;
        self.verify_boot_state(&key_description)?;
        self.verify_rollback_resistance(&key_description)?;
        if self.kind != EngineKind::NougatHybrid {
            self.verify_android_version(&key_description, app, adjusted)?;
        }

        tracing::debug!(
            engine = %self.kind,
            package = %app.package_name,
            "attestation accepted"
        );
        Ok(key_description)
    }

    /// The anchor set this flavor validates against. Nougat-hybrid chains terminate at a
    /// software root: the leaf is keymaster-signed but the factory-provisioned attestation key
    /// on those devices chains to the software CA.
    fn trust_anchors(&self) -> &[TrustAnchor] {
        match self.kind {
            EngineKind::Hardware => &self.config.hardware_trust_anchors,
            EngineKind::Software | EngineKind::NougatHybrid => {
                &self.config.software_trust_anchors
            }
        }
    }

    /// Pick the configured application this attestation belongs to. Applications are tried in
    /// configuration order; if none matches, the first application's failure is reported so
    /// operators always see a stable error.
    fn identify_application(&self, key_description: &KeyDescription) -> Result<&AppData, Error> {
        let mut first_failure = None;
        for app in &self.config.applications {
            match verify_application(app, key_description) {
                Ok(()) => return Ok(app),
                Err(error) => {
                    first_failure.get_or_insert(error);
                }
            }
        }
        // the config builder guarantees at least one application
        Err(first_failure.expect("configurations always carry an application"))
    }

    fn verify_challenge(
        &self,
        expected: &[u8],
        key_description: &KeyDescription,
    ) -> Result<(), Error> {
        if key_description.attestation_challenge != expected {
            let b64 = base64::engine::general_purpose::STANDARD;
            return Err(Error::value(
                ValueReason::Challenge,
                b64.encode(expected),
                b64.encode(&key_description.attestation_challenge),
            ));
        }
        Ok(())
    }

    /// Bound the attestation statement's age: creation must not be in the future and not older
    /// than the configured validity. Skipped entirely when no validity is configured.
    fn verify_attestation_time(
        &self,
        key_description: &KeyDescription,
        check_time: OffsetDateTime,
    ) -> Result<(), Error> {
        let Some(validity) = self.config.attestation_statement_validity_seconds else {
            return Ok(());
        };
        let created_at = key_description
            .tee_enforced
            .creation_date_time
            .or(key_description.software_enforced.creation_date_time)
            .ok_or_else(|| {
                Error::value(ValueReason::Time, "a creation time", "no creation time")
            })?;
        if created_at > check_time {
            return Err(Error::value(
                ValueReason::Time,
                format!("creation before {check_time}"),
                created_at.to_string(),
            ));
        }
        if (check_time - created_at).whole_seconds() > validity {
            return Err(Error::value(
                ValueReason::Time,
                format!("creation within {validity}s of {check_time}"),
                created_at.to_string(),
            ));
        }
        Ok(())
    }

    fn verify_security_level(&self, key_description: &KeyDescription) -> Result<(), Error> {
        let attestation = key_description.attestation_security_level;
        let keymaster = key_description.keymaster_security_level;
        let strong_box = self.config.require_strong_box;

        let (ok, expected) = match self.kind {
            EngineKind::Hardware if strong_box => (
                attestation == SecurityLevel::StrongBox && keymaster == SecurityLevel::StrongBox,
                "STRONG_BOX/STRONG_BOX",
            ),
            EngineKind::Hardware => (
                attestation != SecurityLevel::Software && keymaster != SecurityLevel::Software,
                "hardware/hardware",
            ),
            EngineKind::Software => (
                attestation == SecurityLevel::Software && keymaster == SecurityLevel::Software,
                "SOFTWARE/SOFTWARE",
            ),
            EngineKind::NougatHybrid if strong_box => (
                attestation == SecurityLevel::Software && keymaster == SecurityLevel::StrongBox,
                "SOFTWARE/STRONG_BOX",
            ),
            EngineKind::NougatHybrid => (
                attestation == SecurityLevel::Software && keymaster != SecurityLevel::Software,
                "SOFTWARE/hardware",
            ),
        };
        if !ok {
            return Err(Error::value(
                ValueReason::SecLevel,
                expected,
                format!("{attestation}/{keymaster}"),
            ));
        }
        Ok(())
    }

    /// Root-of-trust policy, applied by the hardware engine only: software attestations carry no
    /// meaningful boot state, and on Nougat hybrids the OS claims are untrustworthy by
    /// definition.
    fn verify_boot_state(&self, key_description: &KeyDescription) -> Result<(), Error> {
        if self.kind != EngineKind::Hardware || self.config.allow_bootloader_unlock {
            return Ok(());
        }
        let root_of_trust = key_description
            .tee_enforced
            .root_of_trust
            .as_ref()
            .ok_or_else(|| {
                Error::value(ValueReason::SystemIntegrity, "a root of trust", "no root of trust")
            })?;
        if !root_of_trust.device_locked {
            return Err(Error::value(
                ValueReason::SystemIntegrity,
                "a locked device",
                "an unlocked bootloader",
            ));
        }
        if root_of_trust.verified_boot_state != VerifiedBootState::Verified {
            return Err(Error::value(
                ValueReason::SystemIntegrity,
                "VERIFIED boot",
                format!("{:?}", root_of_trust.verified_boot_state),
            ));
        }
        Ok(())
    }

    fn verify_rollback_resistance(&self, key_description: &KeyDescription) -> Result<(), Error> {
        if !self.config.require_rollback_resistance {
            return Ok(());
        }
        let list = match self.kind {
            EngineKind::Software => &key_description.software_enforced,
            EngineKind::Hardware | EngineKind::NougatHybrid => &key_description.tee_enforced,
        };
        if !list.rollback_resistance {
            return Err(Error::value(
                ValueReason::RollbackResistance,
                "a rollback resistant key",
                "no rollback resistance",
            ));
        }
        Ok(())
    }

    /// Minimum OS version and patch level, from the authorization list this flavor trusts.
    /// Attested patch levels too far in the future are as suspect as ones in the past.
    fn verify_android_version(
        &self,
        key_description: &KeyDescription,
        app: &AppData,
        check_time: OffsetDateTime,
    ) -> Result<(), Error> {
        let list = match self.kind {
            EngineKind::Hardware => &key_description.tee_enforced,
            EngineKind::Software => &key_description.software_enforced,
            EngineKind::NougatHybrid => return Ok(()),
        };

        if let Some(minimum) = app.android_version_override.or(self.config.android_version) {
            match list.os_version {
                Some(version) if version >= minimum => {}
                other => {
                    return Err(Error::value(
                        ValueReason::OsVersion,
                        format!("os version >= {minimum}"),
                        other.map_or_else(|| "no os version".into(), |v| v.to_string()),
                    ))
                }
            }
        }

        let minimum_patch = app
            .patch_level_override
            .as_ref()
            .or(self.config.patch_level.as_ref());
        if let Some(minimum) = minimum_patch {
            let attested = list.os_patch_level.ok_or_else(|| {
                Error::value(ValueReason::OsVersion, "an os patch level", "no os patch level")
            })?;
            if attested < minimum.value {
                return Err(Error::value(
                    ValueReason::OsVersion,
                    format!("patch level >= {}", minimum.value),
                    attested.to_string(),
                ));
            }
            if let Some(max_future) = minimum.max_future_months {
                let current = YearMonth::from_date(check_time);
                if attested.months_since(current) > max_future {
                    return Err(Error::value(
                        ValueReason::OsVersion,
                        format!("patch level within {max_future} months of {current}"),
                        attested.to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Match the attestation's application identity against one configured application.
fn verify_application(app: &AppData, key_description: &KeyDescription) -> Result<(), Error> {
    let app_id = key_description
        .software_enforced
        .attestation_application_id
        .as_ref()
        .ok_or_else(|| {
            Error::value(
                ValueReason::AppUnexpected,
                "an attestation application id",
                "no attestation application id",
            )
        })?;

    if !app_id
        .package_infos
        .iter()
        .any(|info| info.package_name == app.package_name)
    {
        let attested: Vec<&str> = app_id
            .package_infos
            .iter()
            .map(|info| info.package_name.as_str())
            .collect();
        return Err(Error::value(
            ValueReason::PackageName,
            &app.package_name,
            attested.join(", "),
        ));
    }

    if let Some(minimum) = app.app_version {
        let first = app_id.package_infos.first().ok_or_else(|| {
            Error::value(ValueReason::AppUnexpected, "a package entry", "no package entries")
        })?;
        if first.version < minimum {
            return Err(Error::value(
                ValueReason::AppVersion,
                format!("version >= {minimum}"),
                first.version.to_string(),
            ));
        }
    }

    if !app_id
        .signature_digests
        .iter()
        .any(|digest| app.signature_digests.contains(digest))
    {
        return Err(Error::value(
            ValueReason::AppSignerDigest,
            "a configured signer digest",
            "only unknown signer digests",
        ));
    }

    Ok(())
}

/// The front door: one engine per enabled flavor, sharing a single status list client. `verify`
/// tries hardware first, then Nougat-hybrid, then software, and reports the first engine's
/// failure when none accepts the chain.
pub struct Verifier {
    engines: Vec<Engine>,
}

impl Verifier {
    /// Build the enabled engines with a revocation client honoring `http_proxy`.
    pub fn new(config: AttestationConfig) -> Result<Self, Error> {
        let client = RevocationListClient::new(config.http_proxy.as_deref())?;
        Self::with_status_source(config, Arc::new(client))
    }

    /// Build the enabled engines against a caller-supplied status list source.
    pub fn with_status_source(
        config: AttestationConfig,
        status: Arc<dyn StatusListSource>,
    ) -> Result<Self, Error> {
        let config = Arc::new(config);
        let mut engines = Vec::new();
        if !config.disable_hardware_attestation {
            engines.push(Engine::new(EngineKind::Hardware, config.clone(), status.clone())?);
        }
        if config.enable_nougat_attestation {
            engines.push(Engine::new(EngineKind::NougatHybrid, config.clone(), status.clone())?);
        }
        if config.enable_software_attestation {
            engines.push(Engine::new(EngineKind::Software, config.clone(), status.clone())?);
        }
        if engines.is_empty() {
            return Err(ConfigurationError::AllFlavorsDisabled.into());
        }
        Ok(Verifier { engines })
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn engine(&self, kind: EngineKind) -> Option<&Engine> {
        self.engines.iter().find(|engine| engine.kind == kind)
    }

    /// Verify against every enabled engine in order; the first acceptance wins.
    pub fn verify(
        &self,
        chain: &CertificateChain,
        verification_time: OffsetDateTime,
        expected_challenge: &[u8],
    ) -> Result<KeyDescription, Error> {
        let mut first_failure = None;
        for engine in &self.engines {
            match engine.verify(chain, verification_time, expected_challenge) {
                Ok(key_description) => return Ok(key_description),
                Err(error) => {
                    tracing::trace!(engine = %engine.kind, %error, "engine rejected attestation");
                    first_failure.get_or_insert(error);
                }
            }
        }
        Err(first_failure.expect("verifiers always carry an engine"))
    }
}
