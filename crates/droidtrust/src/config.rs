// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The policy ground truth. A config is built once at startup, validated while building, and
//! never mutated afterwards; engines borrow it for the lifetime of the verifier.

use crate::anchors::{self, TrustAnchor};
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;
use time::OffsetDateTime;

/// A calendar year-month, as carried by the `osPatchLevel` authorization entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u8,
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(YearMonth { year, month })
    }

    /// Decode the `year * 100 + month` integer encoding (e.g. August 2021 is 202108).
    pub fn from_encoded(value: i64) -> Option<Self> {
        let year = i32::try_from(value / 100).ok()?;
        let month = u8::try_from(value % 100).ok()?;
        Self::new(year, month)
    }

    pub fn encoded(&self) -> i64 {
        self.year as i64 * 100 + self.month as i64
    }

    /// Months from `other` to `self`; positive when `self` is later.
    pub fn months_since(&self, other: YearMonth) -> i32 {
        (self.year * 12 + self.month as i32 - 1) - (other.year * 12 + other.month as i32 - 1)
    }

    pub(crate) fn from_date(date: OffsetDateTime) -> Self {
        let utc = date.to_offset(time::UtcOffset::UTC);
        YearMonth {
            year: utc.year(),
            month: utc.month() as u8,
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A minimum security patch level, with a clamp on how far into the future an attested patch
/// level may lie before it is treated as bogus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchLevel {
    pub value: YearMonth,
    /// How many months past the verification time an attested patch level may claim. `None`
    /// disables the clamp. Negative tolerances are admissible (useful in tests to force the
    /// clamp against a current patch level).
    #[serde(default = "default_max_future_months")]
    pub max_future_months: Option<i32>,
}

fn default_max_future_months() -> Option<i32> {
    Some(1)
}

impl PatchLevel {
    pub fn new(year: i32, month: u8) -> Option<Self> {
        YearMonth::new(year, month).map(|value| PatchLevel {
            value,
            max_future_months: default_max_future_months(),
        })
    }

    /// Decode the `year * 100 + month` integer encoding, rejecting month values outside [1, 12].
    pub fn from_encoded(value: i64) -> Result<Self, ConfigurationError> {
        YearMonth::from_encoded(value)
            .map(|value| PatchLevel {
                value,
                max_future_months: default_max_future_months(),
            })
            .ok_or(ConfigurationError::InvalidPatchLevel { value })
    }

    pub fn without_future_clamp(mut self) -> Self {
        self.max_future_months = None;
        self
    }

    pub fn with_max_future_months(mut self, months: i32) -> Self {
        self.max_future_months = Some(months);
        self
    }
}

/// An application the policy accepts attestations for.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub package_name: String,
    /// SHA-256 digests of the APK signing certificates; the attestation has to carry at least
    /// one of them.
    #[serde_as(as = "Vec<Base64>")]
    pub signature_digests: Vec<Vec<u8>>,
    /// Minimum `versionCode`, checked against the first attested package entry.
    #[serde(default)]
    pub app_version: Option<i64>,
    /// Per-app minimum Android version, taking precedence over the global one.
    #[serde(default)]
    pub android_version_override: Option<i64>,
    /// Per-app minimum patch level, taking precedence over the global one.
    #[serde(default)]
    pub patch_level_override: Option<PatchLevel>,
    /// When set, chains attested to this app must terminate at one of these anchors instead of
    /// the engine's anchor set.
    #[serde(default)]
    pub trust_anchor_overrides: Option<Vec<TrustAnchor>>,
}

impl AppData {
    pub fn new(
        package_name: impl Into<String>,
        signature_digests: Vec<Vec<u8>>,
    ) -> Result<Self, ConfigurationError> {
        let package_name = package_name.into();
        if package_name.is_empty() {
            return Err(ConfigurationError::EmptyPackageName);
        }
        if signature_digests.is_empty() {
            return Err(ConfigurationError::EmptySignatureDigests { package: package_name });
        }
        Ok(AppData {
            package_name,
            signature_digests,
            app_version: None,
            android_version_override: None,
            patch_level_override: None,
            trust_anchor_overrides: None,
        })
    }

    pub fn with_app_version(mut self, version: i64) -> Self {
        self.app_version = Some(version);
        self
    }

    pub fn with_android_version_override(mut self, version: i64) -> Self {
        self.android_version_override = Some(version);
        self
    }

    pub fn with_patch_level_override(mut self, patch_level: PatchLevel) -> Self {
        self.patch_level_override = Some(patch_level);
        self
    }

    pub fn with_trust_anchor_overrides(mut self, anchors: Vec<TrustAnchor>) -> Self {
        self.trust_anchor_overrides = Some(anchors);
        self
    }
}

/// The complete, immutable verification policy.
///
/// Construct through [`AttestationConfig::builder`]; the builder enforces the structural
/// invariants (non-empty application list, at least one anchor set, at least one enabled
/// flavor) so a constructed config is always usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationConfig {
    pub applications: Vec<AppData>,
    /// Minimum Android version, encoded as `major * 10_000` (Android 11 is 110000).
    #[serde(default)]
    pub android_version: Option<i64>,
    #[serde(default)]
    pub patch_level: Option<PatchLevel>,
    #[serde(default)]
    pub require_strong_box: bool,
    /// When set, root-of-trust checks (device locked, verified boot) are skipped.
    #[serde(default)]
    pub allow_bootloader_unlock: bool,
    #[serde(default)]
    pub require_rollback_resistance: bool,
    /// When set, the leaf's notBefore/notAfter are not checked during chain validation.
    #[serde(default)]
    pub ignore_leaf_validity: bool,
    pub hardware_trust_anchors: Vec<TrustAnchor>,
    pub software_trust_anchors: Vec<TrustAnchor>,
    /// Signed offset added to the caller-supplied verification time before any time check.
    #[serde(default)]
    pub verification_seconds_offset: i64,
    /// When set, the attestation statement's creation time must lie within
    /// `[now - validity, now]`.
    #[serde(default)]
    pub attestation_statement_validity_seconds: Option<i64>,
    #[serde(default)]
    pub enable_software_attestation: bool,
    #[serde(default)]
    pub enable_nougat_attestation: bool,
    #[serde(default)]
    pub disable_hardware_attestation: bool,
    /// Proxy URL for the revocation list client.
    #[serde(default)]
    pub http_proxy: Option<String>,
}

impl AttestationConfig {
    pub fn builder() -> AttestationConfigBuilder {
        AttestationConfigBuilder::default()
    }

    pub(crate) fn adjusted_time(&self, verification_time: OffsetDateTime) -> OffsetDateTime {
        verification_time + time::Duration::seconds(self.verification_seconds_offset)
    }
}

#[derive(Debug, Default)]
pub struct AttestationConfigBuilder {
    applications: Vec<AppData>,
    android_version: Option<i64>,
    patch_level: Option<PatchLevel>,
    require_strong_box: bool,
    allow_bootloader_unlock: bool,
    require_rollback_resistance: bool,
    ignore_leaf_validity: bool,
    hardware_trust_anchors: Option<Vec<TrustAnchor>>,
    software_trust_anchors: Option<Vec<TrustAnchor>>,
    verification_seconds_offset: i64,
    attestation_statement_validity_seconds: Option<i64>,
    enable_software_attestation: bool,
    enable_nougat_attestation: bool,
    disable_hardware_attestation: bool,
    http_proxy: Option<String>,
}

impl AttestationConfigBuilder {
    pub fn add_application(mut self, app: AppData) -> Self {
        self.applications.push(app);
        self
    }

    pub fn android_version(mut self, version: i64) -> Self {
        self.android_version = Some(version);
        self
    }

    pub fn patch_level(mut self, patch_level: PatchLevel) -> Self {
        self.patch_level = Some(patch_level);
        self
    }

    pub fn require_strong_box(mut self, required: bool) -> Self {
        self.require_strong_box = required;
        self
    }

    pub fn allow_bootloader_unlock(mut self, allowed: bool) -> Self {
        self.allow_bootloader_unlock = allowed;
        self
    }

    pub fn require_rollback_resistance(mut self, required: bool) -> Self {
        self.require_rollback_resistance = required;
        self
    }

    pub fn ignore_leaf_validity(mut self, ignore: bool) -> Self {
        self.ignore_leaf_validity = ignore;
        self
    }

    /// Replace the hardware anchor set. Without this call the bundled Google hardware anchors
    /// are used.
    pub fn hardware_trust_anchors(mut self, anchors: Vec<TrustAnchor>) -> Self {
        self.hardware_trust_anchors = Some(anchors);
        self
    }

    /// Replace the software anchor set. Without this call the bundled Google software anchors
    /// are used.
    pub fn software_trust_anchors(mut self, anchors: Vec<TrustAnchor>) -> Self {
        self.software_trust_anchors = Some(anchors);
        self
    }

    pub fn verification_seconds_offset(mut self, offset: i64) -> Self {
        self.verification_seconds_offset = offset;
        self
    }

    pub fn attestation_statement_validity_seconds(mut self, seconds: i64) -> Self {
        self.attestation_statement_validity_seconds = Some(seconds);
        self
    }

    pub fn enable_software_attestation(mut self, enabled: bool) -> Self {
        self.enable_software_attestation = enabled;
        self
    }

    pub fn enable_nougat_attestation(mut self, enabled: bool) -> Self {
        self.enable_nougat_attestation = enabled;
        self
    }

    pub fn disable_hardware_attestation(mut self, disabled: bool) -> Self {
        self.disable_hardware_attestation = disabled;
        self
    }

    pub fn http_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.http_proxy = Some(proxy.into());
        self
    }

    pub fn build(self) -> Result<AttestationConfig, ConfigurationError> {
        if self.applications.is_empty() {
            return Err(ConfigurationError::EmptyApplications);
        }
        for app in &self.applications {
            if app.package_name.is_empty() {
                return Err(ConfigurationError::EmptyPackageName);
            }
            if app.signature_digests.is_empty() {
                return Err(ConfigurationError::EmptySignatureDigests {
                    package: app.package_name.clone(),
                });
            }
        }

        let hardware_trust_anchors = self
            .hardware_trust_anchors
            .unwrap_or_else(|| anchors::default_hardware_anchors().to_vec());
        let software_trust_anchors = self
            .software_trust_anchors
            .unwrap_or_else(|| anchors::default_software_anchors().to_vec());
        if hardware_trust_anchors.is_empty() && software_trust_anchors.is_empty() {
            return Err(ConfigurationError::NoTrustAnchors);
        }

        let hardware_enabled = !self.disable_hardware_attestation;
        if !hardware_enabled && !self.enable_software_attestation && !self.enable_nougat_attestation
        {
            return Err(ConfigurationError::AllFlavorsDisabled);
        }

        Ok(AttestationConfig {
            applications: self.applications,
            android_version: self.android_version,
            patch_level: self.patch_level,
            require_strong_box: self.require_strong_box,
            allow_bootloader_unlock: self.allow_bootloader_unlock,
            require_rollback_resistance: self.require_rollback_resistance,
            ignore_leaf_validity: self.ignore_leaf_validity,
            hardware_trust_anchors,
            software_trust_anchors,
            verification_seconds_offset: self.verification_seconds_offset,
            attestation_statement_validity_seconds: self.attestation_statement_validity_seconds,
            enable_software_attestation: self.enable_software_attestation,
            enable_nougat_attestation: self.enable_nougat_attestation,
            disable_hardware_attestation: self.disable_hardware_attestation,
            http_proxy: self.http_proxy,
        })
    }
}
