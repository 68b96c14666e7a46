// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoding of the Google key attestation extension (OID 1.3.6.1.4.1.11129.2.1.17) on the leaf
//! certificate into an owned record. Callers never look at the raw DER again: everything the
//! policy consults is surfaced here, absence stays absence.

pub(crate) mod asn;

use crate::config::YearMonth;
use crate::errors::ChainFailure;
use serde::{Deserialize, Serialize};
use ::time::OffsetDateTime;
use x509_parser::der_parser::asn1_rs::oid;
use x509_parser::prelude::*;

/// Where a key (and its attestation) lives. Wire values 0, 1, 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityLevel {
    Software,
    TrustedEnvironment,
    StrongBox,
}

impl SecurityLevel {
    fn from_wire(value: u32) -> Result<Self, ChainFailure> {
        match value {
            0 => Ok(SecurityLevel::Software),
            1 => Ok(SecurityLevel::TrustedEnvironment),
            2 => Ok(SecurityLevel::StrongBox),
            other => Err(ChainFailure::MalformedKeyDescription(format!(
                "unknown security level {other}"
            ))),
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityLevel::Software => f.write_str("SOFTWARE"),
            SecurityLevel::TrustedEnvironment => f.write_str("TRUSTED_ENVIRONMENT"),
            SecurityLevel::StrongBox => f.write_str("STRONG_BOX"),
        }
    }
}

/// The device-measured boot state. Wire values 0 through 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerifiedBootState {
    Verified,
    SelfSigned,
    Unverified,
    Failed,
}

impl VerifiedBootState {
    fn from_wire(value: u32) -> Result<Self, ChainFailure> {
        match value {
            0 => Ok(VerifiedBootState::Verified),
            1 => Ok(VerifiedBootState::SelfSigned),
            2 => Ok(VerifiedBootState::Unverified),
            3 => Ok(VerifiedBootState::Failed),
            other => Err(ChainFailure::MalformedKeyDescription(format!(
                "unknown verified boot state {other}"
            ))),
        }
    }
}

/// The decoded attestation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDescription {
    pub attestation_version: i64,
    pub attestation_security_level: SecurityLevel,
    pub keymaster_version: i64,
    pub keymaster_security_level: SecurityLevel,
    #[serde(with = "serde_bytes_b64")]
    pub attestation_challenge: Vec<u8>,
    #[serde(with = "serde_bytes_b64")]
    pub unique_id: Vec<u8>,
    pub software_enforced: AuthorizationList,
    pub tee_enforced: AuthorizationList,
}

/// The authorization entries the policy consults. Every field is presence-by-tag; `None` means
/// the attestation did not carry the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationList {
    pub key_size: Option<i64>,
    /// Presence-as-true: either the KeyMint tag (303) or the Keymaster one (703).
    pub rollback_resistance: bool,
    #[serde(default, with = "::time::serde::rfc3339::option")]
    pub creation_date_time: Option<OffsetDateTime>,
    pub root_of_trust: Option<RootOfTrust>,
    pub os_version: Option<i64>,
    pub os_patch_level: Option<YearMonth>,
    pub attestation_application_id: Option<AttestationApplicationId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootOfTrust {
    #[serde(with = "serde_bytes_b64")]
    pub verified_boot_key: Vec<u8>,
    pub device_locked: bool,
    /// Treated as [`VerifiedBootState::Failed`] when the attestation omits the field.
    pub verified_boot_state: VerifiedBootState,
    #[serde(default)]
    pub verified_boot_hash: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationApplicationId {
    pub package_infos: Vec<PackageInfo>,
    pub signature_digests: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub package_name: String,
    pub version: i64,
}

mod serde_bytes_b64 {
    use base64::Engine;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(value))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(raw)
            .map_err(D::Error::custom)
    }
}

/// Locate and decode the attestation extension on the leaf certificate.
pub(crate) fn decode_from_leaf(leaf_der: &[u8]) -> Result<KeyDescription, ChainFailure> {
    let (_, cert) = X509Certificate::from_der(leaf_der).map_err(|_| ChainFailure::Malformed)?;
    let extension = cert
        .get_extension_unique(&oid!(1.3.6.1.4.1.11129.2.1.17))
        .map_err(|_| ChainFailure::Malformed)?
        .ok_or(ChainFailure::MissingAttestationExtension)?;
    decode(extension.value)
}

/// Decode the raw extension payload.
pub(crate) fn decode(data: &[u8]) -> Result<KeyDescription, ChainFailure> {
    let raw = asn1::parse_single::<asn::KeyDescription>(data)
        .map_err(|e| ChainFailure::MalformedKeyDescription(format!("{e:?}")))?;

    Ok(KeyDescription {
        attestation_version: raw.attestation_version,
        attestation_security_level: SecurityLevel::from_wire(
            raw.attestation_security_level.value(),
        )?,
        keymaster_version: raw.keymaster_version,
        keymaster_security_level: SecurityLevel::from_wire(raw.keymaster_security_level.value())?,
        attestation_challenge: raw.attestation_challenge.to_vec(),
        unique_id: raw.unique_id.to_vec(),
        software_enforced: convert_authorization_list(raw.software_enforced)?,
        tee_enforced: convert_authorization_list(raw.tee_enforced)?,
    })
}

fn convert_authorization_list(
    raw: asn::AuthorizationList<'_>,
) -> Result<AuthorizationList, ChainFailure> {
    let creation_date_time = raw
        .creation_date_time
        .map(|millis| {
            OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).map_err(|_| {
                ChainFailure::MalformedKeyDescription(format!(
                    "creation time {millis} out of range"
                ))
            })
        })
        .transpose()?;

    let os_patch_level = raw
        .os_patch_level
        .map(|encoded| {
            YearMonth::from_encoded(encoded).ok_or_else(|| {
                ChainFailure::MalformedKeyDescription(format!(
                    "os patch level {encoded} is not yyyymm"
                ))
            })
        })
        .transpose()?;

    let root_of_trust = raw.root_of_trust.map(convert_root_of_trust).transpose()?;

    let attestation_application_id = raw
        .attestation_application_id
        .map(convert_attestation_application_id)
        .transpose()?;

    Ok(AuthorizationList {
        key_size: raw.key_size,
        rollback_resistance: raw.rollback_resistance.is_some() || raw.rollback_resistant.is_some(),
        creation_date_time,
        root_of_trust,
        os_version: raw.os_version,
        os_patch_level,
        attestation_application_id,
    })
}

fn convert_root_of_trust(raw: asn::RootOfTrust<'_>) -> Result<RootOfTrust, ChainFailure> {
    let verified_boot_state = match raw.verified_boot_state {
        Some(state) => VerifiedBootState::from_wire(state.value())?,
        None => VerifiedBootState::Failed,
    };
    Ok(RootOfTrust {
        verified_boot_key: raw.verified_boot_key.to_vec(),
        device_locked: raw.device_locked,
        verified_boot_state,
        verified_boot_hash: raw.verified_boot_hash.map(<[u8]>::to_vec),
    })
}

fn convert_attestation_application_id(
    octets: &[u8],
) -> Result<AttestationApplicationId, ChainFailure> {
    let raw = asn1::parse_single::<asn::AttestationApplicationId>(octets)
        .map_err(|e| ChainFailure::MalformedKeyDescription(format!("application id: {e:?}")))?;

    let mut package_infos = Vec::new();
    for info in raw.package_infos {
        package_infos.push(PackageInfo {
            package_name: String::from_utf8(info.package_name.to_vec()).map_err(|_| {
                ChainFailure::MalformedKeyDescription("package name is not UTF-8".into())
            })?,
            version: info.version,
        });
    }
    let signature_digests = raw.signature_digests.map(<[u8]>::to_vec).collect();

    Ok(AttestationApplicationId {
        package_infos,
        signature_digests,
    })
}
