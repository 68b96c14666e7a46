// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::chain::CertificateChain;
use serde::{Deserialize, Serialize};

/// We're using a custom error enum instead of `Box<dyn Error>` or one of the crates providing a
/// `Box<dyn Error>` wrapper because callers dispatch on the exact failure: the taxonomy is closed,
/// and every rejection an engine can produce is one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("certificate chain rejected ({}): {cause}", cause.reason())]
    CertificateInvalid {
        cause: ChainFailure,
        /// The full chain under scrutiny, leaf first.
        chain: CertificateChain,
        /// DER of the offending certificate, when one could be singled out.
        certificate: Option<Vec<u8>>,
    },

    #[error("revocation check failed: {reason}")]
    Revocation {
        reason: RevocationReason,
        chain: Option<CertificateChain>,
        /// DER of the revoked certificate, for `Revoked`.
        certificate: Option<Vec<u8>>,
    },

    #[error("attestation rejected by policy ({reason}): expected {expected}, got {actual}")]
    AttestationValue {
        reason: ValueReason,
        expected: String,
        actual: String,
    },

    #[error("invalid configuration")]
    Configuration(#[from] ConfigurationError),
}

impl Error {
    pub(crate) fn value(reason: ValueReason, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::AttestationValue {
            reason,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Two failures are equivalent iff they share the variant, the reason, and (for chain and
/// revocation errors) the offending certificate. The chain itself and human-readable detail are
/// diagnostics and do not participate.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Error::CertificateInvalid { cause: c1, certificate: k1, .. },
                Error::CertificateInvalid { cause: c2, certificate: k2, .. },
            ) => c1.reason() == c2.reason() && k1 == k2,
            (
                Error::Revocation { reason: r1, certificate: k1, .. },
                Error::Revocation { reason: r2, certificate: k2, .. },
            ) => r1 == r2 && k1 == k2,
            (
                Error::AttestationValue { reason: r1, .. },
                Error::AttestationValue { reason: r2, .. },
            ) => r1 == r2,
            (Error::Configuration(a), Error::Configuration(b)) => a == b,
            _ => false,
        }
    }
}

/// What went wrong while validating the certificate chain. Each cause maps onto one of the two
/// coarse reasons ([`CertificateReason::Trust`] or [`CertificateReason::Time`]).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainFailure {
    #[error("the root certificate matches none of the configured trust anchors")]
    NoMatchingRoot,
    #[error("the root certificate matches a default {stage} anchor instead of the configured set")]
    OtherMatchingRoot { stage: AnchorStage },
    #[error("the root certificate's signature does not verify under the matching anchor")]
    InvalidRoot,
    #[error("certificate is not yet valid at the verification time")]
    NotYetValid,
    #[error("certificate is expired at the verification time")]
    Expired,
    #[error("certificate signature does not verify under its issuer's public key")]
    BadSignature,
    #[error("path validation constraint violated: {0}")]
    PathConstraint(String),
    #[error("certificate is not parseable as DER X.509")]
    Malformed,
    #[error("unsupported signature or public key algorithm")]
    UnsupportedAlgorithm,
    #[error("the leaf carries no Android key attestation extension")]
    MissingAttestationExtension,
    #[error("the Android key attestation extension is malformed: {0}")]
    MalformedKeyDescription(String),
}

impl ChainFailure {
    pub fn reason(&self) -> CertificateReason {
        match self {
            ChainFailure::NotYetValid | ChainFailure::Expired => CertificateReason::Time,
            _ => CertificateReason::Trust,
        }
    }
}

/// Coarse classification of a chain rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateReason {
    Trust,
    Time,
}

impl std::fmt::Display for CertificateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CertificateReason::Trust => f.write_str("TRUST"),
            CertificateReason::Time => f.write_str("TIME"),
        }
    }
}

/// Which default anchor category a mis-rooted chain actually matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnchorStage {
    Hardware,
    Software,
}

impl std::fmt::Display for AnchorStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnchorStage::Hardware => f.write_str("hardware"),
            AnchorStage::Software => f.write_str("software"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RevocationReason {
    #[error("the revocation list could not be fetched: {0}")]
    ListUnavailable(String),
    #[error("certificate with serial {serial} is on the revocation list")]
    Revoked { serial: String },
}

/// Transport detail of `ListUnavailable` is not part of a failure's identity.
impl PartialEq for RevocationReason {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RevocationReason::ListUnavailable(_), RevocationReason::ListUnavailable(_)) => true,
            (RevocationReason::Revoked { serial: a }, RevocationReason::Revoked { serial: b }) => a == b,
            _ => false,
        }
    }
}

/// Policy rejections of the decoded key description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReason {
    SystemIntegrity,
    AppSignerDigest,
    PackageName,
    AppVersion,
    AppUnexpected,
    OsVersion,
    RollbackResistance,
    Challenge,
    SecLevel,
    Time,
}

impl std::fmt::Display for ValueReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ValueReason::SystemIntegrity => "SYSTEM_INTEGRITY",
            ValueReason::AppSignerDigest => "APP_SIGNER_DIGEST",
            ValueReason::PackageName => "PACKAGE_NAME",
            ValueReason::AppVersion => "APP_VERSION",
            ValueReason::AppUnexpected => "APP_UNEXPECTED",
            ValueReason::OsVersion => "OS_VERSION",
            ValueReason::RollbackResistance => "ROLLBACK_RESISTANCE",
            ValueReason::Challenge => "CHALLENGE",
            ValueReason::SecLevel => "SEC_LEVEL",
            ValueReason::Time => "TIME",
        };
        f.write_str(s)
    }
}

/// Construction-time failures. These are raised while building an [`AttestationConfig`] or an
/// engine, never during a verification.
///
/// [`AttestationConfig`]: crate::config::AttestationConfig
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("the configuration needs at least one application")]
    EmptyApplications,
    #[error("application {package} has no signature digests")]
    EmptySignatureDigests { package: String },
    #[error("application package names must not be empty")]
    EmptyPackageName,
    #[error("both trust anchor sets are empty")]
    NoTrustAnchors,
    #[error("every attestation flavor is disabled")]
    AllFlavorsDisabled,
    #[error("the {flavor} engine is disabled by the configuration")]
    FlavorDisabled { flavor: &'static str },
    #[error("the {flavor} engine has no trust anchors to validate against")]
    NoAnchorsForFlavor { flavor: &'static str },
    #[error("{value} does not encode a calendar month")]
    InvalidPatchLevel { value: i64 },
    #[error("the proxy URL is not valid: {0}")]
    InvalidProxy(String),
    #[error("the HTTP client could not be built: {0}")]
    HttpClient(String),
}
