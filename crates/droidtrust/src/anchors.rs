// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trust anchors are bare SubjectPublicKeyInfo blobs, not certificates: a chain's root is
//! accepted by comparing its public key byte-for-byte against an anchor, and the root signature
//! is then verified under the anchor's key rather than whatever the root embeds.

use crate::errors::AnchorStage;
use crate::pem;
use base64::Engine;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A single trusted public key, SubjectPublicKeyInfo-encoded.
///
/// Equality is byte-exact on the DER encoding; two logically identical keys with different
/// encodings are different anchors.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustAnchor(#[serde(with = "crate::serde_pem")] Vec<u8>);

impl TrustAnchor {
    /// Build an anchor from raw SubjectPublicKeyInfo DER.
    pub fn from_spki_der(der: impl Into<Vec<u8>>) -> Self {
        TrustAnchor(der.into())
    }

    /// Build an anchor from a PEM `PUBLIC KEY` block or bare base64.
    pub fn from_pem(pem: &str) -> Option<Self> {
        pem::decode(pem).map(TrustAnchor)
    }

    pub fn as_spki_der(&self) -> &[u8] {
        &self.0
    }

    pub fn to_pem(&self) -> String {
        pem::encode(pem::PUBLIC_KEY, &self.0)
    }

    pub(crate) fn matches_key(&self, spki_der: &[u8]) -> bool {
        self.0 == spki_der
    }
}

impl std::fmt::Debug for TrustAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TrustAnchor")
            .field(&base64::engine::general_purpose::STANDARD.encode(&self.0))
            .finish()
    }
}

/// The Google hardware attestation root key (RSA-4096), distributed with AOSP. Every
/// hardware-backed production chain terminates in a certificate carrying this key.
const GOOGLE_HARDWARE_ROOT_B64: &str = "MIICIjANBgkqhkiG9w0BAQEFAAOCAg8AMIICCgKCAgEA\
r7bHgiuxpwHsK7Qui8xUFmOr75gvMsd/dTEDDJdSSxtf6An7xyqpRR90PL2abxM1dEqlXnf2tqw1Ne4Xwl5jlRfdnJLmN0pT\
y/4lj4/7tv0Sk3iiKkypnEUtR6WfMgH0QZfKHM1+di+y9TFRtv6y//0rb+T+W8a9nsNL/ggjnar86461qO0rOs2cXjp3kOG1\
FEJ5MVmFmBGtnrKpa73XpXyTqRxB/M0n1n/W9nGqC4FSYa04T6N5RIZGBN2z2MT5IKGbFlbC8UrW0DxW7AYImQQcHtGl/m00\
QLVWutHQoVJYnFPlXTcHYvASLu+RhhsbDmxMgJJ0mcDpvsC4PjvB+TxywElgS70vE0XmLD+OJtvsBslHZvPBKCOdT0MS+tgS\
OIfga+z1Z1g7+DVagf7quvmag8jfPioyKvxnK/EgsTUVi2ghzq8wm27ud/mIM7AY2qEORR8Go3TVB4HzWQgpZrt3i5MIlCaY\
504LzSRiigHCzAPlHws+W0rB5N+er5/2pJKnfBSDiCiFAVtCLOZ7gLiMm0jhO2B6tUXHI/+MRPjy02i59lINMRRev56GKtcd\
9qO/0kUJWdZTdA2XoS82ixPvZtXQpUpuL12ab+9EaDK8Z4RHJYYfCT3Q5vNAXaiWQ+8PTWm2QgBR/bkwSWc+NpUFgNPN9PvQ\
i8WEg5UmAGMCAwEAAQ==";

/// The Google software attestation root key (EC P-256), published by AOSP. Emulators and
/// software-keymaster devices chain to a certificate carrying this key.
///
/// AOSP also publishes a software attestation RSA root; it is not bundled here, so deployments
/// that accept chains rooted there append it through the config builder's
/// `software_trust_anchors`.
const GOOGLE_SOFTWARE_ROOT_EC_B64: &str = "MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE\
7l1ex+HA220Dpn7mthvsTWpdamguD/9/SQ59dx9EIm29sa/6FsvHrcV30lacqrewLVQBXT5DKyqO107sSHVBpA==";

static HARDWARE_DEFAULTS: Lazy<Vec<TrustAnchor>> = Lazy::new(|| {
    vec![decode_builtin(GOOGLE_HARDWARE_ROOT_B64)]
});

static SOFTWARE_DEFAULTS: Lazy<Vec<TrustAnchor>> = Lazy::new(|| {
    vec![decode_builtin(GOOGLE_SOFTWARE_ROOT_EC_B64)]
});

fn decode_builtin(b64: &str) -> TrustAnchor {
    // the constants above are compiled in; a decode failure is a build defect, not runtime input
    TrustAnchor(
        base64::engine::general_purpose::STANDARD
            .decode(b64)
            .expect("builtin anchor is valid base64"),
    )
}

/// The bundled Google hardware attestation anchors.
pub fn default_hardware_anchors() -> &'static [TrustAnchor] {
    &HARDWARE_DEFAULTS
}

/// The bundled Google software attestation anchors.
pub fn default_software_anchors() -> &'static [TrustAnchor] {
    &SOFTWARE_DEFAULTS
}

/// Check whether a root public key that failed anchor selection is one of the bundled defaults,
/// so operators can tell a mis-categorised chain (hardware chain against a software engine, or
/// vice versa) apart from a genuinely unknown root.
pub(crate) fn classify_default(spki_der: &[u8]) -> Option<AnchorStage> {
    if HARDWARE_DEFAULTS.iter().any(|a| a.matches_key(spki_der)) {
        Some(AnchorStage::Hardware)
    } else if SOFTWARE_DEFAULTS.iter().any(|a| a.matches_key(spki_der)) {
        Some(AnchorStage::Software)
    } else {
        None
    }
}
