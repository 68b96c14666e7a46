// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Public key parsing and signature verification for the certificate chain walk.
//!
//! Attestation chains mix RSA and ECDSA freely, including the StrongBox quirk of ECDSA-SHA256
//! signatures issued under P-384 keys, so ECDSA is verified against the prehash rather than
//! through a curve-fixed digest pairing.

use crate::errors::ChainFailure;
use p256::ecdsa::signature::hazmat::PrehashVerifier;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::signature::Verifier;
use sha2::{Digest, Sha256, Sha384};
use x509_parser::der_parser::asn1_rs::oid;
use x509_parser::prelude::*;

/// A parsed chain-validation key.
#[derive(Clone)]
pub(crate) enum VerifyingKey {
    Rsa(rsa::RsaPublicKey),
    EcP256(p256::ecdsa::VerifyingKey),
    EcP384(p384::ecdsa::VerifyingKey),
}

/// Which digest a signature algorithm pairs with.
enum SignatureDigest {
    Sha256,
    Sha384,
}

impl VerifyingKey {
    /// Parse a SubjectPublicKeyInfo DER blob (a trust anchor, or a certificate's embedded key).
    pub(crate) fn from_spki_der(der: &[u8]) -> Result<Self, ChainFailure> {
        let (_, spki) =
            SubjectPublicKeyInfo::from_der(der).map_err(|_| ChainFailure::Malformed)?;
        Self::from_spki(&spki)
    }

    pub(crate) fn from_spki(spki: &SubjectPublicKeyInfo<'_>) -> Result<Self, ChainFailure> {
        let key_bytes = spki.subject_public_key.data.as_ref();
        if spki.algorithm.algorithm == oid!(1.2.840.113549.1.1.1) {
            let key = rsa::RsaPublicKey::from_pkcs1_der(key_bytes)
                .map_err(|_| ChainFailure::Malformed)?;
            Ok(VerifyingKey::Rsa(key))
        } else if spki.algorithm.algorithm == oid!(1.2.840.10045.2.1) {
            let curve = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.as_oid().ok())
                .ok_or(ChainFailure::UnsupportedAlgorithm)?;
            if curve == oid!(1.2.840.10045.3.1.7) {
                let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(key_bytes)
                    .map_err(|_| ChainFailure::Malformed)?;
                Ok(VerifyingKey::EcP256(key))
            } else if curve == oid!(1.3.132.0.34) {
                let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(key_bytes)
                    .map_err(|_| ChainFailure::Malformed)?;
                Ok(VerifyingKey::EcP384(key))
            } else {
                Err(ChainFailure::UnsupportedAlgorithm)
            }
        } else {
            Err(ChainFailure::UnsupportedAlgorithm)
        }
    }

    /// Verify `signature` over `message` where `algorithm` is the certificate's declared
    /// signature algorithm.
    pub(crate) fn verify(
        &self,
        algorithm: &AlgorithmIdentifier<'_>,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), ChainFailure> {
        let digest = if algorithm.algorithm == oid!(1.2.840.113549.1.1.11)
            || algorithm.algorithm == oid!(1.2.840.10045.4.3.2)
        {
            SignatureDigest::Sha256
        } else if algorithm.algorithm == oid!(1.2.840.113549.1.1.12)
            || algorithm.algorithm == oid!(1.2.840.10045.4.3.3)
        {
            SignatureDigest::Sha384
        } else {
            return Err(ChainFailure::UnsupportedAlgorithm);
        };

        match self {
            VerifyingKey::Rsa(key) => {
                let signature = rsa::pkcs1v15::Signature::try_from(signature)
                    .map_err(|_| ChainFailure::BadSignature)?;
                let verified = match digest {
                    SignatureDigest::Sha256 => {
                        rsa::pkcs1v15::VerifyingKey::<Sha256>::new(key.clone())
                            .verify(message, &signature)
                    }
                    SignatureDigest::Sha384 => {
                        rsa::pkcs1v15::VerifyingKey::<Sha384>::new(key.clone())
                            .verify(message, &signature)
                    }
                };
                verified.map_err(|_| ChainFailure::BadSignature)
            }
            VerifyingKey::EcP256(key) => {
                let signature = p256::ecdsa::Signature::from_der(signature)
                    .map_err(|_| ChainFailure::BadSignature)?;
                key.verify_prehash(&prehash(digest, message), &signature)
                    .map_err(|_| ChainFailure::BadSignature)
            }
            VerifyingKey::EcP384(key) => {
                let signature = p384::ecdsa::Signature::from_der(signature)
                    .map_err(|_| ChainFailure::BadSignature)?;
                key.verify_prehash(&prehash(digest, message), &signature)
                    .map_err(|_| ChainFailure::BadSignature)
            }
        }
    }
}

fn prehash(digest: SignatureDigest, message: &[u8]) -> Vec<u8> {
    match digest {
        SignatureDigest::Sha256 => Sha256::digest(message).to_vec(),
        SignatureDigest::Sha384 => Sha384::digest(message).to_vec(),
    }
}
