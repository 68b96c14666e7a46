// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Certificate chain model and validation.
//!
//! A chain is validated in four steps: root-against-anchor, revocation list fetch, a pairwise
//! walk verifying every certificate under its issuer's key, and an independent structural pass
//! over the PKIX constraints (CA bit, path length, key usage, name chaining) that the pairwise
//! walk does not look at.

use crate::anchors::{self, TrustAnchor};
use crate::crypto::VerifyingKey;
use crate::errors::{ChainFailure, Error, RevocationReason};
use crate::pem;
use crate::revocation::{RevocationList, StatusListSource};
use ::time::OffsetDateTime;
use x509_parser::prelude::*;

/// An ordered certificate chain, leaf first, owning the DER of every certificate.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateChain {
    ders: Vec<Vec<u8>>,
}

impl CertificateChain {
    /// Build a chain from DER certificates ordered leaf to root. Every certificate has to parse
    /// as X.509; the chain has to be non-empty.
    pub fn from_der_list(ders: Vec<Vec<u8>>) -> Result<Self, Error> {
        let chain = CertificateChain { ders };
        if chain.ders.is_empty() {
            return Err(chain.failure(ChainFailure::Malformed, None));
        }
        for der in &chain.ders {
            if X509Certificate::from_der(der).is_err() {
                return Err(chain.failure(ChainFailure::Malformed, Some(der.clone())));
            }
        }
        Ok(chain)
    }

    /// Build a chain from PEM blocks (or bare base64 bodies) ordered leaf to root.
    pub fn from_pem_list<I, S>(pems: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ders = Vec::new();
        for block in pems {
            match pem::decode(block.as_ref()) {
                Some(der) => ders.push(der),
                None => {
                    return Err(CertificateChain { ders }.failure(ChainFailure::Malformed, None))
                }
            }
        }
        Self::from_der_list(ders)
    }

    pub fn len(&self) -> usize {
        self.ders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ders.is_empty()
    }

    pub fn leaf_der(&self) -> &[u8] {
        &self.ders[0]
    }

    pub fn der_list(&self) -> &[Vec<u8>] {
        &self.ders
    }

    pub fn to_pem_list(&self) -> Vec<String> {
        self.ders
            .iter()
            .map(|der| pem::encode(pem::CERTIFICATE, der))
            .collect()
    }

    pub(crate) fn failure(&self, cause: ChainFailure, certificate: Option<Vec<u8>>) -> Error {
        Error::CertificateInvalid {
            cause,
            chain: self.clone(),
            certificate,
        }
    }
}

impl std::fmt::Debug for CertificateChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let serials: Vec<String> = self
            .ders
            .iter()
            .map(|der| match X509Certificate::from_der(der) {
                Ok((_, cert)) => cert.tbs_certificate.serial.to_str_radix(16),
                Err(_) => "<unparseable>".into(),
            })
            .collect();
        f.debug_struct("CertificateChain")
            .field("length", &self.ders.len())
            .field("serials", &serials)
            .finish()
    }
}

/// Validate the chain against the given anchor set.
pub(crate) fn validate(
    chain: &CertificateChain,
    verification_time: OffsetDateTime,
    trust_anchors: &[TrustAnchor],
    ignore_leaf_validity: bool,
    status: &dyn StatusListSource,
) -> Result<(), Error> {
    let certs = parse_all(chain)?;
    let timestamp = verification_time.unix_timestamp();
    let root_index = certs.len() - 1;
    let root = &certs[root_index];

    // Step 1: the root has to be temporally valid and carry a key from the anchor set. Its
    // signature is verified under the anchor's key, never under whatever the root itself embeds.
    check_validity(chain, root, root_index, timestamp)?;
    let root_spki = root.tbs_certificate.subject_pki.raw;
    let anchor = match trust_anchors.iter().find(|a| a.matches_key(root_spki)) {
        Some(anchor) => anchor,
        None => {
            let cause = match anchors::classify_default(root_spki) {
                Some(stage) => ChainFailure::OtherMatchingRoot { stage },
                None => ChainFailure::NoMatchingRoot,
            };
            return Err(chain.failure(cause, Some(chain.ders[root_index].clone())));
        }
    };
    let anchor_key = VerifyingKey::from_spki_der(anchor.as_spki_der())
        .map_err(|cause| chain.failure(cause, Some(chain.ders[root_index].clone())))?;
    verify_signature(chain, &anchor_key, root, root_index)
        .map_err(|_| chain.failure(ChainFailure::InvalidRoot, Some(chain.ders[root_index].clone())))?;

    // Step 2: fetch the revocation snapshot. An unreachable list fails the verification.
    let revocation = status.fetch()?;
    check_revocation(chain, &revocation, root, root_index)?;

    // Step 3: walk from the root towards the leaf, each certificate verified under its parent.
    for index in (0..root_index).rev() {
        let parent = &certs[index + 1];
        let child = &certs[index];
        let child_is_leaf = index == 0;
        if !(child_is_leaf && ignore_leaf_validity) {
            check_validity(chain, child, index, timestamp)?;
        }
        let parent_key = VerifyingKey::from_spki(&parent.tbs_certificate.subject_pki)
            .map_err(|cause| chain.failure(cause, Some(chain.ders[index + 1].clone())))?;
        verify_signature(chain, &parent_key, child, index)?;
        check_revocation(chain, &revocation, child, index)?;
    }

    // Step 4: independent structural pass. Time has been ruled out above, so anything caught
    // here is a trust failure.
    path_constraints(chain, &certs)?;

    tracing::trace!(length = chain.len(), "certificate chain accepted");
    Ok(())
}

fn parse_all<'a>(chain: &'a CertificateChain) -> Result<Vec<X509Certificate<'a>>, Error> {
    let mut certs = Vec::with_capacity(chain.ders.len());
    for der in &chain.ders {
        let (_, cert) = X509Certificate::from_der(der)
            .map_err(|_| chain.failure(ChainFailure::Malformed, Some(der.clone())))?;
        certs.push(cert);
    }
    Ok(certs)
}

fn check_validity(
    chain: &CertificateChain,
    cert: &X509Certificate<'_>,
    index: usize,
    timestamp: i64,
) -> Result<(), Error> {
    let validity = cert.validity();
    let cause = if timestamp < validity.not_before.timestamp() {
        ChainFailure::NotYetValid
    } else if timestamp > validity.not_after.timestamp() {
        ChainFailure::Expired
    } else {
        return Ok(());
    };
    Err(chain.failure(cause, Some(chain.ders[index].clone())))
}

fn verify_signature(
    chain: &CertificateChain,
    issuer_key: &VerifyingKey,
    cert: &X509Certificate<'_>,
    index: usize,
) -> Result<(), Error> {
    issuer_key
        .verify(
            &cert.signature_algorithm,
            cert.tbs_certificate.as_ref(),
            cert.signature_value.data.as_ref(),
        )
        .map_err(|cause| chain.failure(cause, Some(chain.ders[index].clone())))
}

fn check_revocation(
    chain: &CertificateChain,
    revocation: &RevocationList,
    cert: &X509Certificate<'_>,
    index: usize,
) -> Result<(), Error> {
    let serial = cert.tbs_certificate.serial.to_str_radix(16);
    if revocation.is_revoked(&serial) {
        return Err(Error::Revocation {
            reason: RevocationReason::Revoked { serial },
            chain: Some(chain.clone()),
            certificate: Some(chain.ders[index].clone()),
        });
    }
    Ok(())
}

/// PKIX constraints over the whole path: every issuer must be a CA allowed to sign certificates
/// at its depth, and names must chain. The pairwise walk only proves signatures, so a chain
/// spliced out of legitimate certificates would pass it; this pass catches that.
fn path_constraints(
    chain: &CertificateChain,
    certs: &[X509Certificate<'_>],
) -> Result<(), Error> {
    for (index, cert) in certs.iter().enumerate().skip(1) {
        let constraint_error = |detail: &str| {
            chain.failure(
                ChainFailure::PathConstraint(detail.into()),
                Some(chain.ders[index].clone()),
            )
        };

        match cert.tbs_certificate.basic_constraints() {
            Ok(Some(bc)) => {
                if !bc.value.ca {
                    return Err(constraint_error("issuer is not a CA"));
                }
                // `index - 1` subordinate CAs sit between this issuer and the leaf
                if let Some(max) = bc.value.path_len_constraint {
                    if (index - 1) as u32 > max {
                        return Err(constraint_error("path length constraint exceeded"));
                    }
                }
            }
            Ok(None) => return Err(constraint_error("issuer has no basic constraints")),
            Err(_) => return Err(constraint_error("basic constraints are malformed")),
        }

        match cert.tbs_certificate.key_usage() {
            Ok(Some(usage)) => {
                if !usage.value.key_cert_sign() {
                    return Err(constraint_error("issuer key usage forbids certificate signing"));
                }
            }
            Ok(None) => {}
            Err(_) => return Err(constraint_error("key usage is malformed")),
        }
    }

    for index in 0..certs.len() - 1 {
        let child = &certs[index];
        let parent = &certs[index + 1];
        if child.tbs_certificate.issuer.as_raw() != parent.tbs_certificate.subject.as_raw() {
            return Err(chain.failure(
                ChainFailure::PathConstraint("issuer name does not chain to parent subject".into()),
                Some(chain.ders[index].clone()),
            ));
        }
    }

    Ok(())
}
