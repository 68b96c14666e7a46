#![cfg_attr(docsrs, feature(doc_auto_cfg))]

// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-side verification of Android Key Attestation.
//!
//! Given the certificate chain an Android Keystore emits when a key pair is generated with an
//! attestation challenge, this crate decides whether the chain terminates at a trusted root, no
//! certificate is revoked, and the leaf's key description satisfies the configured policy
//! (application identity, device integrity, OS version and patch level, security level) with
//! the expected challenge bound in.
//!
//! ```no_run
//! use droidtrust::{AppData, AttestationConfig, CertificateChain, Verifier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AttestationConfig::builder()
//!     .add_application(AppData::new("com.example.app", vec![vec![0u8; 32]])?)
//!     .android_version(110000)
//!     .build()?;
//! let verifier = Verifier::new(config)?;
//!
//! let chain = CertificateChain::from_pem_list(["...leaf...", "...root..."])?;
//! let record = verifier.verify(&chain, time::OffsetDateTime::now_utc(), b"challenge")?;
//! println!("attested at {:?}", record.attestation_security_level);
//! # Ok(())
//! # }
//! ```

pub mod anchors;
pub mod chain;
pub mod config;
mod crypto;
pub mod envelope;
pub mod errors;
pub mod key_description;
mod pem;
pub mod revocation;
mod serde_pem;
#[cfg(test)]
mod test_utils;
pub mod verifier;

pub use anchors::TrustAnchor;
pub use chain::CertificateChain;
pub use config::{AppData, AttestationConfig, PatchLevel, YearMonth};
pub use envelope::DebugEnvelope;
pub use errors::Error;
pub use key_description::{KeyDescription, SecurityLevel, VerifiedBootState};
pub use revocation::{RevocationList, RevocationListClient, StatusListSource};
pub use verifier::{Engine, EngineKind, Verifier};
