// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Borrowed ASN.1 structures for the Android key attestation extension, mirroring the AOSP
//! schema. Every context tag the schema has ever defined (Keymaster 1 through KeyMint 300) is
//! listed so that an attestation from any shipping version parses; fields the policy does not
//! consult are decoded and then ignored.
//!
//! See the AOSP certificate schema:
//! <https://source.android.com/docs/security/features/keystore/attestation#schema>

use asn1::{Asn1Read, Asn1Write, Enumerated, Null, SetOf};

/// `KeyDescription ::= SEQUENCE { ... }`, the payload of extension OID
/// 1.3.6.1.4.1.11129.2.1.17.
#[derive(Asn1Read, Asn1Write)]
pub struct KeyDescription<'a> {
    pub attestation_version: i64,
    pub attestation_security_level: SecurityLevel,
    pub keymaster_version: i64,
    pub keymaster_security_level: SecurityLevel,
    pub attestation_challenge: &'a [u8],
    pub unique_id: &'a [u8],
    pub software_enforced: AuthorizationList<'a>,
    pub tee_enforced: AuthorizationList<'a>,
}

/// One of Software (0), TrustedEnvironment (1), StrongBox (2).
pub type SecurityLevel = Enumerated;

/// `AuthorizationList ::= SEQUENCE { ... }` of EXPLICIT context-tagged optionals, in ascending
/// tag order. Absence of a field is meaningful and never replaced by a default.
#[derive(Asn1Read, Asn1Write)]
pub struct AuthorizationList<'a> {
    #[explicit(1)]
    pub purpose: Option<SetOf<'a, i64>>,
    #[explicit(2)]
    pub algorithm: Option<i64>,
    #[explicit(3)]
    pub key_size: Option<i64>,
    #[explicit(5)]
    pub digest: Option<SetOf<'a, i64>>,
    #[explicit(6)]
    pub padding: Option<SetOf<'a, i64>>,
    #[explicit(10)]
    pub ec_curve: Option<i64>,
    #[explicit(200)]
    pub rsa_public_exponent: Option<i64>,
    #[explicit(203)]
    pub mgf_digest: Option<SetOf<'a, i64>>,
    #[explicit(303)]
    pub rollback_resistance: Option<Null>,
    #[explicit(305)]
    pub early_boot_only: Option<Null>,
    #[explicit(400)]
    pub active_date_time: Option<i64>,
    #[explicit(401)]
    pub origination_expire_date_time: Option<i64>,
    #[explicit(402)]
    pub usage_expire_date_time: Option<i64>,
    #[explicit(405)]
    pub usage_count_limit: Option<i64>,
    #[explicit(503)]
    pub no_auth_required: Option<Null>,
    #[explicit(504)]
    pub user_auth_type: Option<i64>,
    #[explicit(505)]
    pub auth_timeout: Option<i64>,
    #[explicit(506)]
    pub allow_while_on_body: Option<Null>,
    #[explicit(507)]
    pub trusted_user_presence_required: Option<Null>,
    #[explicit(508)]
    pub trusted_confirmation_required: Option<Null>,
    #[explicit(509)]
    pub unlocked_device_required: Option<Null>,
    // 600/601 only appear in Keymaster 1-2 attestations
    #[explicit(600)]
    pub all_applications: Option<Null>,
    #[explicit(601)]
    pub application_id: Option<&'a [u8]>,
    #[explicit(701)]
    pub creation_date_time: Option<i64>,
    #[explicit(702)]
    pub origin: Option<i64>,
    // 703 is the Keymaster 2-3 spelling of rollback protection, 303 the KeyMint one
    #[explicit(703)]
    pub rollback_resistant: Option<Null>,
    #[explicit(704)]
    pub root_of_trust: Option<RootOfTrust<'a>>,
    #[explicit(705)]
    pub os_version: Option<i64>,
    #[explicit(706)]
    pub os_patch_level: Option<i64>,
    /// An OCTET STRING wrapping a DER [`AttestationApplicationId`].
    #[explicit(709)]
    pub attestation_application_id: Option<&'a [u8]>,
    #[explicit(710)]
    pub attestation_id_brand: Option<&'a [u8]>,
    #[explicit(711)]
    pub attestation_id_device: Option<&'a [u8]>,
    #[explicit(712)]
    pub attestation_id_product: Option<&'a [u8]>,
    #[explicit(713)]
    pub attestation_id_serial: Option<&'a [u8]>,
    #[explicit(714)]
    pub attestation_id_imei: Option<&'a [u8]>,
    #[explicit(715)]
    pub attestation_id_meid: Option<&'a [u8]>,
    #[explicit(716)]
    pub attestation_id_manufacturer: Option<&'a [u8]>,
    #[explicit(717)]
    pub attestation_id_model: Option<&'a [u8]>,
    #[explicit(718)]
    pub vendor_patch_level: Option<i64>,
    #[explicit(719)]
    pub boot_patch_level: Option<i64>,
    #[explicit(720)]
    pub device_unique_attestation: Option<Null>,
    #[explicit(723)]
    pub attestation_id_second_imei: Option<&'a [u8]>,
    #[explicit(724)]
    pub module_hash: Option<&'a [u8]>,
}

/// `RootOfTrust ::= SEQUENCE { ... }`. The boot state and hash are absent on the oldest
/// Keymaster versions.
#[derive(Asn1Read, Asn1Write)]
pub struct RootOfTrust<'a> {
    pub verified_boot_key: &'a [u8],
    pub device_locked: bool,
    pub verified_boot_state: Option<VerifiedBootState>,
    pub verified_boot_hash: Option<&'a [u8]>,
}

/// One of Verified (0), SelfSigned (1), Unverified (2), Failed (3).
pub type VerifiedBootState = Enumerated;

/// The DER payload of the `attestationApplicationId` entry, assembled by the platform rather
/// than the Keymaster: the calling packages and their signing certificate digests.
#[derive(Asn1Read, Asn1Write)]
pub struct AttestationApplicationId<'a> {
    pub package_infos: SetOf<'a, AttestationPackageInfo<'a>>,
    pub signature_digests: SetOf<'a, &'a [u8]>,
}

#[derive(Asn1Read, Asn1Write)]
pub struct AttestationPackageInfo<'a> {
    pub package_name: &'a [u8],
    pub version: i64,
}
