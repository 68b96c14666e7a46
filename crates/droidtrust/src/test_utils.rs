// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test fixtures: captured production chains (a Pixel StrongBox chain and a Samsung TEE chain,
//! both rooting at the Google hardware attestation key) and a builder producing synthetic
//! attestation chains signed with throwaway P-256 keys, for the scenarios no capture covers.

use crate::anchors::TrustAnchor;
use crate::chain::CertificateChain;
use crate::key_description::asn;
use asn1::{oid, Asn1Write, BitString, ObjectIdentifier, PrintableString, SequenceOfWriter, SetOfWriter};
use p256::ecdsa::signature::Signer;
use p256::ecdsa::SigningKey;
use rand_core::OsRng;
use time::macros::datetime;
use time::OffsetDateTime;

/// Inside every certificate validity window of both captured chains.
pub(crate) const VERIFICATION_TIME: OffsetDateTime = datetime!(2023-04-14 14:31:42 UTC);

/// The challenge the Pixel capture was generated with.
pub(crate) const PIXEL_CHALLENGE: &[u8] = b"testasdf";

/// The APK signer digest attested in both captures.
pub(crate) const PIXEL_SIGNER_DIGEST: [u8; 32] = [
    0xbd, 0xcb, 0x45, 0x60, 0xf6, 0xb3, 0xc4, 0x1d, 0xad, 0x92, 0x06, 0x68, 0x16, 0x9c, 0x28,
    0xbe, 0x1e, 0xf9, 0xea, 0x49, 0xf2, 0x3d, 0x98, 0xcd, 0x8e, 0xb2, 0xf3, 0x7a, 0xe4, 0x48,
    0x8f, 0xf9,
];

pub(crate) const PIXEL_ATTESTED_PACKAGE: &str = "com.ubinetic.attested.executor.test.testnet";

pub(crate) fn pixel_chain() -> CertificateChain {
    CertificateChain::from_pem_list([
        PIXEL_KEY_CERT,
        PIXEL_INTERMEDIATE_1_CERT,
        PIXEL_INTERMEDIATE_2_CERT,
        PIXEL_ROOT_CERT,
    ])
    .unwrap()
}

/// The Pixel chain with one bit of the leaf signature flipped.
pub(crate) fn pixel_chain_tampered() -> CertificateChain {
    CertificateChain::from_pem_list([
        PIXEL_KEY_CERT_INVALID,
        PIXEL_INTERMEDIATE_1_CERT,
        PIXEL_INTERMEDIATE_2_CERT,
        PIXEL_ROOT_CERT,
    ])
    .unwrap()
}

pub(crate) fn samsung_chain() -> CertificateChain {
    CertificateChain::from_pem_list([
        SAMSUNG_KEY_CERT,
        SAMSUNG_INTERMEDIATE_1_CERT,
        SAMSUNG_INTERMEDIATE_2_CERT,
        SAMSUNG_ROOT_CERT,
    ])
    .unwrap()
}

/// Both captured chains root at the bundled Google hardware key.
pub(crate) fn pixel_root_anchor() -> TrustAnchor {
    crate::anchors::default_hardware_anchors()[0].clone()
}

pub(crate) fn samsung_root_anchor() -> TrustAnchor {
    crate::anchors::default_hardware_anchors()[0].clone()
}

// ---------------------------------------------------------------------------
// Synthetic chains
// ---------------------------------------------------------------------------

/// What the synthetic leaf should attest. Field placement follows the platform: the application
/// id and creation time are platform-asserted (software list), while the device claims land in
/// the tee list unless the keymaster itself is software.
pub(crate) struct FakeAttestation {
    pub challenge: Vec<u8>,
    pub attestation_security_level: u32,
    pub keymaster_security_level: u32,
    pub package_name: String,
    pub package_version: i64,
    pub signature_digest: Vec<u8>,
    pub creation_ms: Option<i64>,
    pub os_version: Option<i64>,
    pub os_patch_level: Option<i64>,
    pub rollback_resistance: bool,
    /// `(device_locked, verified_boot_state)`
    pub root_of_trust: Option<(bool, u32)>,
}

impl Default for FakeAttestation {
    fn default() -> Self {
        FakeAttestation {
            challenge: b"fake-challenge".to_vec(),
            attestation_security_level: 1,
            keymaster_security_level: 1,
            package_name: "com.example.fake".into(),
            package_version: 1,
            signature_digest: vec![0xaa; 32],
            // a couple of weeks before VERIFICATION_TIME
            creation_ms: Some(1_680_300_000_000),
            os_version: Some(120000),
            os_patch_level: Some(202303),
            rollback_resistance: false,
            root_of_trust: Some((true, 0)),
        }
    }
}

/// Build a two-certificate chain (self-signed CA root, attestation leaf) carrying the given key
/// description, along with the anchor matching the root's key.
pub(crate) fn build_fake_attestation(spec: &FakeAttestation) -> (CertificateChain, TrustAnchor) {
    let root_key = SigningKey::random(&mut OsRng);
    let leaf_key = SigningKey::random(&mut OsRng);
    let root_point = root_key.verifying_key().to_encoded_point(false);
    let leaf_point = leaf_key.verifying_key().to_encoded_point(false);

    // attestationApplicationId payload
    let package_info = AaidPackageWriter {
        package_name: spec.package_name.as_bytes(),
        version: spec.package_version,
    };
    let digests: Vec<&[u8]> = vec![&spec.signature_digest];
    let aaid_der = asn1::write_single(&AaidWriter {
        package_infos: SetOfWriter::new(vec![package_info]),
        signature_digests: SetOfWriter::new(digests),
    })
    .expect("failed to encode AAID");

    // key description payload
    let boot_key = [0u8; 32];
    let boot_hash = [0u8; 32];
    let mut software = empty_authorization_list();
    software.attestation_application_id = Some(&aaid_der);
    software.creation_date_time = spec.creation_ms;
    let mut device = empty_authorization_list();
    device.os_version = spec.os_version;
    device.os_patch_level = spec.os_patch_level;
    if spec.rollback_resistance {
        device.rollback_resistance = Some(());
    }
    if let Some((locked, state)) = spec.root_of_trust {
        device.root_of_trust = Some(asn::RootOfTrust {
            verified_boot_key: &boot_key,
            device_locked: locked,
            verified_boot_state: Some(asn1::Enumerated::new(state)),
            verified_boot_hash: Some(&boot_hash),
        });
    }
    let (software_enforced, tee_enforced) = if spec.keymaster_security_level == 0 {
        // a software keymaster enforces everything in software
        let mut merged = device;
        merged.attestation_application_id = software.attestation_application_id;
        merged.creation_date_time = software.creation_date_time;
        (merged, empty_authorization_list())
    } else {
        (software, device)
    };
    let key_description_der = asn1::write_single(&asn::KeyDescription {
        attestation_version: 4,
        attestation_security_level: asn1::Enumerated::new(spec.attestation_security_level),
        keymaster_version: 4,
        keymaster_security_level: asn1::Enumerated::new(spec.keymaster_security_level),
        attestation_challenge: &spec.challenge,
        unique_id: b"",
        software_enforced,
        tee_enforced,
    })
    .expect("failed to encode KeyDescription");

    let root_der = build_certificate(CertificateParams {
        serial: &[0x01],
        issuer_cn: "Fake Attestation Root",
        subject_cn: "Fake Attestation Root",
        public_key_sec1: root_point.as_bytes(),
        signer: &root_key,
        extensions: vec![basic_constraints_ca()],
    });
    let leaf_der = build_certificate(CertificateParams {
        serial: &[0x02],
        issuer_cn: "Fake Attestation Root",
        subject_cn: "Android Keystore Key",
        public_key_sec1: leaf_point.as_bytes(),
        signer: &root_key,
        extensions: vec![ExtensionWriter {
            extn_id: KEY_ATTESTATION_OID,
            critical: false,
            extn_value: &key_description_der,
        }],
    });

    let anchor = TrustAnchor::from_spki_der(encode_spki(root_point.as_bytes()));
    let chain = CertificateChain::from_der_list(vec![leaf_der, root_der]).unwrap();
    (chain, anchor)
}

const KEY_ATTESTATION_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 4, 1, 11129, 2, 1, 17);
const EC_PUBLIC_KEY_OID: ObjectIdentifier = oid!(1, 2, 840, 10045, 2, 1);
const EC_P256_OID: ObjectIdentifier = oid!(1, 2, 840, 10045, 3, 1, 7);
const ECDSA_SHA256_OID: ObjectIdentifier = oid!(1, 2, 840, 10045, 4, 3, 2);
const COMMON_NAME_OID: ObjectIdentifier = oid!(2, 5, 4, 3);
const BASIC_CONSTRAINTS_OID: ObjectIdentifier = oid!(2, 5, 29, 19);

#[derive(Asn1Write)]
struct CertificateWriter<'a> {
    tbs_certificate: asn1::Tlv<'a>,
    signature_algorithm: SignatureAlgorithmWriter,
    signature_value: BitString<'a>,
}

#[derive(Asn1Write)]
struct SignatureAlgorithmWriter {
    algorithm: ObjectIdentifier,
}

#[derive(Asn1Write)]
struct TbsCertificateWriter<'a> {
    #[explicit(0)]
    #[default(1u64)]
    version: u64,
    serial_number: asn1::BigUint<'a>,
    signature: SignatureAlgorithmWriter,
    issuer: NameWriter<'a>,
    validity: ValidityWriter,
    subject: NameWriter<'a>,
    subject_public_key_info: SpkiWriter<'a>,
    #[explicit(3)]
    extensions: Option<SequenceOfWriter<'a, ExtensionWriter<'a>, Vec<ExtensionWriter<'a>>>>,
}

type NameWriter<'a> = SequenceOfWriter<
    'a,
    SetOfWriter<'a, AttributeWriter<'a>, Vec<AttributeWriter<'a>>>,
    Vec<SetOfWriter<'a, AttributeWriter<'a>, Vec<AttributeWriter<'a>>>>,
>;

#[derive(Asn1Write)]
struct AttributeWriter<'a> {
    typ: ObjectIdentifier,
    value: PrintableString<'a>,
}

#[derive(Asn1Write)]
struct ValidityWriter {
    not_before: asn1::UtcTime,
    not_after: asn1::UtcTime,
}

#[derive(Asn1Write)]
struct SpkiWriter<'a> {
    algorithm: EcAlgorithmWriter,
    subject_public_key: BitString<'a>,
}

#[derive(Asn1Write)]
struct EcAlgorithmWriter {
    algorithm: ObjectIdentifier,
    parameters: ObjectIdentifier,
}

#[derive(Asn1Write)]
struct ExtensionWriter<'a> {
    extn_id: ObjectIdentifier,
    #[default(false)]
    critical: bool,
    extn_value: &'a [u8],
}

#[derive(Asn1Write)]
struct BasicConstraintsWriter {
    ca: bool,
}

#[derive(Asn1Write)]
struct AaidWriter<'a> {
    package_infos: SetOfWriter<'a, AaidPackageWriter<'a>, Vec<AaidPackageWriter<'a>>>,
    signature_digests: SetOfWriter<'a, &'a [u8], Vec<&'a [u8]>>,
}

#[derive(Asn1Write)]
struct AaidPackageWriter<'a> {
    package_name: &'a [u8],
    version: i64,
}

struct CertificateParams<'a> {
    serial: &'a [u8],
    issuer_cn: &'a str,
    subject_cn: &'a str,
    public_key_sec1: &'a [u8],
    signer: &'a SigningKey,
    extensions: Vec<ExtensionWriter<'a>>,
}

fn build_certificate(params: CertificateParams<'_>) -> Vec<u8> {
    let tbs_der = asn1::write_single(&TbsCertificateWriter {
        version: 2,
        serial_number: asn1::BigUint::new(params.serial).unwrap(),
        signature: SignatureAlgorithmWriter { algorithm: ECDSA_SHA256_OID },
        issuer: name(params.issuer_cn),
        validity: ValidityWriter {
            not_before: utc_time(2020, 1, 1),
            not_after: utc_time(2035, 1, 1),
        },
        subject: name(params.subject_cn),
        subject_public_key_info: SpkiWriter {
            algorithm: EcAlgorithmWriter {
                algorithm: EC_PUBLIC_KEY_OID,
                parameters: EC_P256_OID,
            },
            subject_public_key: BitString::new(params.public_key_sec1, 0).unwrap(),
        },
        extensions: Some(SequenceOfWriter::new(params.extensions)),
    })
    .expect("failed to encode TBS certificate");

    let signature: p256::ecdsa::Signature = params.signer.sign(&tbs_der);
    let signature_der = signature.to_der();
    let tbs_tlv = asn1::parse_single::<asn1::Tlv>(&tbs_der).unwrap();
    asn1::write_single(&CertificateWriter {
        tbs_certificate: tbs_tlv,
        signature_algorithm: SignatureAlgorithmWriter { algorithm: ECDSA_SHA256_OID },
        signature_value: BitString::new(signature_der.as_bytes(), 0).unwrap(),
    })
    .expect("failed to encode certificate")
}

fn name(common_name: &str) -> NameWriter<'_> {
    SequenceOfWriter::new(vec![SetOfWriter::new(vec![AttributeWriter {
        typ: COMMON_NAME_OID,
        value: PrintableString::new(common_name).unwrap(),
    }])])
}

fn utc_time(year: u16, month: u8, day: u8) -> asn1::UtcTime {
    let date = chrono::NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).unwrap();
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    asn1::UtcTime::new(chrono::DateTime::from_naive_utc_and_offset(naive, chrono::Utc)).unwrap()
}

fn basic_constraints_ca() -> ExtensionWriter<'static> {
    static CA_TRUE: once_cell::sync::Lazy<Vec<u8>> =
        once_cell::sync::Lazy::new(|| {
            asn1::write_single(&BasicConstraintsWriter { ca: true })
                .expect("failed to encode BasicConstraints")
        });
    ExtensionWriter {
        extn_id: BASIC_CONSTRAINTS_OID,
        critical: true,
        extn_value: CA_TRUE.as_slice(),
    }
}

fn encode_spki(public_key_sec1: &[u8]) -> Vec<u8> {
    asn1::write_single(&SpkiWriter {
        algorithm: EcAlgorithmWriter {
            algorithm: EC_PUBLIC_KEY_OID,
            parameters: EC_P256_OID,
        },
        subject_public_key: BitString::new(public_key_sec1, 0).unwrap(),
    })
    .expect("failed to encode SPKI")
}

fn empty_authorization_list<'a>() -> asn::AuthorizationList<'a> {
    asn::AuthorizationList {
        purpose: None,
        algorithm: None,
        key_size: None,
        digest: None,
        padding: None,
        ec_curve: None,
        rsa_public_exponent: None,
        mgf_digest: None,
        rollback_resistance: None,
        early_boot_only: None,
        active_date_time: None,
        origination_expire_date_time: None,
        usage_expire_date_time: None,
        usage_count_limit: None,
        no_auth_required: None,
        user_auth_type: None,
        auth_timeout: None,
        allow_while_on_body: None,
        trusted_user_presence_required: None,
        trusted_confirmation_required: None,
        unlocked_device_required: None,
        all_applications: None,
        application_id: None,
        creation_date_time: None,
        origin: None,
        rollback_resistant: None,
        root_of_trust: None,
        os_version: None,
        os_patch_level: None,
        attestation_application_id: None,
        attestation_id_brand: None,
        attestation_id_device: None,
        attestation_id_product: None,
        attestation_id_serial: None,
        attestation_id_imei: None,
        attestation_id_meid: None,
        attestation_id_manufacturer: None,
        attestation_id_model: None,
        vendor_patch_level: None,
        boot_patch_level: None,
        device_unique_attestation: None,
        attestation_id_second_imei: None,
        module_hash: None,
    }
}

// ---------------------------------------------------------------------------
// Captured chains
// ---------------------------------------------------------------------------

pub(crate) const PIXEL_ROOT_CERT: &str = r"MIIFYDCCA0igAwIBAgIJAOj6GWMU0voYMA0GCSqGSIb3DQEBCwUAMBsxGTAXBgNVBAUTEGY5MjAwOWU4NTNiNmIwNDUwHhcNMTYwNTI2MTYyODUyWhcNMjYwNTI0MTYyODUyWjAbMRkwFwYDVQQFExBmOTIwMDllODUzYjZiMDQ1MIICIjANBgkqhkiG9w0BAQEFAAOCAg8AMIICCgKCAgEAr7bHgiuxpwHsK7Qui8xUFmOr75gvMsd/dTEDDJdSSxtf6An7xyqpRR90PL2abxM1dEqlXnf2tqw1Ne4Xwl5jlRfdnJLmN0pTy/4lj4/7tv0Sk3iiKkypnEUtR6WfMgH0QZfKHM1+di+y9TFRtv6y//0rb+T+W8a9nsNL/ggjnar86461qO0rOs2cXjp3kOG1FEJ5MVmFmBGtnrKpa73XpXyTqRxB/M0n1n/W9nGqC4FSYa04T6N5RIZGBN2z2MT5IKGbFlbC8UrW0DxW7AYImQQcHtGl/m00QLVWutHQoVJYnFPlXTcHYvASLu+RhhsbDmxMgJJ0mcDpvsC4PjvB+TxywElgS70vE0XmLD+OJtvsBslHZvPBKCOdT0MS+tgSOIfga+z1Z1g7+DVagf7quvmag8jfPioyKvxnK/EgsTUVi2ghzq8wm27ud/mIM7AY2qEORR8Go3TVB4HzWQgpZrt3i5MIlCaY504LzSRiigHCzAPlHws+W0rB5N+er5/2pJKnfBSDiCiFAVtCLOZ7gLiMm0jhO2B6tUXHI/+MRPjy02i59lINMRRev56GKtcd9qO/0kUJWdZTdA2XoS82ixPvZtXQpUpuL12ab+9EaDK8Z4RHJYYfCT3Q5vNAXaiWQ+8PTWm2QgBR/bkwSWc+NpUFgNPN9PvQi8WEg5UmAGMCAwEAAaOBpjCBozAdBgNVHQ4EFgQUNmHhAHyIBQlRi0RsR/8aTMnqTxIwHwYDVR0jBBgwFoAUNmHhAHyIBQlRi0RsR/8aTMnqTxIwDwYDVR0TAQH/BAUwAwEB/zAOBgNVHQ8BAf8EBAMCAYYwQAYDVR0fBDkwNzA1oDOgMYYvaHR0cHM6Ly9hbmRyb2lkLmdvb2dsZWFwaXMuY29tL2F0dGVzdGF0aW9uL2NybC8wDQYJKoZIhvcNAQELBQADggIBACDIw41L3KlXG0aMiS//cqrG+EShHUGo8HNsw30W1kJtjn6UBwRM6jnmiwfBPb8VA91chb2vssAtX2zbTvqBJ9+LBPGCdw/E53Rbf86qhxKaiAHOjpvAy5Y3m00mqC0w/Zwvju1twb4vhLaJ5NkUJYsUS7rmJKHHBnETLi8GFqiEsqTWpG/6ibYCv7rYDBJDcR9W62BW9jfIoBQcxUCUJouMPH25lLNcDc1ssqvC2v7iUgI9LeoM1sNovqPmQUiG9rHli1vXxzCyaMTjwftkJLkf6724DFhuKug2jITV0QkXvaJWF4nUaHOTNA4uJU9WDvZLI1j83A+/xnAJUucIv/zGJ1AMH2boHqF8CY16LpsYgBt6tKxxWH00XcyDCdW2KlBCeqbQPcsFmWyWugxdcekhYsAWyoSf818NUsZdBWBaR/OukXrNLfkQ79IyZohZbvabO/X+MVT3rriAoKc8oE2Uws6DF+60PV7/WIPjNvXySdqspImSN78mflxDqwLqRBYkA3I75qppLGG9rp7UCdRjxMl8ZDBld+7yvHVgt1cVzJx9xnyGCC23UaicMDSXYrB4I4WHXPGjxhZuCuPBLTdOLU8YRvMYdEvYebWHMpvwGCF6bAx3JBpIeOQ1wDB5y0USicV3YgYGmi+NZfhA4URSh77Yd6uuJOJENRaNVTzk";

pub(crate) const PIXEL_INTERMEDIATE_2_CERT: &str = r"MIID1zCCAb+gAwIBAgIKA4gmZ2BliZaF9TANBgkqhkiG9w0BAQsFADAbMRkwFwYDVQQFExBmOTIwMDllODUzYjZiMDQ1MB4XDTE5MDgwOTIzMDMyM1oXDTI5MDgwNjIzMDMyM1owLzEZMBcGA1UEBRMQNTRmNTkzNzA1NDJmNWE5NTESMBAGA1UEDAwJU3Ryb25nQm94MHYwEAYHKoZIzj0CAQYFK4EEACIDYgAE41Inb5v86kMBpfBCf6ZHjlcyCa5E/XYs+8V8u9RxNjFQnoAuoOlAU25U+iVwyihGFUaYB1UJKTsxALOVW0MXdosoa/b+JlHFmvbGsNszYAkKRkfHhg527MO4p9tc5XrMo4G2MIGzMB0GA1UdDgQWBBRpkLEMOwiK7ir4jDOHtCwS2t/DpjAfBgNVHSMEGDAWgBQ2YeEAfIgFCVGLRGxH/xpMyepPEjAPBgNVHRMBAf8EBTADAQH/MA4GA1UdDwEB/wQEAwICBDBQBgNVHR8ESTBHMEWgQ6BBhj9odHRwczovL2FuZHJvaWQuZ29vZ2xlYXBpcy5jb20vYXR0ZXN0YXRpb24vY3JsLzhGNjczNEM5RkE1MDQ3ODkwDQYJKoZIhvcNAQELBQADggIBAFxZEyegsCSeytyUkYTJZR7R8qYXoXUWQ5h1Qp6b0h+H/SNl0NzedHAiwZQQ8jqzgP4c7w9HrrxEPCpFMd8+ykEBv5bWvDDf2HjtZzRlMRG154KgM1DMJgXhKLSKV+f/H+S/QQTeP3yprOavsBvdkgX6ELkYN6M3JXr7gpCvpFb6Ypz65Ud7FysAm/KNQ9zU0x7cvz3Btvz8ylw4p5dz04tanTzNgVLVHyX5kAcB2ftPvxMH4X/PXdx1lAmGPS8PsubCRGjJxdhRVOEEMYyxCuYLonuyUggOByZFaBw55WDoWGpkVQhnFi9L3p23VkWILLnq/07+GwoxL1vUAiQpjJHxNQYbjgTo+kxhjDP3uULAKPANGBE7+25VqVLMtdce4Eb5v9yFqgg+JtlL41RUWVS3DIEqxOMm/fB3A7t55TbUKf8dCZyBci2BcUWTx8K7VnQMy8gBMyu1SGleKPLIrBRSomDP5X8xGtwTLo3aAdY4+aSjEoimI6kX9bbIfhyDFpJxKaDRHzhCUdLfJrlCp2hEq5GWj0lT50hPLs0tbhh/l3LTtFhKyYbiB5vHXyB3P4gUui0WxyZnYdajUF+Tn8MW79qHhwhaXU9HnflE+dBh0smazOc+0xdwZZKXET+UFAUAMGiHvhuICCuWsY4SPKv8/715toeCoECHSMv08C9C";

pub(crate) const PIXEL_INTERMEDIATE_1_CERT: &str = r"MIICMDCCAbegAwIBAgIKFZBYV0ZxdmNYNDAKBggqhkjOPQQDAjAvMRkwFwYDVQQFExA1NGY1OTM3MDU0MmY1YTk1MRIwEAYDVQQMDAlTdHJvbmdCb3gwHhcNMTkwNzI3MDE1MjE5WhcNMjkwNzI0MDE1MjE5WjAvMRkwFwYDVQQFExA5NzM1Mzc3OTM2ZDBkZDc0MRIwEAYDVQQMDAlTdHJvbmdCb3gwWTATBgcqhkjOPQIBBggqhkjOPQMBBwNCAAR2OZY6u30za18jjYs1Xv2zlaIrLM3me9okMo5Lv4Av76l/IE3YvbRQMyy15Wb3Wb3G/6+587x443R9/Ognjl8Co4G6MIG3MB0GA1UdDgQWBBRBPjyps0vHpRy7ASXAQhvmUa162DAfBgNVHSMEGDAWgBRpkLEMOwiK7ir4jDOHtCwS2t/DpjAPBgNVHRMBAf8EBTADAQH/MA4GA1UdDwEB/wQEAwICBDBUBgNVHR8ETTBLMEmgR6BFhkNodHRwczovL2FuZHJvaWQuZ29vZ2xlYXBpcy5jb20vYXR0ZXN0YXRpb24vY3JsLzE1OTA1ODU3NDY3MTc2NjM1ODM0MAoGCCqGSM49BAMCA2cAMGQCMBeg3ziAoi6h1LPfvbbASk5WVdC6cL3IpaxIOycMHm1SDNqYALOtd1uujfzMeobs+AIwKJj5XySGe7MRL0QNtdrSd2nkK+fbjcUc8LKvVapDwRAC40CiTzllAy+aOnyDxrvb";

pub(crate) const PIXEL_KEY_CERT: &str = r"MIICnDCCAkGgAwIBAgIBATAMBggqhkjOPQQDAgUAMC8xGTAXBgNVBAUTEDk3MzUzNzc5MzZkMGRkNzQxEjAQBgNVBAwMCVN0cm9uZ0JveDAiGA8yMDIyMDcwOTEwNTE1NVoYDzIwMjgwNTIzMjM1OTU5WjAfMR0wGwYDVQQDDBRBbmRyb2lkIEtleXN0b3JlIEtleTBZMBMGByqGSM49AgEGCCqGSM49AwEHA0IABLIMHRVHdmJiPs9DAQSJgAbg+BwNsbrofLlqh8d3dARlnlhdPZBXuKL/iuYfQBoHj8dc9SyMQmjoEPk3mMcp6GKjggFWMIIBUjAOBgNVHQ8BAf8EBAMCB4AwggE+BgorBgEEAdZ5AgERBIIBLjCCASoCAQQKAQICASkKAQIECHRlc3Rhc2RmBAAwbL+FPQgCBgGB4pZhH7+FRVwEWjBYMTIwMAQrY29tLnViaW5ldGljLmF0dGVzdGVkLmV4ZWN1dG9yLnRlc3QudGVzdG5ldAIBDjEiBCC9y0Vg9rPEHa2SBmgWnCi+HvnqSfI9mM2OsvN65EiP+TCBoaEFMQMCAQKiAwIBA6MEAgIBAKUFMQMCAQCqAwIBAb+DdwIFAL+FPgMCAQC/hUBMMEoEIIec0/GOp24kTU1Kw7y5wzfBO0ZnGQsZA1r+JTZVAFDxAQH/CgEABCA/QTbuNYHmq6jqM3prQ9cD3h7KJB+bfyd+zfr/96jc8b+FQQUCAwHUwL+FQgUCAwMV3r+FTgYCBAE0ir2/hU8GAgQBNIq9MAwGCCqGSM49BAMCBQADRwAwRAIgM6YTzOmm7SUCakkrZR8Kxnw8AonU5HQxaMaQPi+qC9oCIDJM01xL8mldca0Sooho5pIyESki6vDjaZ9q3YEz1SjZ";

pub(crate) const PIXEL_KEY_CERT_INVALID: &str = r"MIICnDCCAkGgAwIBAgIBATAMBggqhkjOPQQDAgUAMC8xGTAXBgNVBAUTEDk3MzUzNzc5MzZkMGRkNzQxEjAQBgNVBAwMCVN0cm9uZ0JveDAiGA8yMDIyMDcwOTEwNTE1NVoYDzIwMjgwNTIzMjM1OTU5WjAfMR0wGwYDVQQDDBRBbmRyb2lkIEtleXN0b3JlIEtleTBZMBMGByqGSM49AgEGCCqGSM49AwEHA0IABLIMHRVHdmJiPs9DAQSJgAbg+BwNsbrofLlqh8d3dARlnlhdPZBXuKL/iuYfQBoHj8dc9SyMQmjoEPk3mMcp6GKjggFWMIIBUjAOBgNVHQ8BAf8EBAMCB4AwggE+BgorBgEEAdZ5AgERBIIBLjCCASoCAQQKAQICASkKAQIECHRlc3Rhc2RmBAAwbL+FPQgCBgGB4pZhH7+FRVwEWjBYMTIwMAQrY29tLnViaW5ldGljLmF0dGVzdGVkLmV4ZWN1dG9yLnRlc3QudGVzdG5ldAIBDjEiBCC9y0Vg9rPEHa2SBmgWnCi+HvnqSfI9mM2OsvN65EiP+TCBoaEFMQMCAQKiAwIBA6MEAgIBAKUFMQMCAQCqAwIBAb+DdwIFAL+FPgMCAQC/hUBMMEoEIIec0/GOp24kTU1Kw7y5wzfBO0ZnGQsZA1r+JTZVAFDxAQH/CgEABCA/QTbuNYHmq6jqM3prQ9cD3h7KJB+bfyd+zfr/96jc8b+FQQUCAwHUwL+FQgUCAwMV3r+FTgYCBAE0ir2/hU8GAgQBNIq9MAwGCCqGSM49BAMCBQADRwAwRAIgM6YTzOmm7SUCakkrZR8Kxnw8AonU5HQxaMaQPi+qC9oCIDJM01xL8mldca0Sooho5pIyESki6vDjaZ9q3YAz1SjZ";

pub(crate) const SAMSUNG_ROOT_CERT: &str = r"MIIFHDCCAwSgAwIBAgIJANUP8luj8tazMA0GCSqGSIb3DQEBCwUAMBsxGTAXBgNVBAUTEGY5MjAwOWU4NTNiNmIwNDUwHhcNMTkxMTIyMjAzNzU4WhcNMzQxMTE4MjAzNzU4WjAbMRkwFwYDVQQFExBmOTIwMDllODUzYjZiMDQ1MIICIjANBgkqhkiG9w0BAQEFAAOCAg8AMIICCgKCAgEAr7bHgiuxpwHsK7Qui8xUFmOr75gvMsd/dTEDDJdSSxtf6An7xyqpRR90PL2abxM1dEqlXnf2tqw1Ne4Xwl5jlRfdnJLmN0pTy/4lj4/7tv0Sk3iiKkypnEUtR6WfMgH0QZfKHM1+di+y9TFRtv6y//0rb+T+W8a9nsNL/ggjnar86461qO0rOs2cXjp3kOG1FEJ5MVmFmBGtnrKpa73XpXyTqRxB/M0n1n/W9nGqC4FSYa04T6N5RIZGBN2z2MT5IKGbFlbC8UrW0DxW7AYImQQcHtGl/m00QLVWutHQoVJYnFPlXTcHYvASLu+RhhsbDmxMgJJ0mcDpvsC4PjvB+TxywElgS70vE0XmLD+OJtvsBslHZvPBKCOdT0MS+tgSOIfga+z1Z1g7+DVagf7quvmag8jfPioyKvxnK/EgsTUVi2ghzq8wm27ud/mIM7AY2qEORR8Go3TVB4HzWQgpZrt3i5MIlCaY504LzSRiigHCzAPlHws+W0rB5N+er5/2pJKnfBSDiCiFAVtCLOZ7gLiMm0jhO2B6tUXHI/+MRPjy02i59lINMRRev56GKtcd9qO/0kUJWdZTdA2XoS82ixPvZtXQpUpuL12ab+9EaDK8Z4RHJYYfCT3Q5vNAXaiWQ+8PTWm2QgBR/bkwSWc+NpUFgNPN9PvQi8WEg5UmAGMCAwEAAaNjMGEwHQYDVR0OBBYEFDZh4QB8iAUJUYtEbEf/GkzJ6k8SMB8GA1UdIwQYMBaAFDZh4QB8iAUJUYtEbEf/GkzJ6k8SMA8GA1UdEwEB/wQFMAMBAf8wDgYDVR0PAQH/BAQDAgIEMA0GCSqGSIb3DQEBCwUAA4ICAQBOMaBc8oumXb2voc7XCWnuXKhBBK3e2KMGz39t7lA3XXRe2ZLLAkLM5y3J7tURkf5a1SutfdOyXAmeE6SRo83Uh6WszodmMkxK5GM4JGrnt4pBisu5igXEydaW7qq2CdC6DOGjG+mEkN8/TA6p3cnoL/sPyz6evdjLlSeJ8rFBH6xWyIZCbrcpYEJzXaUOEaxxXxgYz5/cTiVKN2M1G2okQBUIYSY6bjEL4aUN5cfo7ogP3UvliEo3Eo0YgwuzR2v0KR6C1cZqZJSTnghIC/vAD32KdNQ+c3N+vl2OTsUVMC1GiWkngNx1OO1+kXW+YTnnTUOtOIswUP/Vqd5SYgAImMAfY8U9/iIgkQj6T2W6FsScy94IN9fFhE1UtzmLoBIuUFsVXJMTz+Jucth+IqoWFua9v1R93/k98p41pjtFX+H8DslVgfP097vju4KDlqN64xV1grw3ZLl4CiOe/A91oeLm2UHOq6wn3esB4r2EIQKb6jTVGu5sYCcdWpXr0AUVqcABPdgL+H7qJguBw09ojm6xNIrw2OocrDKsudk/okr/AwqEyPKw9WnMlQgLIKw1rODG2NvU9oR3GVGdMkUBZutL8VuFkERQGt6vQ2OCw0sV47VMkuYbacK/xyZFiRcrPJPb41zgbQj9XAEyLKCHex0SdDrx+tWUDqG8At2JHA==";

pub(crate) const SAMSUNG_INTERMEDIATE_2_CERT: &str = r"MIIDlDCCAXygAwIBAgIRAJ3uw09QZQdXUqFIiXyf5uUwDQYJKoZIhvcNAQELBQAwGzEZMBcGA1UEBRMQZjkyMDA5ZTg1M2I2YjA0NTAeFw0yMTExMTcyMjQ1MTBaFw0zMTExMTUyMjQ1MTBaMDkxDDAKBgNVBAwMA1RFRTEpMCcGA1UEBRMgODFiNTdmZmZiMzc5NTEyOWNmM2ZjNTBlY2EwY2QzOWMwdjAQBgcqhkjOPQIBBgUrgQQAIgNiAARSfOriwm02QddIzGI1JpbUWTw93rtxu/BBMGpQopLCEsI1IMcO+YO75XEx5PJb0qpN0qZy4ZyohEOkXyqdD/KNkNCKWnhVk7wyyJCdnw35L8+adMpuHkp7Wc8nK14aXKKjYzBhMB0GA1UdDgQWBBQNE845gvrI02p2mda2mk3SWwhGYjAfBgNVHSMEGDAWgBQ2YeEAfIgFCVGLRGxH/xpMyepPEjAPBgNVHRMBAf8EBTADAQH/MA4GA1UdDwEB/wQEAwICBDANBgkqhkiG9w0BAQsFAAOCAgEAVRzcron3lJ+sG5Jaqd9L2G33Dm/0/u0Ed+1jNJ7LrCLMKSHmEmoEiuNRKue2Tyv8UVb/Z9dENmC+gBqWkgOB6hxJ6lVcvIa38/CKNHBHr/Ras55+zZ68tQlpO6tdOVKUlfvlvI1BdpCv4qSEMpR9Zz4f4dzjEAbb24isT0PLcYvN0IrDELdCK+R+b+HaM5GrcFj1STv3uju/xHJnU6GeMdMPFf/rbMLNi1P6xVqdNUBGbKFx8J+px78z/Bcjq8Swt+uEoINvk/whROT8TQuzdccofx0hRFaoC1lgjRo8xgLlqFIyj0ICETuyYfEXbJwGgJczdS7ndte2SES4Rl3+NlYA2/mXjBUPnmGvJraOUZaw7ahIay7L7uUpvdJCHrlCDpRSLLCjuNss/sGn6bb3EDVGBaqzNRUBLNbsqrwKf8MbaJMhxOzHFlVXO1heFvmVdB+69Gkf0Kt2fK8N6VJIDGI9YoluItIbgJ/IqCicwLduxqMSXpPHEXf+f0lQH/AAP6Gz0aD4on3qTjPSl8p4LOqZSQoDqJKUukaXhMvgr/4u4E3ZX3EbxrF77hrML4NK4DfOj3LjLklPZZ3cLlMXzcSnMYvXkVU96qHqppyqjfioOZU2oSFQwPbXmKIYHVYJ2xIFBVy9ESQcqX04mevxMh1YHp+pTdMLXYE0EU+lB5Q=";

pub(crate) const SAMSUNG_INTERMEDIATE_1_CERT: &str = r"MIIB8zCCAXmgAwIBAgIQcH2ewbAt6vTdz/WwWLWu6zAKBggqhkjOPQQDAjA5MQwwCgYDVQQMDANURUUxKTAnBgNVBAUTIDgxYjU3ZmZmYjM3OTUxMjljZjNmYzUwZWNhMGNkMzljMB4XDTIxMTExNzIyNDcxMloXDTMxMTExNTIyNDcxMlowOTEMMAoGA1UEDAwDVEVFMSkwJwYDVQQFEyBiMmMzN2UzODMyOGQ2YWNkZjNiNjAwNmU4YTc3ZjA2NDBZMBMGByqGSM49AgEGCCqGSM49AwEHA0IABE3rCk6dqUilYhf1gsiVMFkOrEze/Ar318VMXFXDlOXDajQORIGWYVVtbcHYPNrews45k2CgHZg6ofN4lpONImyjYzBhMB0GA1UdDgQWBBRt1zXt/O233wIFRiNawaRD3KQPpTAfBgNVHSMEGDAWgBQNE845gvrI02p2mda2mk3SWwhGYjAPBgNVHRMBAf8EBTADAQH/MA4GA1UdDwEB/wQEAwICBDAKBggqhkjOPQQDAgNoADBlAjEA0dNMiUn0+ftvhsFJP1byGMZkaWWOQbIOTItcQTrw29YV5FSjwZW7Ofrj8kR8WC4nAjB0yDVyt86uFrvWWzaa1EJmqR4L7PMUWf8yVey6KLrhQYMSGGhgief4pj3Hx6Eck6o=";

pub(crate) const SAMSUNG_KEY_CERT: &str = r"MIIClzCCAj2gAwIBAgIBATAKBggqhkjOPQQDAjA5MQwwCgYDVQQMDANURUUxKTAnBgNVBAUTIGIyYzM3ZTM4MzI4ZDZhY2RmM2I2MDA2ZThhNzdmMDY0MB4XDTIxMTExNzIyNDcxMloXDTMxMTExNTIyNDcxMlowHzEdMBsGA1UEAxMUQW5kcm9pZCBLZXlzdG9yZSBLZXkwWTATBgcqhkjOPQIBBggqhkjOPQMBBwNCAASDWA5xIavYEzjbcZneQy8gxkAo7nzJrSIqHbmPDy1kOFNWidIZLaKf86qLp73/n2VzK8qo5XsHexoC8wPaIcj8o4IBTjCCAUowggE2BgorBgEEAdZ5AgERBIIBJjCCASICAWQKAQECAWQKAQEEAAQAMGy/hT0IAgYBgddgKwm/hUVcBFowWDEyMDAEK2NvbS51YmluZXRpYy5hdHRlc3RlZC5leGVjdXRvci50ZXN0LnRlc3RuZXQCAQ4xIgQgvctFYPazxB2tkgZoFpwovh756knyPZjNjrLzeuRIj/kwgaGhBTEDAgECogMCAQOjBAICAQClBTEDAgEAqgMCAQG/g3cCBQC/hT4DAgEAv4VATDBKBCDnyVk+0qoHM1jC6eS+ScTwsvI1J6mtlFgzf0F3HTIMawEB/woBAAQgowcEEJQaU4V58HU/EPyCMBydcLlh8pR+qgnfWnuur+W/hUEFAgMB1MC/hUIFAgMDFdy/hU4GAgQBNInxv4VPBgIEATSJ8TAOBgNVHQ8BAf8EBAMCB4AwCgYIKoZIzj0EAwIDSAAwRQIgOQNrjHRHg9gcN6gFJFZHSjpIG1Gx1061FAEq3E9yUsgCIQD1FvhmjYsTWeQMQsj22ms/8dw9O3WsvE0y2AtrN0KWuw==";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_description::{self, SecurityLevel};

    #[test]
    fn test_fake_chain_carries_the_requested_key_description() {
        let spec = FakeAttestation {
            challenge: b"hello".to_vec(),
            os_patch_level: Some(202301),
            ..FakeAttestation::default()
        };
        let (chain, _) = build_fake_attestation(&spec);
        let kd = key_description::decode_from_leaf(chain.leaf_der()).unwrap();
        assert_eq!(kd.attestation_challenge, b"hello");
        assert_eq!(kd.attestation_security_level, SecurityLevel::TrustedEnvironment);
        assert_eq!(kd.tee_enforced.os_patch_level.unwrap().encoded(), 202301);
        let app_id = kd.software_enforced.attestation_application_id.unwrap();
        assert_eq!(app_id.package_infos[0].package_name, "com.example.fake");
    }

    #[test]
    fn test_fake_software_attestation_uses_the_software_list() {
        let spec = FakeAttestation {
            attestation_security_level: 0,
            keymaster_security_level: 0,
            ..FakeAttestation::default()
        };
        let (chain, _) = build_fake_attestation(&spec);
        let kd = key_description::decode_from_leaf(chain.leaf_der()).unwrap();
        assert_eq!(kd.attestation_security_level, SecurityLevel::Software);
        assert!(kd.software_enforced.os_version.is_some());
        assert!(kd.tee_enforced.os_version.is_none());
    }

    #[test]
    fn test_fake_chain_validates_against_its_anchor() {
        let (chain, anchor) = build_fake_attestation(&FakeAttestation::default());
        crate::chain::validate(
            &chain,
            VERIFICATION_TIME,
            &[anchor],
            false,
            &crate::revocation::FixedStatusList(crate::revocation::RevocationList::empty()),
        )
        .unwrap();
    }
}
