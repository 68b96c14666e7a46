// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde adapter serializing SubjectPublicKeyInfo bytes as `PUBLIC KEY` PEM strings, used with
//! `#[serde(with = "crate::serde_pem")]`. Deserialization also accepts bare base64.

use crate::pem;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub(crate) fn serialize<S>(value: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&pem::encode(pem::PUBLIC_KEY, value))
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    pem::decode(&raw).ok_or_else(|| D::Error::custom("invalid PEM public key"))
}
