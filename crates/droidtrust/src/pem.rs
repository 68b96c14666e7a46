// SPDX-FileCopyrightText: The Droidtrust Developers
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal PEM encoding and decoding for the two labels this crate deals in:
//! certificates and SubjectPublicKeyInfo blobs.

use base64::Engine;

pub(crate) const CERTIFICATE: &str = "CERTIFICATE";
pub(crate) const PUBLIC_KEY: &str = "PUBLIC KEY";

const LINE_WIDTH: usize = 64;

/// Wrap DER bytes into a PEM block with the given label.
pub(crate) fn encode(label: &str, der: &[u8]) -> String {
    let body = base64::engine::general_purpose::STANDARD.encode(der);
    let mut out = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 64);
    out.push_str("-----BEGIN ");
    out.push_str(label);
    out.push_str("-----\n");
    for chunk in body.as_bytes().chunks(LINE_WIDTH) {
        // chunks of an ASCII string are valid UTF-8
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        out.push('\n');
    }
    out.push_str("-----END ");
    out.push_str(label);
    out.push_str("-----\n");
    out
}

/// Extract the DER bytes from a PEM block, or from bare base64 without armor. The label of an
/// armored block is not checked: captured chains in the wild mix `CERTIFICATE` and
/// `TRUSTED CERTIFICATE` armors for the same payload.
pub(crate) fn decode(pem: &str) -> Option<Vec<u8>> {
    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .map(str::trim)
        .collect();
    base64::engine::general_purpose::STANDARD.decode(body).ok()
}
