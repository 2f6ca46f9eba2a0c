//! API token formatting, parsing, and credential hashing.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

/// API token prefix.
pub const API_TOKEN_PREFIX: &str = "sf";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

const API_TOKEN_SECRET_HEX_CHARS: usize = API_TOKEN_SECRET_BYTES * 2;

#[derive(Clone)]
pub struct ApiTokenSecret {
    bytes: [u8; API_TOKEN_SECRET_BYTES],
}

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")?;
        Ok(())
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Error)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_api_token_secret() -> ApiTokenSecret {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    ApiTokenSecret::from_bytes(secret)
}

/// Render a secret as a bearer token: `sf_<64 lowercase hex chars>`.
#[must_use]
pub fn format_api_token(secret: &ApiTokenSecret) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}",
        encode_secret_hex(secret.as_bytes())
    )
}

/// Parses a bearer token back into its secret.
///
/// # Errors
///
/// Fails when the prefix is wrong or the secret is not 64 hex characters.
pub fn parse_api_token(token: &str) -> Result<ApiTokenSecret, ApiTokenError> {
    let (prefix, secret_hex) = token.split_once('_').ok_or(ApiTokenError::InvalidFormat)?;

    if prefix != API_TOKEN_PREFIX {
        return Err(ApiTokenError::InvalidFormat);
    }

    decode_secret_hex(secret_hex)
        .map(ApiTokenSecret::from_bytes)
        .ok_or(ApiTokenError::InvalidSecretEncoding)
}

/// Hex SHA-256 digest of the secret, stored as the account's credential hash.
#[must_use]
pub fn credential_hash(secret: &ApiTokenSecret) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

/// A freshly generated token and the hash to persist for it.
#[derive(Debug)]
pub struct IssuedApiToken {
    /// Raw bearer token. Shown to the caller once and never stored.
    pub token: String,

    /// Value for `accounts.credential_hash`.
    pub credential_hash: String,
}

#[must_use]
pub fn issue_api_token() -> IssuedApiToken {
    let secret = generate_api_token_secret();

    IssuedApiToken {
        token: format_api_token(&secret),
        credential_hash: credential_hash(&secret),
    }
}

fn encode_secret_hex(secret: &[u8; API_TOKEN_SECRET_BYTES]) -> String {
    secret.iter().map(|byte| format!("{byte:02x}")).collect()
}

fn decode_secret_hex(secret_hex: &str) -> Option<[u8; API_TOKEN_SECRET_BYTES]> {
    if secret_hex.len() != API_TOKEN_SECRET_HEX_CHARS {
        return None;
    }

    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(secret_hex.as_bytes().chunks_exact(2)) {
        let [hi, lo] = pair else {
            return None;
        };

        *byte = (decode_hex_nibble(*hi)? << 4) | decode_hex_nibble(*lo)?;
    }

    Some(secret)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formatted_token_has_prefix_and_hex_secret() {
        let secret = ApiTokenSecret::from_bytes([0xAB; API_TOKEN_SECRET_BYTES]);
        let token = format_api_token(&secret);

        assert_eq!(token.len(), 3 + API_TOKEN_SECRET_HEX_CHARS);
        assert!(token.starts_with("sf_"), "unexpected token {token}");
        assert!(token.ends_with("abab"), "unexpected token {token}");
    }

    #[test]
    fn parse_recovers_the_secret() -> TestResult {
        let secret = generate_api_token_secret();
        let parsed = parse_api_token(&format_api_token(&secret))?;

        assert_eq!(parsed.as_bytes(), secret.as_bytes());

        Ok(())
    }

    #[test]
    fn parse_rejects_invalid_prefix() {
        let token = format!("lt_{}", "a".repeat(API_TOKEN_SECRET_HEX_CHARS));

        assert!(
            matches!(parse_api_token(&token), Err(ApiTokenError::InvalidFormat)),
            "foreign prefix should be rejected"
        );
    }

    #[test]
    fn parse_rejects_short_or_non_hex_secrets() {
        let short = parse_api_token("sf_abcd");
        let non_hex = parse_api_token(&format!("sf_{}", "z".repeat(API_TOKEN_SECRET_HEX_CHARS)));

        assert!(
            matches!(short, Err(ApiTokenError::InvalidSecretEncoding)),
            "short secret should be rejected"
        );
        assert!(
            matches!(non_hex, Err(ApiTokenError::InvalidSecretEncoding)),
            "non-hex secret should be rejected"
        );
    }

    #[test]
    fn credential_hash_is_deterministic_sha256_hex() {
        let secret = ApiTokenSecret::from_bytes([0xCD; API_TOKEN_SECRET_BYTES]);

        let first = credential_hash(&secret);
        let second = credential_hash(&secret);

        assert_eq!(first, second, "hash must be deterministic");
        assert_eq!(first.len(), 64, "sha-256 hex digest is 64 characters");
    }

    #[test]
    fn issued_token_hash_matches_its_secret() -> TestResult {
        let issued = issue_api_token();
        let secret = parse_api_token(&issued.token)?;

        assert_eq!(credential_hash(&secret), issued.credential_hash);

        Ok(())
    }
}
