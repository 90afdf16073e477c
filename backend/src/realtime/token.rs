use crate::constants::REALTIME_TOKEN_TTL_SECS;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Why a presented token was rejected. Consumers bind the connection to the
/// unauthenticated room instead of surfacing this to the client.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("malformed token")]
    Malformed,

    #[error("signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,
}

/// A stateless proof that `user_id` may join the room for `match_id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub token: String,
    pub user_id: String,
    pub match_id: i64,
}

/// Signs and verifies realtime connection credentials with the server-held
/// session secret. Verification needs no storage lookup; the payload itself
/// carries the binding and its issue time.
#[derive(Clone)]
pub struct CredentialSigner {
    secret: Vec<u8>,
}

impl CredentialSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length")
    }

    pub fn issue(&self, user_id: &str, match_id: i64) -> Credential {
        self.issue_at(user_id, match_id, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: &str, match_id: i64, issued_at: i64) -> Credential {
        let payload = format!("{user_id}:{match_id}:{issued_at}");
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let tag = hex::encode(mac.finalize().into_bytes());

        Credential {
            token: format!("{payload}.{tag}"),
            user_id: user_id.to_string(),
            match_id,
        }
    }

    /// Validate the signature and age, then recover `(user_id, match_id)`.
    pub fn verify(&self, token: &str) -> Result<(String, i64), CredentialError> {
        let (payload, tag_hex) = token.rsplit_once('.').ok_or(CredentialError::Malformed)?;
        let tag = hex::decode(tag_hex).map_err(|_| CredentialError::Malformed)?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&tag)
            .map_err(|_| CredentialError::BadSignature)?;

        // payload = "{user_id}:{match_id}:{issued_at}"; split from the right
        // so user ids containing ':' stay intact.
        let (rest, issued_at) = payload.rsplit_once(':').ok_or(CredentialError::Malformed)?;
        let issued_at: i64 = issued_at.parse().map_err(|_| CredentialError::Malformed)?;
        let (user_id, match_id) = rest.rsplit_once(':').ok_or(CredentialError::Malformed)?;
        let match_id: i64 = match_id.parse().map_err(|_| CredentialError::Malformed)?;

        if user_id.is_empty() {
            return Err(CredentialError::Malformed);
        }
        if Utc::now().timestamp() - issued_at > REALTIME_TOKEN_TTL_SECS {
            return Err(CredentialError::Expired);
        }

        Ok((user_id.to_string(), match_id))
    }
}
