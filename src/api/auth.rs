use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use thiserror::Error;

use crate::wallet::{Address, pubkey_to_address, sign_hex, verify_signature_hex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Malformed(&'static str),
    #[error("signature does not match pubkey and payload")]
    BadSignature,
    #[error("request issued at {issued_at} is outside the accepted window (now {now})")]
    Expired { issued_at: u64, now: u64 },
    #[error("request already processed")]
    Replayed,
}

/// A request body signed by the caller. The caller is the address of `pubkey`.
///
/// An envelope is spent once the operation it carries succeeds; a rejected
/// one may be resubmitted while it is fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signed<T> {
    /// Hex secp256k1 public key of the caller.
    pub pubkey: String,
    /// Hex DER ECDSA signature over [`sighash`].
    pub signature: String,
    /// Unix seconds at which the client signed.
    pub issued_at: u64,
    pub body: T,
}

/// Signing preimage. Field order is part of the wire format.
#[derive(Serialize)]
struct SigningPayload<'a, T> {
    action: &'a str,
    pubkey: &'a str,
    body: &'a T,
    issued_at: u64,
}

/// SHA-256 of the canonical JSON `{"action":..,"pubkey":..,"body":..,"issued_at":..}`.
pub fn sighash<T: Serialize>(
    action: &str,
    pubkey: &str,
    body: &T,
    issued_at: u64,
) -> [u8; 32] {
    let payload = SigningPayload {
        action,
        pubkey,
        body,
        issued_at,
    };
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(&payload).expect("serialize signing payload"));
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    out
}

impl<T: Serialize> Signed<T> {
    /// Client side: sign `body` for `action` with a hex secret key.
    pub fn sign(
        secret_hex: &str,
        pubkey_hex: &str,
        action: &str,
        body: T,
        issued_at: u64,
    ) -> Result<Self, &'static str> {
        let hash = sighash(action, pubkey_hex, &body, issued_at);
        let signature = sign_hex(secret_hex, hash)?;
        Ok(Self {
            pubkey: pubkey_hex.to_string(),
            signature,
            issued_at,
            body,
        })
    }

    /// Host side: check freshness, signature and replay. The envelope is not
    /// marked as spent here; see [`ReplayGuard::admit`].
    pub fn authorize(
        &self,
        action: &str,
        now: u64,
        ttl_secs: u64,
        guard: &ReplayGuard,
    ) -> Result<Authorized, AuthError> {
        if now.abs_diff(self.issued_at) > ttl_secs {
            return Err(AuthError::Expired {
                issued_at: self.issued_at,
                now,
            });
        }

        let caller = pubkey_to_address(&self.pubkey).map_err(AuthError::Malformed)?;
        let hash = sighash(action, &self.pubkey, &self.body, self.issued_at);
        if !verify_signature_hex(&self.pubkey, &self.signature, hash)
            .map_err(AuthError::Malformed)?
        {
            return Err(AuthError::BadSignature);
        }

        if guard.contains(&hash) {
            return Err(AuthError::Replayed);
        }
        debug!("{action}: authorized {caller} (issued_at={})", self.issued_at);
        Ok(Authorized {
            caller,
            hash,
            issued_at: self.issued_at,
        })
    }
}

/// A verified envelope: who signed it and what to remember once it is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized {
    pub caller: Address,
    pub hash: [u8; 32],
    pub issued_at: u64,
}

/// Remembers signed payloads accepted within the freshness window.
#[derive(Debug, Default)]
pub struct ReplayGuard {
    seen: HashMap<[u8; 32], u64>,
}

impl ReplayGuard {
    pub fn new() -> Self {
        Self {
            seen: HashMap::new(),
        }
    }

    pub fn contains(&self, hash: &[u8; 32]) -> bool {
        self.seen.contains_key(hash)
    }

    /// Mark an envelope as spent.
    pub fn admit(&mut self, auth: &Authorized, now: u64, ttl_secs: u64) {
        // anything older than the window can no longer pass the freshness check
        self.seen
            .retain(|_, at| now.saturating_sub(*at) <= ttl_secs);
        self.seen.insert(auth.hash, auth.issued_at);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
