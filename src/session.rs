//! Session-scoped key pairs for ad-hoc encrypt/decrypt calls made outside a
//! comparison run.
//!
//! Sessions expire after a fixed TTL and the store holds at most
//! `max_sessions` entries; the oldest session is evicted first.

use crate::{
    config::SessionConfig,
    ecc::{EccPrivateKey, EccProvider, EccPublicKey},
    error::{CompareError, CompareResult},
    hybrid::RsaAesHybridProvider,
    provider::{Algorithm, AlgorithmProvider, KeyPair},
    rsa::RsaProvider,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::Serialize;
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tracing::debug;
use uuid::Uuid;

enum SessionKeys {
    Rsa(KeyPair<RsaPublicKey, RsaPrivateKey>),
    Ecc(KeyPair<EccPublicKey, EccPrivateKey>),
    Hybrid(KeyPair<RsaPublicKey, RsaPrivateKey>),
}

struct Session {
    algorithm: Algorithm,
    key_size: usize,
    keys: SessionKeys,
    created_at: Instant,
}

/// Returned when a session is opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyGeneration {
    pub session_id: Uuid,
    pub algorithm: Algorithm,
    pub key_size: usize,
    pub generation_ms: f64,
}

/// Output bytes of an encrypt or decrypt call and how long it took.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedOutput {
    pub bytes: Vec<u8>,
    pub elapsed_ms: f64,
}

impl TimedOutput {
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    ttl: Duration,
    max_sessions: usize,
    rsa: RsaProvider,
    ecc: EccProvider,
    hybrid: RsaAesHybridProvider,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl: Duration::from_secs(config.ttl_secs),
            max_sessions: config.max_sessions.max(1),
            rsa: RsaProvider::new(),
            ecc: EccProvider::strict(),
            hybrid: RsaAesHybridProvider::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn purge_expired(&mut self) {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.created_at.elapsed() < ttl);
        let purged = before - self.sessions.len();
        if purged > 0 {
            debug!(purged, "expired sessions removed");
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, s)| s.created_at)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            self.sessions.remove(&id);
            debug!(session_id = %id, "evicted oldest session");
        }
    }

    /// Generates a key pair and stores it under a new session id.
    ///
    /// Unsupported key sizes are rejected for every algorithm, ECC included.
    pub fn generate_keys(
        &mut self,
        algorithm: Algorithm,
        key_size: usize,
    ) -> CompareResult<KeyGeneration> {
        let start = Instant::now();
        let keys = match algorithm {
            Algorithm::Rsa => SessionKeys::Rsa(self.rsa.generate_key_pair(key_size)?),
            Algorithm::Ecc => SessionKeys::Ecc(self.ecc.generate_key_pair(key_size)?),
            Algorithm::RsaAesHybrid => {
                SessionKeys::Hybrid(self.hybrid.generate_key_pair(key_size)?)
            }
        };
        let generation_ms = start.elapsed().as_secs_f64() * 1000.0;

        self.purge_expired();
        while self.sessions.len() >= self.max_sessions {
            self.evict_oldest();
        }

        let session_id = Uuid::new_v4();
        self.sessions.insert(
            session_id,
            Session {
                algorithm,
                key_size,
                keys,
                created_at: Instant::now(),
            },
        );
        debug!(%session_id, %algorithm, key_size, "session opened");

        Ok(KeyGeneration {
            session_id,
            algorithm,
            key_size,
            generation_ms,
        })
    }

    fn session(&mut self, session_id: &Uuid) -> CompareResult<&Session> {
        self.purge_expired();
        self.sessions
            .get(session_id)
            .ok_or_else(|| CompareError::SessionNotFound(session_id.to_string()))
    }

    /// Algorithm and key size of a live session.
    pub fn describe(&mut self, session_id: &Uuid) -> CompareResult<(Algorithm, usize)> {
        let session = self.session(session_id)?;
        Ok((session.algorithm, session.key_size))
    }

    pub fn encrypt(&mut self, session_id: &Uuid, data: &[u8]) -> CompareResult<TimedOutput> {
        let (rsa, ecc, hybrid) = (self.rsa, self.ecc, self.hybrid);
        let session = self.session(session_id)?;

        let start = Instant::now();
        let bytes = match &session.keys {
            SessionKeys::Rsa(keys) => rsa.encrypt(data, &keys.public_key)?,
            SessionKeys::Ecc(keys) => ecc.encrypt(data, &keys.public_key)?,
            SessionKeys::Hybrid(keys) => hybrid.encrypt(data, &keys.public_key)?,
        };
        Ok(TimedOutput {
            bytes,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    pub fn decrypt(&mut self, session_id: &Uuid, data: &[u8]) -> CompareResult<TimedOutput> {
        let (rsa, ecc, hybrid) = (self.rsa, self.ecc, self.hybrid);
        let session = self.session(session_id)?;

        let start = Instant::now();
        let bytes = match &session.keys {
            SessionKeys::Rsa(keys) => rsa.decrypt(data, &keys.private_key)?,
            SessionKeys::Ecc(keys) => ecc.decrypt(data, &keys.private_key)?,
            SessionKeys::Hybrid(keys) => hybrid.decrypt(data, &keys.private_key)?,
        };
        Ok(TimedOutput {
            bytes,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    /// Drops a session and its keys. Returns whether it existed.
    pub fn remove(&mut self, session_id: &Uuid) -> bool {
        self.sessions.remove(session_id).is_some()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}
