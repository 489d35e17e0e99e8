//! Server-side session store.
//!
//! Session data lives in process memory keyed by a random UUID. The browser only holds the id,
//! signed as `<uuid>.<hex hmac-sha256(secret, uuid)>`; cookies whose signature does not verify
//! are treated as absent. Sessions idle for longer than the TTL are dropped, and the store never
//! holds more than its configured number of sessions.

use axum::http::{header, HeaderMap};
use hmac::{Hmac, Mac};
use predictor_core::{DiabetesType, PatientRecord};
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Idle time after which a session is discarded.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on concurrently stored sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Per-client values carried between requests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionData {
    /// Latest diagnosis label.
    pub diabetes_type: Option<DiabetesType>,
    /// Record behind the latest successful prediction.
    pub user_input: Option<PatientRecord>,
}

struct Entry {
    data: SessionData,
    touched: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    mac: Hmac<Sha256>,
    ttl: Duration,
    max_sessions: usize,
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
}

impl SessionStore {
    pub fn new(secret: &str) -> Self {
        Self::with_limits(secret, DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limits(secret: &str, ttl: Duration, max_sessions: usize) -> Self {
        Self {
            mac: Hmac::<Sha256>::new_from_slice(secret.as_bytes())
                .expect("HMAC can take any size"),
            ttl,
            max_sessions: max_sessions.max(1),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Session id from the request cookie, if present and correctly signed.
    pub fn session_id(&self, headers: &HeaderMap) -> Option<Uuid> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| self.verify(value))
    }

    /// Snapshot of the session's data, unless it has expired.
    pub fn get(&self, id: Uuid) -> Option<SessionData> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .get(&id)
            .filter(|entry| entry.touched.elapsed() < self.ttl)
            .map(|entry| entry.data.clone())
    }

    /// Apply `f` to the session `id`, creating a fresh session when `id` is `None`, unknown or
    /// expired. Returns the id the data was stored under.
    ///
    /// Expired sessions are purged first; if the store is still full the least recently
    /// touched session is evicted to make room for a new one.
    pub fn update<F>(&self, id: Option<Uuid>, f: F) -> Uuid
    where
        F: FnOnce(&mut SessionData),
    {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let ttl = self.ttl;
        sessions.retain(|_, entry| now.duration_since(entry.touched) < ttl);

        let id = match id.filter(|id| sessions.contains_key(id)) {
            Some(id) => id,
            None => {
                if sessions.len() >= self.max_sessions {
                    let oldest = sessions
                        .iter()
                        .min_by_key(|(_, entry)| entry.touched)
                        .map(|(id, _)| *id);
                    if let Some(oldest) = oldest {
                        sessions.remove(&oldest);
                        tracing::debug!("session store full, evicted {}", oldest);
                    }
                }
                Uuid::new_v4()
            }
        };

        let entry = sessions.entry(id).or_insert_with(|| Entry {
            data: SessionData::default(),
            touched: now,
        });
        entry.touched = now;
        f(&mut entry.data);
        id
    }

    /// Number of live (unexpired) sessions.
    pub fn len(&self) -> usize {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions
            .values()
            .filter(|entry| entry.touched.elapsed() < self.ttl)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `Set-Cookie` header value for `id`.
    pub fn cookie(&self, id: Uuid) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            self.sign(id)
        )
    }

    fn sign(&self, id: Uuid) -> String {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        format!("{}.{}", id.simple(), hex::encode(mac.finalize().into_bytes()))
    }

    fn verify(&self, value: &str) -> Option<Uuid> {
        let (id, signature) = value.split_once('.')?;
        let id = Uuid::parse_str(id).ok()?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok().map(|_| id)
    }
}

/// Random secret for processes started without one configured.
pub fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[test]
    fn signed_cookie_round_trips() {
        let store = SessionStore::new("secret");
        let id = store.update(None, |s| s.diabetes_type = Some(DiabetesType::Type1));

        let headers = headers_with(&format!("theme=dark; {}", cookie_pair(&store.cookie(id))));
        assert_eq!(store.session_id(&headers), Some(id));
        assert_eq!(
            store.get(id).and_then(|s| s.diabetes_type),
            Some(DiabetesType::Type1)
        );
    }

    #[test]
    fn cookie_from_another_secret_is_ignored() {
        let ours = SessionStore::new("secret");
        let theirs = SessionStore::new("other");
        let id = theirs.update(None, |_| {});

        let headers = headers_with(&cookie_pair(&theirs.cookie(id)));
        assert_eq!(ours.session_id(&headers), None);
    }

    #[test]
    fn tampered_or_malformed_cookies_are_ignored() {
        let store = SessionStore::new("secret");
        assert_eq!(store.session_id(&headers_with("session=garbage")), None);
        let forged = format!("session={}.{}", Uuid::new_v4().simple(), "00".repeat(32));
        assert_eq!(store.session_id(&headers_with(&forged)), None);
        assert_eq!(store.session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn update_reuses_known_sessions_and_replaces_unknown() {
        let store = SessionStore::new("secret");
        let id = store.update(None, |s| s.diabetes_type = Some(DiabetesType::Type2));
        let again = store.update(Some(id), |s| {
            s.diabetes_type = Some(DiabetesType::NonDiabetic)
        });
        assert_eq!(id, again);
        assert_eq!(
            store.get(id).and_then(|s| s.diabetes_type),
            Some(DiabetesType::NonDiabetic)
        );

        let stranger = Uuid::new_v4();
        assert_ne!(store.update(Some(stranger), |_| {}), stranger);
    }

    #[test]
    fn signature_is_hmac_sha256_of_the_id() {
        let store = SessionStore::new("secret");
        let id = store.update(None, |_| {});
        let set_cookie = store.cookie(id);
        let value = cookie_pair(&set_cookie)
            .trim_start_matches("session=")
            .to_string();
        let (_, signature) = value.split_once('.').unwrap();

        let mut mac = Hmac::<Sha256>::new_from_slice(b"secret").unwrap();
        mac.update(id.as_bytes());
        assert_eq!(signature, hex::encode(mac.finalize().into_bytes()));
    }

    #[test]
    fn expired_sessions_are_dropped() {
        let store = SessionStore::with_limits("secret", Duration::ZERO, 10);
        let id = store.update(None, |s| s.diabetes_type = Some(DiabetesType::Type2));

        assert_eq!(store.get(id), None);
        assert!(store.is_empty());
        // An expired id is not revived.
        assert_ne!(store.update(Some(id), |_| {}), id);
    }

    #[test]
    fn full_store_evicts_to_stay_within_capacity() {
        let store = SessionStore::with_limits("secret", DEFAULT_SESSION_TTL, 2);
        let ids: Vec<Uuid> = (0..5).map(|_| store.update(None, |_| {})).collect();

        assert_eq!(store.len(), 2);
        let newest = ids[4];
        assert!(store.get(newest).is_some());
    }

    #[test]
    fn known_session_is_not_evicted_when_touched() {
        let store = SessionStore::with_limits("secret", DEFAULT_SESSION_TTL, 1);
        let id = store.update(None, |_| {});
        assert_eq!(store.update(Some(id), |_| {}), id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn generated_secrets_differ() {
        assert_ne!(generate_secret(), generate_secret());
    }
}
