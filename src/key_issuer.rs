//! API key issuance and per-key authorization.
//!
//! Cadet identities may obtain at most [`MAX_CADET_REQUESTS_PER_WINDOW`] keys
//! per window, and each cadet key may be presented that many times per
//! window. Captains are served from a fixed allow-list and are never counted.
//!
//! A single window is tracked for the whole process. When it elapses every
//! counter is cleared at once and the next window starts at the moment of
//! the reset.

use crate::domain::{Role, ServiceError};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

// ---

/// Issuance and usage cap for a cadet within one window.
pub const MAX_CADET_REQUESTS_PER_WINDOW: u32 = 5;

/// Length of the shared counting window, in minutes.
pub const WINDOW_MINUTES: i64 = 30;

/// Prefix of every minted cadet key.
const CADET_KEY_PREFIX: &str = "cadetApiKey_";

/// Upper bound on memoized denials for keys the issuer never minted.
/// Denials of minted keys are always remembered.
const MAX_DENIED_UNKNOWN_KEYS: usize = 10_000;

// ---

/// A key known to the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyRecord {
    pub key: String,
    pub identity: String,
    pub role: Role,
    /// `None` means the key never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Mutable issuer state. Always accessed under [`KeyIssuer::ledger`].
#[derive(Debug)]
struct KeyLedger {
    /// Cadet identities and cadet keys share this map.
    request_counts: HashMap<String, u32>,
    window_resets_at: DateTime<Utc>,
    valid_keys: HashMap<String, ApiKeyRecord>,
    cadet_keys: HashSet<String>,
    captain_keys: HashSet<String>,
    /// Memoized negative lookups. Never cleared.
    denied_keys: HashSet<String>,
    /// How many entries of `denied_keys` were never minted.
    denied_unknown: usize,
}

impl KeyLedger {
    // ---
    /// Clears every counter once `now` passes the reset timestamp.
    fn roll_window(&mut self, now: DateTime<Utc>) {
        // ---
        if now > self.window_resets_at {
            tracing::debug!(
                cleared = self.request_counts.len(),
                "cadet request window elapsed, resetting counters"
            );
            self.request_counts.clear();
            self.window_resets_at = now + Duration::minutes(WINDOW_MINUTES);
        }
    }

    fn deny(&mut self, key: &str, reason: &str) -> ServiceError {
        // ---
        self.denied_keys.insert(key.to_string());
        ServiceError::Unauthorized(reason.to_string())
    }

    /// Memoizes a key that was never minted, up to [`MAX_DENIED_UNKNOWN_KEYS`].
    ///
    /// Past the cap the key is still denied by the known-key check, just
    /// not remembered.
    fn deny_unknown(&mut self, key: &str) -> ServiceError {
        // ---
        if self.denied_unknown < MAX_DENIED_UNKNOWN_KEYS
            && self.denied_keys.insert(key.to_string())
        {
            self.denied_unknown += 1;
            if self.denied_unknown == MAX_DENIED_UNKNOWN_KEYS {
                tracing::warn!(
                    cap = MAX_DENIED_UNKNOWN_KEYS,
                    "unknown api key denylist is full, further unknown keys are not memoized"
                );
            }
        }
        ServiceError::Unauthorized("API key is not valid.".to_string())
    }
}

/// Issues API keys and authorizes requests that present them.
///
/// Every compound check-and-update runs inside one critical section, so a
/// window rollover and the increment that follows it are never observed
/// separately by concurrent callers.
#[derive(Debug)]
pub struct KeyIssuer {
    captain_allow_list: HashSet<String>,
    cadet_key_ttl: Option<Duration>,
    ledger: Mutex<KeyLedger>,
}

impl KeyIssuer {
    // ---
    /// Creates an issuer whose captain allow-list doubles as the set of
    /// captain keys. The first window ends [`WINDOW_MINUTES`] from now.
    pub fn new<I, S>(captain_identities: I, cadet_key_ttl: Option<Duration>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // ---
        Self::starting_at(captain_identities, cadet_key_ttl, Utc::now())
    }

    fn starting_at<I, S>(
        captain_identities: I,
        cadet_key_ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // ---
        let captain_allow_list: HashSet<String> =
            captain_identities.into_iter().map(Into::into).collect();

        let valid_keys = captain_allow_list
            .iter()
            .map(|identity| {
                let record = ApiKeyRecord {
                    key: identity.clone(),
                    identity: identity.clone(),
                    role: Role::Captain,
                    expires_at: None,
                };
                (identity.clone(), record)
            })
            .collect();

        let ledger = KeyLedger {
            request_counts: HashMap::new(),
            window_resets_at: now + Duration::minutes(WINDOW_MINUTES),
            valid_keys,
            cadet_keys: HashSet::new(),
            captain_keys: captain_allow_list.clone(),
            denied_keys: HashSet::new(),
            denied_unknown: 0,
        };

        Self {
            captain_allow_list,
            cadet_key_ttl,
            ledger: Mutex::new(ledger),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, KeyLedger> {
        // Critical sections do every fallible step before mutating, so a
        // poisoned lock still guards consistent counters.
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issues a key for `identity` acting as `role`.
    ///
    /// # Errors
    /// - [`ServiceError::InvalidRole`] for any role other than cadet/captain
    /// - [`ServiceError::Unauthorized`] for a captain outside the allow-list
    /// - [`ServiceError::RateLimited`] once a cadet reaches the window cap
    pub fn request_key(&self, identity: &str, role: &str) -> Result<ApiKeyRecord, ServiceError> {
        // ---
        self.request_key_at(identity, role, Utc::now())
    }

    fn request_key_at(
        &self,
        identity: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<ApiKeyRecord, ServiceError> {
        // ---
        match role.parse::<Role>()? {
            Role::Captain => {
                if !self.captain_allow_list.contains(identity) {
                    tracing::debug!(identity, "captain not in allow-list");
                    return Err(ServiceError::Unauthorized(
                        "Invalid captain username.".to_string(),
                    ));
                }

                Ok(ApiKeyRecord {
                    key: identity.to_string(),
                    identity: identity.to_string(),
                    role: Role::Captain,
                    expires_at: None,
                })
            }
            Role::Cadet => {
                let expires_at = self.cadet_key_expiry(now);

                let mut guard = self.ledger();
                let ledger = &mut *guard;

                ledger.roll_window(now);

                let count = ledger
                    .request_counts
                    .entry(identity.to_string())
                    .or_insert(0);
                if *count >= MAX_CADET_REQUESTS_PER_WINDOW {
                    return Err(ServiceError::RateLimited);
                }
                *count += 1;

                let key = format!("{CADET_KEY_PREFIX}{}", Uuid::new_v4());
                let record = ApiKeyRecord {
                    key: key.clone(),
                    identity: identity.to_string(),
                    role: Role::Cadet,
                    expires_at,
                };

                ledger.request_counts.insert(key.clone(), 0);
                ledger.cadet_keys.insert(key.clone());
                ledger.valid_keys.insert(key, record.clone());

                tracing::info!(identity, "issued cadet api key");
                Ok(record)
            }
        }
    }

    /// Expiry for a cadet key minted at `now`.
    ///
    /// A TTL reaching past the last representable instant never arrives, so
    /// such keys are issued without expiry.
    fn cadet_key_expiry(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        // ---
        let ttl = self.cadet_key_ttl?;
        let expires_at = now.checked_add_signed(ttl);
        if expires_at.is_none() {
            tracing::warn!(?ttl, "cadet key ttl overflows the calendar, issuing without expiry");
        }
        expires_at
    }

    /// Resolves the role of a presented key and counts the use.
    ///
    /// Denied keys are remembered; later presentations fail without further
    /// checks. Cadet keys are denied permanently once they reach the window
    /// cap. Captain keys are never counted.
    pub fn is_authorized(&self, key: &str) -> Result<Role, ServiceError> {
        // ---
        self.is_authorized_at(key, Utc::now())
    }

    fn is_authorized_at(&self, key: &str, now: DateTime<Utc>) -> Result<Role, ServiceError> {
        // ---
        let mut guard = self.ledger();
        let ledger = &mut *guard;

        if ledger.denied_keys.contains(key) {
            return Err(ServiceError::Unauthorized("API key is not valid.".to_string()));
        }

        let known = ledger.valid_keys.get(key).map(|record| record.expires_at);
        let Some(expires_at) = known else {
            return Err(ledger.deny_unknown(key));
        };

        if expires_at.is_some_and(|at| now >= at) {
            return Err(ledger.deny(key, "API key has expired."));
        }

        let role = if ledger.cadet_keys.contains(key) {
            Role::Cadet
        } else if ledger.captain_keys.contains(key) {
            Role::Captain
        } else {
            return Err(ledger.deny(key, "API key has no role."));
        };

        if role == Role::Captain {
            return Ok(role);
        }

        ledger.roll_window(now);

        let count = ledger.request_counts.entry(key.to_string()).or_insert(0);
        if *count >= MAX_CADET_REQUESTS_PER_WINDOW {
            return Err(ledger.deny(key, "API key request limit reached for the half-hour period."));
        }
        *count += 1;

        Ok(role)
    }

    /// Current count for an identity or cadet key.
    pub fn request_count(&self, identity_or_key: &str) -> u32 {
        // ---
        self.ledger()
            .request_counts
            .get(identity_or_key)
            .copied()
            .unwrap_or(0)
    }

    /// End of the current counting window.
    pub fn window_resets_at(&self) -> DateTime<Utc> {
        // ---
        self.ledger().window_resets_at
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::sync::Arc;

    fn issuer_at(now: DateTime<Utc>) -> KeyIssuer {
        // ---
        KeyIssuer::starting_at(["captainApiKey1", "captainApiKey2"], None, now)
    }

    #[test]
    fn sixth_cadet_request_in_window_is_rate_limited() {
        // ---
        let now = Utc::now();
        let issuer = issuer_at(now);

        for _ in 0..MAX_CADET_REQUESTS_PER_WINDOW {
            let record = issuer.request_key_at("alice", "cadet", now).unwrap();
            assert!(record.key.starts_with(CADET_KEY_PREFIX));
            assert_eq!(record.role, Role::Cadet);
        }

        assert_eq!(
            issuer.request_key_at("alice", "cadet", now),
            Err(ServiceError::RateLimited)
        );
        // Other identities keep their own quota.
        assert!(issuer.request_key_at("bob", "cadet", now).is_ok());
    }

    #[test]
    fn issued_cadet_keys_are_unique() {
        // ---
        let issuer = KeyIssuer::new(Vec::<String>::new(), None);
        let a = issuer.request_key("alice", "cadet").unwrap();
        let b = issuer.request_key("alice", "cadet").unwrap();
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn window_rollover_resets_all_identities() {
        // ---
        let start = Utc::now();
        let issuer = issuer_at(start);

        for _ in 0..MAX_CADET_REQUESTS_PER_WINDOW {
            issuer.request_key_at("alice", "cadet", start).unwrap();
        }
        issuer.request_key_at("bob", "cadet", start).unwrap();
        assert!(issuer.request_key_at("alice", "cadet", start).is_err());

        let later = start + Duration::minutes(WINDOW_MINUTES) + Duration::seconds(1);
        issuer.request_key_at("alice", "cadet", later).unwrap();

        assert_eq!(issuer.request_count("alice"), 1);
        assert_eq!(issuer.request_count("bob"), 0);
        assert_eq!(
            issuer.window_resets_at(),
            later + Duration::minutes(WINDOW_MINUTES)
        );
    }

    #[test]
    fn window_does_not_reset_at_exact_boundary() {
        // ---
        let start = Utc::now();
        let issuer = issuer_at(start);
        for _ in 0..MAX_CADET_REQUESTS_PER_WINDOW {
            issuer.request_key_at("alice", "cadet", start).unwrap();
        }

        let boundary = start + Duration::minutes(WINDOW_MINUTES);
        assert_eq!(
            issuer.request_key_at("alice", "cadet", boundary),
            Err(ServiceError::RateLimited)
        );
    }

    #[test]
    fn captain_in_allow_list_gets_identity_as_key() {
        // ---
        let issuer = issuer_at(Utc::now());

        // Never counted, so any number of requests succeed.
        for _ in 0..10 {
            let record = issuer.request_key("captainApiKey1", "captain").unwrap();
            assert_eq!(record.key, "captainApiKey1");
            assert_eq!(record.role, Role::Captain);
        }
        assert_eq!(issuer.request_count("captainApiKey1"), 0);
    }

    #[test]
    fn unknown_captain_is_always_denied() {
        // ---
        let issuer = issuer_at(Utc::now());
        for _ in 0..10 {
            assert!(matches!(
                issuer.request_key("stowaway", "captain"),
                Err(ServiceError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn unknown_role_is_invalid() {
        // ---
        let issuer = issuer_at(Utc::now());
        assert_eq!(
            issuer.request_key("alice", "admiral"),
            Err(ServiceError::InvalidRole("admiral".to_string()))
        );
        assert_eq!(issuer.request_count("alice"), 0);
    }

    #[test]
    fn cadet_key_authorizes_until_cap_then_stays_denied() {
        // ---
        let start = Utc::now();
        let issuer = issuer_at(start);
        let key = issuer.request_key_at("alice", "cadet", start).unwrap().key;

        for _ in 0..MAX_CADET_REQUESTS_PER_WINDOW {
            assert_eq!(issuer.is_authorized_at(&key, start), Ok(Role::Cadet));
        }
        assert!(matches!(
            issuer.is_authorized_at(&key, start),
            Err(ServiceError::Unauthorized(_))
        ));

        // The denial is memoized and survives the next window.
        let later = start + Duration::minutes(WINDOW_MINUTES * 2);
        assert!(matches!(
            issuer.is_authorized_at(&key, later),
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[test]
    fn captain_key_is_always_authorized() {
        // ---
        let issuer = issuer_at(Utc::now());
        for _ in 0..20 {
            assert_eq!(issuer.is_authorized("captainApiKey2"), Ok(Role::Captain));
        }
    }

    #[test]
    fn unknown_key_is_denied() {
        // ---
        let issuer = issuer_at(Utc::now());
        assert!(issuer.is_authorized("cadetApiKey_forged").is_err());
        assert!(issuer.is_authorized("cadetApiKey_forged").is_err());
    }

    #[test]
    fn expired_cadet_key_is_denied() {
        // ---
        let start = Utc::now();
        let issuer = KeyIssuer::starting_at(["captainApiKey1"], Some(Duration::minutes(5)), start);
        let record = issuer.request_key_at("alice", "cadet", start).unwrap();
        assert_eq!(record.expires_at, Some(start + Duration::minutes(5)));

        assert!(issuer.is_authorized_at(&record.key, start).is_ok());
        assert!(matches!(
            issuer.is_authorized_at(&record.key, start + Duration::minutes(5)),
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[test]
    fn window_rollover_restores_cadet_key_usage() {
        // ---
        let start = Utc::now();
        let issuer = issuer_at(start);
        let key = issuer.request_key_at("alice", "cadet", start).unwrap().key;
        assert_eq!(issuer.request_count("alice"), 1);

        for _ in 0..4 {
            assert_eq!(issuer.is_authorized_at(&key, start), Ok(Role::Cadet));
        }
        assert_eq!(issuer.request_count(&key), 4);

        // The first presentation after the window clears every counter,
        // so the key gets a full quota again.
        let later = start + Duration::minutes(WINDOW_MINUTES) + Duration::seconds(1);
        for _ in 0..MAX_CADET_REQUESTS_PER_WINDOW {
            assert_eq!(issuer.is_authorized_at(&key, later), Ok(Role::Cadet));
        }
        assert_eq!(issuer.request_count(&key), MAX_CADET_REQUESTS_PER_WINDOW);
        assert_eq!(issuer.request_count("alice"), 0);
        assert_eq!(
            issuer.window_resets_at(),
            later + Duration::minutes(WINDOW_MINUTES)
        );
    }

    #[test]
    fn oversized_ttl_issues_key_without_panicking() {
        // ---
        let now = Utc::now();
        let issuer = KeyIssuer::starting_at(
            ["captainApiKey1"],
            Some(Duration::minutes(1_000_000_000_000)),
            now,
        );

        let record = issuer.request_key_at("alice", "cadet", now).unwrap();
        assert_eq!(record.expires_at, None);
        assert_eq!(issuer.request_count("alice"), 1);
        assert_eq!(issuer.is_authorized_at(&record.key, now), Ok(Role::Cadet));
    }

    #[test]
    fn unknown_key_memo_is_capped() {
        // ---
        let issuer = issuer_at(Utc::now());

        for i in 0..MAX_DENIED_UNKNOWN_KEYS + 50 {
            assert!(issuer.is_authorized(&format!("forged-{i}")).is_err());
        }
        assert_eq!(issuer.ledger().denied_keys.len(), MAX_DENIED_UNKNOWN_KEYS);

        // Keys past the cap are still denied.
        assert!(issuer.is_authorized("forged-last").is_err());

        // Minted keys that exhaust their quota are still memoized.
        let now = Utc::now();
        let key = issuer.request_key_at("alice", "cadet", now).unwrap().key;
        for _ in 0..=MAX_CADET_REQUESTS_PER_WINDOW {
            let _ = issuer.is_authorized_at(&key, now);
        }
        assert!(issuer.ledger().denied_keys.contains(&key));
    }

    #[test]
    fn concurrent_requests_never_exceed_cap() {
        // ---
        let issuer = Arc::new(issuer_at(Utc::now()));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let issuer = Arc::clone(&issuer);
                std::thread::spawn(move || issuer.request_key("alice", "cadet").is_ok())
            })
            .collect();

        let granted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(granted, MAX_CADET_REQUESTS_PER_WINDOW as usize);
    }
}
