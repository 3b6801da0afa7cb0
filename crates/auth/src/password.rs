//! One-way salted password hashing (Argon2id, PHC string encoding).
//!
//! The encoded hash carries algorithm, version, cost parameters, salt and
//! digest, so verification needs nothing but the stored string.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _, Version};

use crate::AuthError;

/// Tunable cost of a password hash.
///
/// Raising any of these slows down both legitimate verification and offline
/// guessing; tune, don't eliminate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HashCost {
    /// Memory size in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl HashCost {
    /// Smallest cost Argon2 accepts. Only meant for tests.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(cost: HashCost) -> Result<Self, AuthError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| AuthError::Internal(format!("invalid hash cost: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
    }

    /// Check `plaintext` against an encoded hash.
    ///
    /// Uses the parameters embedded in `hashed`, not this hasher's cost, so
    /// hashes survive cost changes. Malformed input yields `false`.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed) else {
            return false;
        };
        self.argon2().verify_password(plaintext.as_bytes(), &parsed).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(HashCost::minimal()).unwrap()
    }

    #[test]
    fn hash_is_self_describing_and_not_plaintext() {
        let hashed = hasher().hash("Str0ng!Pw").unwrap();
        assert!(hashed.starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
        assert!(!hashed.contains("Str0ng!Pw"));
    }

    #[test]
    fn same_password_gets_a_fresh_salt_each_time() {
        let h = hasher();
        let a = h.hash("Str0ng!Pw").unwrap();
        let b = h.hash("Str0ng!Pw").unwrap();
        assert_ne!(a, b);
        assert!(h.verify("Str0ng!Pw", &a));
        assert!(h.verify("Str0ng!Pw", &b));
    }

    #[test]
    fn verify_uses_embedded_cost() {
        let weak = hasher();
        let strong = PasswordHasher::new(HashCost {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let hashed = weak.hash("secret").unwrap();
        assert!(strong.verify("secret", &hashed));
    }

    #[test]
    fn malformed_hash_is_rejected_without_error() {
        let h = hasher();
        assert!(!h.verify("anything", ""));
        assert!(!h.verify("anything", "not-a-phc-string"));
        assert!(!h.verify("anything", "$argon2id$v=19$m=8,t=1,p=1$short"));
    }

    #[test]
    fn invalid_cost_is_reported() {
        let err = PasswordHasher::new(HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn verify_accepts_own_hash_and_rejects_others(p in ".{0,40}", q in ".{0,40}") {
            let h = hasher();
            let hashed = h.hash(&p).unwrap();
            prop_assert!(h.verify(&p, &hashed));
            if p != q {
                prop_assert!(!h.verify(&q, &hashed));
            }
        }
    }
}
