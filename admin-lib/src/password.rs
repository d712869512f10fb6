use argon2::{Config, Variant};

/// Argon2 hasher with tunable cost. Each hash gets a fresh random salt and is
/// stored in encoded form, so verification needs nothing but the hash string.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    memory_kib: u32,
    iterations: u32,
}

impl PasswordHasher {
    pub const fn new(memory_kib: u32, iterations: u32) -> PasswordHasher {
        PasswordHasher {
            memory_kib,
            iterations,
        }
    }

    pub fn encode_password(&self, password: &str) -> Result<String, argon2::Error> {
        let config = Config {
            mem_cost: self.memory_kib,
            time_cost: self.iterations,
            variant: Variant::Argon2id,
            ..Config::default()
        };
        let salt: [u8; 32] = rand::random();
        argon2::hash_encoded(password.as_bytes(), &salt, &config)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        let config = Config::default();
        PasswordHasher::new(config.mem_cost, config.time_cost)
    }
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, argon2::Error> {
    argon2::verify_encoded(password_hash, password.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::{verify_password, PasswordHasher};

    #[test]
    fn hash_verifies_only_original_password() {
        let hasher = PasswordHasher::new(64, 1);
        let hash = hasher.encode_password("secret1").unwrap();

        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let hasher = PasswordHasher::new(64, 1);
        let first = hasher.encode_password("secret1").unwrap();
        let second = hasher.encode_password("secret1").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("secret1", &second).unwrap());
    }

    #[test]
    fn cost_parameters_are_encoded() {
        let hasher = PasswordHasher::new(128, 2);
        let hash = hasher.encode_password("secret1").unwrap();
        assert!(hash.contains("m=128"), "hash was {}", hash);
        assert!(hash.contains("t=2"), "hash was {}", hash);
    }

    #[test]
    fn hashes_use_argon2id() {
        let hash = PasswordHasher::new(64, 1).encode_password("secret1").unwrap();
        assert!(hash.starts_with("$argon2id$"), "hash was {}", hash);
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("secret1", "not a real hash").is_err());
    }
}
