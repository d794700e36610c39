// Password hashing and random passwords

use crate::{AuthError, Result};
use rand::Rng;
use tracing::debug;

/// Lowest bcrypt cost accepted
pub const MIN_COST: u32 = 4;

/// Highest bcrypt cost accepted
pub const MAX_COST: u32 = 31;

/// Cost used by [`PasswordHelper::new`]
pub const DEFAULT_COST: u32 = 10;

/// Characters used by `generate_random_password`: no `0/O`, `1/l/I` or `i/L` lookalikes
pub const UNAMBIGUOUS_CHARS: &str =
    "ABCDEFGHJKMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789!@#$%^&*";

/// Default length of generated passwords
pub const DEFAULT_PASSWORD_LENGTH: usize = 8;

/// Bcrypt password hasher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHelper {
    cost: u32,
}

impl PasswordHelper {
    /// Create a helper hashing with the default cost
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create a helper hashing with `cost` (4-31)
    pub fn with_cost(cost: u32) -> Result<Self> {
        check_cost(cost)?;
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with this helper's cost
    pub fn hash(&self, password: &str) -> Result<String> {
        Self::generate_hash(password, self.cost)
    }

    /// Hash a password with bcrypt
    pub fn generate_hash(password: &str, cost: u32) -> Result<String> {
        check_cost(cost)?;
        let hash = bcrypt::hash(password, cost)
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))?;
        debug!("Generated bcrypt hash with cost {}", cost);
        Ok(hash)
    }

    /// Check a password against a bcrypt hash
    pub fn compare_to_hash(password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(|e| AuthError::PasswordVerifyError(e.to_string()))
    }

    /// Random string of `length` characters drawn from `chars`
    pub fn generate_random_string(length: usize, chars: &str) -> Result<String> {
        Self::generate_random_string_with(&mut rand::rng(), length, chars)
    }

    /// Same as [`generate_random_string`](Self::generate_random_string) with a caller-supplied RNG
    pub fn generate_random_string_with<R: Rng + ?Sized>(
        rng: &mut R,
        length: usize,
        chars: &str,
    ) -> Result<String> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(AuthError::EmptyCharset);
        }
        Ok((0..length)
            .map(|_| chars[rng.random_range(0..chars.len())])
            .collect())
    }

    /// Random password drawn from [`UNAMBIGUOUS_CHARS`]
    pub fn generate_random_password(length: usize) -> String {
        let mut rng = rand::rng();
        let chars: Vec<char> = UNAMBIGUOUS_CHARS.chars().collect();
        (0..length)
            .map(|_| chars[rng.random_range(0..chars.len())])
            .collect()
    }
}

impl Default for PasswordHelper {
    fn default() -> Self {
        Self::new()
    }
}

fn check_cost(cost: u32) -> Result<()> {
    if (MIN_COST..=MAX_COST).contains(&cost) {
        Ok(())
    } else {
        Err(AuthError::InvalidCost(cost))
    }
}
