//! Demo user directory
//!
//! Accounts live in memory for the lifetime of the store and are never
//! persisted. Passwords are kept as bcrypt hashes. This is demonstration
//! gating, not access control.

use std::collections::HashMap;
use std::fmt;

pub const DEMO_USERNAME: &str = "admin";
pub const DEMO_PASSWORD: &str = "adminpass";

const HASH_COST: u32 = 10;

/// Registration failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    UsernameTaken(String),
    PasswordMismatch,
    /// Username or password left blank
    EmptyField(&'static str),
    Hashing(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UsernameTaken(name) => {
                write!(f, "Username '{name}' already exists. Please choose a different one.")
            }
            AuthError::PasswordMismatch => write!(f, "Passwords do not match."),
            AuthError::EmptyField(field) => write!(f, "The {field} must not be empty."),
            AuthError::Hashing(reason) => write!(f, "Could not hash password: {reason}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Where accounts are kept
pub trait UserStore {
    fn register(&mut self, username: &str, password: &str, confirm: &str) -> Result<(), AuthError>;

    /// True when the username exists and the password matches
    fn verify(&self, username: &str, password: &str) -> bool;

    fn contains(&self, username: &str) -> bool;
}

/// bcrypt hash with its salt and cost embedded
#[derive(Debug, Clone, PartialEq, Eq)]
struct Credential {
    hash: String,
}

impl Credential {
    fn new(password: &str) -> Result<Self, AuthError> {
        let hash =
            bcrypt::hash(password, HASH_COST).map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self { hash })
    }

    fn matches(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.hash).unwrap_or(false)
    }
}

/// Process-local user directory
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, Credential>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding only the demo account
    pub fn with_demo_user() -> Result<Self, AuthError> {
        let mut store = Self::new();
        store
            .users
            .insert(DEMO_USERNAME.to_string(), Credential::new(DEMO_PASSWORD)?);
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn register(&mut self, username: &str, password: &str, confirm: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::EmptyField("username"));
        }
        if password.is_empty() {
            return Err(AuthError::EmptyField("password"));
        }
        if self.users.contains_key(username) {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }
        self.users
            .insert(username.to_string(), Credential::new(password)?);
        Ok(())
    }

    fn verify(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username.trim())
            .is_some_and(|c| c.matches(password))
    }

    fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username.trim())
    }
}
