//! Sessions
//!
//! Token issuance, refresh and storage are delegated to an external backend; this module
//! defines the seam the storefront consumes, plus an in-memory provider for demos and tests.

use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors surfaced by a session provider.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The username/password pair was not accepted.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// A signed-in storefront user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSession {
    /// Account username.
    pub username: String,

    /// Redeemable loyalty point balance, in won.
    pub points_balance: i64,
}

/// The authentication seam consumed by checkout.
///
/// The storefront only ever asks who is signed in; how sessions are issued, stored and
/// refreshed is the collaborator's business.
#[automock]
pub trait SessionProvider {
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserSession>;

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCredentials`] if the backend rejects the pair.
    fn login(&mut self, username: &str, password: &str) -> Result<UserSession, SessionError>;

    /// Drop the current session.
    fn logout(&mut self);
}

/// Account record held by [`MemorySessions`].
#[derive(Clone, Debug)]
struct Account {
    password: String,
    points_balance: i64,
}

/// An in-memory session provider for demos and tests.
///
/// Real deployments speak to the storefront backend through [`SessionProvider`]; this
/// stand-in checks credentials against a fixed account table.
#[derive(Debug, Default)]
pub struct MemorySessions {
    accounts: FxHashMap<String, Account>,
    current: Option<UserSession>,
}

impl MemorySessions {
    /// Create an empty provider with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account with the given credentials and point balance.
    #[must_use]
    pub fn with_account(mut self, username: &str, password: &str, points_balance: i64) -> Self {
        self.accounts.insert(
            username.to_string(),
            Account {
                password: password.to_string(),
                points_balance,
            },
        );

        self
    }
}

impl SessionProvider for MemorySessions {
    fn current_user(&self) -> Option<UserSession> {
        self.current.clone()
    }

    fn login(&mut self, username: &str, password: &str) -> Result<UserSession, SessionError> {
        let account = self
            .accounts
            .get(username)
            .filter(|account| account.password == password)
            .ok_or(SessionError::InvalidCredentials)?;

        let session = UserSession {
            username: username.to_string(),
            points_balance: account.points_balance,
        };

        self.current = Some(session.clone());

        Ok(session)
    }

    fn logout(&mut self) {
        self.current = None;
    }
}
