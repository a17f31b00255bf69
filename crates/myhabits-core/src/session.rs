//! Users, the active session, and the login/registration gate.
//!
//! The session is an explicit value: callers hold the current [`Session`],
//! hand it to [`AuthGate`] and keep whatever comes back. The gate mirrors each
//! transition into the store's `current_user` pointer so the next process can
//! [`AuthGate::restore`] it.
//!
//! Credentials are stored and compared in plaintext. There is no hashing,
//! salting or lockout; treat the user list as test data, not secrets.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::storage::{HabitStore, KvStore};

/// Minimum password length accepted by registration pre-validation.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: NaiveDateTime,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
            created_at: Local::now().naive_local(),
        }
    }
}

/// Who is logged in, if anyone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::LoggedIn(user) => Some(user),
            Session::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn(_))
    }
}

/// Why a login or registration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthRejection {
    InvalidCredentials,
    EmailTaken,
}

impl std::fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthRejection::InvalidCredentials => f.write_str("Invalid email or password"),
            AuthRejection::EmailTaken => f.write_str("Email already exists"),
        }
    }
}

/// Result of a gate transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Accepted(Session),
    /// Refused; carries the unchanged session.
    Rejected {
        session: Session,
        reason: AuthRejection,
    },
}

impl AuthOutcome {
    pub fn session(&self) -> &Session {
        match self {
            AuthOutcome::Accepted(session) => session,
            AuthOutcome::Rejected { session, .. } => session,
        }
    }

    pub fn into_session(self) -> Session {
        match self {
            AuthOutcome::Accepted(session) => session,
            AuthOutcome::Rejected { session, .. } => session,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, AuthOutcome::Accepted(_))
    }
}

/// Session transitions backed by a habit store.
pub struct AuthGate<'a, S: KvStore> {
    store: &'a HabitStore<S>,
}

impl<'a, S: KvStore> AuthGate<'a, S> {
    pub fn new(store: &'a HabitStore<S>) -> Self {
        Self { store }
    }

    /// Session persisted by the previous run.
    pub fn restore(&self) -> Result<Session> {
        Ok(match self.store.current_session()? {
            Some(user) => Session::LoggedIn(user),
            None => Session::LoggedOut,
        })
    }

    /// `LoggedOut --authenticate ok--> LoggedIn(user)`.
    pub fn login(&self, session: Session, email: &str, password: &str) -> Result<AuthOutcome> {
        match self.store.authenticate(email, password)? {
            Some(user) => {
                self.store.set_current_session(&user)?;
                tracing::info!(user_id = %user.id, "logged in");
                Ok(AuthOutcome::Accepted(Session::LoggedIn(user)))
            }
            None => {
                tracing::info!("login rejected");
                Ok(AuthOutcome::Rejected {
                    session,
                    reason: AuthRejection::InvalidCredentials,
                })
            }
        }
    }

    /// `LoggedOut --register ok--> LoggedIn(user)`; registration logs in.
    pub fn register(&self, session: Session, user: User) -> Result<AuthOutcome> {
        if !self.store.register(user.clone())? {
            tracing::info!("registration rejected: email taken");
            return Ok(AuthOutcome::Rejected {
                session,
                reason: AuthRejection::EmailTaken,
            });
        }
        self.store.set_current_session(&user)?;
        tracing::info!(user_id = %user.id, "registered");
        Ok(AuthOutcome::Accepted(Session::LoggedIn(user)))
    }

    /// `LoggedIn(_) --logout--> LoggedOut`.
    pub fn logout(&self, session: Session) -> Result<Session> {
        if let Some(user) = session.user() {
            tracing::info!(user_id = %user.id, "logged out");
        }
        self.store.clear_session()?;
        Ok(Session::LoggedOut)
    }
}

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Login input, checked before the gate is asked.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email)?;
        require("password", &self.password)
    }
}

/// Registration input, checked before the gate is asked.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("username", &self.username)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("confirm_password", &self.confirm_password)?;

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }

    pub fn into_user(self) -> User {
        User::new(self.username, self.email, self.password)
    }
}
