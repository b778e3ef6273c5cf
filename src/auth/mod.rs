//! Authentication collaborator: turns a bearer credential into a [`UserId`].
//!
//! The interview core only sees the resulting identity. Which token scheme
//! backs it is decided here, behind the [`Authenticator`] trait.

mod token;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::Database;
use crate::models::UserId;

pub use token::{TokenAuthenticator, TokenClaims, DEMO_TOKEN_PREFIX};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("user {0} not found")]
    UnknownUser(String),

    #[error("user lookup failed: {0:#}")]
    Directory(anyhow::Error),
}

/// Resolves a bearer credential to the identity that owns the request.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn resolve(&self, credential: &str) -> Result<UserId, AuthError>;
}

/// Answers whether an identity named by a token is a registered user.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, user_id: &str) -> anyhow::Result<bool>;
}

#[async_trait]
impl UserDirectory for Database {
    async fn user_exists(&self, user_id: &str) -> anyhow::Result<bool> {
        Ok(self.find_user(user_id).await?.is_some())
    }
}
