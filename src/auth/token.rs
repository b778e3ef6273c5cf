use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::UserId;
use crate::settings::AuthSettings;

use super::{AuthError, Authenticator, UserDirectory};

/// Tokens of the form `token_<user id>` are accepted verbatim when demo
/// tokens are enabled.
pub const DEMO_TOKEN_PREFIX: &str = "token_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Option<String>,
    /// Checked only when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Resolves demo `token_<id>` credentials and HMAC-signed JWTs whose `sub`
/// claim names the user, then confirms the user is registered.
pub struct TokenAuthenticator {
    directory: Arc<dyn UserDirectory>,
    decoding_key: Option<DecodingKey>,
    validation: Validation,
    allow_demo_tokens: bool,
}

impl TokenAuthenticator {
    pub fn new(settings: &AuthSettings, directory: Arc<dyn UserDirectory>) -> Result<Self> {
        let algorithm: Algorithm = settings
            .jwt_algorithm
            .parse()
            .with_context(|| format!("unsupported JWT algorithm '{}'", settings.jwt_algorithm))?;

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            bail!(
                "JWT algorithm {:?} needs a key pair; only HS256/HS384/HS512 are supported",
                algorithm
            );
        }

        let decoding_key = settings
            .jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()));

        if decoding_key.is_none() {
            warn!("No JWT secret configured; only demo tokens can authenticate");
        }

        let mut validation = Validation::new(algorithm);
        validation.required_spec_claims.clear();

        Ok(Self {
            directory,
            decoding_key,
            validation,
            allow_demo_tokens: settings.allow_demo_tokens,
        })
    }

    fn user_id_from_token(&self, token: &str) -> Result<String, AuthError> {
        if self.allow_demo_tokens {
            if let Some(user_id) = token.strip_prefix(DEMO_TOKEN_PREFIX) {
                return Ok(user_id.to_string());
            }
        }

        let key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| AuthError::InvalidToken("no signing secret configured".into()))?;

        let data = decode::<TokenClaims>(token, key, &self.validation)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))?;

        data.claims
            .sub
            .ok_or_else(|| AuthError::InvalidToken("token has no subject".into()))
    }
}

fn strip_scheme(credential: &str) -> &str {
    let trimmed = credential.trim();
    match trimmed.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => trimmed,
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn resolve(&self, credential: &str) -> Result<UserId, AuthError> {
        let token = strip_scheme(credential);
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let user_id = self.user_id_from_token(token)?;
        if user_id.is_empty() {
            return Err(AuthError::InvalidToken("empty user id".into()));
        }

        let exists = self
            .directory
            .user_exists(&user_id)
            .await
            .map_err(AuthError::Directory)?;
        if !exists {
            debug!("Token names unknown user {user_id}");
            return Err(AuthError::UnknownUser(user_id));
        }

        Ok(UserId::new(user_id))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use anyhow::anyhow;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    const SECRET: &str = "test-secret";

    struct KnownUsers(HashSet<String>);

    #[async_trait]
    impl UserDirectory for KnownUsers {
        async fn user_exists(&self, user_id: &str) -> anyhow::Result<bool> {
            Ok(self.0.contains(user_id))
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl UserDirectory for BrokenDirectory {
        async fn user_exists(&self, _user_id: &str) -> anyhow::Result<bool> {
            Err(anyhow!("connection refused"))
        }
    }

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: Some(SECRET.into()),
            jwt_algorithm: "HS256".into(),
            allow_demo_tokens: true,
        }
    }

    fn authenticator(settings: &AuthSettings) -> TokenAuthenticator {
        let users = KnownUsers(["alice".to_string()].into_iter().collect());
        TokenAuthenticator::new(settings, Arc::new(users)).unwrap()
    }

    fn jwt(sub: Option<&str>, expires_in: Duration, secret: &str) -> String {
        let claims = TokenClaims {
            sub: sub.map(str::to_string),
            exp: Some((Utc::now() + expires_in).timestamp() as u64),
        };
        sign(claims, secret)
    }

    fn sign(claims: TokenClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn demo_token_resolves_to_embedded_id() {
        let auth = authenticator(&settings());
        let user = auth.resolve("Bearer token_alice").await.unwrap();
        assert_eq!(user, UserId::new("alice"));
    }

    #[tokio::test]
    async fn demo_tokens_can_be_disabled() {
        let mut settings = settings();
        settings.allow_demo_tokens = false;
        let auth = authenticator(&settings);
        assert!(matches!(
            auth.resolve("token_alice").await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn valid_jwt_resolves_subject() {
        let auth = authenticator(&settings());
        let token = jwt(Some("alice"), Duration::minutes(60), SECRET);
        assert_eq!(auth.resolve(&token).await.unwrap(), UserId::new("alice"));
    }

    #[tokio::test]
    async fn expired_or_forged_jwt_is_rejected() {
        let auth = authenticator(&settings());

        let expired = jwt(Some("alice"), Duration::minutes(-10), SECRET);
        assert!(matches!(
            auth.resolve(&expired).await,
            Err(AuthError::InvalidToken(_))
        ));

        let forged = jwt(Some("alice"), Duration::minutes(60), "other-secret");
        assert!(matches!(
            auth.resolve(&forged).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn jwt_without_expiry_is_accepted() {
        let auth = authenticator(&settings());
        let token = sign(
            TokenClaims {
                sub: Some("alice".into()),
                exp: None,
            },
            SECRET,
        );
        assert_eq!(auth.resolve(&token).await.unwrap(), UserId::new("alice"));
    }

    #[tokio::test]
    async fn jwt_without_subject_is_rejected() {
        let auth = authenticator(&settings());
        let token = jwt(None, Duration::minutes(60), SECRET);
        assert!(matches!(
            auth.resolve(&token).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn unknown_or_empty_users_are_rejected() {
        let auth = authenticator(&settings());
        assert!(matches!(
            auth.resolve("token_mallory").await,
            Err(AuthError::UnknownUser(id)) if id == "mallory"
        ));
        assert!(matches!(
            auth.resolve("token_").await,
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            auth.resolve("   ").await,
            Err(AuthError::MissingCredential)
        ));
    }

    #[tokio::test]
    async fn directory_failure_is_reported() {
        let auth = TokenAuthenticator::new(&settings(), Arc::new(BrokenDirectory)).unwrap();
        assert!(matches!(
            auth.resolve("token_alice").await,
            Err(AuthError::Directory(_))
        ));
    }

    #[tokio::test]
    async fn missing_secret_only_allows_demo_tokens() {
        let mut settings = settings();
        settings.jwt_secret = None;
        let auth = authenticator(&settings);

        assert!(auth.resolve("token_alice").await.is_ok());
        let token = jwt(Some("alice"), Duration::minutes(60), SECRET);
        assert!(matches!(
            auth.resolve(&token).await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn asymmetric_algorithms_are_refused() {
        let mut settings = settings();
        settings.jwt_algorithm = "RS256".into();
        let users = KnownUsers(HashSet::new());
        assert!(TokenAuthenticator::new(&settings, Arc::new(users)).is_err());

        settings.jwt_algorithm = "nope".into();
        let users = KnownUsers(HashSet::new());
        assert!(TokenAuthenticator::new(&settings, Arc::new(users)).is_err());
    }
}
