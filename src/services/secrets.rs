// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Secret provider for the Fitbit OAuth client credentials.
//!
//! Cloud Run binds Secret Manager secrets into the container as environment
//! variables, so the production provider reads the environment at call
//! time rather than talking to the Secret Manager API.

use crate::error::AppError;
use crate::models::Credentials;
use async_trait::async_trait;

/// Source of named secrets.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Raw secret value for `name`.
    async fn get_secret(&self, name: &str) -> Result<String, AppError>;
}

/// Reads secrets from environment variables.
///
/// `fitbit-api-creds` is looked up as `FITBIT_API_CREDS`.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    /// Environment variable name for a secret name.
    pub fn env_var_name(secret_name: &str) -> String {
        secret_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get_secret(&self, name: &str) -> Result<String, AppError> {
        let var = Self::env_var_name(name);
        std::env::var(&var)
            .map_err(|_| AppError::SecretUnavailable(format!("{} is not set", var)))
    }
}

/// Fixed secret value (local runs and tests).
#[derive(Clone)]
pub struct StaticSecretProvider {
    value: String,
}

impl StaticSecretProvider {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn get_secret(&self, _name: &str) -> Result<String, AppError> {
        Ok(self.value.clone())
    }
}

/// Fetch and parse the OAuth client credentials.
pub async fn get_credentials(
    provider: &dyn SecretProvider,
    secret_name: &str,
) -> Result<Credentials, AppError> {
    let raw = provider.get_secret(secret_name).await?;

    let creds: Credentials = serde_json::from_str(&raw).map_err(|e| {
        AppError::SecretUnavailable(format!("secret {} is malformed: {}", secret_name, e))
    })?;

    if creds.client_id.trim().is_empty() || creds.client_secret.trim().is_empty() {
        return Err(AppError::SecretUnavailable(format!(
            "secret {} has an empty client_id or client_secret",
            secret_name
        )));
    }

    Ok(creds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        assert_eq!(
            EnvSecretProvider::env_var_name("fitbit-api-creds"),
            "FITBIT_API_CREDS"
        );
    }

    #[tokio::test]
    async fn test_get_credentials_parses_json() {
        let provider =
            StaticSecretProvider::new(r#"{"client_id": "ABC123", "client_secret": "s3cret"}"#);

        let creds = get_credentials(&provider, "fitbit-api-creds").await.unwrap();
        assert_eq!(creds.client_id, "ABC123");
        assert_eq!(creds.client_secret, "s3cret");
        assert!(!format!("{:?}", creds).contains("s3cret"));
    }

    #[tokio::test]
    async fn test_get_credentials_malformed() {
        let provider = StaticSecretProvider::new("not json");
        assert!(matches!(
            get_credentials(&provider, "fitbit-api-creds").await,
            Err(AppError::SecretUnavailable(_))
        ));

        let provider = StaticSecretProvider::new(r#"{"client_id": "", "client_secret": "x"}"#);
        assert!(matches!(
            get_credentials(&provider, "fitbit-api-creds").await,
            Err(AppError::SecretUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_env_provider_missing_variable() {
        let provider = EnvSecretProvider;
        let err = provider
            .get_secret("fitbit-steps-test-unset-secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SecretUnavailable(_)));
    }
}
