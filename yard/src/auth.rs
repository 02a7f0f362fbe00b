use crate::client::YardClient;
use crate::error::YardError;
use crate::types::TokenResponse;

/// Upstream usernames are per-tenant: a fixed base prefixed onto the
/// lower-cased organization code.
fn password_grant_username(base: &str, org: &str) -> String {
    format!("{}{}", base, org.to_lowercase())
}

impl YardClient {
    /// Exchange an organization code for a short-lived bearer token.
    ///
    /// Fails closed: every transport error, non-2xx status, and malformed
    /// body collapses into [`YardError::AuthFailed`]. The real cause is
    /// only visible in debug logs.
    pub async fn authenticate(&self, org: &str) -> Result<String, YardError> {
        let url = format!("https://{}/oauth/token", self.config.auth_host);
        let username = password_grant_username(&self.config.username_base, org);
        let form = [
            ("grant_type", "password"),
            ("username", username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("token exchange transport failure: {e}");
                YardError::AuthFailed
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, "token exchange rejected");
            return Err(YardError::AuthFailed);
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            tracing::debug!("token exchange returned malformed body: {e}");
            YardError::AuthFailed
        })?;

        Ok(body.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;

    #[test]
    fn test_username_derivation_lowercases_org() {
        assert_eq!(
            password_grant_username("sdtadmin@", "ACME"),
            "sdtadmin@acme"
        );
        assert_eq!(password_grant_username("ops@", "MixedCase"), "ops@mixedcase");
    }

    #[tokio::test]
    async fn test_authenticate_unreachable_host_returns_auth_failed() {
        // Port 9 (discard) is closed in any sane test environment; the call
        // must come back as a failure signal, never a panic.
        let config = UpstreamConfig::new("127.0.0.1:9", "127.0.0.1:9", "pw", "secret");
        let client = YardClient::new(config).unwrap();

        let result = client.authenticate("acme").await;
        assert!(matches!(result, Err(YardError::AuthFailed)));
    }
}
