//! Client-credential token exchange.

use crate::error::{CatalogError, Result};
use crate::types::TokenResponse;
use reqwest::Client;
use tracing::{debug, warn};

/// Token endpoint client.
pub struct TokenClient<'a> {
    http: &'a Client,
    token_url: &'a str,
}

impl<'a> TokenClient<'a> {
    pub(crate) fn new(http: &'a Client, token_url: &'a str) -> Self {
        Self { http, token_url }
    }

    /// Exchange application credentials for an access token.
    pub async fn exchange(&self, client_id: &str, client_secret: &str) -> Result<TokenResponse> {
        debug!(url = %self.token_url, "Requesting client-credential token");

        let response = self
            .http
            .post(self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret),
            ])
            .send()
            .await
            .map_err(CatalogError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let token: TokenResponse = response.json().await.map_err(|e| {
                CatalogError::ParseError(format!("Failed to parse token response: {}", e))
            })?;

            debug!(expires_in = token.expires_in, "Token exchange successful");
            Ok(token)
        } else if status.as_u16() == 400 || status.as_u16() == 401 {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Token exchange rejected");
            Err(CatalogError::AuthFailed(
                "Invalid client credentials".to_string(),
            ))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(CatalogError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
