//! Service-account OAuth: sign a JWT and trade it for an access token.

use std::path::Path;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;

pub(crate) const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// The fields of a Google service-account key file that signing needs.
#[derive(Deserialize)]
struct ServiceAccountFile {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    token_uri: String,
}

/// Parsed service-account key, ready to sign assertions.
pub(crate) struct ServiceAccount {
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    signing_key: EncodingKey,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("signing_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccount {
    /// Read and validate a service-account key file.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Io`] if the file cannot be read,
    /// [`SinkError::Json`] if it is not a key file, or
    /// [`SinkError::Credentials`] if the private key is not RSA PEM.
    pub(crate) fn from_file(path: &Path) -> Result<Self, SinkError> {
        let raw = std::fs::read_to_string(path)?;
        let file: ServiceAccountFile = serde_json::from_str(&raw)?;
        let signing_key = EncodingKey::from_rsa_pem(file.private_key.as_bytes())
            .map_err(|e| SinkError::Credentials(format!("private_key: {e}")))?;

        Ok(Self {
            client_email: file.client_email,
            key_id: file.private_key_id,
            token_uri: file.token_uri,
            signing_key,
        })
    }

    /// Signed RS256 assertion for the spreadsheets scope, valid for one hour.
    fn assertion(&self) -> Result<String, SinkError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key_id);
        Ok(jsonwebtoken::encode(&header, &claims, &self.signing_key)?)
    }

    /// Exchange a fresh assertion for a bearer access token.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Jwt`] if signing fails, [`SinkError::Http`] on
    /// network failure, or [`SinkError::Api`] if the token endpoint rejects
    /// the assertion.
    pub(crate) async fn access_token(&self, client: &reqwest::Client) -> Result<String, SinkError> {
        let body = form_body(&[("grant_type", GRANT_TYPE), ("assertion", &self.assertion()?)]);

        let response = client
            .post(&self.token_uri)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

fn form_body(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, NON_ALPHANUMERIC),
                utf8_percent_encode(v, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
