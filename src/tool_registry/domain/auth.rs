//! Tool server authentication settings and header resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Header carrying an API key credential.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Header carrying a bearer token credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Authentication scheme declared for a tool server.
///
/// The wire form is tagged by `type`; credential fields are camelCase and
/// optional because the edit buffer may hold a scheme before its secret has
/// been entered.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum McpAuthentication {
    /// No credentials.
    #[default]
    None,
    /// Static key sent in `X-API-Key`.
    #[serde(rename_all = "camelCase")]
    ApiKey {
        /// API key value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
    },
    /// Static token sent as `Authorization: Bearer <token>`.
    #[serde(rename_all = "camelCase")]
    Bearer {
        /// Bearer token value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bearer_token: Option<String>,
    },
    /// OAuth2 client credentials. Stored only; no token exchange exists.
    #[serde(rename = "oauth2", rename_all = "camelCase")]
    OAuth2 {
        /// OAuth2 client identifier.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        client_id: Option<String>,
        /// OAuth2 client secret.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        client_secret: Option<String>,
        /// Token endpoint URL.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_url: Option<String>,
        /// Requested scope.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scope: Option<String>,
    },
}

/// Error returned when an authentication scheme cannot produce headers.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("authentication type '{0}' is not supported for direct requests")]
pub struct UnsupportedAuthenticationError(pub &'static str);

impl McpAuthentication {
    /// Creates API key authentication.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey {
            api_key: Some(key.into()),
        }
    }

    /// Creates bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            bearer_token: Some(token.into()),
        }
    }

    /// Returns the wire name of the scheme.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ApiKey { .. } => "api_key",
            Self::Bearer { .. } => "bearer",
            Self::OAuth2 { .. } => "oauth2",
        }
    }

    /// Resolves the outbound request headers for this scheme.
    ///
    /// A missing or blank credential yields no header rather than an error;
    /// the request is then attempted unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedAuthenticationError`] for `oauth2`, which has no
    /// token acquisition flow.
    pub fn resolve_headers(&self) -> Result<AuthHeaders, UnsupportedAuthenticationError> {
        let mut headers = AuthHeaders::default();
        match self {
            Self::None => {}
            Self::ApiKey { api_key } => {
                if let Some(key) = present(api_key.as_deref()) {
                    headers.insert(API_KEY_HEADER, key);
                }
            }
            Self::Bearer { bearer_token } => {
                if let Some(token) = present(bearer_token.as_deref()) {
                    headers.insert(AUTHORIZATION_HEADER, format!("Bearer {token}"));
                }
            }
            Self::OAuth2 { .. } => return Err(UnsupportedAuthenticationError(self.kind())),
        }
        Ok(headers)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|credential| !credential.is_empty())
}

fn redact(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "<redacted>")
}

impl fmt::Debug for McpAuthentication {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => formatter.write_str("None"),
            Self::ApiKey { api_key } => formatter
                .debug_struct("ApiKey")
                .field("api_key", &redact(api_key.as_ref()))
                .finish(),
            Self::Bearer { bearer_token } => formatter
                .debug_struct("Bearer")
                .field("bearer_token", &redact(bearer_token.as_ref()))
                .finish(),
            Self::OAuth2 {
                client_id,
                client_secret,
                token_url,
                scope,
            } => formatter
                .debug_struct("OAuth2")
                .field("client_id", client_id)
                .field("client_secret", &redact(client_secret.as_ref()))
                .field("token_url", token_url)
                .field("scope", scope)
                .finish(),
        }
    }
}

/// Resolved outbound authentication headers.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders(BTreeMap<String, String>);

impl AuthHeaders {
    /// Inserts or replaces a header.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns a header value by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns whether no headers were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates headers in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl fmt::Debug for AuthHeaders {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.0.keys().map(|name| (name, "<redacted>")))
            .finish()
    }
}
