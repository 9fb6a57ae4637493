use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Bearer credential attached to every mutating request.
///
/// An absent token still produces `Authorization: Bearer ` so servers that
/// only check for the header's presence keep working.
#[derive(Debug, Clone, Default)]
pub struct BearerToken {
    token: Option<SecretString>,
}

impl BearerToken {
    pub fn new(token: SecretString) -> Self {
        Self { token: Some(token) }
    }

    /// No credential configured.
    pub fn none() -> Self {
        Self { token: None }
    }

    pub fn is_configured(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty())
    }

    /// The `Authorization` header value, marked sensitive.
    pub fn header_value(&self) -> Result<HeaderValue, Error> {
        let token = self.token.as_ref().map_or("", |t| t.expose_secret());
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Headers sent with POST, PUT and DELETE.
    pub fn mutation_headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.header_value()?);
        Ok(headers)
    }
}

impl From<SecretString> for BearerToken {
    fn from(token: SecretString) -> Self {
        Self::new(token)
    }
}

impl From<Option<SecretString>> for BearerToken {
    fn from(token: Option<SecretString>) -> Self {
        Self { token }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn header_carries_configured_token() {
        let token = BearerToken::new(SecretString::from("abc123".to_string()));
        let value = token.header_value().unwrap();
        assert_eq!(value.to_str().unwrap(), "Bearer abc123");
        assert!(value.is_sensitive());
        assert!(token.is_configured());
    }

    #[test]
    fn missing_token_sends_empty_bearer() {
        let token = BearerToken::none();
        assert_eq!(token.header_value().unwrap().to_str().unwrap(), "Bearer ");
        assert!(!token.is_configured());
    }

    #[test]
    fn mutation_headers_include_content_type() {
        let headers = BearerToken::none().mutation_headers().unwrap();
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn control_characters_are_rejected() {
        let token = BearerToken::new(SecretString::from("bad\ntoken".to_string()));
        assert!(matches!(token.header_value(), Err(Error::InvalidToken(_))));
    }
}
