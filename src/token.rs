use std::fmt::{self, Debug};

/// A usable OAuth2 bearer token.
///
/// Immutable once constructed and not self-refreshing: ask the refresher
/// that produced it for a new one when it runs out.
///
/// This shape doubles as the decoder for the token endpoint's snake_case
/// response body. The impersonation endpoint answers in a different shape
/// and is decoded independently, see
/// [`ImpersonatedServiceAccountRefresher`](crate::ImpersonatedServiceAccountRefresher).
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
pub struct AccessToken {
    /// The access token issued by the authorization server.
    pub access_token: String,
    /// The type of token issued, typically `Bearer`.
    pub token_type: String,
    /// Remaining lifetime in seconds.
    ///
    /// Advisory only. When derived from an absolute expiry timestamp this
    /// may be negative if the server clock disagrees with ours; the value is
    /// deliberately not clamped.
    pub expires_in: i64,
}

/// Make sure the access token is redacted for AccessToken.
impl Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_token_endpoint_shape() {
        let token: AccessToken = serde_json::from_str(
            r#"{"access_token":"tok123","token_type":"Bearer","expires_in":3600}"#,
        )
        .unwrap();
        assert_eq!("tok123", token.access_token);
        assert_eq!("Bearer", token.token_type);
        assert_eq!(3600, token.expires_in);
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let token = AccessToken {
            access_token: "very-secret".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 60,
        };
        let debug = format!("{token:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("Bearer"));
    }
}
