use std::time::Duration;

/// Configuration of the API the refreshed tokens are for.
///
/// Everything here is optional: an empty config falls back to the
/// cloud-platform scope and the metadata service's `default` account.
#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    /// Requested OAuth2 scopes, in the order they were configured.
    pub scopes: Vec<String>,
    /// User to impersonate via domain-wide delegation, sent as the `sub`
    /// claim of the service account assertion.
    pub subscription: Option<String>,
    /// Service account identifier the metadata service should mint tokens
    /// for.
    pub service_account: Option<String>,
    /// Requested lifetime for impersonated tokens.
    pub token_lifetime: Option<Duration>,
}

impl ApiConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested OAuth2 scopes.
    ///
    /// Order is preserved: the scope string sent on the wire joins them in
    /// exactly this order, which keeps request bodies reproducible.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the user to impersonate via domain-wide delegation.
    pub fn with_subscription(mut self, subscription: impl Into<String>) -> Self {
        self.subscription = Some(subscription.into());
        self
    }

    /// Set the service account identifier for the metadata strategy.
    pub fn with_service_account(mut self, service_account: impl Into<String>) -> Self {
        self.service_account = Some(service_account.into());
        self
    }

    /// Set the requested lifetime for impersonated tokens.
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = Some(lifetime);
        self
    }

    /// The space-joined scope string, `None` when no scopes are configured.
    pub fn scope(&self) -> Option<String> {
        if self.scopes.is_empty() {
            None
        } else {
            Some(self.scopes.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scope_joins_with_single_space_in_order() {
        let config = ApiConfig::new().with_scopes([
            "https://www.googleapis.com/auth/devstorage.read_write",
            "https://www.googleapis.com/auth/cloud-platform",
        ]);
        assert_eq!(
            Some(
                "https://www.googleapis.com/auth/devstorage.read_write \
                 https://www.googleapis.com/auth/cloud-platform"
                    .to_string()
            ),
            config.scope()
        );
    }

    #[test]
    fn test_empty_scopes_yield_none() {
        assert_eq!(None, ApiConfig::new().scope());
    }
}
