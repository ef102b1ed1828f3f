// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use http::header::CONTENT_TYPE;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::{debug, error};
use serde::Serialize;

use crate::constants::{DEFAULT_SCOPE, JWT_BEARER_GRANT_TYPE};
use crate::refresh::TokenRefresh;
use crate::{AccessToken, Context, Error, Result, ServiceAccountCredentials};

/// Claims of the JWT assertion built from the service account key.
///
/// ```json
/// {
///   "iss": "761326798069-r5mljlln1rd4lrbhg75efgigp36m78j5@developer.gserviceaccount.com",
///   "scope": "https://www.googleapis.com/auth/devstorage.read_only",
///   "aud": "https://oauth2.googleapis.com/token",
///   "exp": 1328554385,
///   "iat": 1328550785
/// }
/// ```
#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
    /// User impersonated via domain-wide delegation, when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<&'a str>,
}

impl<'a> Claims<'a> {
    fn new(
        client_email: &'a str,
        scope: &'a str,
        token_uri: &'a str,
        subscription: Option<&'a str>,
    ) -> Claims<'a> {
        let current = chrono::Utc::now().timestamp();

        Claims {
            iss: client_email,
            scope,
            aud: token_uri,
            exp: current + 3600,
            iat: current,
            sub: subscription,
        }
    }
}

/// JWT-bearer assertion request.
#[derive(Serialize)]
struct AssertionRequest<'a> {
    grant_type: &'static str,
    assertion: &'a str,
}

/// ServiceAccountRefresher exchanges a self-signed JWT assertion for an
/// access token.
///
/// Reference: [Using OAuth 2.0 for Server to Server Applications](https://developers.google.com/identity/protocols/oauth2/service-account#authorizingrequests)
#[derive(Debug, Clone)]
pub struct ServiceAccountRefresher {
    credentials: ServiceAccountCredentials,
    scope: Option<String>,
    subscription: Option<String>,
}

impl ServiceAccountRefresher {
    /// Create a new ServiceAccountRefresher.
    pub fn new(credentials: ServiceAccountCredentials) -> Self {
        Self {
            credentials,
            scope: None,
            subscription: None,
        }
    }

    /// Set the OAuth2 scope, a space-joined list of scope strings.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the user to impersonate via domain-wide delegation.
    pub fn with_subscription(mut self, subscription: impl Into<String>) -> Self {
        self.subscription = Some(subscription.into());
        self
    }
}

#[async_trait::async_trait]
impl TokenRefresh for ServiceAccountRefresher {
    async fn refresh(&self, ctx: &Context) -> Result<AccessToken> {
        debug!(
            "exchanging signed assertion for {}",
            self.credentials.client_email
        );

        let scope = self.scope.as_deref().unwrap_or(DEFAULT_SCOPE);

        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| Error::credential_invalid("invalid service account key").with_source(e))?;
        let assertion = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &Claims::new(
                &self.credentials.client_email,
                scope,
                &self.credentials.token_uri,
                self.subscription.as_deref(),
            ),
            &key,
        )
        .map_err(|e| Error::credential_invalid("failed to sign assertion").with_source(e))?;

        let req_body = AssertionRequest {
            grant_type: JWT_BEARER_GRANT_TYPE,
            assertion: &assertion,
        };

        let body = serde_urlencoded::to_string(&req_body)
            .map_err(|e| Error::request_invalid("failed to encode token request").with_source(e))?;
        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&self.credentials.token_uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.into())?;

        let resp = ctx.http_send(req).await?;

        if resp.status() != http::StatusCode::OK || resp.body().is_empty() {
            error!(
                "assertion exchange got unexpected response: {}",
                resp.status()
            );
            return Err(Error::no_response(resp.status()));
        }

        serde_json::from_slice(resp.body())
            .map_err(|e| Error::decode("failed to parse token response").with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_claims_shape() {
        let claims = Claims::new(
            "sa@test.iam.gserviceaccount.com",
            "https://www.googleapis.com/auth/devstorage.read_only",
            "https://oauth2.googleapis.com/token",
            None,
        );
        assert_eq!(claims.iat + 3600, claims.exp);

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!("sa@test.iam.gserviceaccount.com", value["iss"]);
        assert_eq!("https://oauth2.googleapis.com/token", value["aud"]);
        // No delegation configured, the claim must be absent entirely.
        assert!(value.get("sub").is_none());
    }

    #[test]
    fn test_claims_carry_subscription() {
        let claims = Claims::new(
            "sa@test.iam.gserviceaccount.com",
            "scope",
            "https://oauth2.googleapis.com/token",
            Some("user@example.com"),
        );
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!("user@example.com", value["sub"]);
    }
}
