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

use std::time::Duration;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_IMPERSONATION_LIFETIME, DEFAULT_SCOPE};
use crate::refresh::{ApplicationDefaultRefresher, TokenRefresh};
use crate::{
    AccessToken, Context, Error, ImpersonatedServiceAccountCredentials, Result,
};

/// Impersonation request.
#[derive(Serialize)]
struct ImpersonationRequest<'a> {
    lifetime: String,
    scope: &'a str,
    delegates: &'a [String],
}

/// Response of the impersonation endpoint.
///
/// Unlike the token endpoint this one answers in camelCase and with an
/// absolute RFC3339 expiry instead of a duration. Decoded with its own
/// shape on purpose; sharing a decoder with the token endpoint would let
/// malformed responses from the wrong endpoint slip through.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImpersonatedTokenResponse {
    access_token: String,
    expire_time: String,
}

/// ImpersonatedServiceAccountRefresher performs the two-hop delegation
/// exchange.
///
/// Hop 1 refreshes the embedded source credentials through an owned
/// [`ApplicationDefaultRefresher`]. Hop 2, issued only if hop 1 succeeded,
/// posts the impersonation request to the descriptor's endpoint with the
/// source token as bearer auth. The hops are strictly sequential since the
/// second request carries the first response's token.
#[derive(Debug, Clone)]
pub struct ImpersonatedServiceAccountRefresher {
    credentials: ImpersonatedServiceAccountCredentials,
    source: ApplicationDefaultRefresher,
    scope: Option<String>,
    token_lifetime: Duration,
}

impl ImpersonatedServiceAccountRefresher {
    /// Create a new ImpersonatedServiceAccountRefresher.
    ///
    /// The source refresher is constructed fresh from the descriptor's
    /// embedded source credentials and owned exclusively by this instance.
    pub fn new(credentials: ImpersonatedServiceAccountCredentials) -> Self {
        let source = ApplicationDefaultRefresher::new(credentials.source_credentials.clone());
        Self {
            credentials,
            source,
            scope: None,
            token_lifetime: DEFAULT_IMPERSONATION_LIFETIME,
        }
    }

    /// Set the OAuth2 scope, a space-joined list of scope strings.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Set the requested lifetime of the impersonated token.
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    async fn exchange_source_token(
        &self,
        ctx: &Context,
        source_token: &AccessToken,
    ) -> Result<AccessToken> {
        debug!("exchanging source token for impersonated access token");

        let scope = self.scope.as_deref().unwrap_or(DEFAULT_SCOPE);
        let req_body = ImpersonationRequest {
            lifetime: format!("{}s", self.token_lifetime.as_secs()),
            scope,
            delegates: &self.credentials.delegates,
        };

        let body = serde_json::to_vec(&req_body).map_err(|e| {
            Error::request_invalid("failed to encode impersonation request").with_source(e)
        })?;
        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(&self.credentials.service_account_impersonation_url)
            .header(CONTENT_TYPE, "application/json")
            .header(
                AUTHORIZATION,
                format!("Bearer {}", source_token.access_token),
            )
            .body(body.into())?;

        let resp = ctx.http_send(req).await?;

        if resp.status() != http::StatusCode::OK || resp.body().is_empty() {
            error!(
                "impersonation exchange got unexpected response: {}",
                resp.status()
            );
            return Err(Error::no_response(resp.status()));
        }

        let token_resp: ImpersonatedTokenResponse = serde_json::from_slice(resp.body())
            .map_err(|e| Error::decode("failed to parse impersonation response").with_source(e))?;

        // The endpoint reports an absolute expiry; the remaining lifetime is
        // derived at decode time and may come out negative under clock skew.
        // Advisory for the caller's caching TTL, so it is not clamped.
        let expire_time = chrono::DateTime::parse_from_rfc3339(&token_resp.expire_time)
            .map_err(|e| {
                Error::invalid_expiry_date(format!(
                    "impersonation endpoint returned unparseable expireTime {:?}",
                    token_resp.expire_time
                ))
                .with_source(e)
            })?;
        let expires_in = (expire_time.with_timezone(&chrono::Utc) - chrono::Utc::now())
            .num_seconds();

        // The impersonation endpoint does not return a token type.
        Ok(AccessToken {
            access_token: token_resp.access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }
}

#[async_trait::async_trait]
impl TokenRefresh for ImpersonatedServiceAccountRefresher {
    async fn refresh(&self, ctx: &Context) -> Result<AccessToken> {
        // A failed source hop short-circuits the chain; the impersonation
        // endpoint is never contacted with half-refreshed credentials.
        let source_token = self.source.refresh(ctx).await?;

        self.exchange_source_token(ctx, &source_token).await
    }
}
