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
use log::{debug, error};
use serde::Serialize;

use crate::constants::{GOOGLE_OAUTH2_TOKEN_URL, REFRESH_TOKEN_GRANT_TYPE};
use crate::refresh::TokenRefresh;
use crate::{AccessToken, ApplicationDefaultCredentials, Context, Error, Result};

/// OAuth2 refresh token request.
#[derive(Serialize)]
struct RefreshTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
    grant_type: &'static str,
}

/// ApplicationDefaultRefresher exchanges a long-lived refresh token for an
/// access token.
///
/// One form-encoded POST against the fixed Google OAuth2 token endpoint, no
/// retries; retry and caching policy belong to the caller.
///
/// Reference: [Using OAuth 2.0 for Web Server Applications](https://developers.google.com/identity/protocols/oauth2/web-server#offline)
#[derive(Debug, Clone)]
pub struct ApplicationDefaultRefresher {
    credentials: ApplicationDefaultCredentials,
}

impl ApplicationDefaultRefresher {
    /// Create a new ApplicationDefaultRefresher.
    pub fn new(credentials: ApplicationDefaultCredentials) -> Self {
        Self { credentials }
    }
}

#[async_trait::async_trait]
impl TokenRefresh for ApplicationDefaultRefresher {
    async fn refresh(&self, ctx: &Context) -> Result<AccessToken> {
        debug!("exchanging refresh token for access token");

        let req_body = RefreshTokenRequest {
            client_id: &self.credentials.client_id,
            client_secret: &self.credentials.client_secret,
            refresh_token: &self.credentials.refresh_token,
            grant_type: REFRESH_TOKEN_GRANT_TYPE,
        };

        let body = serde_urlencoded::to_string(&req_body)
            .map_err(|e| Error::request_invalid("failed to encode token request").with_source(e))?;
        let req = http::Request::builder()
            .method(http::Method::POST)
            .uri(GOOGLE_OAUTH2_TOKEN_URL)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.into())?;

        let resp = ctx.http_send(req).await?;

        // A non-200 body is not decoded at all; the status is the whole
        // diagnosis.
        if resp.status() != http::StatusCode::OK || resp.body().is_empty() {
            error!(
                "refresh token exchange got unexpected response: {}",
                resp.status()
            );
            return Err(Error::no_response(resp.status()));
        }

        serde_json::from_slice(resp.body())
            .map_err(|e| Error::decode("failed to parse token response").with_source(e))
    }
}
