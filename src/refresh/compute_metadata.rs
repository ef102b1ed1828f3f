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

use bytes::Bytes;
use log::{debug, error};

use crate::constants::{DEFAULT_METADATA_HOST, DEFAULT_METADATA_SERVICE_ACCOUNT};
use crate::refresh::TokenRefresh;
use crate::{AccessToken, Context, Error, Result};

/// ComputeMetadataRefresher fetches tokens for the workload's ambient
/// identity from the Compute Engine VM metadata service.
///
/// No local secret is involved; the metadata server mints tokens for the
/// configured (or `default`) service account attached to the instance.
#[derive(Debug, Clone, Default)]
pub struct ComputeMetadataRefresher {
    scopes: Vec<String>,
    service_account: Option<String>,
    endpoint: Option<String>,
}

impl ComputeMetadataRefresher {
    /// Create a new ComputeMetadataRefresher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested OAuth2 scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Set the service account to mint tokens for.
    pub fn with_service_account(mut self, service_account: impl Into<String>) -> Self {
        self.service_account = Some(service_account.into());
        self
    }

    /// Set the metadata host, mainly useful for testing.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

#[async_trait::async_trait]
impl TokenRefresh for ComputeMetadataRefresher {
    async fn refresh(&self, ctx: &Context) -> Result<AccessToken> {
        let service_account = self
            .service_account
            .as_deref()
            .unwrap_or(DEFAULT_METADATA_SERVICE_ACCOUNT);
        let metadata_host = self.endpoint.as_deref().unwrap_or(DEFAULT_METADATA_HOST);

        debug!("loading token from VM metadata service for account {service_account}");

        // The metadata service takes scopes comma-separated in the query.
        let mut url = format!(
            "http://{metadata_host}/computeMetadata/v1/instance/service-accounts/{service_account}/token"
        );
        if !self.scopes.is_empty() {
            url.push_str("?scopes=");
            url.push_str(&self.scopes.join(","));
        }

        let req = http::Request::builder()
            .method(http::Method::GET)
            .uri(&url)
            .header("Metadata-Flavor", "Google")
            .body(Bytes::new())?;

        let resp = ctx.http_send(req).await?;

        if resp.status() != http::StatusCode::OK || resp.body().is_empty() {
            error!(
                "VM metadata service got unexpected response: {}",
                resp.status()
            );
            return Err(Error::no_response(resp.status()));
        }

        serde_json::from_slice(resp.body())
            .map_err(|e| Error::decode("failed to parse VM metadata response").with_source(e))
    }
}
