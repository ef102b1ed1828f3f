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

use std::fmt::Debug;

use crate::{AccessToken, ApiConfig, Context, CredentialBundle, Result};

mod application_default;
pub use application_default::ApplicationDefaultRefresher;

mod service_account;
pub use service_account::ServiceAccountRefresher;

mod impersonated;
pub use impersonated::ImpersonatedServiceAccountRefresher;

mod compute_metadata;
pub use compute_metadata::ComputeMetadataRefresher;

/// The capability of producing a fresh access token on demand.
///
/// `refresh` never mutates the refresher: implementations hold their parsed
/// credential material immutably, so concurrent calls from multiple callers
/// are safe and independent. No caching happens at this layer; every call
/// performs the full network exchange.
#[async_trait::async_trait]
pub trait TokenRefresh: Debug + Send + Sync + 'static {
    /// Perform the exchange for this strategy and return a fresh token.
    async fn refresh(&self, ctx: &Context) -> Result<AccessToken>;
}

/// Resolve the one refresh strategy to use for the given credential
/// material.
///
/// Precedence is fixed, first match wins:
///
/// 1. service account key,
/// 2. impersonated service account descriptor,
/// 3. application default credentials,
/// 4. ambient compute-metadata identity.
///
/// An explicitly provisioned key always beats ambient identity, and the
/// impersonation descriptor is checked before plain application default
/// credentials because it nests an application-default-shaped block that
/// must not be mistaken for the real thing.
///
/// Selection performs no I/O and cannot fail: with no material at all it
/// falls through to the metadata strategy.
pub fn select(bundle: CredentialBundle, config: &ApiConfig) -> Box<dyn TokenRefresh> {
    if let Some(sa) = bundle.service_account {
        let mut refresher = ServiceAccountRefresher::new(sa);
        if let Some(scope) = config.scope() {
            refresher = refresher.with_scope(scope);
        }
        if let Some(subscription) = &config.subscription {
            refresher = refresher.with_subscription(subscription);
        }
        return Box::new(refresher);
    }

    if let Some(isa) = bundle.impersonated_service_account {
        let mut refresher = ImpersonatedServiceAccountRefresher::new(isa);
        if let Some(scope) = config.scope() {
            refresher = refresher.with_scope(scope);
        }
        if let Some(lifetime) = config.token_lifetime {
            refresher = refresher.with_token_lifetime(lifetime);
        }
        return Box::new(refresher);
    }

    if let Some(adc) = bundle.application_default {
        return Box::new(ApplicationDefaultRefresher::new(adc));
    }

    // No local material at all, assume we're on Google infrastructure.
    let mut refresher = ComputeMetadataRefresher::new().with_scopes(config.scopes.clone());
    if let Some(account) = &config.service_account {
        refresher = refresher.with_service_account(account);
    }
    Box::new(refresher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ApplicationDefaultCredentials, ImpersonatedServiceAccountCredentials,
        ServiceAccountCredentials,
    };

    fn service_account() -> ServiceAccountCredentials {
        ServiceAccountCredentials {
            credential_type: "service_account".to_string(),
            project_id: "test-project".to_string(),
            private_key_id: "key-id".to_string(),
            private_key: "pem".to_string(),
            client_email: "sa@test.iam.gserviceaccount.com".to_string(),
            client_id: "123".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            auth_provider_x509_cert_url: "https://www.googleapis.com/oauth2/v1/certs".to_string(),
            client_x509_cert_url: "https://www.googleapis.com/robot/v1/metadata/x509/test"
                .to_string(),
        }
    }

    fn application_default() -> ApplicationDefaultCredentials {
        ApplicationDefaultCredentials {
            credential_type: "authorized_user".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
        }
    }

    fn impersonated() -> ImpersonatedServiceAccountCredentials {
        ImpersonatedServiceAccountCredentials {
            credential_type: "impersonated_service_account".to_string(),
            delegates: vec![],
            service_account_impersonation_url: "https://example.com/generateAccessToken"
                .to_string(),
            source_credentials: application_default(),
        }
    }

    fn strategy_name(refresher: &dyn TokenRefresh) -> &'static str {
        let debug = format!("{refresher:?}");
        for name in [
            "ServiceAccountRefresher",
            "ImpersonatedServiceAccountRefresher",
            "ApplicationDefaultRefresher",
            "ComputeMetadataRefresher",
        ] {
            if debug.starts_with(name) {
                return name;
            }
        }
        panic!("unknown strategy: {debug}");
    }

    #[test]
    fn test_select_precedence_first_match_wins() {
        let config = ApiConfig::new();

        // service account beats everything else.
        let bundle = CredentialBundle::new()
            .with_service_account(service_account())
            .with_impersonated_service_account(impersonated())
            .with_application_default(application_default());
        assert_eq!(
            "ServiceAccountRefresher",
            strategy_name(select(bundle, &config).as_ref())
        );

        // Impersonation beats the bare application default credentials it
        // nests.
        let bundle = CredentialBundle::new()
            .with_impersonated_service_account(impersonated())
            .with_application_default(application_default());
        assert_eq!(
            "ImpersonatedServiceAccountRefresher",
            strategy_name(select(bundle, &config).as_ref())
        );

        let bundle = CredentialBundle::new().with_application_default(application_default());
        assert_eq!(
            "ApplicationDefaultRefresher",
            strategy_name(select(bundle, &config).as_ref())
        );

        // Nothing at all falls through to the metadata strategy.
        assert_eq!(
            "ComputeMetadataRefresher",
            strategy_name(select(CredentialBundle::new(), &config).as_ref())
        );
    }

    #[test]
    fn test_select_is_total_over_all_combinations() {
        let config = ApiConfig::new();
        for mask in 0u8..8 {
            let mut bundle = CredentialBundle::new();
            if mask & 1 != 0 {
                bundle = bundle.with_service_account(service_account());
            }
            if mask & 2 != 0 {
                bundle = bundle.with_impersonated_service_account(impersonated());
            }
            if mask & 4 != 0 {
                bundle = bundle.with_application_default(application_default());
            }

            let expected = if mask & 1 != 0 {
                "ServiceAccountRefresher"
            } else if mask & 2 != 0 {
                "ImpersonatedServiceAccountRefresher"
            } else if mask & 4 != 0 {
                "ApplicationDefaultRefresher"
            } else {
                "ComputeMetadataRefresher"
            };
            assert_eq!(expected, strategy_name(select(bundle, &config).as_ref()));
        }
    }
}
