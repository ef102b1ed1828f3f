//! Resolve and refresh Google Cloud OAuth2 access tokens.
//!
//! This crate turns locally available credential material into short-lived
//! bearer tokens. Four mutually exclusive strategies are supported, resolved
//! in a fixed precedence order:
//!
//! 1. Service account key: exchange a signed JWT assertion at the token
//!    endpoint.
//! 2. Impersonated service account: refresh the embedded source credentials,
//!    then exchange the source token at the impersonation endpoint.
//! 3. Application default (authorized user) credentials: refresh-token grant
//!    against the token endpoint.
//! 4. Compute metadata: fetch a token for the workload's ambient identity
//!    from the VM metadata service.
//!
//! All network and file I/O goes through an injected [`Context`], so the
//! refresh flows stay independent of any concrete HTTP client or runtime.
//!
//! ## Example
//!
//! ```no_run
//! use gcloud_token::{ApiConfig, ApplicationDefaultCredentials, Context, CredentialBundle};
//!
//! # async fn example() -> gcloud_token::Result<()> {
//! let ctx = Context::default();
//!
//! let credentials = ApplicationDefaultCredentials::from_file(
//!     &ctx,
//!     "/home/me/.config/gcloud/application_default_credentials.json",
//! )
//! .await?;
//!
//! let config = ApiConfig::new()
//!     .with_scopes(["https://www.googleapis.com/auth/devstorage.read_only"]);
//! let bundle = CredentialBundle::new().with_application_default(credentials);
//!
//! let refresher = gcloud_token::select(bundle, &config);
//! let token = refresher.refresh(&ctx).await?;
//! println!("Bearer {}", token.access_token);
//! # Ok(())
//! # }
//! ```
//!
//! Refreshers never cache: every [`refresh`](TokenRefresh::refresh) call
//! performs the full exchange. Callers that want TTL-aware reuse should wrap
//! the returned [`AccessToken`] in their own cache keyed on `expires_in`.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod context;
#[cfg(feature = "http-reqwest")]
pub use context::ReqwestHttpSend;
#[cfg(feature = "fs-tokio")]
pub use context::TokioFileRead;
pub use context::{Context, FileRead, HttpSend, NoopFileRead, NoopHttpSend};

mod error;
pub use error::{Error, ErrorKind, Result};

mod config;
pub use config::ApiConfig;

mod credential;
pub use credential::{
    ApplicationDefaultCredentials, CredentialBundle, ImpersonatedServiceAccountCredentials,
    ServiceAccountCredentials,
};

mod token;
pub use token::AccessToken;

mod refresh;
pub use refresh::{
    select, ApplicationDefaultRefresher, ComputeMetadataRefresher,
    ImpersonatedServiceAccountRefresher, ServiceAccountRefresher, TokenRefresh,
};
