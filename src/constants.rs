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

/// The fixed Google OAuth2 token endpoint.
///
/// Used for refresh-token grants and JWT assertion exchanges. Read-only for
/// the process lifetime.
pub const GOOGLE_OAUTH2_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Grant type for refreshing application default credentials.
pub const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Grant type for exchanging a signed JWT assertion.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Default OAuth2 scope for Google Cloud services.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Default host of the Compute Engine VM metadata service.
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

/// Service account alias used by the metadata service when none is configured.
pub const DEFAULT_METADATA_SERVICE_ACCOUNT: &str = "default";

/// Requested lifetime for impersonated tokens when none is configured, the
/// maximum the impersonation endpoint allows.
pub const DEFAULT_IMPERSONATION_LIFETIME: Duration = Duration::from_secs(3600);
