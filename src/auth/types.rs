// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

//! # Identity exchange wire types
//!
//! Request and response payload shapes for the Keystone v2 and v3 token
//! exchanges. Requests are built from [`crate::auth::ResolvedAuthOptions`];
//! responses carry the token and the service catalog the session bootstrap
//! selects an endpoint from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{ServiceEntryV2, ServiceEntryV3};

/// A v3 authentication request, as `POST /v3/auth/tokens` expects it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AuthRequest {
    pub auth: AuthRequestInner,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AuthRequestInner {
    pub identity: Identity,
    /// Project scope. Omitted entirely for an unscoped request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// An identity object.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Identity {
    /// The authentication method. For password authentication, specify
    /// `password`.
    pub methods: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordAuth>,
}

/// The password object, contains the authentication information.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PasswordAuth {
    pub user: UserPassword,
}

/// User password information.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct UserPassword {
    pub name: String,
    pub domain: Domain,
    pub password: String,
}

/// Domain reference by id.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Domain {
    pub id: String,
}

/// The authorization scope.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Scope {
    pub project: ProjectScope,
}

/// Project scope information.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProjectScope {
    pub name: String,
    pub domain: Domain,
}

impl AuthRequest {
    /// Password payload with the domain fixed for both the user and the
    /// project scope; the scope is present only when a project name is
    /// known.
    pub fn password(
        user_name: &str,
        password: &str,
        domain_id: &str,
        project_name: Option<&str>,
    ) -> Self {
        Self {
            auth: AuthRequestInner {
                identity: Identity {
                    methods: vec!["password".to_string()],
                    password: Some(PasswordAuth {
                        user: UserPassword {
                            name: user_name.to_string(),
                            domain: Domain {
                                id: domain_id.to_string(),
                            },
                            password: password.to_string(),
                        },
                    }),
                },
                scope: project_name.map(|name| Scope {
                    project: ProjectScope {
                        name: name.to_string(),
                        domain: Domain {
                            id: domain_id.to_string(),
                        },
                    },
                }),
            },
        }
    }
}

/// A v2 authentication request, as `POST /v2.0/tokens` expects it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AuthRequestV2 {
    pub auth: AuthV2,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AuthV2 {
    #[serde(rename = "passwordCredentials")]
    pub password_credentials: PasswordCredentials,
    #[serde(rename = "tenantName", skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PasswordCredentials {
    pub username: String,
    pub password: String,
}

impl AuthRequestV2 {
    pub fn password(username: &str, password: &str, tenant_name: Option<&str>) -> Self {
        Self {
            auth: AuthV2 {
                password_credentials: PasswordCredentials {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                tenant_name: tenant_name.map(str::to_string),
            },
        }
    }
}

/// v2 token exchange response body.
#[derive(Clone, Debug, Deserialize)]
pub struct AccessResponse {
    pub access: Access,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Access {
    pub token: TokenV2,
    #[serde(rename = "serviceCatalog", default)]
    pub service_catalog: Vec<ServiceEntryV2>,
}

/// The v2 token; the id doubles as the `X-Auth-Token` value.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenV2 {
    pub id: String,
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
}

/// v3 token exchange response body. The token id itself arrives in the
/// `X-Subject-Token` response header, not in the body.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub token: TokenV3,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TokenV3 {
    #[serde(default)]
    pub catalog: Vec<ServiceEntryV3>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}
