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

//! # Service configuration
//!
//! The loosely-typed configuration bag a host hands the adapter. The shape is
//! data only; which credential scheme applies is decided by
//! [`crate::auth::resolve`]. Secrets are held as [`SecretString`] so they
//! never leak through `Debug` or logs.

use derive_builder::Builder;
use secrecy::SecretString;
use serde::Deserialize;

/// Identity host used by the Rackspace-hosted Cloud Files offering.
const RACKSPACE_IDENTITY_HOST: &str = "identity.api.rackspacecloud.com";

/// Connection settings for one Cloud Files service instance, immutable for
/// the adapter's lifetime.
#[derive(Builder, Clone, Debug, Deserialize)]
#[builder(setter(into, strip_option))]
pub struct ObjectStoreConfig {
    /// Identity (Keystone) endpoint. Must end with the API version segment,
    /// i.e. `/v2.0` or `/v3`.
    pub url: String,

    /// Region of the object storage service, i.e. `DFW`.
    pub region: String,

    /// The user name for the service connection.
    pub username: String,

    /// Account password. Ignored when an API key is configured.
    #[builder(default)]
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Rackspace API key. Takes precedence over `password`.
    #[builder(default)]
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Tenant (v2) or project (v3) name. Normally the account number.
    #[builder(default)]
    #[serde(default)]
    pub tenant_name: Option<String>,

    /// Root container used by the file service.
    pub container: String,

    /// Emit identity-exchange request/response summaries through `tracing`.
    #[builder(default)]
    #[serde(default)]
    pub debug_log: bool,
}

impl ObjectStoreConfig {
    pub fn builder() -> ObjectStoreConfigBuilder {
        ObjectStoreConfigBuilder::default()
    }
}

/// Whether an identity URL points at the Rackspace-hosted identity service.
///
/// Rackspace accounts can carry several object-store catalog entries; the
/// Cloud Files one is disambiguated by catalog name (see
/// [`crate::session::RACKSPACE_CATALOG_NAME`]).
pub fn is_rackspace(url: &str) -> bool {
    url.contains(RACKSPACE_IDENTITY_HOST)
}

/// One selectable Cloud Files region.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Region {
    /// Human-readable data center label.
    pub label: &'static str,
    /// Region code passed in the configuration `region` field.
    pub name: &'static str,
    /// Identity endpoint host serving the region.
    pub url: &'static str,
}

/// Cloud Files is a regionalized service; containers live in one of the
/// Rackspace data centers. Exposed for hosts that render a region picklist.
pub const RACKSPACE_REGIONS: &[Region] = &[
    Region {
        label: "Chicago",
        name: "ORD",
        url: "https://identity.api.rackspacecloud.com",
    },
    Region {
        label: "Dallas/Ft. Worth",
        name: "DFW",
        url: "https://identity.api.rackspacecloud.com",
    },
    Region {
        label: "London",
        name: "LON",
        url: "https://lon.identity.api.rackspacecloud.com",
    },
    Region {
        label: "Hong Kong",
        name: "HKG",
        url: "https://identity.api.rackspacecloud.com",
    },
    Region {
        label: "Northern Virginia",
        name: "IAD",
        url: "https://identity.api.rackspacecloud.com",
    },
    Region {
        label: "Sydney",
        name: "SYD",
        url: "https://identity.api.rackspacecloud.com",
    },
];
