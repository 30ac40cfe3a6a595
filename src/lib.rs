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

//! # OpenStack/Rackspace Cloud Files adapter
//!
//! This crate adapts a generic remote-file-storage contract to
//! OpenStack-compatible object storage: it authenticates against a Keystone
//! identity service (v2 or v3) and drives the Swift v1 object API,
//! normalizing vendor responses and failures into one error taxonomy.
//!
//! The part worth reading first is credential resolution ([`auth`]): a
//! loosely-typed configuration bag is turned into exactly one of three
//! authentication strategies: v2 password, v3 password, or the Rackspace
//! `RAX-KSKEY` API-key extension. An API key always wins over a password and
//! forces the auth URL onto the `v2.0` suffix, since the extension is only
//! defined there; otherwise the protocol version is parsed from the URL's
//! trailing `/vN` segment, with no fallback default.
//!
//! The rest of the flow is linear: the resolved credentials feed a
//! short-lived [`identity::IdentityClient`] whose exchange yields a token
//! and service catalog; [`session::ObjectStoreSession::open`] selects the
//! storage endpoint by region (and by the `cloudFiles` catalog name on
//! Rackspace-hosted identity) and retains the token; and
//! [`service::CloudFilesService`] is the operational surface the host calls
//! repeatedly. Constructing the service also bootstraps the configured root
//! container, creating it when absent.
//!
//! All operations are blocking request/response calls; chunked downloads are
//! pull-based ([`store::chunks::BlobChunks`]). Nothing is cached, retried,
//! or re-authenticated behind the caller's back.
//!
//! ```no_run
//! use openstack_cloudfiles::{CloudFilesService, ObjectStoreConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ObjectStoreConfig::builder()
//!     .url("https://identity.api.rackspacecloud.com/v2.0")
//!     .region("DFW")
//!     .username("account")
//!     .api_key(secrecy::SecretString::from("0123456789abcdef"))
//!     .tenant_name("948417")
//!     .container("dftest")
//!     .build()?;
//! let service = CloudFilesService::new(&config)?;
//! service.put_blob_data("dftest", "notes.txt", b"hello", "text/plain")?;
//! for record in service.list_blobs("dftest", "", "")? {
//!     println!("{} ({:?} bytes)", record.name, record.content_length);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod service;
pub mod session;
pub mod store;

pub use config::{ObjectStoreConfig, RACKSPACE_REGIONS, Region, is_rackspace};
pub use error::{ConfigError, Error};
pub use service::CloudFilesService;
pub use store::chunks::BlobChunks;
pub use store::types::{ContainerProperties, ContainerSummary, ObjectRecord};
