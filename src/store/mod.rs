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

//! # Object storage backend
//!
//! The wire-level surface of the Swift v1 API the gateway is written
//! against. [`crate::session::ObjectStoreSession`] implements it over HTTP;
//! tests drive the gateway through a mock instead.

use std::io::Read;

pub mod chunks;
#[cfg(test)]
pub mod mock;
pub mod types;

#[cfg(test)]
pub use mock::MockBackend;

use crate::error::Error;
use types::{ContainerEntry, ContainerProperties, ListingEntry, ObjectRecord};

/// Wire-level Swift v1 operations. Every method is one blocking
/// request/response round trip; failures arrive already mapped into the
/// domain taxonomy.
pub trait ObjectStoreBackend: Send {
    /// Account listing.
    fn list_containers(&self) -> Result<Vec<ContainerEntry>, Error>;

    fn head_container(&self, container: &str) -> Result<ContainerProperties, Error>;

    fn container_exists(&self, container: &str) -> Result<bool, Error>;

    fn create_container(&self, container: &str) -> Result<(), Error>;

    fn delete_container(&self, container: &str) -> Result<(), Error>;

    fn object_exists(&self, container: &str, name: &str) -> Result<bool, Error>;

    fn put_object(
        &self,
        container: &str,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<(), Error>;

    fn copy_object(
        &self,
        src_container: &str,
        src_name: &str,
        dest_container: &str,
        dest_name: &str,
    ) -> Result<(), Error>;

    fn get_object(&self, container: &str, name: &str) -> Result<Vec<u8>, Error>;

    /// Open the object body as a blocking stream; the connection stays open
    /// until the reader is dropped.
    fn open_object(&self, container: &str, name: &str) -> Result<Box<dyn Read + Send>, Error>;

    fn delete_object(&self, container: &str, name: &str) -> Result<(), Error>;

    /// JSON listing of a container. Empty `prefix`/`delimiter` filters are
    /// not sent.
    fn list_objects(
        &self,
        container: &str,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<ListingEntry>, Error>;

    fn head_object(&self, container: &str, name: &str) -> Result<ObjectRecord, Error>;
}
