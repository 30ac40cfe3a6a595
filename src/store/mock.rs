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

use std::io::Read;

use mockall::mock;

use crate::error::Error;
use crate::store::ObjectStoreBackend;
use crate::store::types::{ContainerEntry, ContainerProperties, ListingEntry, ObjectRecord};

mock! {
    pub Backend {}

    impl ObjectStoreBackend for Backend {
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

        fn open_object(&self, container: &str, name: &str) -> Result<Box<dyn Read + Send>, Error>;

        fn delete_object(&self, container: &str, name: &str) -> Result<(), Error>;

        fn list_objects(
            &self,
            container: &str,
            prefix: &str,
            delimiter: &str,
        ) -> Result<Vec<ListingEntry>, Error>;

        fn head_object(&self, container: &str, name: &str) -> Result<ObjectRecord, Error>;
    }
}
