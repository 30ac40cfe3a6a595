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

//! # Object storage types
//!
//! Containers and object records as the gateway reports them to the host,
//! plus the raw listing shapes the storage endpoint returns. Modification
//! times reach the adapter in two shapes (structured timestamps in JSON
//! listings, pre-formatted header text on `HEAD` responses) and
//! [`LastModified`] is the single point normalizing both to an RFC-1123
//! string.

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Container entry of an account listing.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ContainerEntry {
    pub name: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub bytes: u64,
}

/// `{name, path}` container summary exposed to the host.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ContainerSummary {
    pub name: String,
    pub path: String,
}

impl ContainerSummary {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: name.to_string(),
        }
    }
}

/// Container metadata from a `HEAD` request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ContainerProperties {
    pub name: String,
    /// Bytes used, from the `X-Container-Bytes-Used` header.
    pub size: u64,
}

/// Object listing entries: real objects interleaved with delimiter
/// pseudo-directories.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListingEntry {
    Subdir {
        subdir: String,
    },
    Object(ObjectEntry),
}

/// One object as the JSON listing reports it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ObjectEntry {
    pub name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    /// Structured timestamp, i.e. `2014-01-15T16:41:49.390270`.
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

/// An object modification timestamp as the vendor reported it.
#[derive(Clone, Debug, PartialEq)]
pub enum LastModified {
    /// Structured value from a JSON listing.
    Timestamp(chrono::DateTime<Utc>),
    /// Pre-formatted HTTP date header text.
    HeaderText(String),
}

impl LastModified {
    /// Parse a listing value; anything unparseable passes through verbatim.
    pub fn from_listing(raw: &str) -> Self {
        match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            Ok(naive) => Self::Timestamp(Utc.from_utc_datetime(&naive)),
            Err(_) => Self::HeaderText(raw.to_string()),
        }
    }

    /// RFC-1123 rendering, identical whichever shape the value arrived in.
    pub fn to_http_date(&self) -> String {
        match self {
            Self::Timestamp(timestamp) => {
                timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
            }
            Self::HeaderText(text) => text.clone(),
        }
    }
}

/// Object metadata exposed to the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ObjectRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    /// Always an RFC-1123 string, see [`LastModified`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl ObjectRecord {
    /// The sentinel reported when a resolved object has no name of its own,
    /// i.e. the container root.
    pub fn container_root() -> Self {
        Self {
            name: ".".to_string(),
            ..Default::default()
        }
    }
}

impl From<ObjectEntry> for ObjectRecord {
    fn from(entry: ObjectEntry) -> Self {
        Self {
            name: entry.name,
            content_type: entry.content_type,
            content_length: entry.bytes,
            last_modified: entry
                .last_modified
                .as_deref()
                .map(|raw| LastModified::from_listing(raw).to_http_date()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_parses_objects_and_subdirs() {
        let entries: Vec<ListingEntry> = serde_json::from_value(json!([
            {"subdir": "photos/"},
            {
                "name": "photos/cat.jpg",
                "content_type": "image/jpeg",
                "bytes": 512,
                "last_modified": "2014-01-15T16:41:49.390270",
                "hash": "d41d8cd98f00b204e9800998ecf8427e"
            }
        ]))
        .unwrap();
        assert_eq!(
            entries[0],
            ListingEntry::Subdir {
                subdir: "photos/".into()
            }
        );
        match &entries[1] {
            ListingEntry::Object(object) => assert_eq!(object.name, "photos/cat.jpg"),
            other => panic!("expected object entry, got {other:?}"),
        }
    }

    #[test]
    fn test_last_modified_normalization_matches_both_shapes() {
        let from_listing = LastModified::from_listing("2014-01-15T16:41:49.390270");
        let from_header = LastModified::HeaderText("Wed, 15 Jan 2014 16:41:49 GMT".to_string());
        assert_eq!(from_listing.to_http_date(), from_header.to_http_date());
    }

    #[test]
    fn test_last_modified_without_fraction() {
        let value = LastModified::from_listing("2014-01-15T16:41:49");
        assert_eq!(value.to_http_date(), "Wed, 15 Jan 2014 16:41:49 GMT");
    }

    #[test]
    fn test_unparseable_last_modified_passes_through() {
        let value = LastModified::from_listing("not a date");
        assert_eq!(value.to_http_date(), "not a date");
    }

    #[test]
    fn test_record_from_listing_entry() {
        let record: ObjectRecord = ObjectEntry {
            name: "path/file.txt".into(),
            content_type: Some("text/plain".into()),
            bytes: Some(42),
            last_modified: Some("2014-01-15T16:41:49.390270".into()),
            hash: None,
        }
        .into();
        assert_eq!(record.content_length, Some(42));
        assert_eq!(
            record.last_modified.as_deref(),
            Some("Wed, 15 Jan 2014 16:41:49 GMT")
        );
    }

    #[test]
    fn test_container_root_sentinel() {
        let record = ObjectRecord::container_root();
        assert_eq!(record.name, ".");
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"name": "."}));
    }
}
