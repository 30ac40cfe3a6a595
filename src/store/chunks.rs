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

//! # Chunked download
//!
//! A pull-based iterator over fixed-size chunks of one object body. Each
//! `next()` is a blocking read against the open network stream; the stream
//! is released when the iterator is dropped, on every exit path. The
//! sequence is finite and restartable only by requesting a new iterator.

use std::io::{ErrorKind, Read};

use crate::error::Error;

pub struct BlobChunks {
    reader: Box<dyn Read + Send>,
    chunk_size: usize,
    done: bool,
}

impl BlobChunks {
    pub(crate) fn new(reader: Box<dyn Read + Send>, chunk_size: usize) -> Self {
        Self {
            reader,
            // a zero chunk size would loop forever yielding nothing
            chunk_size: chunk_size.max(1),
            done: false,
        }
    }
}

impl std::fmt::Debug for BlobChunks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobChunks")
            .field("chunk_size", &self.chunk_size)
            .field("done", &self.done)
            .finish()
    }
}

impl Iterator for BlobChunks {
    type Item = Result<Vec<u8>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut chunk = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < chunk.len() {
            match self.reader.read(&mut chunk[filled..]) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(read) => filled += read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
            }
        }
        if filled == 0 {
            None
        } else {
            chunk.truncate(filled);
            Some(Ok(chunk))
        }
    }
}
