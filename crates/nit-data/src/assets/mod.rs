// Copyright 2025 eraflo
//
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

//! Implements the registry of versioned, reference-counted assets.
//!
//! Asset types are registered with a set of hooks ([`AssetTypeArgs`]) and get
//! one self-managed pool each. Assets are created in code or read from
//! documents on disk (see [`document`]), loaded lazily through
//! `retain`/`release`, and hot-reloaded in place when a document for a known
//! id is applied again.

mod args;
mod discovery;
pub mod document;
mod error;
mod registry;
mod storage;

pub use args::AssetTypeArgs;
pub use document::AssetDocument;
pub use error::AssetError;
pub use registry::AssetRegistry;

#[cfg(test)]
mod tests;
