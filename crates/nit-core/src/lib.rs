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

//! # Nit Core
//!
//! Foundational crate containing the value types and contracts shared by the
//! storage core and by every subsystem that consumes it: entity ids and
//! signatures, asset handles and metadata, the minimal reflection contract,
//! notification payloads and the event bus that carries them.

#![warn(missing_docs)]

pub mod asset;
pub mod check;
pub mod config;
pub mod ecs;
pub mod event;
pub mod reflect;

pub use config::EngineConfig;
pub use reflect::TypeInfo;
