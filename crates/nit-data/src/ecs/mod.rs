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

//! Implements Nit's sparse-set ECS storage.
//!
//! Each registered component type owns a [`Pool`](crate::pool::Pool) keyed by
//! entity id, so attaching, detaching and looking up a component are O(1) and
//! every instance of a type sits in one contiguous array. Entities carry an
//! [`EntitySignature`](nit_core::ecs::EntitySignature) listing their
//! components, which drives the cached [`EntityGroup`]s systems iterate over.
//!
//! The entry point is [`EntityRegistry`].

mod component;
mod error;
mod group;
mod registry;
mod serialization;
mod storage;

pub use component::*;
pub use error::EcsError;
pub use group::*;
pub use registry::*;
