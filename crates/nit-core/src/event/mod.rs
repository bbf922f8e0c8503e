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

//! Provides the notification primitive used by the registries.
//!
//! The registries own one [`EventBus`] per notification kind. Listeners are
//! either callbacks, run synchronously in subscription order, or channels
//! whose receivers are drained later by the consumer (editor panels, gameplay
//! code polling once per frame).

mod bus;

pub use self::bus::{EventBus, ListenerId};
