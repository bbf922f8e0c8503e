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

//! Reporting of precondition violations.
//!
//! Operating on an invalid id, double-inserting, exceeding a capacity bound or
//! using an unregistered type are programmer errors. They are always logged;
//! with the `strict` feature they also abort on the spot so the offending call
//! shows up at the top of the backtrace. Without it the error is handed back
//! to the caller, which receives a plain `Err` and no state is touched.

use std::fmt::Display;

/// Logs a precondition violation and returns it, or panics in strict builds.
#[track_caller]
pub fn violation<E: Display>(error: E) -> E {
    log::error!("Precondition violated: {error}");
    if cfg!(feature = "strict") {
        panic!("precondition violated: {error}");
    }
    error
}

/// Returns `Err(violation(error))`; shorthand for early returns.
#[track_caller]
pub fn fail<T, E: Display>(error: E) -> Result<T, E> {
    Err(violation(error))
}
