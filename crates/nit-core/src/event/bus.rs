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

use std::fmt;

/// Identifies a subscription so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

enum Listener<T> {
    Callback(Box<dyn FnMut(&T)>),
    Channel(flume::Sender<T>),
}

/// An ordered list of listeners for one event type `T`.
///
/// `publish` visits listeners in the order they subscribed. Callbacks only
/// receive the event payload, never the registry that published it, so they
/// cannot mutate the registry reentrantly.
pub struct EventBus<T: Clone + 'static> {
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u64,
}

impl<T: Clone + 'static> EventBus<T> {
    /// Creates a bus without listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Registers a callback invoked synchronously on every publish.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> ListenerId {
        let id = self.next_listener_id();
        self.listeners
            .push((id, Listener::Callback(Box::new(callback))));
        id
    }

    /// Registers a channel listener and returns its receiving end.
    ///
    /// Every published event is cloned into the channel. Dropping the receiver
    /// unsubscribes on the next publish.
    pub fn subscribe_channel(&mut self) -> flume::Receiver<T> {
        let (sender, receiver) = flume::unbounded();
        let id = self.next_listener_id();
        self.listeners.push((id, Listener::Channel(sender)));
        receiver
    }

    /// Removes a callback subscription. Returns false if `id` was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to every listener in subscription order.
    pub fn publish(&mut self, event: &T) {
        log::trace!("Publishing an event to {} listener(s).", self.listeners.len());

        self.listeners.retain_mut(|(_, listener)| match listener {
            Listener::Callback(callback) => {
                callback(event);
                true
            }
            Listener::Channel(sender) => {
                if sender.send(event.clone()).is_err() {
                    log::debug!("Dropping channel listener: receiver disconnected.");
                    false
                } else {
                    true
                }
            }
        });
    }

    /// Number of active subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if nobody listens.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<T: Clone + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
