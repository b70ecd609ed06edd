//! Conversational target buffers and their registry.
//!
//! A [`Buffer`] is one conversational target: a channel, a private query
//! peer, or the status pseudo-target `*`. The [`BufferRegistry`] owns the
//! canonical mapping from IRC-lowercased pattern to buffer; buffers keep
//! their original-case pattern for display. Buffers are created and removed
//! by the owning collaborator only — incoming traffic merely reports state
//! (names, topic, messages) into targets that already exist.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::casemap::{irc_eq, irc_to_lower};
use crate::message::Message;

/// The pattern of the main (status) buffer.
pub const MAIN_BUFFER_PATTERN: &str = "*";

/// Membership entries and reported names may carry status sigils (@, +, %);
/// identity comparison ignores them on both sides.
fn strip_sigils(name: &str) -> &str {
    name.trim_start_matches(['@', '+', '%'])
}

/// A message recorded in a buffer's log, with its arrival time.
#[derive(Clone, Debug)]
pub struct LoggedMessage {
    /// When the message was processed.
    pub received: DateTime<Utc>,
    /// The classified message.
    pub message: Message,
}

/// A named conversational target.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    pattern: String,
    names: Vec<String>,
    topic: Option<String>,
    log: Vec<LoggedMessage>,
}

impl Buffer {
    fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_owned(),
            ..Self::default()
        }
    }

    /// The original-case pattern this buffer was created with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Current membership list, for channel-like buffers.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Current topic, if one has been reported.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// The timestamped per-target message log, in arrival order.
    pub fn log(&self) -> &[LoggedMessage] {
        &self.log
    }

    pub(crate) fn add_name(&mut self, name: &str) {
        if !self.contains_name(name) {
            self.names.push(name.to_owned());
        }
    }

    pub(crate) fn remove_name(&mut self, name: &str) {
        let name = strip_sigils(name);
        self.names.retain(|n| !irc_eq(strip_sigils(n), name));
    }

    fn contains_name(&self, name: &str) -> bool {
        let name = strip_sigils(name);
        self.names.iter().any(|n| irc_eq(strip_sigils(n), name))
    }

    pub(crate) fn set_topic(&mut self, topic: &str) {
        self.topic = if topic.is_empty() {
            None
        } else {
            Some(topic.to_owned())
        };
    }

    pub(crate) fn push_message(&mut self, message: Message) {
        self.log.push(LoggedMessage {
            received: Utc::now(),
            message,
        });
    }

    pub(crate) fn set_pattern(&mut self, pattern: &str) {
        self.pattern = pattern.to_owned();
    }
}

/// Registry of buffers keyed by IRC-lowercased pattern, insertion-ordered.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    /// Lowered keys in insertion order.
    order: Vec<String>,
    map: HashMap<String, Buffer>,
}

impl BufferRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a buffer by pattern, case-insensitively.
    pub fn get(&self, pattern: &str) -> Option<&Buffer> {
        self.map.get(&irc_to_lower(pattern))
    }

    pub(crate) fn get_mut(&mut self, pattern: &str) -> Option<&mut Buffer> {
        self.map.get_mut(&irc_to_lower(pattern))
    }

    /// Add a buffer for `pattern`, idempotently.
    ///
    /// Returns the buffer and whether it was newly created. Calling `add`
    /// for an existing case-insensitive key returns the existing buffer
    /// unchanged, so at most one creation event is ever warranted per key.
    pub fn add(&mut self, pattern: &str) -> (&mut Buffer, bool) {
        let key = irc_to_lower(pattern);
        let created = !self.map.contains_key(&key);
        if created {
            self.order.push(key.clone());
            self.map.insert(key.clone(), Buffer::new(pattern));
        }
        (self.map.get_mut(&key).expect("buffer just ensured"), created)
    }

    /// Remove the buffer registered under `pattern`.
    ///
    /// Returns the detached buffer if one was actually registered; a
    /// removal event is warranted only in that case.
    pub fn remove(&mut self, pattern: &str) -> Option<Buffer> {
        let key = irc_to_lower(pattern);
        let removed = self.map.remove(&key);
        if removed.is_some() {
            self.order.retain(|k| k != &key);
        }
        removed
    }

    /// Re-key a buffer from `old` to `new` as an atomic remove-then-insert,
    /// preserving the buffer's state. Used when a query peer changes nick.
    ///
    /// Returns false if `old` is not registered or `new` already is.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let old_key = irc_to_lower(old);
        let new_key = irc_to_lower(new);
        if old_key == new_key {
            if let Some(buffer) = self.map.get_mut(&old_key) {
                buffer.set_pattern(new);
                return true;
            }
            return false;
        }
        if self.map.contains_key(&new_key) || !self.map.contains_key(&old_key) {
            return false;
        }
        let mut buffer = self.map.remove(&old_key).expect("checked above");
        buffer.set_pattern(new);
        let pos = self
            .order
            .iter()
            .position(|k| k == &old_key)
            .expect("order tracks map keys");
        self.order[pos] = new_key.clone();
        self.map.insert(new_key, buffer);
        true
    }

    /// Iterate buffers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Buffer> {
        self.order.iter().filter_map(|k| self.map.get(k))
    }

    /// Number of registered buffers.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
