//! Immutable, branchable logger state
//!
//! A [`Loglet`] is a handle to the leaf of a singly linked chain of nodes.
//! Each node records one increment of state (a level, a field, a batch of
//! fields or a call stack) and points at the node it was derived from.
//! Nodes are never mutated once built, so any number of loggers, on any
//! number of threads, can branch from the same node without coordination:
//! every `with_*` call allocates one new leaf and shares the rest.
//!
//! Lookups walk from the leaf toward the root, so the closest node wins:
//!
//! ```
//! use loglet::{Loglet, LogLevel};
//!
//! let base = Loglet::new().with_level(LogLevel::Info).with_field("a", 1);
//! let x = base.with_field("b", 2);
//! let y = base.with_field("a", 3).with_level(LogLevel::Debug);
//!
//! assert_eq!(x.level(), LogLevel::Info);
//! assert_eq!(x.fields_count(), 2);
//! assert_eq!(y.level(), LogLevel::Debug);
//! assert_eq!(y.fields_map().get("a"), Some(&3.into()));
//! ```

use super::error::LoggerError;
use super::fields::{FieldValue, Fields, ERROR_FIELD_KEY};
use super::log_level::LogLevel;
use super::stack::CallStack;
use std::collections::{HashMap, HashSet};
use std::iter::FusedIterator;
use std::sync::Arc;

#[derive(Debug)]
enum Payload {
    Empty,
    Field(String, FieldValue),
    Batch(Box<[(String, FieldValue)]>),
}

#[derive(Debug)]
struct Node {
    parent: Option<Arc<Node>>,
    /// `Undefined` when this node does not set a level
    level: LogLevel,
    payload: Payload,
    stack: Option<Arc<CallStack>>,
}

// Unlink uniquely owned ancestors one at a time; the default recursive drop
// overflows the stack on long chains.
impl Drop for Node {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Arc::try_unwrap(node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Handle to an immutable chain of logger state
///
/// Cloning is O(1) and shares the whole chain.
#[derive(Debug, Clone, Default)]
pub struct Loglet {
    head: Option<Arc<Node>>,
}

impl Loglet {
    /// Create an empty root: no level, no fields, no stack
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None }
    }

    fn push(&self, level: LogLevel, payload: Payload, stack: Option<Arc<CallStack>>) -> Self {
        Self {
            head: Some(Arc::new(Node {
                parent: self.head.clone(),
                level,
                payload,
                stack,
            })),
        }
    }

    fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
    }

    /// Derive a loglet with `level` as its effective level.
    ///
    /// Returns the receiver itself when `level` is already the effective
    /// level.
    ///
    /// # Panics
    ///
    /// Panics when `level` is [`LogLevel::Undefined`].
    #[must_use]
    #[track_caller]
    pub fn with_level(&self, level: LogLevel) -> Self {
        if !level.is_valid() {
            panic!("{}", LoggerError::invalid_level(level.into()));
        }

        if self.level() == level {
            return self.clone();
        }

        self.push(level, Payload::Empty, None)
    }

    /// Derive a loglet carrying one more field. An empty key adds nothing.
    #[must_use]
    pub fn with_field<K, V>(&self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let key = key.into();
        if key.is_empty() {
            return self.clone();
        }

        self.push(
            LogLevel::Undefined,
            Payload::Field(key, value.into()),
            None,
        )
    }

    /// Derive a loglet carrying a batch of fields.
    ///
    /// Entries with empty keys are skipped; when nothing is left no node is
    /// added. A key repeated within the batch keeps its last value.
    #[must_use]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let batch: HashMap<String, FieldValue> = fields
            .into_iter()
            .filter_map(|(k, v)| {
                let key: String = k.into();
                (!key.is_empty()).then(|| (key, v.into()))
            })
            .collect();

        let mut entries: Vec<_> = batch.into_iter().collect();
        let payload = match entries.len() {
            0 => return self.clone(),
            1 => match entries.pop() {
                Some((key, value)) => Payload::Field(key, value),
                None => return self.clone(),
            },
            _ => {
                entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
                Payload::Batch(entries.into_boxed_slice())
            }
        };

        self.push(LogLevel::Undefined, payload, None)
    }

    /// Attach `err` under the conventional `"error"` key
    #[must_use]
    pub fn with_error(&self, err: &dyn std::error::Error) -> Self {
        self.with_field(ERROR_FIELD_KEY, err.to_string())
    }

    /// Derive a loglet carrying a snapshot of the caller's stack.
    ///
    /// The snapshot starts at the caller of `with_stack`; `skip` omits that
    /// many additional frames.
    #[must_use]
    #[inline(never)]
    pub fn with_stack(&self, skip: usize) -> Self {
        let stack = CallStack::capture(skip.saturating_add(1));
        self.push(LogLevel::Undefined, Payload::Empty, Some(Arc::new(stack)))
    }

    /// Effective level: the closest explicit level, or `Undefined`
    pub fn level(&self) -> LogLevel {
        self.nodes()
            .map(|node| node.level)
            .find(LogLevel::is_valid)
            .unwrap_or(LogLevel::Undefined)
    }

    /// Closest call stack snapshot along the chain
    pub fn call_stack(&self) -> Option<Arc<CallStack>> {
        self.nodes().find_map(|node| node.stack.clone())
    }

    /// Snapshot carried by this exact node, ignoring ancestors
    pub fn local_call_stack(&self) -> Option<Arc<CallStack>> {
        self.head.as_ref().and_then(|node| node.stack.clone())
    }

    /// Number of distinct keys in the effective field set
    pub fn fields_count(&self) -> usize {
        self.fields().count()
    }

    /// Lazily iterate the effective field set, leaf first
    pub fn fields(&self) -> FieldsIter<'_> {
        FieldsIter {
            node: self.head.as_deref(),
            pending: Default::default(),
            seen: HashSet::new(),
        }
    }

    /// Collect the effective field set
    pub fn fields_map(&self) -> Fields {
        self.fields().map(|(k, v)| (k, v.clone())).collect()
    }

    /// `true` for a loglet no `with_*` call has been applied to
    pub fn is_root(&self) -> bool {
        self.head.is_none()
    }

    /// Number of nodes between this loglet and the root
    pub fn depth(&self) -> usize {
        self.nodes().count()
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &Loglet) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Iterator over the effective fields of a [`Loglet`]
///
/// Yields every key once, with the value closest to the leaf.
pub struct FieldsIter<'a> {
    node: Option<&'a Node>,
    pending: std::slice::Iter<'a, (String, FieldValue)>,
    seen: HashSet<&'a str>,
}

impl<'a> Iterator for FieldsIter<'a> {
    type Item = (&'a str, &'a FieldValue);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for (key, value) in self.pending.by_ref() {
                if self.seen.insert(key.as_str()) {
                    return Some((key.as_str(), value));
                }
            }

            let node = self.node?;
            self.node = node.parent.as_deref();

            match &node.payload {
                Payload::Field(key, value) => {
                    if self.seen.insert(key.as_str()) {
                        return Some((key.as_str(), value));
                    }
                }
                Payload::Batch(entries) => self.pending = entries.iter(),
                Payload::Empty => {}
            }
        }
    }
}

impl FusedIterator for FieldsIter<'_> {}
