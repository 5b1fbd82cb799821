//! What the channel backend does when its queue is full
//!
//! Fatal and Panic messages ignore the policy: they always wait for room.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for a full channel queue
///
/// # Example
///
/// ```
/// use loglet::OverflowPolicy;
/// use std::time::Duration;
///
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::AlertAndDrop);
///
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Drop the new message and count it
    DropNewest,

    /// Evict the oldest queued message to make room
    ///
    /// The logger keeps a receiver handle to do this, so the queue never
    /// reports a disconnect while the logger is alive.
    DropOldest,

    /// Block the printing thread until there is room
    Block,

    /// Block up to the given duration, then drop
    BlockWithTimeout(Duration),

    /// Drop, and alert on stderr and through the overflow callback
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Called with the running total of dropped messages
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;
