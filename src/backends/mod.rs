//! Logger backends

pub mod channel;
pub mod discard;
pub mod filter;
pub mod recorder;
pub mod writer;

#[cfg(feature = "log")]
pub mod log_bridge;
#[cfg(feature = "tracing")]
pub mod tracing_bridge;

pub use channel::{ChannelLogger, ChannelLoggerBuilder, DEFAULT_BUFFER_SIZE};
pub use discard::DiscardLogger;
pub use filter::{FieldFilter, FilterLogger, FilterLoggerBuilder, MessageFilter};
pub use recorder::RecorderLogger;
pub use writer::{WriterLogger, WriterLoggerBuilder};

#[cfg(feature = "log")]
pub use log_bridge::LogLogger;
#[cfg(feature = "tracing")]
pub use tracing_bridge::TracingLogger;
