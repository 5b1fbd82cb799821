//! Call stack snapshots attached by `with_stack`

use backtrace::Backtrace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol fragment identifying the capture routine itself in a backtrace.
const CAPTURE_SYMBOL: &str = "CallStack::capture";

/// One resolved stack frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Frame {
    pub fn name(&self) -> &str {
        self.function.as_deref().unwrap_or("<unknown>")
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if let Some(ref file) = self.file {
            write!(f, "\n\t{}", file)?;
            if let Some(line) = self.line {
                write!(f, ":{}", line)?;
            }
        }
        Ok(())
    }
}

/// Snapshot of the call stack, innermost frame first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallStack {
    frames: Vec<Frame>,
}

impl CallStack {
    /// Capture the current call stack.
    ///
    /// The first frame kept is the caller of `capture`; `skip` omits that
    /// many additional frames above it. Layers wrapping this call must pass
    /// `skip + 1`.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        let backtrace = Backtrace::new();

        let mut frames: Vec<Frame> = backtrace
            .frames()
            .iter()
            .flat_map(|frame| {
                frame.symbols().iter().map(|symbol| Frame {
                    function: symbol.name().map(|name| format!("{:#}", name)),
                    file: symbol.filename().map(|path| path.display().to_string()),
                    line: symbol.lineno(),
                })
            })
            .collect();

        // Without symbols the capture routine cannot be located; keep
        // everything rather than guessing.
        let start = frames
            .iter()
            .position(|frame| {
                frame
                    .function
                    .as_deref()
                    .is_some_and(|name| name.contains(CAPTURE_SYMBOL))
            })
            .map_or(0, |idx| idx + 1);

        let cut = start.saturating_add(skip).min(frames.len());
        frames.drain(..cut);

        Self { frames }
    }

    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Innermost frame kept by the snapshot
    pub fn top(&self) -> Option<&Frame> {
        self.frames.first()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for CallStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, frame) in self.frames.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}
