//! Candidate port window.

use serde::Serialize;

/// Default first candidate when nothing else is configured.
pub const DEFAULT_START_PORT: u16 = 8080;

/// Default number of ports scanned past the start port.
pub const DEFAULT_SPAN: u16 = 50;

/// An inclusive range of candidate ports `[start, start + span]`.
///
/// The upper bound saturates at 65535, so a window starting near the top
/// of the port space is simply shorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScanWindow {
    start: u16,
    end: u16,
}

impl ScanWindow {
    /// Create a window starting at `start` and covering `span` further ports.
    pub fn new(start: u16, span: u16) -> Self {
        Self {
            start,
            end: start.saturating_add(span),
        }
    }

    /// First candidate.
    pub fn start(&self) -> u16 {
        self.start
    }

    /// Last candidate (inclusive).
    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of candidates in the window.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    /// A window always holds at least its start port.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Candidates in ascending order.
    pub fn candidates(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }
}

impl Default for ScanWindow {
    fn default() -> Self {
        Self::new(DEFAULT_START_PORT, DEFAULT_SPAN)
    }
}

impl std::fmt::Display for ScanWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
