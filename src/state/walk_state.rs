/// Walk state definitions for pagination
///
/// A walk starts positioned on page 1 and ends in exactly one terminal state.
use serde::Serialize;
use std::fmt;

/// Position of a pagination walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkState {
    // ===== Active State =====
    /// Positioned on page `n` (1-based), which has not been summarised yet
    Positioned(u32),

    // ===== Terminal States =====
    /// The requested number of pages was summarised
    Exhausted,

    /// No next-page control was found; the site has no further pages
    Blocked,

    /// Navigation broke down with no way to continue
    Failed,
}

impl WalkState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Positioned(_))
    }

    /// Returns the termination reason for terminal states
    pub fn termination(&self) -> Option<Termination> {
        match self {
            Self::Positioned(_) => None,
            Self::Exhausted => Some(Termination::Exhausted),
            Self::Blocked => Some(Termination::Blocked),
            Self::Failed => Some(Termination::Failed),
        }
    }
}

impl fmt::Display for WalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positioned(n) => write!(f, "positioned({})", n),
            Self::Exhausted => write!(f, "exhausted"),
            Self::Blocked => write!(f, "blocked"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Why a pagination walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Requested page count reached
    Exhausted,
    /// No next control on the last page
    Blocked,
    /// Navigation failure; pages gathered so far are still reported
    Failed,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::Blocked => "blocked",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
