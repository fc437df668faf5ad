//! Turn phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phases of a player's turn, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Start,
    Deploy,
    Combat,
    End,
}

impl Phase {
    /// The next phase within the same turn; `None` after `End`
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Start => Some(Phase::Deploy),
            Phase::Deploy => Some(Phase::Combat),
            Phase::Combat => Some(Phase::End),
            Phase::End => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Start => "start",
            Phase::Deploy => "deploy",
            Phase::Combat => "combat",
            Phase::End => "end",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let mut phase = Phase::Start;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(seen, vec![Phase::Start, Phase::Deploy, Phase::Combat, Phase::End]);
    }
}
