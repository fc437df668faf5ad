//! Game log with verbosity-filtered console echo
//!
//! Every rules event is appended to the game's own log (turn, phase and
//! message), which is part of the game state and is what players see.
//! Independently, lines are echoed to stdout when the verbosity allows.
//! Verbose diagnostics are echoed only and never enter the game log.

use crate::game::{Phase, VerbosityLevel};
use serde::{Deserialize, Serialize};

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Keep only the in-memory game log (no stdout)
    Memory,
    /// Both stdout and the game log
    Both,
}

/// One line of the game log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub phase: Phase,
    pub message: String,
}

/// Game logger owned by [`crate::game::GameState`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    entries: Vec<LogEntry>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logger with specified verbosity
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            ..Self::default()
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Suppress stdout, keeping only the game log
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    /// All game log entries, oldest first
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The last `n` game log entries
    pub fn tail(&self, n: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Game outcome lines
    pub fn minimal(&mut self, turn: u32, phase: Phase, message: &str) {
        self.record(VerbosityLevel::Minimal, turn, phase, message);
    }

    /// Ordinary rules events
    pub fn normal(&mut self, turn: u32, phase: Phase, message: &str) {
        self.record(VerbosityLevel::Normal, turn, phase, message);
    }

    /// Diagnostics (AI scoring, trap scans); echoed only
    pub fn verbose(&self, message: &str) {
        if self.echoes(VerbosityLevel::Verbose) {
            println!("    {message}");
        }
    }

    fn record(&mut self, level: VerbosityLevel, turn: u32, phase: Phase, message: &str) {
        if self.echoes(level) {
            if level == VerbosityLevel::Minimal {
                println!("{message}");
            } else {
                println!("  [T{turn} {phase}] {message}");
            }
        }
        self.entries.push(LogEntry {
            turn,
            phase,
            message: message.to_string(),
        });
    }

    #[inline]
    fn echoes(&self, level: VerbosityLevel) -> bool {
        cfg!(feature = "verbose-logging")
            && matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity
    }
}
