//! Creation-feedback pulse sequence.
//!
//! # Responsibility
//! - Drive the scale-up-then-down pulse fired on every successful add.
//!
//! # Invariants
//! - Phases are strictly sequential: scale-up must finish before
//!   scale-down begins.
//! - The pulse has no effect on task state and no ordering dependency with
//!   persistence or deletion.

use crate::animation::{PULSE_PEAK, PULSE_PHASE_DURATION_MS, PULSE_REST};

/// Instruction for the renderer to run one pulse phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseSignal {
    /// Target value for the pulse parameter (renderer maps onto scale).
    pub to_value: f32,
    /// Phase duration in milliseconds.
    pub duration_ms: u64,
}

/// Pulse sequence position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PulsePhase {
    #[default]
    Idle,
    ScalingUp,
    ScalingDown,
}

/// Two-phase feedback pulse state machine.
#[derive(Debug, Default)]
pub struct CreationPulse {
    phase: PulsePhase,
}

impl CreationPulse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the pulse sequence, returning the scale-up
    /// phase signal.
    pub fn trigger(&mut self) -> PulseSignal {
        self.phase = PulsePhase::ScalingUp;
        PulseSignal {
            to_value: PULSE_PEAK,
            duration_ms: PULSE_PHASE_DURATION_MS,
        }
    }

    /// Advances past a completed phase.
    ///
    /// Returns the scale-down signal after scale-up completes, and `None`
    /// once the sequence is over (or was never started).
    pub fn advance(&mut self) -> Option<PulseSignal> {
        match self.phase {
            PulsePhase::ScalingUp => {
                self.phase = PulsePhase::ScalingDown;
                Some(PulseSignal {
                    to_value: PULSE_REST,
                    duration_ms: PULSE_PHASE_DURATION_MS,
                })
            }
            PulsePhase::ScalingDown => {
                self.phase = PulsePhase::Idle;
                None
            }
            PulsePhase::Idle => None,
        }
    }

    pub fn phase(&self) -> PulsePhase {
        self.phase
    }
}
