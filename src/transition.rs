// ✨ Transition Plan - Fixed timed sequence between unlock and reveal
//
// Purely presentational. Once started it runs to completion; the only way to
// stop it is tearing the gate down.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// PHASES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionPhase {
    /// Code boxes settle and the mark fades in
    Appear,
    /// Mark glows
    Glow,
    /// Ripple spreads outward from the mark
    Ripple,
    /// Content is uncovered
    Reveal,
    /// Reduced-motion: single flat fade
    Fade,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::Appear => "appear",
            TransitionPhase::Glow => "glow",
            TransitionPhase::Ripple => "ripple",
            TransitionPhase::Reveal => "reveal",
            TransitionPhase::Fade => "fade",
        }
    }
}

// ============================================================================
// PLAN
// ============================================================================

/// One entry of a plan: at `offset` from the start, do `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanStep {
    pub offset: Duration,
    pub step: TransitionStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    Enter(TransitionPhase),
    Complete,
}

/// Ordered steps of a transition, offsets relative to its start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    steps: Vec<PlanStep>,
}

impl TransitionPlan {
    /// appear → glow (0.7s) → ripple (2.2s) → reveal (3.2s) → done (3.8s)
    pub fn standard() -> Self {
        TransitionPlan {
            steps: vec![
                step(0, TransitionStep::Enter(TransitionPhase::Appear)),
                step(700, TransitionStep::Enter(TransitionPhase::Glow)),
                step(2200, TransitionStep::Enter(TransitionPhase::Ripple)),
                step(3200, TransitionStep::Enter(TransitionPhase::Reveal)),
                step(3800, TransitionStep::Complete),
            ],
        }
    }

    /// Flat 0.8s fade straight to completion
    pub fn reduced_motion() -> Self {
        TransitionPlan {
            steps: vec![
                step(0, TransitionStep::Enter(TransitionPhase::Fade)),
                step(800, TransitionStep::Complete),
            ],
        }
    }

    pub fn for_preference(reduced_motion: bool) -> Self {
        if reduced_motion {
            Self::reduced_motion()
        } else {
            Self::standard()
        }
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Offset of the completion step
    pub fn total_duration(&self) -> Duration {
        self.steps
            .iter()
            .filter(|s| s.step == TransitionStep::Complete)
            .map(|s| s.offset)
            .max()
            .unwrap_or_default()
    }

    /// Phases entered by this plan, in order
    pub fn phases(&self) -> Vec<TransitionPhase> {
        self.steps
            .iter()
            .filter_map(|s| match s.step {
                TransitionStep::Enter(phase) => Some(phase),
                TransitionStep::Complete => None,
            })
            .collect()
    }
}

fn step(offset_ms: u64, step: TransitionStep) -> PlanStep {
    PlanStep {
        offset: Duration::from_millis(offset_ms),
        step,
    }
}

// ============================================================================
// TESTS
// ============================================================================
