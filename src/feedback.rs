// 📳 Feedback - Best-effort haptics and chimes
//
// Devices advertise what they can do; the adapter only calls what is
// supported and swallows any failure. Feedback never surfaces an error.

use anyhow::Result;
use std::io::Write;
use tracing::debug;

/// Success pulse (vibrate, pause, vibrate) in milliseconds
pub const SUCCESS_PATTERN: &[u64] = &[30, 50, 30];

/// Error pulse in milliseconds
pub const ERROR_PATTERN: &[u64] = &[100, 50, 100];

/// A synthesized tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
}

/// Rising C major arpeggio played on unlock
pub const SUCCESS_CHIME: &[Tone] = &[
    Tone { frequency_hz: 523.25, duration_ms: 120 },
    Tone { frequency_hz: 659.25, duration_ms: 120 },
    Tone { frequency_hz: 783.99, duration_ms: 120 },
];

// ============================================================================
// DEVICE
// ============================================================================

/// Host capabilities for tactile and audio feedback
pub trait FeedbackDevice {
    fn supports_vibration(&self) -> bool;
    fn supports_audio(&self) -> bool;
    fn vibrate(&mut self, pattern: &[u64]) -> Result<()>;
    fn play_tones(&mut self, tones: &[Tone]) -> Result<()>;
}

/// Host with no feedback capabilities at all
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl FeedbackDevice for NoFeedback {
    fn supports_vibration(&self) -> bool {
        false
    }

    fn supports_audio(&self) -> bool {
        false
    }

    fn vibrate(&mut self, _pattern: &[u64]) -> Result<()> {
        Ok(())
    }

    fn play_tones(&mut self, _tones: &[Tone]) -> Result<()> {
        Ok(())
    }
}

/// Terminal host: no vibration, the chime is the terminal bell
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl FeedbackDevice for TerminalBell {
    fn supports_vibration(&self) -> bool {
        false
    }

    fn supports_audio(&self) -> bool {
        true
    }

    fn vibrate(&mut self, _pattern: &[u64]) -> Result<()> {
        Ok(())
    }

    fn play_tones(&mut self, _tones: &[Tone]) -> Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()?;
        Ok(())
    }
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Capability-checked wrapper used by the gate
pub struct Feedback {
    device: Box<dyn FeedbackDevice>,
}

impl Feedback {
    pub fn new(device: Box<dyn FeedbackDevice>) -> Self {
        Feedback { device }
    }

    pub fn none() -> Self {
        Self::new(Box::new(NoFeedback))
    }

    pub fn vibrate(&mut self, pattern: &[u64]) {
        if !self.device.supports_vibration() {
            return;
        }
        if let Err(e) = self.device.vibrate(pattern) {
            debug!("vibration failed: {}", e);
        }
    }

    pub fn chime(&mut self, tones: &[Tone]) {
        if !self.device.supports_audio() {
            return;
        }
        if let Err(e) = self.device.play_tones(tones) {
            debug!("chime failed: {}", e);
        }
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feedback")
            .field("vibration", &self.device.supports_vibration())
            .field("audio", &self.device.supports_audio())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
