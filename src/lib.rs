// KFO Studio - Core Library
// Exposes all modules for use in the terminal UI, API server, and tests

pub mod timer;          // Cancelable delayed callbacks on a simulated clock
pub mod entry;          // Three-slot entry code
pub mod transition;     // Unlock transition phases and timing
pub mod feedback;       // Capability-checked haptics / chime
pub mod gate;           // Access gate state machine
pub mod shell;          // Gate mount + page routing
pub mod catalog;        // Services & pricing
pub mod config;
pub mod store;          // Booking store: memory + SQLite

#[cfg(feature = "server")]
pub mod chat;
#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use timer::{Scheduler, TimerId};
pub use entry::{EntryAttempt, SLOT_COUNT};
pub use transition::{TransitionPhase, TransitionPlan};
pub use feedback::{Feedback, FeedbackDevice, NoFeedback, TerminalBell, Tone};
pub use gate::{AccessSequencer, GateEvent, GateState, ACCESS_CODE};
pub use shell::{AppShell, Page};
pub use catalog::{PricingTier, Service};
pub use config::{Config, StoreBackend};
pub use store::{
    open_store, BookingError, BookingInput, BookingRecord, BookingStore,
    MemoryStore, ProjectType, SqliteStore,
};

#[cfg(feature = "server")]
pub use chat::{ChatBackend, ChatProxy, FALLBACK_REPLY};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
