// 🧭 Application Shell - Mounts the gate, then routes the studio pages
//
// The shell is the only consumer of the gate's Granted event. It keeps its
// own `granted` flag and drops the gate once access is given.

use crate::gate::AccessSequencer;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Services,
    Pricing,
    Bookings,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Services => Page::Pricing,
            Page::Pricing => Page::Bookings,
            Page::Bookings => Page::Services,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Services => Page::Bookings,
            Page::Pricing => Page::Services,
            Page::Bookings => Page::Pricing,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Services => "Services",
            Page::Pricing => "Pricing",
            Page::Bookings => "Bookings",
        }
    }
}

pub struct AppShell {
    gate: Option<AccessSequencer>,
    granted: bool,
    page: Page,
}

impl AppShell {
    pub fn new(gate: AccessSequencer) -> Self {
        AppShell {
            gate: Some(gate),
            granted: false,
            page: Page::Services,
        }
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// The mounted gate, `None` once access has been granted
    pub fn gate(&self) -> Option<&AccessSequencer> {
        self.gate.as_ref()
    }

    pub fn gate_mut(&mut self) -> Option<&mut AccessSequencer> {
        self.gate.as_mut()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Drive the gate's clock and swap it out when it reports Granted
    pub fn tick(&mut self, dt: Duration) {
        let Some(gate) = self.gate.as_mut() else {
            return;
        };

        gate.advance(dt);
        if gate.take_granted() {
            gate.unmount();
            self.gate = None;
            self.granted = true;
        }
    }

    pub fn next_page(&mut self) {
        if self.granted {
            self.page = self.page.next();
        }
    }

    pub fn previous_page(&mut self) {
        if self.granted {
            self.page = self.page.previous();
        }
    }

    pub fn show(&mut self, page: Page) {
        if self.granted {
            self.page = page;
        }
    }
}

impl Drop for AppShell {
    fn drop(&mut self) {
        if let Some(gate) = self.gate.as_mut() {
            gate.unmount();
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateState;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_page_cycle() {
        assert_eq!(Page::Services.next(), Page::Pricing);
        assert_eq!(Page::Bookings.next(), Page::Services);
        assert_eq!(Page::Services.previous(), Page::Bookings);
        assert_eq!(Page::Pricing.title(), "Pricing");
    }

    #[test]
    fn test_pages_locked_until_granted() {
        let mut shell = AppShell::new(AccessSequencer::default());

        shell.next_page();
        shell.show(Page::Bookings);

        assert_eq!(shell.page(), Page::Services);
        assert!(!shell.is_granted());
        assert!(shell.gate().is_some());
    }

    #[test]
    fn test_granted_unmounts_gate() {
        let mut shell = AppShell::new(AccessSequencer::new(true));

        if let Some(gate) = shell.gate_mut() {
            gate.paste_sequence("kfo");
        }
        shell.tick(ms(100));
        assert_eq!(shell.gate().map(|g| g.state()), Some(GateState::Unlocking));

        shell.tick(ms(800));
        assert!(shell.is_granted());
        assert!(shell.gate().is_none());

        shell.next_page();
        assert_eq!(shell.page(), Page::Pricing);
    }

    #[test]
    fn test_wrong_code_keeps_gate() {
        let mut shell = AppShell::new(AccessSequencer::default());

        if let Some(gate) = shell.gate_mut() {
            gate.paste_sequence("abc");
        }
        shell.tick(ms(5000));

        assert!(!shell.is_granted());
        assert_eq!(shell.gate().map(|g| g.state()), Some(GateState::Entering));
    }

    #[test]
    fn test_tick_after_grant_is_noop() {
        let mut shell = AppShell::new(AccessSequencer::new(true));
        if let Some(gate) = shell.gate_mut() {
            gate.paste_sequence("KFO");
        }
        shell.tick(ms(1000));
        shell.tick(ms(1000));

        assert!(shell.is_granted());
        assert!(shell.gate().is_none());
    }
}
