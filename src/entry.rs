// 🔤 Entry Attempt - The three-slot code being typed at the gate
//
// Slots only ever hold uppercase ASCII letters. Anything else is dropped
// at the edit step and never reaches validation.

use serde::{Deserialize, Serialize};

/// Number of entry slots on the gate
pub const SLOT_COUNT: usize = 3;

/// Letter filter applied to every keystroke and pasted character
pub fn is_code_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

// ============================================================================
// ENTRY ATTEMPT
// ============================================================================

/// The code currently typed into the three slots
///
/// Always exactly [`SLOT_COUNT`] slots; an empty slot is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryAttempt {
    digits: [Option<char>; SLOT_COUNT],
}

impl EntryAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot contents in order
    pub fn digits(&self) -> &[Option<char>; SLOT_COUNT] {
        &self.digits
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.digits.get(index).copied().flatten()
    }

    /// Put `c` into slot `index`, normalized to uppercase
    ///
    /// Returns false (slot untouched) when the index is out of range or the
    /// character fails the letter filter.
    pub fn set(&mut self, index: usize, c: char) -> bool {
        if index >= SLOT_COUNT || !is_code_letter(c) {
            return false;
        }

        self.digits[index] = Some(c.to_ascii_uppercase());
        true
    }

    pub fn clear_slot(&mut self, index: usize) {
        if let Some(slot) = self.digits.get_mut(index) {
            *slot = None;
        }
    }

    pub fn clear(&mut self) {
        self.digits = [None; SLOT_COUNT];
    }

    pub fn is_slot_empty(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.digits.iter().all(Option::is_some)
    }

    /// Index of the first empty slot, if any
    pub fn first_empty(&self) -> Option<usize> {
        self.digits.iter().position(Option::is_none)
    }

    /// Fill slots left to right from the letters found in `raw`
    ///
    /// Non-letters are skipped; at most [`SLOT_COUNT`] letters are taken.
    /// Slots past the pasted letters keep their value. Returns how many were filled.
    pub fn fill_from(&mut self, raw: &str) -> usize {
        let mut filled = 0;
        for c in raw.chars().filter(|c| is_code_letter(*c)).take(SLOT_COUNT) {
            self.digits[filled] = Some(c.to_ascii_uppercase());
            filled += 1;
        }

        filled
    }

    /// The typed code as a string, `None` while any slot is empty
    pub fn code(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        Some(self.digits.iter().flatten().collect())
    }

    /// Slot values as strings, empty slots as ""
    pub fn as_strings(&self) -> [String; SLOT_COUNT] {
        self.digits.map(|slot| slot.map(String::from).unwrap_or_default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_attempt_is_empty() {
        let attempt = EntryAttempt::new();

        assert_eq!(attempt.digits(), &[None, None, None]);
        assert_eq!(attempt.first_empty(), Some(0));
        assert!(!attempt.is_complete());
        assert_eq!(attempt.code(), None);
    }

    #[test]
    fn test_set_uppercases_letters() {
        let mut attempt = EntryAttempt::new();

        assert!(attempt.set(0, 'k'));
        assert_eq!(attempt.get(0), Some('K'));
    }

    #[test]
    fn test_set_rejects_non_letters() {
        let mut attempt = EntryAttempt::new();
        attempt.set(1, 'F');

        for c in ['1', ' ', '-', 'é', '!', '\n'] {
            assert!(!attempt.set(1, c), "{:?} should be rejected", c);
            assert_eq!(attempt.get(1), Some('F'));
        }
    }

    #[test]
    fn test_set_out_of_range() {
        let mut attempt = EntryAttempt::new();
        assert!(!attempt.set(3, 'A'));
        assert_eq!(attempt, EntryAttempt::new());
    }

    #[test]
    fn test_fill_from_skips_non_letters() {
        let mut attempt = EntryAttempt::new();

        assert_eq!(attempt.fill_from(" k-f 0 o x"), 3);
        assert_eq!(attempt.code(), Some("KFO".to_string()));
    }

    #[test]
    fn test_fill_from_partial() {
        let mut attempt = EntryAttempt::new();
        attempt.set(2, 'Z');

        assert_eq!(attempt.fill_from("a1"), 1);
        assert_eq!(attempt.as_strings(), ["A".to_string(), String::new(), "Z".to_string()]);
        assert_eq!(attempt.first_empty(), Some(1));
    }

    #[test]
    fn test_fill_from_without_letters_changes_nothing() {
        let mut attempt = EntryAttempt::new();
        attempt.set(0, 'k');
        attempt.set(1, 'f');

        assert_eq!(attempt.fill_from("12 3!"), 0);
        assert_eq!(attempt.as_strings(), ["K".to_string(), "F".to_string(), String::new()]);
    }

    #[test]
    fn test_clear() {
        let mut attempt = EntryAttempt::new();
        attempt.fill_from("abc");
        attempt.clear();

        assert_eq!(attempt, EntryAttempt::new());
    }
}
