//! Bounded variable table
//!
//! Programs get at most [`MAX_VARIABLES`] named signed 8-bit registers.
//! Names keep [`NAME_LEN`] significant characters; anything longer is
//! silently truncated, so two names agreeing on their first ten characters
//! are the same variable. Bindings are created lazily on first assignment
//! and only ever reclaimed by a full reset.

use std::fmt;

/// Maximum number of live bindings.
pub const MAX_VARIABLES: usize = 10;

/// Significant characters in a variable or label name.
pub const NAME_LEN: usize = 10;

/// A variable or label name: up to [`NAME_LEN`] significant characters of
/// `[a-z0-9_]`. Extra characters are accepted but not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name {
    chars: [u8; NAME_LEN],
    len: u8,
}

impl Name {
    pub fn new() -> Self {
        Name {
            chars: [0; NAME_LEN],
            len: 0,
        }
    }

    /// Append a character; characters past the significant length are
    /// dropped.
    pub fn push(&mut self, c: u8) {
        if (self.len as usize) < NAME_LEN {
            self.chars[self.len as usize] = c;
            self.len += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.chars[..self.len as usize]).unwrap_or_default()
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        let mut name = Name::new();
        for &c in s.as_bytes() {
            name.push(c);
        }
        name
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
struct Binding {
    name: Name,
    value: i8,
}

/// Fixed-capacity table of named signed 8-bit registers.
#[derive(Debug, Clone)]
pub struct VariableTable {
    slots: [Option<Binding>; MAX_VARIABLES],
}

impl VariableTable {
    pub fn new() -> Self {
        VariableTable {
            slots: Default::default(),
        }
    }

    /// Drop every binding.
    pub fn reset(&mut self) {
        self.slots = Default::default();
    }

    /// Number of live bindings.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Slot index of an existing binding.
    pub fn find(&self, name: &Name) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| matches!(slot, Some(b) if b.name == *name))
    }

    /// Slot index of an existing binding, or a fresh zero-valued binding in
    /// the first free slot. `None` when the table is full.
    pub fn bind(&mut self, name: &Name) -> Option<usize> {
        if let Some(slot) = self.find(name) {
            return Some(slot);
        }
        let slot = self.slots.iter().position(|s| s.is_none())?;
        self.slots[slot] = Some(Binding {
            name: *name,
            value: 0,
        });
        Some(slot)
    }

    /// Value in a slot returned by [`find`](Self::find) or
    /// [`bind`](Self::bind).
    pub fn value_at(&self, slot: usize) -> i8 {
        self.slots[slot].as_ref().map_or(0, |b| b.value)
    }

    pub fn set_at(&mut self, slot: usize, value: i8) {
        if let Some(binding) = self.slots[slot].as_mut() {
            binding.value = value;
        }
    }

    /// Value of a binding by name.
    pub fn lookup(&self, name: &Name) -> Option<i8> {
        self.find(name).map(|slot| self.value_at(slot))
    }

    /// Convenience lookup from a string name.
    pub fn get(&self, name: &str) -> Option<i8> {
        self.lookup(&Name::from(name))
    }

    /// Live bindings in slot order, for display.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i8)> {
        self.slots
            .iter()
            .flatten()
            .map(|b| (b.name.as_str(), b.value))
    }
}

impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_creates_then_reuses() {
        let mut vars = VariableTable::new();
        let a = vars.bind(&Name::from("x")).unwrap();
        vars.set_at(a, 5);
        let b = vars.bind(&Name::from("x")).unwrap();
        assert_eq!(a, b);
        assert_eq!(vars.value_at(b), 5);
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_capacity_is_ten() {
        let mut vars = VariableTable::new();
        let names = [
            "a", "b", "c", "d", "e", "f", "g", "h", "i", "j",
        ];
        for name in names {
            assert!(vars.bind(&Name::from(name)).is_some());
        }
        assert_eq!(vars.bind(&Name::from("k")), None);
        // existing bindings still reachable when full
        assert!(vars.bind(&Name::from("a")).is_some());
    }

    #[test]
    fn test_names_truncate_to_significant_length() {
        let mut vars = VariableTable::new();
        let a = vars.bind(&Name::from("abcdefghij_one")).unwrap();
        vars.set_at(a, 7);
        // same first ten characters, same variable
        assert_eq!(vars.get("abcdefghij_two"), Some(7));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_reset_clears_bindings() {
        let mut vars = VariableTable::new();
        vars.bind(&Name::from("x")).unwrap();
        vars.reset();
        assert!(vars.is_empty());
        assert_eq!(vars.get("x"), None);
    }
}
