use std::collections::HashMap;

/// Maps condition names to flat integer slots.
///
/// Built during signal-rule compilation by collecting every condition
/// referenced by any rule. Used by `BindingsBuilder` to place truth values at
/// the correct index in a `Vec<Option<bool>>`.
#[derive(Debug, Clone, Default)]
pub struct ConditionSlots {
    slots: HashMap<String, usize>,
    names: Vec<String>,
}

impl ConditionSlots {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a condition name, returning its slot. If the name is already
    /// registered, returns the existing slot.
    pub(crate) fn register(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.slots.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.slots.insert(name.to_owned(), idx);
        self.names.push(name.to_owned());
        idx
    }

    /// Look up the slot for a condition name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    /// The condition name stored at `slot`.
    #[must_use]
    pub fn name(&self, slot: usize) -> Option<&str> {
        self.names.get(slot).map(String::as_str)
    }

    /// The number of registered conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over all registered names in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_get() {
        let mut slots = ConditionSlots::new();
        let idx = slots.register("rsi_oversold");
        assert_eq!(idx, 0);
        assert_eq!(slots.get("rsi_oversold"), Some(0));
        assert_eq!(slots.name(0), Some("rsi_oversold"));
    }

    #[test]
    fn duplicate_register_returns_same_slot() {
        let mut slots = ConditionSlots::new();
        let a = slots.register("a");
        let b = slots.register("a");
        assert_eq!(a, b);
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn slots_follow_registration_order() {
        let mut slots = ConditionSlots::new();
        slots.register("c");
        slots.register("a");
        slots.register("b");
        assert_eq!(slots.iter().collect::<Vec<_>>(), vec!["c", "a", "b"]);
    }

    #[test]
    fn get_missing_returns_none() {
        let slots = ConditionSlots::new();
        assert_eq!(slots.get("nonexistent"), None);
        assert_eq!(slots.name(0), None);
        assert!(slots.is_empty());
    }
}
