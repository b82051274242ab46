use super::slots::ConditionSlots;

/// Pre-indexed bindings for fast per-bar evaluation. Truth values are stored
/// in a flat `Vec` with indices matching the compiled rules' condition slots.
///
/// Created via [`BindingsBuilder`], which is obtained from
/// [`SignalRules::bindings_builder()`](super::SignalRules::bindings_builder).
#[derive(Debug, Clone)]
pub struct IndexedBindings {
    values: Vec<Option<bool>>,
}

impl IndexedBindings {
    /// Get a truth value by its pre-resolved slot.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<bool> {
        self.values.get(slot).copied().flatten()
    }

    /// The raw slot values, for direct access by the evaluator.
    #[must_use]
    pub(crate) fn values(&self) -> &[Option<bool>] {
        &self.values
    }
}

/// Builder for constructing an [`IndexedBindings`].
///
/// Condition names are resolved to slots using the compiled rules' registry.
/// Names not referenced by any rule are silently ignored.
#[derive(Debug)]
pub struct BindingsBuilder<'a> {
    slots: &'a ConditionSlots,
    values: Vec<Option<bool>>,
}

impl<'a> BindingsBuilder<'a> {
    pub(crate) fn new(slots: &'a ConditionSlots) -> Self {
        Self {
            slots,
            values: vec![None; slots.len()],
        }
    }

    /// Bind a condition by name. Unreferenced names are ignored.
    #[must_use]
    pub fn set(mut self, name: &str, value: bool) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind a condition by name (mutable reference version).
    pub fn insert(&mut self, name: &str, value: bool) {
        if let Some(idx) = self.slots.get(name) {
            self.values[idx] = Some(value);
        }
    }

    /// Build the indexed bindings.
    #[must_use]
    pub fn build(self) -> IndexedBindings {
        IndexedBindings {
            values: self.values,
        }
    }
}
