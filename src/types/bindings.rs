use std::collections::HashMap;

/// Truth values for named conditions at one evaluation instant (one bar).
///
/// Must cover every condition referenced by the evaluated expression;
/// extra entries are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<String, bool>,
}

impl Bindings {
    /// Create an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a condition to a truth value.
    #[must_use]
    pub fn set(mut self, name: &str, value: bool) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind a condition (mutable reference version).
    pub fn insert(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, bool)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (&'a str, bool)>>(iter: T) -> Self {
        let mut bindings = Self::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}
