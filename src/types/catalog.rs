use std::collections::HashMap;

/// Where a condition comes from and what it means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionInfo {
    indicator: Option<String>,
    description: String,
}

impl ConditionInfo {
    /// The indicator that registered this condition, if known.
    #[must_use]
    pub fn indicator(&self) -> Option<&str> {
        self.indicator.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Snapshot of the conditions available to an expression.
///
/// Built once from the selected indicators' condition tables into a reverse
/// index `condition name -> (indicator, description)`, so every lookup during
/// validation and display is a single hash probe. Names are expected to be
/// unique across indicators; the first registration of a name wins.
#[derive(Debug, Clone, Default)]
pub struct ConditionCatalog {
    index: HashMap<String, ConditionInfo>,
    indicators: Vec<(String, Vec<String>)>,
}

impl ConditionCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every `(name, description)` condition of one indicator.
    #[must_use]
    pub fn indicator<N, D>(mut self, id: &str, conditions: impl IntoIterator<Item = (N, D)>) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        for (name, description) in conditions {
            self.register(Some(id), name.into(), description.into());
        }
        self
    }

    /// Register a single condition. Returns `false` and leaves the catalog
    /// unchanged if the name is already taken.
    pub fn register(&mut self, indicator: Option<&str>, name: String, description: String) -> bool {
        if let Some(existing) = self.index.get(&name) {
            tracing::warn!(
                condition = %name,
                registered_by = existing.indicator().unwrap_or("-"),
                rejected = indicator.unwrap_or("-"),
                "duplicate condition name ignored"
            );
            return false;
        }

        if let Some(id) = indicator {
            match self.indicators.iter_mut().find(|(i, _)| i == id) {
                Some((_, names)) => names.push(name.clone()),
                None => self.indicators.push((id.to_owned(), vec![name.clone()])),
            }
        }

        self.index.insert(
            name,
            ConditionInfo {
                indicator: indicator.map(str::to_owned),
                description,
            },
        );
        true
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConditionInfo> {
        self.index.get(name)
    }

    #[must_use]
    pub fn description(&self, name: &str) -> Option<&str> {
        self.get(name).map(ConditionInfo::description)
    }

    #[must_use]
    pub fn indicator_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ConditionInfo::indicator)
    }

    /// Condition names registered by one indicator, in registration order.
    pub fn conditions_for<'a>(&'a self, indicator: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.indicators
            .iter()
            .filter(move |(id, _)| id == indicator)
            .flat_map(|(_, names)| names.iter().map(String::as_str))
    }

    /// The number of registered conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterate over all registered (name, info) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConditionInfo)> {
        self.index.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Build a catalog from a plain `name -> description` map with no indicator
/// attribution.
impl<N, D> FromIterator<(N, D)> for ConditionCatalog
where
    N: Into<String>,
    D: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, D)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (name, description) in iter {
            catalog.register(None, name.into(), description.into());
        }
        catalog
    }
}
