use crate::models::StyleOption;
use std::collections::BTreeSet;

/// Set of chosen style ids. Membership is all that matters; iteration is
/// sorted so the submitted list is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSelection {
    ids: BTreeSet<String>,
}

impl StyleSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `id` if absent, removes it if present.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Drops ids the catalog does not offer.
    pub fn retain_known(&mut self, catalog: &[StyleOption]) {
        self.ids
            .retain(|id| catalog.iter().any(|style| &style.id == id));
    }
}

impl<S: Into<String>> FromIterator<S> for StyleSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
