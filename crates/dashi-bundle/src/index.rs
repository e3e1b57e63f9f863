//! Collated variant lists and runtime resolution.

use crate::item::{Item, ItemBuilder};
use crate::{BundleError, BundleResult, Qualifier};
use std::collections::HashMap;

/// All variants of one identifier, in qualifier order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantList {
    id: String,
    variants: Vec<Item>,
}

impl VariantList {
    /// Sort `variants` by qualifier. Equal qualifiers keep their given order.
    #[must_use]
    pub fn new(id: impl Into<String>, mut variants: Vec<Item>) -> Self {
        variants.sort_by(|a, b| a.qualifier().cmp(b.qualifier()));
        Self {
            id: id.into(),
            variants,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn variants(&self) -> &[Item] {
        &self.variants
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Variants whose qualifier matches `context`, in list order.
    pub fn matching<'a>(&'a self, context: &'a Qualifier) -> impl Iterator<Item = &'a Item> + 'a {
        self.variants
            .iter()
            .filter(move |v| v.qualifier().matches(context))
    }

    /// Merge every variant matching `runtime` into one item.
    ///
    /// Matches are overlaid in list order, so a later match's non-empty
    /// fields and extras replace earlier ones. The result carries the
    /// qualifier of the last match. A single match is returned unchanged.
    pub fn resolve(&self, runtime: &Qualifier) -> BundleResult<Option<Item>> {
        if !runtime.is_fully_specified() {
            return Err(BundleError::NotFullySpecified(runtime.to_string()));
        }

        let mut matches = self.matching(runtime);
        let Some(first) = matches.next() else {
            return Ok(None);
        };

        let mut merged: Option<ItemBuilder> = None;
        for next in matches {
            let builder = merged.unwrap_or_else(|| ItemBuilder::from_item(first));
            merged = Some(builder.overlay(next).qualifier(next.qualifier().clone()));
        }
        Ok(Some(merged.map_or_else(|| first.clone(), ItemBuilder::build)))
    }
}

/// Identifier → variant list. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundleIndex {
    lists: HashMap<String, VariantList>,
}

impl BundleIndex {
    /// Group `(identifier, item)` pairs into sorted variant lists.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (String, Item)>,
    {
        let mut grouped: HashMap<String, Vec<Item>> = HashMap::new();
        for (id, item) in items {
            grouped.entry(id).or_default().push(item);
        }
        Self::from_groups(grouped)
    }

    pub(crate) fn from_groups(grouped: HashMap<String, Vec<Item>>) -> Self {
        let lists = grouped
            .into_iter()
            .map(|(id, items)| {
                let list = VariantList::new(id.clone(), items);
                (id, list)
            })
            .collect();
        Self { lists }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&VariantList> {
        self.lists.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lists.contains_key(id)
    }

    /// Identifiers in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.lists.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Resolve `id` for a fully specified runtime qualifier.
    ///
    /// An unknown identifier, or one without a matching variant, resolves
    /// to `Ok(None)`. An empty identifier or a partial qualifier is a
    /// usage error.
    pub fn resolve(&self, id: &str, runtime: &Qualifier) -> BundleResult<Option<Item>> {
        if id.is_empty() {
            return Err(BundleError::InvalidIdentifier(id.to_string()));
        }
        if !runtime.is_fully_specified() {
            return Err(BundleError::NotFullySpecified(runtime.to_string()));
        }
        match self.lists.get(id) {
            Some(list) => list.resolve(runtime),
            None => Ok(None),
        }
    }
}
