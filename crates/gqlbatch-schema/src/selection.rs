//! Default selection-set synthesis.
//!
//! Walks a composite type and produces a single-line selection body that
//! requests every reachable leaf field at least once. Recursion is bounded by
//! a [`SelectionMemo`]: each `(field, type)` pair expands at most once per
//! top-level call, so self-referential schemas terminate.
//!
//! The memo is shared by the whole call tree, not reset per branch. A pair
//! that was already expanded anywhere earlier in the walk is dropped from
//! every later position, including siblings that are not part of a cycle.

use std::collections::HashMap;

use crate::error::SchemaError;
use crate::registry::SchemaRegistry;
use crate::resolver::TypeClass;
use crate::types::TypeData;
use crate::Result;

/// Visit counts keyed by `(field name, resolved type name)`.
///
/// Owned by one top-level synthesis call and threaded by `&mut` through
/// every recursive step.
#[derive(Debug, Default, Clone)]
pub struct SelectionMemo {
    visits: HashMap<(String, String), u32>,
}

impl SelectionMemo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `field` of type `type_name` has been expanded.
    #[must_use]
    pub fn visits(&self, field: &str, type_name: &str) -> u32 {
        self.visits
            .get(&(field.to_string(), type_name.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct pairs recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Records an expansion unless the pair was already expanded.
    fn try_enter(&mut self, field: &str, type_name: &str) -> bool {
        let count = self
            .visits
            .entry((field.to_string(), type_name.to_string()))
            .or_insert(0);
        if *count >= 1 {
            return false;
        }
        *count += 1;
        true
    }
}

/// Synthesizes default selection sets over one registry.
#[derive(Debug, Clone, Copy)]
pub struct SelectionSynthesizer<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> SelectionSynthesizer<'a> {
    #[must_use]
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Synthesizes the selection body for `type_data` with a fresh memo.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotComposite`] if the type has no fields and
    /// [`SchemaError::TypeNotFound`] if a field type is missing from the
    /// registry.
    pub fn synthesize(&self, type_data: &TypeData) -> Result<String> {
        let mut memo = SelectionMemo::new();
        self.synthesize_with_memo(type_data, &mut memo)
    }

    /// Synthesizes the selection body using a caller-supplied memo.
    ///
    /// Pairs already recorded in `memo` are not expanded again.
    ///
    /// # Errors
    ///
    /// Same as [`Self::synthesize`].
    pub fn synthesize_with_memo(
        &self,
        type_data: &TypeData,
        memo: &mut SelectionMemo,
    ) -> Result<String> {
        let fields = type_data
            .member_fields()
            .ok_or_else(|| SchemaError::not_composite(&type_data.name))?;

        let mut tokens = Vec::with_capacity(fields.len());
        for (field_name, type_ref) in fields {
            let resolved = self.registry.resolve(type_ref)?;
            if self.registry.classify(resolved) != TypeClass::Object {
                tokens.push(field_name.to_string());
                continue;
            }

            if memo.try_enter(field_name, &resolved.name) {
                let body = self.synthesize_with_memo(resolved, memo)?;
                tokens.push(format!("{field_name} {{ {body} }}"));
            } else {
                tracing::trace!(
                    field = field_name,
                    type_name = %resolved.name,
                    parent = %type_data.name,
                    "Pruned repeated expansion"
                );
            }
        }

        Ok(tokens
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }
}

impl SchemaRegistry {
    /// Default selection body for the named type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeNotFound`] for an unknown name, otherwise
    /// the errors of [`SelectionSynthesizer::synthesize`].
    pub fn default_selection(&self, type_name: &str) -> Result<String> {
        SelectionSynthesizer::new(self).synthesize(self.get(type_name)?)
    }

    /// Default selection bodies for every object-like type, in schema order.
    ///
    /// Each type gets its own memo.
    ///
    /// # Errors
    ///
    /// Fails on the first type whose synthesis fails.
    pub fn default_selections(&self) -> Result<Vec<(&str, String)>> {
        let synthesizer = SelectionSynthesizer::new(self);
        self.object_like_types()
            .map(|t| synthesizer.synthesize(t).map(|body| (t.name.as_str(), body)))
            .collect()
    }
}

/// Synthesizes the default selection body for `type_data`.
///
/// # Errors
///
/// See [`SelectionSynthesizer::synthesize`].
pub fn synthesize_selection_set(registry: &SchemaRegistry, type_data: &TypeData) -> Result<String> {
    SelectionSynthesizer::new(registry).synthesize(type_data)
}
