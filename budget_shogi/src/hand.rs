use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Catalog, KindId, PieceInstance};

/// The captured pieces of one player, as one stack per kind.
///
/// Tokens are kept individually rather than counted, because each one
/// carries its own instance id and designer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Hand {
    stacks: BTreeMap<KindId, Vec<PieceInstance>>,
}

impl Hand {
    /// An empty stack for every kind of the catalog.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            stacks: catalog
                .iter()
                .map(|kind| (kind.id.clone(), Vec::new()))
                .collect(),
        }
    }

    pub fn push(&mut self, token: PieceInstance) {
        self.stacks.entry(token.kind.clone()).or_default().push(token);
    }

    /// Removes the most recently captured token of a kind.
    pub fn pop(&mut self, kind: &str) -> Option<PieceInstance> {
        self.stacks.get_mut(kind)?.pop()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.stacks.get(kind).map_or(0, Vec::len)
    }

    /// Total number of tokens.
    pub fn len(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stacks, including empty ones, ordered by kind id.
    pub fn stacks(&self) -> impl Iterator<Item = (&KindId, &[PieceInstance])> {
        self.stacks.iter().map(|(kind, stack)| (kind, stack.as_slice()))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &PieceInstance> {
        self.stacks.values().flatten()
    }
}
