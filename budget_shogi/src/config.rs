use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Ability, AbilitySet, Catalog, InstanceId, KindId, PieceInstance, Rejected, POINT_BUDGET};

/// What a design edit applies to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditTarget {
    /// A single instance, e.g. `{"instance": "PAWN-3"}`.
    Instance(InstanceId),
    /// Every instance of a kind, e.g. `{"kind": "PAWN"}`.
    Kind(KindId),
}

/// One player's abilities for each of their piece instances.
///
/// Keyed by instance, so siblings of the same kind may diverge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigStore {
    entries: BTreeMap<InstanceId, AbilitySet>,
}

impl ConfigStore {
    /// Every instance starts with its kind's base abilities.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut entries = BTreeMap::new();
        for kind in catalog {
            for index in 0..kind.count as usize {
                entries.insert(InstanceId::new(&kind.id, index), kind.abilities);
            }
        }
        Self { entries }
    }

    pub fn get(&self, instance: &str) -> Option<AbilitySet> {
        self.entries.get(instance).copied()
    }

    /// The configured abilities of a piece. Unknown instances can't do anything.
    pub fn lookup(&self, piece: &PieceInstance) -> AbilitySet {
        self.get(piece.instance_id.as_str()).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InstanceId, &AbilitySet)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Σ cost over all instances.
    pub fn total_cost(&self) -> u32 {
        self.entries.values().map(AbilitySet::cost).sum()
    }

    /// The instances an edit applies to, after checking that the target exists
    /// and may be edited.
    fn resolve(&self, catalog: &Catalog, target: &EditTarget) -> Result<Vec<InstanceId>, Rejected> {
        let (kind_id, instances) = match target {
            EditTarget::Instance(id) => {
                if !self.entries.contains_key(id) {
                    return Err(Rejected::UnknownPiece {
                        id: id.to_string(),
                    });
                }
                (id.kind(), vec![id.clone()])
            }
            EditTarget::Kind(kind) => {
                let instances: Vec<InstanceId> = self
                    .entries
                    .keys()
                    .filter(|id| id.kind() == kind.as_str())
                    .cloned()
                    .collect();
                (kind.as_str(), instances)
            }
        };
        let kind = catalog.get(kind_id).ok_or_else(|| Rejected::UnknownPiece {
            id: String::from(kind_id),
        })?;
        if kind.is_locked() {
            return Err(Rejected::LockedPiece {
                kind: kind.id.clone(),
            });
        }
        Ok(instances)
    }

    /// Writes new abilities if the budget allows it.
    ///
    /// An edit is refused if it raises the total above [`POINT_BUDGET`]. Edits
    /// that lower the total are always accepted, so a roster that starts out
    /// over budget can still be fixed.
    fn commit(&mut self, updates: Vec<(InstanceId, AbilitySet)>) -> Result<u32, Rejected> {
        let old_total = self.total_cost();
        let new_total = updates.iter().fold(old_total, |total, (id, abilities)| {
            total - self.entries[id].cost() + abilities.cost()
        });
        if new_total > POINT_BUDGET && new_total > old_total {
            return Err(Rejected::OverBudget {
                cost: new_total,
                budget: POINT_BUDGET,
            });
        }
        self.entries.extend(updates);
        Ok(new_total)
    }

    /// Replaces the abilities of the target. Returns the new total cost.
    pub fn attempt_edit_ability(
        &mut self,
        catalog: &Catalog,
        target: &EditTarget,
        abilities: AbilitySet,
    ) -> Result<u32, Rejected> {
        let instances = self.resolve(catalog, target)?;
        self.commit(instances.into_iter().map(|id| (id, abilities)).collect())
    }

    /// Switches one ability of the target on or off. Returns the new total cost.
    ///
    /// For a whole kind, the ability is removed if every instance has it and
    /// added to all of them otherwise.
    pub fn attempt_toggle_ability(
        &mut self,
        catalog: &Catalog,
        target: &EditTarget,
        ability: Ability,
    ) -> Result<u32, Rejected> {
        let instances = self.resolve(catalog, target)?;
        let on = !instances
            .iter()
            .all(|id| self.entries[id].contains(ability));
        let updates = instances
            .into_iter()
            .map(|id| {
                let abilities = self.entries[&id].with(ability, on);
                (id, abilities)
            })
            .collect();
        self.commit(updates)
    }

    /// Back to the catalog's base abilities.
    pub fn reset_to_standard(&mut self, catalog: &Catalog) {
        *self = Self::from_catalog(catalog);
    }
}

/// Checks whether a design may be confirmed.
pub fn attempt_confirm_design(store: &ConfigStore) -> Result<(), Rejected> {
    let cost = store.total_cost();
    if cost > POINT_BUDGET {
        Err(Rejected::OverBudget {
            cost,
            budget: POINT_BUDGET,
        })
    } else {
        Ok(())
    }
}
