use serde::Serialize;
use tracing::debug;

use crate::{attempt_confirm_design, Ability, AbilitySet, Catalog, ConfigStore, EditTarget, Player, Rejected};

/// The design phase: both players build their configuration in turn,
/// player one first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Design {
    designer: Player,
    stores: [ConfigStore; 2],
}

/// What confirming a design led to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesignStep {
    /// The other player designs next.
    NextDesigner(Player),
    /// Both designs are done.
    Complete,
}

impl Design {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            designer: Player::One,
            stores: [
                ConfigStore::from_catalog(catalog),
                ConfigStore::from_catalog(catalog),
            ],
        }
    }

    /// The player whose design is being edited.
    pub fn designer(&self) -> Player {
        self.designer
    }

    pub fn store(&self, player: Player) -> &ConfigStore {
        &self.stores[player.index()]
    }

    pub fn stores(&self) -> &[ConfigStore; 2] {
        &self.stores
    }

    fn current_mut(&mut self) -> &mut ConfigStore {
        &mut self.stores[self.designer.index()]
    }

    pub fn edit(&mut self, catalog: &Catalog, target: &EditTarget, abilities: AbilitySet) -> Result<u32, Rejected> {
        self.current_mut().attempt_edit_ability(catalog, target, abilities)
    }

    pub fn toggle(&mut self, catalog: &Catalog, target: &EditTarget, ability: Ability) -> Result<u32, Rejected> {
        self.current_mut().attempt_toggle_ability(catalog, target, ability)
    }

    pub fn reset_to_standard(&mut self, catalog: &Catalog) {
        self.current_mut().reset_to_standard(catalog);
    }

    /// Locks in the current designer's configuration.
    pub fn confirm(&mut self) -> Result<DesignStep, Rejected> {
        attempt_confirm_design(self.store(self.designer))?;
        debug!(designer = %self.designer, cost = self.store(self.designer).total_cost(), "Design confirmed");
        match self.designer {
            Player::One => {
                self.designer = Player::Two;
                Ok(DesignStep::NextDesigner(Player::Two))
            }
            Player::Two => Ok(DesignStep::Complete),
        }
    }
}
