use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{
    Ability, AbilitySet, Catalog, Design, DesignStep, EditTarget, Event, Match, Player, Rejected, Square,
};

/// Something a player asks the session to do.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    EditAbilities {
        target: EditTarget,
        abilities: AbilitySet,
    },
    ToggleAbility {
        target: EditTarget,
        ability: Ability,
    },
    ResetStandard,
    ConfirmDesign,
    ClickSquare {
        square: Square,
    },
    ClickHand {
        player: Player,
        kind: String,
    },
    CancelSelection,
    Move {
        from: Square,
        to: Square,
    },
    Drop {
        kind: String,
        to: Square,
    },
    TogglePromotion {
        ability: Ability,
    },
    ConfirmPromotion,
    DeclinePromotion,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Setup { design: Design },
    Playing { position: Match },
    Finished { winner: Player, position: Match },
}

/// A whole game, from designing the configurations to the captured king.
///
/// A session can only be created from a loaded [`Catalog`], so nothing can
/// happen before the roster is known.
#[derive(Clone, Debug, Serialize)]
pub struct Session {
    #[serde(skip)]
    catalog: Catalog,
    phase: Phase,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        let design = Design::new(&catalog);
        Self {
            catalog,
            phase: Phase::Setup { design },
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The match being played or the final position, if design is over.
    pub fn position(&self) -> Option<&Match> {
        match &self.phase {
            Phase::Setup { .. } => None,
            Phase::Playing { position } | Phase::Finished { position, .. } => Some(position),
        }
    }

    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::Finished { winner, .. } => Some(winner),
            _ => None,
        }
    }

    /// The whole observable state as JSON.
    pub fn snapshot(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Applies one action. A rejected action leaves the session unchanged.
    pub fn apply(&mut self, action: Action) -> Result<Event, Rejected> {
        trace!(?action, "Applying action");
        let result = self.dispatch(action);
        match &result {
            Ok(event) => debug!(?event, "Action accepted"),
            Err(reason) => debug!(%reason, "Action rejected"),
        }
        result
    }

    fn dispatch(&mut self, action: Action) -> Result<Event, Rejected> {
        if action == Action::Restart {
            self.phase = Phase::Setup {
                design: Design::new(&self.catalog),
            };
            return Ok(Event::Restarted);
        }
        match &mut self.phase {
            Phase::Setup { design } => {
                let event = apply_design_action(&self.catalog, design, action)?;
                if event == Event::MatchStarted {
                    let position = Match::new(&self.catalog, design.stores().clone());
                    self.phase = Phase::Playing { position };
                }
                Ok(event)
            }
            Phase::Playing { position } => {
                let event = apply_play_action(position, action)?;
                if let Some(winner) = position.winner() {
                    let position = position.clone();
                    self.phase = Phase::Finished { winner, position };
                }
                Ok(event)
            }
            Phase::Finished { .. } => Err(Rejected::GameOver),
        }
    }
}

fn apply_design_action(catalog: &Catalog, design: &mut Design, action: Action) -> Result<Event, Rejected> {
    let player = design.designer();
    match action {
        Action::EditAbilities { target, abilities } => {
            let total_cost = design.edit(catalog, &target, abilities)?;
            Ok(Event::DesignEdited { player, total_cost })
        }
        Action::ToggleAbility { target, ability } => {
            let total_cost = design.toggle(catalog, &target, ability)?;
            Ok(Event::DesignEdited { player, total_cost })
        }
        Action::ResetStandard => {
            design.reset_to_standard(catalog);
            Ok(Event::DesignReset { player })
        }
        Action::ConfirmDesign => match design.confirm()? {
            DesignStep::NextDesigner(next_designer) => Ok(Event::DesignConfirmed {
                player,
                next_designer,
            }),
            DesignStep::Complete => {
                info!("Both designs confirmed, starting the match");
                Ok(Event::MatchStarted)
            }
        },
        _ => Err(Rejected::WrongPhase),
    }
}

fn apply_play_action(position: &mut Match, action: Action) -> Result<Event, Rejected> {
    match action {
        Action::ClickSquare { square } => position.click_square(square),
        Action::ClickHand { player, kind } => position.click_hand(player, &kind),
        Action::CancelSelection => position.cancel_selection(),
        Action::Move { from, to } => position.apply_move(from, to),
        Action::Drop { kind, to } => position.apply_drop(&kind, to),
        Action::TogglePromotion { ability } => position.toggle_promotion(ability),
        Action::ConfirmPromotion => position.resolve_promotion(true),
        Action::DeclinePromotion => position.resolve_promotion(false),
        _ => Err(Rejected::WrongPhase),
    }
}
