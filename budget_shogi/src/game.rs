use serde::Serialize;
use tracing::{debug, info};

use crate::{
    legal_moves, promotion_eligible, Ability, AbilitySet, Board, Catalog, ConfigStore, Hand, Illegal,
    InstanceId, KindId, Move, PieceInstance, Player, PromotionDraft, PromotionOffer, Rejected, Square,
};

/// What the active player is in the middle of.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Staging {
    /// Waiting for an origin square or a hand kind.
    Idle,
    /// A piece is selected; waiting for a destination.
    PieceSelected { origin: Square, legal: Vec<Move> },
    /// A hand kind is selected; waiting for an empty square.
    DropArmed { kind: KindId },
    /// A move has been made and the turn is suspended until the mover
    /// decides about promotion.
    PromotionOffered { offer: PromotionOffer },
}

/// A transient hint for the player, cleared on every turn change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    ChooseDestination,
    ChooseDropTarget,
    ChoosePromotion,
}

/// How a move ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveOutcome {
    TurnPassed { next: Player },
    PromotionOffered { square: Square },
    GameWon { winner: Player },
}

/// Summarizes what an accepted action did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    DesignEdited {
        player: Player,
        total_cost: u32,
    },
    DesignReset {
        player: Player,
    },
    DesignConfirmed {
        player: Player,
        next_designer: Player,
    },
    MatchStarted,
    Selected {
        origin: Square,
        legal: Vec<Move>,
    },
    SelectionCleared,
    DropArmed {
        kind: KindId,
    },
    Moved {
        from: Square,
        to: Square,
        captured: Option<InstanceId>,
        outcome: MoveOutcome,
    },
    Dropped {
        instance: InstanceId,
        to: Square,
        next: Player,
    },
    PromotionDraftChanged {
        draft: AbilitySet,
        cost: u32,
    },
    PromotionResolved {
        square: Square,
        promoted: bool,
        next: Player,
    },
    Restarted,
}

/// The playing phase: board, hands, both configurations and whose turn it is.
///
/// Every method validates completely before it changes anything, so a
/// rejected action leaves the match exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Match {
    #[serde(skip)]
    catalog: Catalog,
    board: Board,
    hands: [Hand; 2],
    configs: [ConfigStore; 2],
    turn: Player,
    staging: Staging,
    prompt: Option<Prompt>,
    winner: Option<Player>,
}

impl Match {
    /// Sets up the starting position. Player one moves first.
    pub fn new(catalog: &Catalog, configs: [ConfigStore; 2]) -> Self {
        Self {
            catalog: catalog.clone(),
            board: Board::setup(catalog),
            hands: [Hand::new(catalog), Hand::new(catalog)],
            configs,
            turn: Player::One,
            staging: Staging::Idle,
            prompt: None,
            winner: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self, player: Player) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn config(&self, player: Player) -> &ConfigStore {
        &self.configs[player.index()]
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn staging(&self) -> &Staging {
        &self.staging
    }

    pub fn prompt(&self) -> Option<Prompt> {
        self.prompt
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// The promotion waiting for a decision, if any.
    pub fn pending_promotion(&self) -> Option<&PromotionOffer> {
        match &self.staging {
            Staging::PromotionOffered { offer } => Some(offer),
            _ => None,
        }
    }

    /// Where the piece on `origin` may go, using its designer's configuration.
    pub fn legal_moves_from(&self, origin: Square) -> Result<Vec<Move>, Rejected> {
        if !origin.is_on_board() {
            return Err(Illegal::OffBoard.into());
        }
        let piece = self.board.get(origin).ok_or(Illegal::NoPieceAtOrigin)?;
        let config = &self.configs[piece.config_owner.index()];
        Ok(legal_moves(&self.board, origin, piece, config, false))
    }

    fn ensure_accepting_input(&self) -> Result<(), Rejected> {
        if self.winner.is_some() {
            return Err(Rejected::GameOver);
        }
        if self.pending_promotion().is_some() {
            return Err(Rejected::WrongPhase);
        }
        Ok(())
    }

    fn own_piece_at(&self, square: Square) -> Result<&PieceInstance, Rejected> {
        if !square.is_on_board() {
            return Err(Illegal::OffBoard.into());
        }
        let piece = self.board.get(square).ok_or(Illegal::NoPieceAtOrigin)?;
        if piece.owner != self.turn {
            return Err(Illegal::NotYourPiece.into());
        }
        Ok(piece)
    }

    /// Moves the active player's piece from `from` to `to`.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<Event, Rejected> {
        self.ensure_accepting_input()?;
        self.own_piece_at(from)?;
        if !to.is_on_board() {
            return Err(Illegal::OffBoard.into());
        }
        if !self.legal_moves_from(from)?.iter().any(|m| m.to == to) {
            return Err(Illegal::NotReachable { square: to }.into());
        }
        let moving = self.board.take(from).ok_or(Illegal::NoPieceAtOrigin)?;
        let mover = self.turn;

        let captured = self.board.take(to);
        let captured_id = captured.as_ref().map(|piece| piece.instance_id.clone());
        if let Some(target) = captured {
            if target.kind.is_king() {
                self.board.place(to, moving);
                self.winner = Some(mover);
                self.clear_staging();
                info!(winner = %mover, %to, "King captured");
                return Ok(Event::Moved {
                    from,
                    to,
                    captured: captured_id,
                    outcome: MoveOutcome::GameWon { winner: mover },
                });
            }
            debug!(captured = %target.instance_id, by = %mover, "Piece captured");
            self.hands[mover.index()].push(target.captured_by(mover));
        }

        let may_promote = promotion_eligible(&self.catalog, &moving, from, to);
        self.board.place(to, moving);
        let outcome = if may_promote {
            self.staging = Staging::PromotionOffered {
                offer: PromotionOffer {
                    square: to,
                    draft: PromotionDraft::new(),
                },
            };
            self.prompt = Some(Prompt::ChoosePromotion);
            MoveOutcome::PromotionOffered { square: to }
        } else {
            MoveOutcome::TurnPassed {
                next: self.end_turn(),
            }
        };
        Ok(Event::Moved {
            from,
            to,
            captured: captured_id,
            outcome,
        })
    }

    /// Drops the most recently captured piece of `kind` from the active
    /// player's hand onto the empty square `to`.
    pub fn apply_drop(&mut self, kind: &str, to: Square) -> Result<Event, Rejected> {
        self.ensure_accepting_input()?;
        if !to.is_on_board() {
            return Err(Illegal::OffBoard.into());
        }
        if self.hand(self.turn).count(kind) == 0 {
            return Err(Illegal::EmptyHandStack.into());
        }
        if !self.board.is_empty_at(to) {
            return Err(Illegal::Occupied { square: to }.into());
        }
        let mut token = self.hands[self.turn.index()]
            .pop(kind)
            .ok_or(Illegal::EmptyHandStack)?;
        token.owner = self.turn;
        let instance = token.instance_id.clone();
        debug!(%instance, %to, player = %self.turn, "Piece dropped");
        self.board.place(to, token);
        Ok(Event::Dropped {
            instance,
            to,
            next: self.end_turn(),
        })
    }

    /// The square-click interaction: select, re-select, deselect, move or drop,
    /// depending on what is staged.
    pub fn click_square(&mut self, square: Square) -> Result<Event, Rejected> {
        self.ensure_accepting_input()?;
        if !square.is_on_board() {
            return Err(Illegal::OffBoard.into());
        }
        match self.staging.clone() {
            Staging::Idle => self.select(square),
            Staging::DropArmed { kind } => self.apply_drop(kind.as_str(), square),
            Staging::PieceSelected { origin, legal } => {
                if origin == square {
                    self.clear_staging();
                    Ok(Event::SelectionCleared)
                } else if legal.iter().any(|m| m.to == square) {
                    self.apply_move(origin, square)
                } else if self.own_piece_at(square).is_ok() {
                    self.select(square)
                } else {
                    Err(Illegal::NotReachable { square }.into())
                }
            }
            Staging::PromotionOffered { .. } => Err(Rejected::WrongPhase),
        }
    }

    fn select(&mut self, origin: Square) -> Result<Event, Rejected> {
        self.own_piece_at(origin)?;
        let legal = self.legal_moves_from(origin)?;
        self.staging = Staging::PieceSelected {
            origin,
            legal: legal.clone(),
        };
        self.prompt = Some(Prompt::ChooseDestination);
        Ok(Event::Selected { origin, legal })
    }

    /// Arms a drop of `kind`, or disarms it if it is already armed.
    pub fn click_hand(&mut self, player: Player, kind: &str) -> Result<Event, Rejected> {
        self.ensure_accepting_input()?;
        if player != self.turn {
            return Err(Illegal::NotYourTurn.into());
        }
        if self.hand(player).count(kind) == 0 {
            return Err(Illegal::EmptyHandStack.into());
        }
        if matches!(&self.staging, Staging::DropArmed { kind: armed } if armed.as_str() == kind) {
            self.clear_staging();
            return Ok(Event::SelectionCleared);
        }
        let kind = KindId::from(kind);
        self.staging = Staging::DropArmed { kind: kind.clone() };
        self.prompt = Some(Prompt::ChooseDropTarget);
        Ok(Event::DropArmed { kind })
    }

    pub fn cancel_selection(&mut self) -> Result<Event, Rejected> {
        self.ensure_accepting_input()?;
        self.clear_staging();
        Ok(Event::SelectionCleared)
    }

    /// Switches an ability of the pending promotion draft.
    pub fn toggle_promotion(&mut self, ability: Ability) -> Result<Event, Rejected> {
        if self.winner.is_some() {
            return Err(Rejected::GameOver);
        }
        let Staging::PromotionOffered { offer } = &mut self.staging else {
            return Err(Rejected::WrongPhase);
        };
        offer.draft.toggle(ability)?;
        Ok(Event::PromotionDraftChanged {
            draft: offer.draft.abilities(),
            cost: offer.draft.cost(),
        })
    }

    /// Accepts or declines the pending promotion; either way the turn ends.
    pub fn resolve_promotion(&mut self, accept: bool) -> Result<Event, Rejected> {
        if self.winner.is_some() {
            return Err(Rejected::GameOver);
        }
        let offer = *self.pending_promotion().ok_or(Rejected::WrongPhase)?;
        if accept {
            if let Some(piece) = self.board.get_mut(offer.square) {
                piece.promote(offer.draft.abilities());
                debug!(instance = %piece.instance_id, extra = ?offer.draft.abilities(), "Piece promoted");
            }
        }
        Ok(Event::PromotionResolved {
            square: offer.square,
            promoted: accept,
            next: self.end_turn(),
        })
    }

    fn clear_staging(&mut self) {
        self.staging = Staging::Idle;
        self.prompt = None;
    }

    /// Hands the turn to the opponent. Returns the new active player.
    fn end_turn(&mut self) -> Player {
        self.turn = self.turn.opponent();
        self.clear_staging();
        debug!(turn = %self.turn, "Turn passed");
        self.turn
    }
}
