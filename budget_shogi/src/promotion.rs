use serde::Serialize;

use crate::{Ability, AbilitySet, Catalog, PieceInstance, Player, Rejected, Square, PROMOTION_BUDGET};

/// The extra abilities a promoting piece is shopping for.
///
/// Only steps and the knight jump can be bought, and only up to
/// [`PROMOTION_BUDGET`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PromotionDraft {
    extra: AbilitySet,
}

impl PromotionDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abilities(&self) -> AbilitySet {
        self.extra
    }

    pub fn cost(&self) -> u32 {
        self.extra.without_slides().cost()
    }

    /// Switches one ability. Refused, leaving the draft as it was, if the
    /// ability is a slide or the draft would cost more than the budget.
    pub fn toggle(&mut self, ability: Ability) -> Result<(), Rejected> {
        if let Ability::Slide(_) = ability {
            return Err(Rejected::UnavailableAbility { ability });
        }
        let next = self.extra.toggle(ability);
        let cost = next.cost();
        if cost > PROMOTION_BUDGET {
            return Err(Rejected::OverBudget {
                cost,
                budget: PROMOTION_BUDGET,
            });
        }
        self.extra = next;
        Ok(())
    }
}

/// A promotion that is waiting for the mover's decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PromotionOffer {
    /// Where the promoting piece now stands.
    pub square: Square,
    pub draft: PromotionDraft,
}

/// Whether moving `piece` from `from` to `to` lets it promote.
///
/// Drops never promote; the caller only asks for board moves.
pub fn promotion_eligible(catalog: &Catalog, piece: &PieceInstance, from: Square, to: Square) -> bool {
    let mover: Player = piece.owner;
    catalog.can_promote(piece.kind.as_str())
        && !piece.is_promoted()
        && (mover.in_promotion_zone(from) || mover.in_promotion_zone(to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KindId, SlideKind, StepDir, GOLD, KING, PAWN};

    #[test]
    fn budget_caps_the_draft() {
        let mut draft = PromotionDraft::new();
        draft.toggle(Ability::Step(StepDir::S)).unwrap();
        draft.toggle(Ability::Step(StepDir::E)).unwrap();
        assert_eq!(
            draft.toggle(Ability::Step(StepDir::W)),
            Err(Rejected::OverBudget {
                cost: 3,
                budget: PROMOTION_BUDGET
            })
        );
        assert_eq!(
            draft.toggle(Ability::Step(StepDir::SW)),
            Err(Rejected::OverBudget {
                cost: 3,
                budget: PROMOTION_BUDGET
            })
        );
        assert_eq!(draft.abilities().step.len(), 2);
        assert_eq!(draft.cost(), 2);

        // Switching one off makes room for something else.
        draft.toggle(Ability::Step(StepDir::E)).unwrap();
        assert!(draft.toggle(Ability::Knight).is_err());
        draft.toggle(Ability::Step(StepDir::S)).unwrap();
        draft.toggle(Ability::Knight).unwrap();
        assert_eq!(draft.abilities(), AbilitySet::EMPTY.with(Ability::Knight, true));
    }

    #[test]
    fn slides_cannot_be_bought() {
        let mut draft = PromotionDraft::new();
        let slide = Ability::Slide(SlideKind::Forward);
        assert_eq!(
            draft.toggle(slide),
            Err(Rejected::UnavailableAbility { ability: slide })
        );
        assert_eq!(draft, PromotionDraft::new());
    }

    #[test]
    fn eligibility() {
        let catalog = Catalog::default();
        let pawn = PieceInstance::new(KindId::from(PAWN), Player::One, 0);
        assert!(promotion_eligible(&catalog, &pawn, Square::new(3, 0), Square::new(2, 0)));
        assert!(promotion_eligible(&catalog, &pawn, Square::new(2, 0), Square::new(3, 0)));
        assert!(!promotion_eligible(&catalog, &pawn, Square::new(4, 0), Square::new(3, 0)));

        let theirs = PieceInstance::new(KindId::from(PAWN), Player::Two, 0);
        assert!(promotion_eligible(&catalog, &theirs, Square::new(5, 0), Square::new(6, 0)));
        assert!(!promotion_eligible(&catalog, &theirs, Square::new(3, 0), Square::new(2, 0)));

        let gold = PieceInstance::new(KindId::from(GOLD), Player::One, 0);
        assert!(!promotion_eligible(&catalog, &gold, Square::new(3, 0), Square::new(2, 0)));
        let king = PieceInstance::new(KindId::from(KING), Player::One, 0);
        assert!(!promotion_eligible(&catalog, &king, Square::new(3, 0), Square::new(2, 0)));

        let mut promoted = pawn.clone();
        promoted.promote(AbilitySet::EMPTY);
        assert!(!promotion_eligible(&catalog, &promoted, Square::new(3, 0), Square::new(2, 0)));
    }
}
