use quickcheck::{Arbitrary, Gen};

use crate::{Ability, AbilitySet, SlideKind, SlideSet, StepDir, StepSet};

impl Arbitrary for StepDir {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&StepDir::ALL).unwrap()
    }
}

impl Arbitrary for SlideKind {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&SlideKind::ALL).unwrap()
    }
}

impl Arbitrary for Ability {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 3 {
            0 => Ability::Step(StepDir::arbitrary(g)),
            1 => Ability::Knight,
            _ => Ability::Slide(SlideKind::arbitrary(g)),
        }
    }
}

impl Arbitrary for StepSet {
    fn arbitrary(g: &mut Gen) -> Self {
        StepDir::ALL
            .into_iter()
            .filter(|_| bool::arbitrary(g))
            .fold(StepSet::EMPTY, StepSet::insert)
    }
}

impl Arbitrary for SlideSet {
    fn arbitrary(g: &mut Gen) -> Self {
        SlideKind::ALL
            .into_iter()
            .filter(|_| u8::arbitrary(g) % 4 == 0)
            .fold(SlideSet::EMPTY, SlideSet::insert)
    }
}

impl Arbitrary for AbilitySet {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            step: StepSet::arbitrary(g),
            knight: bool::arbitrary(g),
            slide: SlideSet::arbitrary(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let abilities: Vec<Ability> = StepDir::ALL
            .into_iter()
            .map(Ability::Step)
            .chain(std::iter::once(Ability::Knight))
            .chain(SlideKind::ALL.into_iter().map(Ability::Slide))
            .filter(|&ability| self.contains(ability))
            .collect();
        let set = *self;
        Box::new(abilities.into_iter().map(move |ability| set.with(ability, false)))
    }
}
