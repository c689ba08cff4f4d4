//! Card instances - one physical copy of a card in a match.
//!
//! A `Card` wraps its immutable `CardDescr` and adds what can change while
//! it sits in a zone: a cost modifier from buffs, and for minion cards the
//! embedded `Minion` that will enter play (created when the card is, so it
//! keeps one identity from hand to board).

use std::sync::Arc;

use serde::Serialize;

use crate::core::{EntityId, PlayerId};
use crate::world::{Minion, World};

use super::definition::{CardDescr, CardId, CardType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Card {
    id: EntityId,
    owner: PlayerId,
    descr: Arc<CardDescr>,
    cost_modifier: i32,
    minion: Option<Minion>,
}

impl Card {
    /// Create a card. `minion_id` is used for the embedded minion of a
    /// minion card and ignored otherwise.
    pub fn new(
        id: EntityId,
        owner: PlayerId,
        descr: Arc<CardDescr>,
        minion_id: Option<EntityId>,
    ) -> Self {
        let minion = match (&descr.minion, minion_id) {
            (Some(template), Some(minion_id)) => Some(Minion::new(
                minion_id,
                owner,
                descr.id,
                Arc::clone(template),
            )),
            _ => None,
        };
        Self {
            id,
            owner,
            descr,
            cost_modifier: 0,
            minion,
        }
    }

    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn descr(&self) -> &Arc<CardDescr> {
        &self.descr
    }

    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.descr.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descr.name
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.descr.card_type
    }

    #[must_use]
    pub fn minion(&self) -> Option<&Minion> {
        self.minion.as_ref()
    }

    /// Move the embedded minion out, leaving the card minion-less.
    pub(crate) fn take_minion(&mut self) -> Option<Minion> {
        self.minion.take()
    }

    #[must_use]
    pub fn cost_modifier(&self) -> i32 {
        self.cost_modifier
    }

    pub(crate) fn set_cost_modifier(&mut self, modifier: i32) {
        self.cost_modifier = modifier;
    }

    /// The cost the owner pays right now: base cost plus buffs plus every
    /// adjuster in declaration order, never below zero.
    #[must_use]
    pub fn active_mana_cost(&self, world: &World) -> i32 {
        let adjusted = self
            .descr
            .cost_adjusters
            .iter()
            .fold(self.descr.mana_cost + self.cost_modifier, |cost, adjuster| {
                cost + adjuster.adjustment(world, self.owner)
            });
        adjusted.max(0)
    }
}
