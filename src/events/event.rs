//! Game event kinds and payloads.
//!
//! Every kind has its own channel on the [`EventBus`](super::EventBus).
//! A payload is the mutable record a dispatch carries through its
//! reactions: a veto flag, a redirected attack defender, a replaced spell
//! target. What a payload offers is summarised by its kind's
//! [`Capabilities`], which the reaction parser uses to reject filters and
//! actions that could never apply.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardType};
use crate::core::{EntityId, PlayerId};
use crate::effects::Damage;

/// The channels of the event bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    TurnStarts,
    TurnEnds,
    StartPlayingCard,
    DonePlayingCard,
    PrepareDamage,
    DamageDealt,
    CharacterHealed,
    StartSummoning,
    /// The summoned minion is in play; its own reactions are not fired.
    #[serde(rename = "on-summon")]
    Summoning,
    DoneSummoning,
    MinionKilled,
    DrawCard,
    AttackInitiated,
    SecretRevealed,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::TurnStarts,
        EventKind::TurnEnds,
        EventKind::StartPlayingCard,
        EventKind::DonePlayingCard,
        EventKind::PrepareDamage,
        EventKind::DamageDealt,
        EventKind::CharacterHealed,
        EventKind::StartSummoning,
        EventKind::Summoning,
        EventKind::DoneSummoning,
        EventKind::MinionKilled,
        EventKind::DrawCard,
        EventKind::AttackInitiated,
        EventKind::SecretRevealed,
    ];

    /// Channel index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Name used in reaction definitions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::TurnStarts => "turn-starts",
            EventKind::TurnEnds => "turn-ends",
            EventKind::StartPlayingCard => "start-playing-card",
            EventKind::DonePlayingCard => "done-playing-card",
            EventKind::PrepareDamage => "prepare-damage",
            EventKind::DamageDealt => "damage-dealt",
            EventKind::CharacterHealed => "character-healed",
            EventKind::StartSummoning => "start-summoning",
            EventKind::Summoning => "on-summon",
            EventKind::DoneSummoning => "done-summoning",
            EventKind::MinionKilled => "minion-killed",
            EventKind::DrawCard => "draw-card",
            EventKind::AttackInitiated => "attack-initiated",
            EventKind::SecretRevealed => "secret-revealed",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// What this kind's payload offers to filters and actions.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        let none = Capabilities::NONE;
        match self {
            EventKind::TurnStarts | EventKind::TurnEnds => none,
            EventKind::StartPlayingCard => Capabilities {
                subject: true,
                source: true,
                card: true,
                veto: true,
                card_play: true,
                ..none
            },
            EventKind::DonePlayingCard => Capabilities {
                subject: true,
                source: true,
                card: true,
                ..none
            },
            EventKind::PrepareDamage => Capabilities {
                subject: true,
                source: true,
                damage: true,
                veto: true,
                damage_request: true,
                ..none
            },
            EventKind::DamageDealt | EventKind::CharacterHealed => Capabilities {
                subject: true,
                source: true,
                damage: true,
                ..none
            },
            EventKind::StartSummoning
            | EventKind::Summoning
            | EventKind::DoneSummoning
            | EventKind::MinionKilled => Capabilities {
                subject: true,
                ..none
            },
            EventKind::DrawCard => Capabilities {
                source: true,
                card: true,
                ..none
            },
            EventKind::AttackInitiated => Capabilities {
                subject: true,
                source: true,
                attack: true,
                ..none
            },
            EventKind::SecretRevealed => Capabilities {
                source: true,
                ..none
            },
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a payload offers.
///
/// - `subject`: a character the event is about (damage target, summoned
///   minion, attack defender, spell target)
/// - `source`: the entity that caused it (damage source, attacker, card)
/// - `card`: a card type
/// - `damage`: a damage amount
/// - `veto`: a veto flag
/// - `attack`: a redirectable attack
/// - `card_play`: a vetoable card play with a replaceable target
/// - `damage_request`: a vetoable damage request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub subject: bool,
    pub source: bool,
    pub card: bool,
    pub damage: bool,
    pub veto: bool,
    pub attack: bool,
    pub card_play: bool,
    pub damage_request: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        subject: false,
        source: false,
        card: false,
        damage: false,
        veto: false,
        attack: false,
        card_play: false,
        damage_request: false,
    };

    /// True if every capability in `required` is offered.
    #[must_use]
    pub fn covers(&self, required: &Capabilities) -> bool {
        let pairs = [
            (self.subject, required.subject),
            (self.source, required.source),
            (self.card, required.card),
            (self.damage, required.damage),
            (self.veto, required.veto),
            (self.attack, required.attack),
            (self.card_play, required.card_play),
            (self.damage_request, required.damage_request),
        ];
        pairs.iter().all(|(offered, needed)| *offered || !*needed)
    }
}

/// The mutable record carried through one dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum EventPayload {
    Player {
        player: PlayerId,
    },
    CardPlay {
        card: EntityId,
        card_id: CardId,
        player: PlayerId,
        card_type: CardType,
        target: Option<EntityId>,
        mana_cost: i32,
        vetoed: bool,
    },
    CardPlayed {
        card: EntityId,
        card_id: CardId,
        player: PlayerId,
        card_type: CardType,
        target: Option<EntityId>,
    },
    DamageRequest {
        damage: Damage,
        target: EntityId,
        target_owner: PlayerId,
        vetoed: bool,
    },
    Damage {
        damage: Damage,
        target: EntityId,
        target_owner: PlayerId,
    },
    Minion {
        minion: EntityId,
        owner: PlayerId,
    },
    CardDrawn {
        card: EntityId,
        card_id: CardId,
        player: PlayerId,
        card_type: CardType,
    },
    Attack {
        attacker: EntityId,
        attacker_owner: PlayerId,
        defender: EntityId,
        defender_owner: PlayerId,
    },
    Secret {
        secret: EntityId,
        card_id: CardId,
        owner: PlayerId,
    },
}

impl EventPayload {
    /// The character the event is about.
    #[must_use]
    pub fn subject(&self) -> Option<EntityId> {
        match *self {
            EventPayload::CardPlay { target, .. } | EventPayload::CardPlayed { target, .. } => target,
            EventPayload::DamageRequest { target, .. } | EventPayload::Damage { target, .. } => {
                Some(target)
            }
            EventPayload::Minion { minion, .. } => Some(minion),
            EventPayload::Attack { defender, .. } => Some(defender),
            EventPayload::Player { .. } | EventPayload::CardDrawn { .. } | EventPayload::Secret { .. } => {
                None
            }
        }
    }

    /// The subject's owner, when the payload knows it.
    #[must_use]
    pub fn subject_owner(&self) -> Option<PlayerId> {
        match *self {
            EventPayload::DamageRequest { target_owner, .. }
            | EventPayload::Damage { target_owner, .. } => Some(target_owner),
            EventPayload::Minion { owner, .. } => Some(owner),
            EventPayload::Attack { defender_owner, .. } => Some(defender_owner),
            _ => None,
        }
    }

    /// The entity that caused the event.
    #[must_use]
    pub fn source(&self) -> Option<EntityId> {
        match *self {
            EventPayload::CardPlay { card, .. }
            | EventPayload::CardPlayed { card, .. }
            | EventPayload::CardDrawn { card, .. } => Some(card),
            EventPayload::DamageRequest { damage, .. } | EventPayload::Damage { damage, .. } => {
                Some(damage.source.entity)
            }
            EventPayload::Attack { attacker, .. } => Some(attacker),
            EventPayload::Secret { secret, .. } => Some(secret),
            EventPayload::Player { .. } | EventPayload::Minion { .. } => None,
        }
    }

    /// The player behind the source.
    #[must_use]
    pub fn source_owner(&self) -> Option<PlayerId> {
        match *self {
            EventPayload::CardPlay { player, .. }
            | EventPayload::CardPlayed { player, .. }
            | EventPayload::CardDrawn { player, .. } => Some(player),
            EventPayload::DamageRequest { damage, .. } | EventPayload::Damage { damage, .. } => {
                Some(damage.source.player)
            }
            EventPayload::Attack { attacker_owner, .. } => Some(attacker_owner),
            EventPayload::Secret { owner, .. } => Some(owner),
            EventPayload::Player { player } => Some(player),
            EventPayload::Minion { .. } => None,
        }
    }

    #[must_use]
    pub fn card_type(&self) -> Option<CardType> {
        match *self {
            EventPayload::CardPlay { card_type, .. }
            | EventPayload::CardPlayed { card_type, .. }
            | EventPayload::CardDrawn { card_type, .. } => Some(card_type),
            _ => None,
        }
    }

    /// Damage amount of a damage or healing event.
    #[must_use]
    pub fn amount(&self) -> Option<i32> {
        match *self {
            EventPayload::DamageRequest { damage, .. } | EventPayload::Damage { damage, .. } => {
                Some(damage.amount)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_vetoed(&self) -> bool {
        match *self {
            EventPayload::CardPlay { vetoed, .. } | EventPayload::DamageRequest { vetoed, .. } => vetoed,
            _ => false,
        }
    }
}
