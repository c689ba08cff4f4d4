//! Undo exactness over random action sequences.
//!
//! Every public action returns an inverse. Undoing the inverses last-first
//! must walk back through exactly the snapshots seen on the way forward.

use std::sync::Arc;

use ccg_rules::cards::{CardDescr, CardId, CardRegistry, Keyword, MinionDescr, WeaponDescr};
use ccg_rules::core::{EntityId, PlayerId, RulesConfig};
use ccg_rules::effects::{Effect, EntityFilter, MultiTargeter, Selector, Side};
use ccg_rules::events::{EventFilter, EventKind, ReactionAction, ReactionDef};
use ccg_rules::rules::TargetRequest;
use ccg_rules::undo::{UndoAction, Undoable};
use ccg_rules::world::{AuraDef, AuraScope, World};
use ccg_rules::zones::ZonePosition;
use proptest::prelude::*;

fn catalog() -> CardRegistry {
    let mut registry = CardRegistry::new();
    let cards = [
        CardDescr::minion(CardId(1), "Wisp", 0, MinionDescr::new("Wisp", 1, 1)),
        CardDescr::minion(
            CardId(2),
            "Bluegill",
            1,
            MinionDescr::new("Bluegill", 2, 1).with_keyword(Keyword::CHARGE),
        ),
        CardDescr::minion(
            CardId(3),
            "Squire",
            1,
            MinionDescr::new("Squire", 1, 2)
                .with_keyword(Keyword::DIVINE_SHIELD)
                .with_keyword(Keyword::TAUNT),
        ),
        CardDescr::minion(
            CardId(4),
            "Egg",
            1,
            MinionDescr::new("Egg", 0, 2).with_deathrattle(Effect::SummonMinion {
                card: CardId(1),
                enemy_side: false,
            }),
        ),
        CardDescr::minion(
            CardId(5),
            "Leader",
            2,
            MinionDescr::new("Leader", 2, 2).with_aura(AuraDef::new(AuraScope::OtherOwnMinions, 1, 0)),
        ),
        CardDescr::minion(
            CardId(6),
            "Drainer",
            2,
            MinionDescr::new("Drainer", 2, 3).with_reaction(ReactionDef::new(
                EventKind::DamageDealt,
                EventFilter::SourceIsSelf,
                ReactionAction::LifeStealForHero,
            )),
        ),
        CardDescr::spell(CardId(7), "Bombs", 1).with_on_play(Effect::ThrowBombs {
            count: 3,
            targets: Selector::Characters {
                side: Side::Enemy,
                minions: true,
                heroes: true,
            },
        }),
        CardDescr::spell(CardId(8), "Nova", 2).with_on_play(Effect::DamageAll {
            amount: 1,
            targeter: MultiTargeter::enemy_characters(),
        }),
        CardDescr::weapon(CardId(9), "Axe", 1, WeaponDescr::new(2, 2)),
        CardDescr::spell(CardId(10), "Misdirection", 1).with_secret([ReactionDef::secret(
            EventKind::AttackInitiated,
            EventFilter::SubjectIsHero,
            ReactionAction::Misdirect,
        )]),
        CardDescr::spell(CardId(11), "Snipe", 1).with_on_play(Effect::damage(
            2,
            Selector::minions(Side::Enemy).filtered(EntityFilter::Random),
        )),
    ];
    for card in cards {
        registry.register(card).unwrap();
    }
    registry
}

fn new_world(seed: u64) -> World {
    let mut world = World::new(RulesConfig::default().with_seed(seed), Arc::new(catalog())).unwrap();
    for player in PlayerId::both() {
        for card in 1..=11 {
            world.put_in_deck(player, CardId(card), ZonePosition::Top).unwrap();
        }
        world.shuffle_deck(player);
    }
    let _ = world.start_new_turn();
    world
}

/// Try one action; rejected actions are simply skipped.
fn step(world: &mut World, op: u8, pick: usize) -> Option<UndoAction> {
    let player = world.active_player();
    let enemy_hero = world.player(player.opponent()).hero().id();
    match op % 5 {
        0 => {
            let hand = world.player(player).hand();
            if hand.is_empty() {
                return None;
            }
            let card = hand.cards()[pick % hand.len()].id();
            let request = TargetRequest::new().with_target(enemy_hero).at_location(pick);
            world.play_card(player, card, request).ok()
        }
        1 => {
            let me = world.player(player);
            let attackers: Vec<EntityId> = std::iter::once(me.hero().id())
                .chain(me.board().iter().map(|m| m.id()))
                .collect();
            let defenders: Vec<EntityId> = std::iter::once(enemy_hero)
                .chain(world.player(player.opponent()).board().iter().map(|m| m.id()))
                .collect();
            let attacker = attackers[pick % attackers.len()];
            let defender = defenders[pick % defenders.len()];
            world.attack(attacker, defender).ok()
        }
        2 => world.end_player_turn().ok(),
        3 => world.summon_minion(player, CardId(1 + (pick % 6) as u32), pick).ok(),
        _ => Some(world.draw_card(player)),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_undo_walks_back_every_step(
        seed in any::<u64>(),
        ops in prop::collection::vec((0u8..5, 0usize..8), 1..40),
    ) {
        let mut world = new_world(seed);
        let mut trail = Vec::new();

        for (op, pick) in ops {
            let before = world.snapshot().unwrap();
            if let Some(undo) = step(&mut world, op, pick) {
                trail.push((before, undo));
            } else {
                prop_assert_eq!(world.snapshot().unwrap(), before);
            }
        }

        for (before, undo) in trail.into_iter().rev() {
            world.undo(undo);
            prop_assert_eq!(world.snapshot().unwrap(), before);
        }
    }
}

#[test]
fn test_speculate_leaves_no_trace() {
    let mut world = new_world(11);
    let before = world.snapshot().unwrap();
    let player = world.active_player();

    let hand_size = world
        .speculate(|w| {
            let undo = w.end_player_turn()?;
            Ok(Undoable::new(w.player(player.opponent()).hand().len(), undo))
        })
        .unwrap();

    assert!(hand_size > 0);
    assert_eq!(world.snapshot().unwrap(), before);
}
