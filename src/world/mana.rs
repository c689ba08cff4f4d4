//! Mana crystals and overload.

use serde::Serialize;

use crate::error::{EngineError, EngineResult};

/// A player's mana pool.
///
/// `crystals` is the refillable maximum. Overload is a debt: mana spent
/// with overload is locked out of the *next* refresh.
///
/// ```
/// use ccg_rules::world::ManaResource;
///
/// let mut mana = ManaResource::default();
/// mana.refresh(10);
/// mana.refresh(10);
/// assert_eq!((mana.mana(), mana.crystals()), (2, 2));
///
/// mana.spend(1, 2).unwrap();
/// mana.refresh(10);
/// assert_eq!(mana.mana(), 1); // three crystals, two of them locked
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ManaResource {
    mana: i32,
    crystals: i32,
    overloaded: i32,
    next_overload: i32,
}

impl ManaResource {
    /// A full pool of `crystals` crystals.
    #[must_use]
    pub fn full(crystals: i32) -> Self {
        Self {
            mana: crystals,
            crystals,
            overloaded: 0,
            next_overload: 0,
        }
    }

    #[must_use]
    pub fn mana(&self) -> i32 {
        self.mana
    }

    #[must_use]
    pub fn crystals(&self) -> i32 {
        self.crystals
    }

    /// Crystals locked this turn by last turn's overload.
    #[must_use]
    pub fn overloaded(&self) -> i32 {
        self.overloaded
    }

    /// Overload owed on the next refresh.
    #[must_use]
    pub fn next_overload(&self) -> i32 {
        self.next_overload
    }

    /// Start-of-turn refresh: gain a crystal (up to `max_mana`), refill, and
    /// settle the overload debt.
    pub fn refresh(&mut self, max_mana: i32) {
        self.crystals = (self.crystals + 1).clamp(0, max_mana);
        self.overloaded = self.next_overload;
        self.next_overload = 0;
        self.mana = (self.crystals - self.overloaded).max(0);
    }

    /// Spend mana, rejecting overspend before touching anything.
    pub fn spend(&mut self, cost: i32, overload: i32) -> EngineResult<()> {
        if cost < 0 || overload < 0 {
            return Err(EngineError::invalid(format!(
                "negative mana cost {cost} or overload {overload}"
            )));
        }
        if cost > self.mana {
            return Err(EngineError::InsufficientMana {
                required: cost,
                available: self.mana,
            });
        }
        self.mana -= cost;
        self.next_overload += overload;
        Ok(())
    }

    /// Temporary mana for this turn, capped at `max_mana`.
    pub fn gain(&mut self, amount: i32, max_mana: i32) {
        self.mana = (self.mana + amount).clamp(0, max_mana);
    }

    /// Setup helper: set mana and crystals directly.
    pub fn set(&mut self, mana: i32, crystals: i32) {
        self.crystals = crystals.max(0);
        self.mana = mana.max(0);
    }
}
