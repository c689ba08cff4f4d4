//! Entity identification.
//!
//! Heroes, minions, cards, weapons and secrets all carry a unique
//! `EntityId`. Ids are opaque handles into arenas owned by the world; an
//! entity never holds a pointer to its owner or to the world, only ids.
//!
//! ```
//! use ccg_rules::core::{EntityAllocator, EntityId};
//!
//! let mut ids = EntityAllocator::new();
//! let first = ids.alloc();
//! let second = ids.alloc();
//!
//! assert_eq!(first, EntityId(0));
//! assert_ne!(first, second);
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any game entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Monotonic id source.
///
/// Allocation is never rolled back by undo: an id handed out during a
/// speculative action simply goes unused afterwards.
#[derive(Clone, Debug, Default)]
pub struct EntityAllocator {
    next: u32,
}

impl EntityAllocator {
    /// Create an allocator starting at id 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id.
    pub fn alloc(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids allocated so far.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_basics() {
        let id = EntityId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Entity(42)");
        assert_eq!(EntityId::from(3), EntityId(3));
    }

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = EntityAllocator::new();
        let a = ids.alloc();
        let b = ids.alloc();
        let c = ids.alloc();

        assert!(a < b && b < c);
        assert_eq!(ids.allocated(), 3);
    }

    #[test]
    fn test_entity_id_serialization() {
        let id = EntityId(12345);
        let json = serde_json::to_string(&id).unwrap();
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
