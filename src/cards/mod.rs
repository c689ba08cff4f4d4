//! Card system: definitions, instances, and registry.
//!
//! ## Key Types
//!
//! - `CardId`: identifies a card definition (not an instance)
//! - `CardDescr`: immutable card data; `MinionDescr` and `WeaponDescr`
//!   are the templates for what a card puts into play
//! - `Card`: one copy of a card in a zone
//! - `CardRegistry`: the catalog a match is played with
//! - `Keyword`: string tags, a few of which the rules interpret

pub mod definition;
pub mod instance;
pub mod keyword;
pub mod registry;

pub use definition::{
    CardDescr, CardId, CardType, ChooseOneOption, ManaCostAdjuster, MinionDescr, PlayActionDef,
    PlayRequirement, WeaponDescr,
};
pub use instance::Card;
pub use keyword::{Keyword, Keywords};
pub use registry::CardRegistry;
