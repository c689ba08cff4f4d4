//! Keywords carried by cards and minions.
//!
//! A keyword is an interned-by-value string tag. The engine interprets a
//! handful of them (taunt, charge, divine shield, windfury); everything
//! else (tribes, "deathrattle", "secret") is opaque data that filters can
//! match on.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A lower-case keyword tag.
///
/// ```
/// use ccg_rules::cards::Keyword;
///
/// assert_eq!(Keyword::new("Taunt"), Keyword::TAUNT);
/// assert_eq!(Keyword::BEAST.as_str(), "beast");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyword(Cow<'static, str>);

impl Keyword {
    // === Interpreted by the rules ===
    pub const TAUNT: Keyword = Keyword(Cow::Borrowed("taunt"));
    pub const CHARGE: Keyword = Keyword(Cow::Borrowed("charge"));
    pub const DIVINE_SHIELD: Keyword = Keyword(Cow::Borrowed("divine-shield"));
    pub const WINDFURY: Keyword = Keyword(Cow::Borrowed("windfury"));

    // === Descriptive ===
    pub const DEATHRATTLE: Keyword = Keyword(Cow::Borrowed("deathrattle"));
    pub const BATTLECRY: Keyword = Keyword(Cow::Borrowed("battlecry"));
    pub const LIFESTEAL: Keyword = Keyword(Cow::Borrowed("lifesteal"));
    pub const SECRET: Keyword = Keyword(Cow::Borrowed("secret"));
    pub const BEAST: Keyword = Keyword(Cow::Borrowed("beast"));
    pub const DEMON: Keyword = Keyword(Cow::Borrowed("demon"));
    pub const MURLOC: Keyword = Keyword(Cow::Borrowed("murloc"));

    /// Create a keyword, normalised to lower case.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into().to_lowercase()))
    }

    /// The keyword text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Keyword {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ordered keyword set; ordered so serialized snapshots are stable.
pub type Keywords = BTreeSet<Keyword>;

/// True if `set` contains every keyword in `wanted`.
#[must_use]
pub fn has_all(set: &Keywords, wanted: &[Keyword]) -> bool {
    wanted.iter().all(|k| set.contains(k))
}

/// True if `set` contains none of `unwanted`.
#[must_use]
pub fn has_none(set: &Keywords, unwanted: &[Keyword]) -> bool {
    !unwanted.iter().any(|k| set.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_and_borrowed_compare_equal() {
        let owned = Keyword::new("DIVINE-SHIELD");
        assert_eq!(owned, Keyword::DIVINE_SHIELD);

        let mut set = Keywords::new();
        set.insert(owned);
        assert!(set.contains(&Keyword::DIVINE_SHIELD));
    }

    #[test]
    fn test_set_queries() {
        let set: Keywords = [Keyword::TAUNT, Keyword::BEAST].into_iter().collect();

        assert!(has_all(&set, &[Keyword::TAUNT]));
        assert!(!has_all(&set, &[Keyword::TAUNT, Keyword::CHARGE]));
        assert!(has_none(&set, &[Keyword::CHARGE]));
        assert!(!has_none(&set, &[Keyword::BEAST]));
    }

    #[test]
    fn test_keyword_serializes_as_plain_string() {
        let json = serde_json::to_string(&Keyword::WINDFURY).unwrap();
        assert_eq!(json, "\"windfury\"");

        let back: Keyword = serde_json::from_str("\"murloc\"").unwrap();
        assert_eq!(back, Keyword::MURLOC);
    }
}
