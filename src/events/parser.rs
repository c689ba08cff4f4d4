//! Loading reaction definitions from JSON.
//!
//! The input is an object keyed by event name. Each value is one
//! definition or an array of them:
//!
//! ```json
//! {
//!   "damage-dealt": {
//!     "filter": { "type": "subject-is-self" },
//!     "action": { "type": "life-steal-for-hero" },
//!     "priority": "high",
//!     "triggerOnce": false,
//!     "lazyFilter": false
//!   }
//! }
//! ```
//!
//! Every filter and action is type-checked against the event's payload and
//! the kind of entity the definitions will be bound to, and every card it
//! can create must exist in the catalog.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::cards::{CardId, CardRegistry};
use crate::effects::SelfKind;

use super::condition::EventFilter;
use super::event::EventKind;
use super::reaction::{ReactionAction, ReactionDef};
use super::registry::Priority;

/// Errors raised while loading reaction definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown event `{0}`")]
    UnknownEvent(String),

    #[error("{event}: Missing action definition.")]
    MissingAction { event: EventKind },

    #[error("{0} must be a JSON object")]
    NotAnObject(String),

    #[error("{event}: invalid {field}: {message}")]
    Invalid {
        event: EventKind,
        field: &'static str,
        message: String,
    },

    #[error("{event}: {message}")]
    IllTyped { event: EventKind, message: String },

    #[error("{event}: unknown card {card}")]
    UnknownCard { event: EventKind, card: CardId },

    #[error("{event}: invalid priority {value}")]
    InvalidPriority { event: EventKind, value: String },
}

/// Parses reaction definitions for one kind of owner.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::CardRegistry;
/// use ccg_rules::effects::SelfKind;
/// use ccg_rules::events::{EventKind, Priority, ReactionParser};
///
/// let catalog = CardRegistry::new();
/// let json = serde_json::json!({
///     "damage-dealt": {
///         "filter": { "type": "source-is-self" },
///         "action": { "type": "life-steal-for-hero" },
///         "priority": "high"
///     }
/// });
///
/// let defs = ReactionParser::new(&catalog).parse(&json, SelfKind::Minion).unwrap();
/// assert_eq!(defs.len(), 1);
/// assert_eq!(defs[0].kind, EventKind::DamageDealt);
/// assert_eq!(defs[0].priority, Priority::HIGH);
/// ```
#[derive(Clone, Debug)]
pub struct ReactionParser<'a> {
    catalog: &'a CardRegistry,
    global_filter: Option<EventFilter>,
    finalizer: Option<ReactionAction>,
}

impl<'a> ReactionParser<'a> {
    pub fn new(catalog: &'a CardRegistry) -> Self {
        Self {
            catalog,
            global_filter: None,
            finalizer: None,
        }
    }

    /// Every parsed filter is combined with this one.
    #[must_use]
    pub fn with_global_filter(mut self, filter: EventFilter) -> Self {
        self.global_filter = Some(filter);
        self
    }

    /// Every parsed action is followed by this one.
    #[must_use]
    pub fn with_finalizer(mut self, action: ReactionAction) -> Self {
        self.finalizer = Some(action);
        self
    }

    /// Parser for secrets: reactions only on the opponent's turn, and the
    /// secret is revealed after each one runs.
    #[must_use]
    pub fn secret(self) -> Self {
        self.with_global_filter(EventFilter::EnemyTurn)
            .with_finalizer(ReactionAction::RevealSecret)
    }

    /// Parse all definitions in `root`, in event-kind order.
    pub fn parse(&self, root: &Value, self_kind: SelfKind) -> Result<Vec<ReactionDef>, ParseError> {
        let object = root
            .as_object()
            .ok_or_else(|| ParseError::NotAnObject("reaction definitions".to_string()))?;
        if let Some(unknown) = object.keys().find(|k| EventKind::from_name(k).is_none()) {
            return Err(ParseError::UnknownEvent(unknown.clone()));
        }

        let mut defs = Vec::new();
        for kind in EventKind::ALL {
            match object.get(kind.name()) {
                None => {}
                Some(Value::Array(items)) => {
                    for item in items {
                        defs.push(self.parse_def(kind, item, self_kind)?);
                    }
                }
                Some(item) => defs.push(self.parse_def(kind, item, self_kind)?),
            }
        }
        Ok(defs)
    }

    fn parse_def(&self, kind: EventKind, value: &Value, self_kind: SelfKind) -> Result<ReactionDef, ParseError> {
        let object = value
            .as_object()
            .ok_or_else(|| ParseError::NotAnObject(format!("{kind} definition")))?;

        let filter: EventFilter = match object.get("filter") {
            Some(filter) => from_value(kind, "filter", filter)?,
            None => EventFilter::Any,
        };
        let action: ReactionAction = match object.get("action") {
            Some(action) => from_value(kind, "action", action)?,
            None => return Err(ParseError::MissingAction { event: kind }),
        };

        let ill_typed = |message| ParseError::IllTyped { event: kind, message };
        filter.check(kind, self_kind).map_err(ill_typed)?;
        action.check(kind, self_kind).map_err(ill_typed)?;

        let mut cards = Vec::new();
        action.collect_card_refs(&mut cards);
        if let Some(&card) = cards.iter().find(|c| !self.catalog.contains(**c)) {
            return Err(ParseError::UnknownCard { event: kind, card });
        }

        let filter = match &self.global_filter {
            Some(global) => filter.and(global.clone()),
            None => filter,
        };
        let action = match &self.finalizer {
            Some(finalizer) => ReactionAction::Batch {
                actions: vec![action, finalizer.clone()],
            },
            None => action,
        };

        let mut def = ReactionDef::new(kind, filter, action).with_priority(priority(kind, object)?);
        def.trigger_once = flag(kind, object, "triggerOnce")?;
        def.lazy_filter = flag(kind, object, "lazyFilter")?;
        Ok(def)
    }
}

fn from_value<T: DeserializeOwned>(event: EventKind, field: &'static str, value: &Value) -> Result<T, ParseError> {
    serde_json::from_value(value.clone()).map_err(|e| ParseError::Invalid {
        event,
        field,
        message: e.to_string(),
    })
}

fn priority(event: EventKind, object: &Map<String, Value>) -> Result<Priority, ParseError> {
    let invalid = |value: &Value| ParseError::InvalidPriority {
        event,
        value: value.to_string(),
    };
    match object.get("priority") {
        None => Ok(Priority::NORMAL),
        Some(Value::String(name)) => Priority::from_name(name).ok_or_else(|| invalid(&Value::String(name.clone()))),
        Some(value) => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Priority)
            .ok_or_else(|| invalid(value)),
    }
}

fn flag(event: EventKind, object: &Map<String, Value>, field: &'static str) -> Result<bool, ParseError> {
    match object.get(field) {
        None => Ok(false),
        Some(value) => value.as_bool().ok_or_else(|| ParseError::Invalid {
            event,
            field,
            message: format!("expected a boolean, found {value}"),
        }),
    }
}
