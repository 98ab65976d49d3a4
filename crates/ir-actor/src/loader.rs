//! JSON actor template loader.
//!
//! # JSON format
//!
//! A top-level array of templates.  Durations and cooldowns are in ticks.
//!
//! ```json
//! [
//!   {
//!     "name": "mage",
//!     "stamina": { "max": 100, "regen_per_tick": 25 },
//!     "mana":    { "max": 100, "regen_per_tick": 20, "initial": 50 },
//!     "actions": [
//!       { "name": "cast", "stamina_cost": 0, "mana_cost": 30,
//!         "cooldown_ticks": 6, "duration_ticks": 3, "priority": 4 },
//!       { "name": "guard", "stamina_cost": 5, "cooldown_ticks": 0,
//!         "duration_ticks": 2, "priority": 9,
//!         "extendable": true, "repeats_consumption": true }
//!     ]
//!   }
//! ]
//! ```
//!
//! Unknown fields are rejected.  Handlers are not data: a [`HandlerTable`]
//! maps action names to closures, and [`ActorTemplate::builder`] fails with
//! [`ActorError::MissingHandler`] for any action the table does not cover.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{ActionSpec, ActorBuilder, ActorError, ActorResult, Handler, PoolConfig};

// ── Template ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorTemplate {
    pub name:    String,
    pub stamina: PoolConfig,
    #[serde(default)]
    pub mana:    Option<PoolConfig>,
    pub actions: Vec<ActionSpec>,
}

impl ActorTemplate {
    /// Bind every action to its handler from `handlers` and return a builder
    /// ready for [`ActorBuilder::build`].
    pub fn builder<S, A>(&self, handlers: &HandlerTable<S, A>) -> ActorResult<ActorBuilder<S, A>> {
        let mut builder = ActorBuilder::new(self.name.clone()).stamina(self.stamina);
        if let Some(mana) = self.mana {
            builder = builder.mana(mana);
        }
        for spec in &self.actions {
            let handler = handlers.get(&spec.name).ok_or_else(|| ActorError::MissingHandler {
                template: self.name.clone(),
                action:   spec.name.clone(),
            })?;
            builder = builder.add_action(spec.clone(), handler);
        }
        Ok(builder)
    }
}

// ── HandlerTable ──────────────────────────────────────────────────────────────

/// Action name → handler, shared by every template that names the action.
pub struct HandlerTable<S, A> {
    handlers: FxHashMap<String, Handler<S, A>>,
}

impl<S, A> Default for HandlerTable<S, A> {
    fn default() -> Self {
        Self { handlers: FxHashMap::default() }
    }
}

impl<S, A> HandlerTable<S, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `handler`, replacing any earlier binding.
    pub fn insert(&mut self, name: impl Into<String>, handler: Handler<S, A>) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, handler: Handler<S, A>) -> Self {
        self.insert(name, handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<Handler<S, A>> {
        self.handlers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load templates from a JSON file.
pub fn load_templates_json(path: &Path) -> ActorResult<Vec<ActorTemplate>> {
    let file = std::fs::File::open(path).map_err(ActorError::Io)?;
    load_templates_reader(file)
}

/// Like [`load_templates_json`] but accepts any `Read` source.
pub fn load_templates_reader<R: Read>(reader: R) -> ActorResult<Vec<ActorTemplate>> {
    serde_json::from_reader(reader).map_err(|e| ActorError::Parse(e.to_string()))
}

/// Parse templates from an in-memory JSON string.
pub fn parse_templates(json: &str) -> ActorResult<Vec<ActorTemplate>> {
    serde_json::from_str(json).map_err(|e| ActorError::Parse(e.to_string()))
}
