//! Actor intents — what an actor asks the engine to do this tick.

use ir_actor::Actor;
use ir_core::ActionId;

use crate::{BehaviorError, BehaviorResult};

/// A request produced by [`BehaviorModel::decide`][crate::BehaviorModel::decide]
/// and applied by the tick driver before the resolution pass.
///
/// Intents are requests, not commands: an `Act` for an action that is on
/// cooldown or unaffordable is silently dropped by admission control, and an
/// `Act` for an action already running either extends it or does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent<A> {
    /// Run `action` with `args` (see `Actor::enqueue_action`).
    Act {
        action: ActionId,
        args:   A,
    },

    /// Stop `action` if it is running (see `Actor::action_halt`).
    Halt { action: ActionId },
}

impl<A> Intent<A> {
    /// The action this intent names.
    #[inline]
    pub fn action(&self) -> ActionId {
        match self {
            Intent::Act { action, .. } | Intent::Halt { action } => *action,
        }
    }

    /// Build an `Act` intent from an action name.
    ///
    /// # Errors
    ///
    /// [`BehaviorError::UnknownAction`] if `actor` has no such action.
    pub fn act<S>(actor: &Actor<S, A>, name: &str, args: A) -> BehaviorResult<Self> {
        let action = lookup(actor, name)?;
        Ok(Intent::Act { action, args })
    }

    /// Build a `Halt` intent from an action name.
    pub fn halt<S>(actor: &Actor<S, A>, name: &str) -> BehaviorResult<Self> {
        let action = lookup(actor, name)?;
        Ok(Intent::Halt { action })
    }
}

fn lookup<S, A>(actor: &Actor<S, A>, name: &str) -> BehaviorResult<ActionId> {
    actor.action_id(name).ok_or_else(|| BehaviorError::UnknownAction {
        actor: actor.id(),
        name:  name.to_owned(),
    })
}
