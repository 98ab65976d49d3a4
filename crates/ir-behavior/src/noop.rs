//! A no-op behavior model — actors never produce intents.

use ir_actor::Actor;
use ir_core::ActorRng;

use crate::{BehaviorModel, Intent, SimContext};

/// A [`BehaviorModel`] that always returns an empty intent list.
///
/// Useful when every action is issued externally (player input through
/// `Sim::issue`) or as a placeholder in tests.
pub struct NoopBehavior;

impl<S, A> BehaviorModel<S, A> for NoopBehavior {
    fn decide(
        &self,
        _actor: &Actor<S, A>,
        _ctx:   &SimContext<'_, S, A>,
        _rng:   &mut ActorRng,
    ) -> Vec<Intent<A>> {
        vec![]
    }
}
