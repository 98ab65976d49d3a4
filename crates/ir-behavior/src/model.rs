//! The `BehaviorModel` trait — the main extension point for user code.

use ir_actor::Actor;
use ir_core::ActorRng;

use crate::{Intent, SimContext};

/// Pluggable actor behavior.
///
/// Implement this trait to decide what each actor tries to do every tick.
/// All methods receive read-only state and a per-actor [`ActorRng`], so
/// behavior is deterministic regardless of thread ordering.
///
/// # Required methods
///
/// Only [`decide`][Self::decide] is required.  [`is_dead`][Self::is_dead]
/// defaults to "never".
///
/// # Thread safety
///
/// With the `parallel` feature of ir-sim, `decide` runs for many actors at
/// once on Rayon's pool, so implementations must be `Send + Sync`.  Anything
/// that varies per actor belongs in the actor or the world state `S`, not in
/// the model.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysSwing;
///
/// impl BehaviorModel<Arena, Target> for AlwaysSwing {
///     fn decide(
///         &self,
///         actor: &Actor<Arena, Target>,
///         ctx: &SimContext<'_, Arena, Target>,
///         _rng: &mut ActorRng,
///     ) -> Vec<Intent<Target>> {
///         let Some(target) = ctx.state.nearest_enemy(actor.id()) else { return vec![] };
///         Intent::act(actor, "attack", target).into_iter().collect()
///     }
/// }
/// ```
pub trait BehaviorModel<S, A>: Send + Sync + 'static {
    /// Called once per live actor per tick, before the resolution pass.
    ///
    /// An empty `Vec` means "do nothing new"; actions already running keep
    /// running.
    fn decide(
        &self,
        actor: &Actor<S, A>,
        ctx:   &SimContext<'_, S, A>,
        rng:   &mut ActorRng,
    ) -> Vec<Intent<A>>;

    /// Called once per live actor at the end of every tick.  Returning
    /// `true` removes the actor (halting its running actions first).
    ///
    /// Default: actors never die.
    fn is_dead(&self, _actor: &Actor<S, A>, _state: &S) -> bool {
        false
    }
}

/// Adapts a closure into a [`BehaviorModel`] that never reports death.
pub struct FnBehavior<F>(pub F);

impl<S, A, F> BehaviorModel<S, A> for FnBehavior<F>
where
    F: Fn(&Actor<S, A>, &SimContext<'_, S, A>, &mut ActorRng) -> Vec<Intent<A>>
        + Send
        + Sync
        + 'static,
{
    fn decide(
        &self,
        actor: &Actor<S, A>,
        ctx:   &SimContext<'_, S, A>,
        rng:   &mut ActorRng,
    ) -> Vec<Intent<A>> {
        (self.0)(actor, ctx, rng)
    }
}
