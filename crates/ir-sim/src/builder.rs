//! Fluent builder for constructing a [`Sim`].

use tracing::debug;

use ir_actor::{ActorBuilder, ActorRngs, ActorStore};
use ir_behavior::BehaviorModel;
use ir_core::WorldConfig;
use ir_sched::Scheduler;

use crate::{ActionArgs, Sim, SimResult, WorldState};

/// Fluent builder for [`Sim<S, A, B>`].
///
/// # Required inputs
///
/// - [`WorldConfig`] — total ticks, seed, tick rate, …
/// - `state: S` — the application's world state
/// - `B: BehaviorModel<S, A>` — the behavior implementation
///
/// # Optional inputs
///
/// | Method          | Default     |
/// |-----------------|-------------|
/// | `.actor(b)`     | no actors   |
/// | `.actors(iter)` | no actors   |
///
/// Actors receive ids in the order they are added, starting at
/// `ActorId(0)`.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, Arena::default(), NoopBehavior)
///     .actor(knight)
///     .actors(slimes)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<S, A, B: BehaviorModel<S, A>> {
    config:   WorldConfig,
    state:    S,
    behavior: B,
    actors:   Vec<ActorBuilder<S, A>>,
}

impl<S, A, B> SimBuilder<S, A, B>
where
    S: WorldState,
    A: ActionArgs,
    B: BehaviorModel<S, A>,
{
    /// Create a builder with all required inputs.
    pub fn new(config: WorldConfig, state: S, behavior: B) -> Self {
        Self { config, state, behavior, actors: Vec::new() }
    }

    pub fn actor(mut self, builder: ActorBuilder<S, A>) -> Self {
        self.actors.push(builder);
        self
    }

    pub fn actors(mut self, builders: impl IntoIterator<Item = ActorBuilder<S, A>>) -> Self {
        self.actors.extend(builders);
        self
    }

    /// Validate the config, build every actor, and return a ready-to-run
    /// [`Sim`].
    ///
    /// # Errors
    ///
    /// - [`SimError::Config`][crate::SimError::Config] for an invalid
    ///   `WorldConfig`.
    /// - [`SimError::Actor`][crate::SimError::Actor] for the first actor
    ///   whose catalogue fails validation.
    /// - [`SimError::ThreadPool`][crate::SimError::ThreadPool] if the
    ///   `parallel` pool cannot be created.
    pub fn build(self) -> SimResult<Sim<S, A, B>> {
        self.config.validate()?;

        let mut actors = ActorStore::new();
        for builder in self.actors {
            actors.spawn(builder)?;
        }
        let mut rngs = ActorRngs::new(self.config.seed);
        rngs.ensure(actors.id_space());

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::SimError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        debug!(actors = actors.len(), seed = self.config.seed, "simulation built");

        Ok(Sim {
            clock:     self.config.make_clock(),
            config:    self.config,
            state:     self.state,
            actors,
            rngs,
            scheduler: Scheduler::new(),
            behavior:  self.behavior,
            pending:   Vec::new(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
