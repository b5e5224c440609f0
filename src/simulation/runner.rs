//! Fixed-cadence simulation loop
//!
//! Owns the world, the snapshot store and the decision service for the
//! life of the process. The loop is the only thing that mutates the world.

use crate::actor::ActorSpec;
use crate::core::config::ArenaConfig;
use crate::core::error::Result;
use crate::decision::client::DecisionService;
use crate::persistence::SnapshotStore;
use crate::simulation::tick::run_simulation_tick;
use crate::world::{TickSummary, World};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub struct Simulation<S, D> {
    world: World,
    store: S,
    decisions: Arc<D>,
    period: Duration,
    decision_timeout: Duration,
    max_ticks: Option<u64>,
}

impl<S, D> Simulation<S, D>
where
    S: SnapshotStore,
    D: DecisionService,
{
    /// Wipe the store and populate a fresh world
    ///
    /// Errors here are fatal: an unreachable store or an arena too small
    /// for its population stops the run before the first tick.
    pub fn start(config: &ArenaConfig, mut store: S, decisions: Arc<D>) -> Result<Self> {
        config.validate()?;
        store.clear()?;
        tracing::info!("Cleared snapshot store");

        let mut world = World::new(config.clone());
        for _ in 0..config.population.zombie_count {
            world.add(ActorSpec::zombie())?;
        }
        for name in &config.population.human_names {
            world.add(ActorSpec::human(name.clone()))?;
        }
        tracing::info!(
            "Spawned {} zombies and {} humans in a {}x{} arena",
            config.population.zombie_count,
            config.population.human_names.len(),
            config.world.width,
            config.world.height
        );

        Ok(Self::with_world(config, world, store, decisions))
    }

    /// Wrap an already populated world; the store is used as-is
    pub fn with_world(config: &ArenaConfig, world: World, store: S, decisions: Arc<D>) -> Self {
        Self {
            world,
            store,
            decisions,
            period: config.ticks.period(),
            decision_timeout: config.decision.timeout(),
            max_ticks: config.ticks.max_ticks,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_parts(self) -> (World, S) {
        (self.world, self.store)
    }

    /// Run exactly one tick
    pub async fn step(&mut self) -> TickSummary {
        run_simulation_tick(&mut self.world, &mut self.store, &self.decisions, self.decision_timeout).await
    }

    /// Tick until `shutdown` resolves or `max_ticks` is reached
    ///
    /// A tick that has started always runs to completion; shutdown is only
    /// observed between ticks.
    ///
    /// Snapshots are saved inline on the runtime thread. A store that blocks
    /// (such as `DirectoryStore`, which uses `std::fs`) stalls the runtime for
    /// the duration of the save, which is a few small writes per actor.
    pub async fn run<F>(mut self, shutdown: F) -> Self
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!("Simulation running at {:.1} ticks/s", 1.0 / self.period.as_secs_f64());

        loop {
            if self.max_ticks.is_some_and(|max| self.world.current_tick >= max) {
                tracing::info!("Reached {} ticks", self.world.current_tick);
                break;
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested at tick {}", self.world.current_tick);
                    break;
                }
                _ = interval.tick() => {
                    self.step().await;
                }
            }
        }

        tracing::info!(
            "Simulation stopped: {} of {} actors alive after {} ticks",
            self.world.living_count(),
            self.world.actor_count(),
            self.world.current_tick
        );
        self
    }
}
