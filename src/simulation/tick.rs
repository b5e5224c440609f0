//! Tick system - one full simulation step
//!
//! decision fan-out -> world update -> snapshot save
//!
//! Nothing in here can fail the tick. Decision and store failures are
//! logged and counted; the world keeps its in-memory state either way.

use crate::decision::client::{gather_decisions, DecisionService};
use crate::decision::protocol::RemoteDecisions;
use crate::persistence::SnapshotStore;
use crate::world::{TickSummary, World};
use std::sync::Arc;
use std::time::Duration;

pub async fn run_simulation_tick<S, D>(
    world: &mut World,
    store: &mut S,
    decisions: &Arc<D>,
    decision_timeout: Duration,
) -> TickSummary
where
    S: SnapshotStore + ?Sized,
    D: DecisionService,
{
    let tick = world.current_tick;

    let requests = world.decision_requests();
    let remote = if requests.is_empty() {
        RemoteDecisions::new()
    } else {
        gather_decisions(decisions, requests, decision_timeout).await
    };

    let events = world.update(&remote);

    let mut summary = TickSummary::from_events(tick, &events);
    summary.decision_failures = remote.failures();

    summary.saved = match world.save(store) {
        Ok(saved) => saved,
        Err(e) => {
            // Retried naturally on the next tick
            tracing::warn!("Tick {} snapshot incomplete: {}", tick, e);
            0
        }
    };

    tracing::debug!(
        "Tick {}: moved {}, blocked {}, turned {}, hits {}, kills {}, faults {}, decision failures {}",
        summary.tick,
        summary.moved,
        summary.blocked,
        summary.turned,
        summary.hits,
        summary.kills,
        summary.faults,
        summary.decision_failures
    );

    summary
}
