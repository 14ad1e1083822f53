use crate::tally::{TallyShared, TickOutcome};
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Background loop behind live mode. Ticks are strictly sequential; the loop
/// exits once its generation has been retired by a stop.
pub(crate) async fn run_live_tally(shared: Arc<TallyShared>, period: Duration, generation: u64) {
    info!("Starting live tally (every {:?})", period);
    // First update lands one full period after going live.
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match shared.tick(generation) {
            TickOutcome::Applied(revision) => {
                debug!("Live tally advanced to revision {}", revision);
            }
            TickOutcome::Skipped(e) => {
                error!("Skipping live tally tick: {}", e);
            }
            TickOutcome::Cancelled => {
                info!("Live tally stopped");
                break;
            }
        }
    }
}
