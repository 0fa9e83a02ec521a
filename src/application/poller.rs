// Periodic polling with per-loop sequencing
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Tracks the newest response applied by one poll loop. Sequence numbers start
/// at 1, so the first response is always accepted.
#[derive(Debug, Default)]
pub struct Latest {
    applied: u64,
}

impl Latest {
    /// Accept `seq` if it is newer than everything applied so far.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }
}

/// Run `tick` every `period`, first after one full period.
///
/// Each tick is spawned rather than awaited, so a slow fetch does not delay
/// the next one. Ticks carry a monotonically increasing sequence number that
/// receivers check against a [`Latest`] before applying their result.
pub fn spawn_poll_loop<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut(u64) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        tracing::info!("{} poll started every {:?}", name, period);
        let mut seq: u64 = 0;
        loop {
            interval.tick().await;
            seq += 1;
            tracing::debug!(poll = name, seq, "tick");
            tokio::spawn(tick(seq));
        }
    })
}
