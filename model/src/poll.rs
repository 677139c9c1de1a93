/*!

The bounded poller used at every synchronization point of a scenario.

Declarative resources converge asynchronously, so a single read after a mutation races the
controller. Every wait in this workspace goes through [`Poller`]: a predicate over a freshly fetched
snapshot, a fixed number of attempts and a fixed sleep between attempts. Exhausting the
budget is reported as `false`; callers decide whether that is a failure.

!*/

use crate::constants::{CONDITION_RESOURCE_SYNCED, CONDITION_TRUE};
use log::trace;
use std::future::Future;
use std::time::Duration;

/// A fixed attempt budget with a fixed delay between attempts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Poller {
    max_attempts: u32,
    interval: Duration,
}

impl Poller {
    pub const fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Controller sync waits.
    pub const fn sync(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::from_secs(10))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The longest time `until` can sleep before giving up.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }

    /// Evaluate `attempt` until it returns `true` or the attempt budget is exhausted. Sleeps
    /// `interval` between attempts but never before the first or after the last one.
    pub async fn until<F, Fut>(&self, mut attempt: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        self.find(|| {
            let check = attempt();
            async move { check.await.then_some(()) }
        })
        .await
        .is_some()
    }

    /// Evaluate `attempt` until it yields a value or the attempt budget is exhausted, with the
    /// same sleeps as `until`.
    pub async fn find<T, F, Fut>(&self, attempt: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        self.run(false, attempt).await
    }

    /// Like `find`, but also sleeps before the first attempt. Used where the first read would
    /// always be too early, e.g. right after creating a resource.
    pub async fn find_after_delay<T, F, Fut>(&self, attempt: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        self.run(true, attempt).await
    }

    async fn run<T, F, Fut>(&self, delay_first: bool, mut attempt: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        for n in 1..=self.max_attempts {
            if delay_first || n > 1 {
                tokio::time::sleep(self.interval).await;
            }
            if let Some(found) = attempt().await {
                trace!("poll satisfied on attempt {}/{}", n, self.max_attempts);
                return Some(found);
            }
        }
        trace!("poll budget of {} attempts exhausted", self.max_attempts);
        None
    }
}

/// A named status condition, its expected value and the budget for observing it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConditionExpectation {
    pub condition_type: String,
    pub expected_status: String,
    pub poller: Poller,
}

impl ConditionExpectation {
    pub fn new<S1, S2>(condition_type: S1, expected_status: S2, poller: Poller) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            condition_type: condition_type.into(),
            expected_status: expected_status.into(),
            poller,
        }
    }

    /// `ACK.ResourceSynced == True` within `max_attempts` sync periods.
    pub fn synced(max_attempts: u32) -> Self {
        Self::new(
            CONDITION_RESOURCE_SYNCED,
            CONDITION_TRUE,
            Poller::sync(max_attempts),
        )
    }
}
