//! Single-flight refresh coordination
//!
//! One coordinator exists per [`AuthClient`](super::AuthClient). The first
//! request that needs a refresh becomes the leader and receives a
//! [`RefreshLease`]; requests arriving while the lease is held join the queue
//! and receive the leader's outcome. The flag and the queue are updated under
//! a single lock, so at most one refresh runs per coordinator.

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::debug;

use super::errors::ApiError;

/// New access credential on success, the refresh failure otherwise.
pub type RefreshOutcome = Result<String, ApiError>;

/// What a queued request receives when the lease ends.
#[derive(Clone)]
enum Settlement {
    Done(RefreshOutcome),
    Abandoned,
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Settlement>>,
}

/// Owner of the refresh-in-flight flag and the pending queue.
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// Result of [`RefreshCoordinator::acquire_or_join`].
pub enum RefreshTicket<'a> {
    /// Caller must run the refresh and release the lease.
    Leader(RefreshLease<'a>),
    /// A refresh is already running; await its outcome.
    Follower(RefreshWaiter),
}

impl RefreshCoordinator {
    /// Create an idle coordinator with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Become the refresh leader, or join the refresh already in flight.
    pub fn acquire_or_join(&self) -> RefreshTicket<'_> {
        let mut state = self.state.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            debug!(queued = state.waiters.len(), "joined in-flight refresh");
            RefreshTicket::Follower(RefreshWaiter { rx })
        } else {
            state.in_flight = true;
            debug!("refresh lease acquired");
            RefreshTicket::Leader(RefreshLease { coordinator: self, released: false })
        }
    }

    /// Whether a lease is currently held.
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Requests currently waiting on the in-flight refresh.
    pub fn pending(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Clear the flag and hand `settlement` to every waiter in arrival order.
    fn drain(&self, settlement: Settlement) -> usize {
        let waiters = {
            let mut state = self.state.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };

        let count = waiters.len();
        for waiter in waiters {
            // A closed receiver means the caller gave up; nothing to settle.
            let _ = waiter.send(settlement.clone());
        }
        count
    }
}

/// Proof of leadership for one refresh attempt.
///
/// Dropping the lease without calling [`release`](Self::release) (for
/// example when the leader's future is cancelled) settles every waiter as
/// abandoned, so queued requests can start or join a new attempt.
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    released: bool,
}

impl RefreshLease<'_> {
    /// Settle the refresh attempt. Returns how many queued requests were woken.
    pub fn release(mut self, outcome: RefreshOutcome) -> usize {
        self.released = true;
        let success = outcome.is_ok();
        let woken = self.coordinator.drain(Settlement::Done(outcome));
        debug!(woken, success, "refresh lease released");
        woken
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.released {
            let woken = self.coordinator.drain(Settlement::Abandoned);
            debug!(woken, "refresh lease dropped without release");
        }
    }
}

/// A queued request waiting for the leader's outcome.
pub struct RefreshWaiter {
    rx: oneshot::Receiver<Settlement>,
}

impl RefreshWaiter {
    /// Wait for the leader. `None` means the attempt ended without an outcome.
    pub async fn wait(self) -> Option<RefreshOutcome> {
        match self.rx.await {
            Ok(Settlement::Done(outcome)) => Some(outcome),
            Ok(Settlement::Abandoned) | Err(_) => None,
        }
    }
}
