//! Trailing-edge debouncing of a controlled value.
//!
//! The displayed value changes the moment [`Debouncer::set`] is called, so the
//! editing surface never lags. What the host sees is deferred: each `set`
//! arms a new [`Ticket`] and makes any earlier one stale. When the timer for
//! a ticket elapses the owner calls [`Debouncer::fire`], which yields the
//! latest value only if that ticket is still the current one.
//!
//! ## Learning: Timers as Values
//!
//! The debouncer holds no timer itself. The caller runs [`elapsed`] on its
//! executor and feeds the returned ticket back in. Cancelling is therefore
//! two things at once: aborting the future (so nothing is delivered) and
//! clearing the pending ticket (so a late delivery is ignored).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Quiet period used when the host does not specify one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Identifies one armed notification.
///
/// `instance` is unique per [`Debouncer`] in the process, so a ticket that
/// outlives its debouncer can never match a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub instance: u64,
    pub generation: u64,
}

/// Holds a displayed value and at most one pending notification for it.
#[derive(Debug)]
pub struct Debouncer<T> {
    instance: u64,
    generation: u64,
    interval: Duration,
    displayed: T,
    controlled: T,
    last_emitted: Option<T>,
    pending: Option<Ticket>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Creates a debouncer mirroring `controlled`, with nothing pending.
    pub fn new(controlled: T, interval: Duration) -> Self {
        Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            generation: 0,
            interval,
            displayed: controlled.clone(),
            controlled,
            last_emitted: None,
            pending: None,
        }
    }

    /// The value the editing surface should show.
    pub fn value(&self) -> &T {
        &self.displayed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_ticket(&self) -> Option<Ticket> {
        self.pending
    }

    /// Updates the displayed value and re-arms the notification.
    ///
    /// The returned ticket replaces whatever was pending before.
    pub fn set(&mut self, value: T) -> Ticket {
        self.displayed = value;
        self.generation += 1;

        let ticket = Ticket {
            instance: self.instance,
            generation: self.generation,
        };
        if let Some(previous) = self.pending.replace(ticket) {
            tracing::trace!(
                "Debounce re-armed: generation {} supersedes {}",
                ticket.generation,
                previous.generation
            );
        }
        ticket
    }

    /// Consumes a ticket whose timer has elapsed.
    ///
    /// Returns the settled value if `ticket` is the current pending one.
    /// Stale tickets and tickets from other instances yield `None`.
    pub fn fire(&mut self, ticket: Ticket) -> Option<T> {
        if self.pending != Some(ticket) {
            tracing::trace!("Ignoring stale debounce ticket {:?}", ticket);
            return None;
        }

        self.pending = None;
        self.last_emitted = Some(self.displayed.clone());
        tracing::debug!("Debounce settled at generation {}", ticket.generation);
        Some(self.displayed.clone())
    }

    /// Resynchronizes with the externally controlled value.
    ///
    /// A value that differs from the last controlled one replaces the
    /// displayed value and drops any pending notification, unless it is just
    /// the host echoing back what this debouncer last emitted. Returns `true`
    /// when the displayed value was replaced.
    pub fn sync(&mut self, external: T) -> bool {
        if external == self.controlled {
            return false;
        }
        self.controlled = external.clone();

        if self.last_emitted.as_ref() == Some(&external) {
            return false;
        }

        if self.pending.take().is_some() {
            tracing::debug!("External value changed; pending notification discarded");
        }
        self.displayed = external;
        true
    }

    /// Drops the pending notification without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Waits out `interval` and hands back `ticket`.
///
/// A zero interval still yields to the timer wheel first, so notification is
/// never synchronous with the `set` that armed it.
pub async fn elapsed(interval: Duration, ticket: Ticket) -> Ticket {
    tokio::time::sleep(interval).await;
    ticket
}
