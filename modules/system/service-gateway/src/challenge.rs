//! Per-connection memory of sent Negotiate challenges.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;

/// Entries beyond this count trigger a sweep of expired ones, at most once
/// per window.
const SWEEP_THRESHOLD: usize = 1024;

/// Hard limit on remembered connections. Past it new challenges are not
/// recorded, so those clients are simply challenged again.
pub const MAX_ENTRIES: usize = 65_536;

/// Remembers which connections were sent a bare `Negotiate` challenge.
///
/// Keyed by remote socket address, so one keep-alive connection maps to one
/// entry. An entry older than the window counts as absent.
#[derive(Debug)]
pub struct ChallengeLedger {
    window: Duration,
    max_entries: usize,
    sent: DashMap<SocketAddr, Instant>,
    last_sweep: Mutex<Instant>,
}

impl ChallengeLedger {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self::with_limit(window, MAX_ENTRIES)
    }

    fn with_limit(window: Duration, max_entries: usize) -> Self {
        Self {
            window,
            max_entries,
            sent: DashMap::new(),
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Note that `addr` was just challenged.
    pub fn record(&self, addr: SocketAddr) {
        self.record_at(addr, Instant::now());
    }

    /// Whether `addr` was challenged within the window.
    #[must_use]
    pub fn was_challenged(&self, addr: SocketAddr) -> bool {
        self.was_challenged_at(addr, Instant::now())
    }

    /// Forget `addr`. Called once the client sends credentials.
    pub fn clear(&self, addr: SocketAddr) {
        self.sent.remove(&addr);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sent.is_empty()
    }

    fn record_at(&self, addr: SocketAddr, now: Instant) {
        if self.sent.len() >= SWEEP_THRESHOLD {
            self.sweep(now);
        }
        if self.sent.len() >= self.max_entries && !self.sent.contains_key(&addr) {
            tracing::debug!(remote_addr = %addr, "challenge ledger full, challenge not recorded");
            return;
        }
        self.sent.insert(addr, now);
    }

    fn was_challenged_at(&self, addr: SocketAddr, now: Instant) -> bool {
        let fresh = self
            .sent
            .get(&addr)
            .map(|at| now.saturating_duration_since(*at) < self.window);
        match fresh {
            Some(true) => true,
            Some(false) => {
                self.sent.remove(&addr);
                false
            }
            None => false,
        }
    }

    fn sweep(&self, now: Instant) {
        let window = self.window;
        {
            let mut last = self.last_sweep.lock();
            if now.saturating_duration_since(*last) < window {
                return;
            }
            *last = now;
        }
        self.sent
            .retain(|_, at| now.saturating_duration_since(*at) < window);
    }
}
