use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::http::HeaderMap;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

// Per-client counting window. count is at least 1 once the entry exists;
// window_start only moves forward across resets.
#[derive(Debug, Clone, Copy)]
pub struct WindowEntry {
    pub count: u32,
    pub window_start: Instant,
}

// Outcome of an admission check. Deny is normal control flow, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allow,
    Deny,
}

// Fixed-window rate limiter keyed by client identity.
//
// One entry per distinct client ever seen, kept for the process lifetime.
// There is no eviction of stale keys; memory grows with the number of
// distinct clients, which is the intended trade for O(1) bookkeeping with
// no background sweep.
pub struct RateLimiter {
    clients: DashMap<String, WindowEntry>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            clients: DashMap::new(),
            max_requests,
            window,
        }
    }

    // Admit or deny one request from `key` at time `now`.
    //
    // Fixed-window counting: the counter resets when the window has fully
    // elapsed, so a burst straddling a window boundary can admit up to
    // 2 * max_requests in a short span. That is accepted behavior here.
    //
    // The whole read-decide-write runs under the dashmap entry lock, so
    // concurrent calls for the same key cannot lose updates. A denied
    // request does not touch the entry.
    pub fn admit(&self, key: &str, now: Instant) -> Admission {
        match self.clients.entry(key.to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(WindowEntry {
                    count: 1,
                    window_start: now,
                });
                Admission::Allow
            }
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if now.duration_since(entry.window_start) > self.window {
                    // window expired, start a fresh one
                    entry.count = 1;
                    entry.window_start = now;
                    Admission::Allow
                } else if entry.count >= self.max_requests {
                    Admission::Deny
                } else {
                    entry.count += 1;
                    Admission::Allow
                }
            }
        }
    }

    // Current count for a key, if the key has been seen.
    pub fn current_count(&self, key: &str) -> Option<u32> {
        self.clients.get(key).map(|entry| entry.count)
    }

    // Snapshot of a client's window, if the key has been seen.
    pub fn window_entry(&self, key: &str) -> Option<WindowEntry> {
        self.clients.get(key).map(|entry| *entry)
    }

    // Number of distinct clients tracked so far.
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

// Derive the rate-limit key for a request: the raw X-Forwarded-For value
// when present (taken verbatim, proxy hops and all), else the peer IP,
// else "unknown". Always produces a key; the value is an opaque string,
// never parsed as an address.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(raw) = forwarded.to_str() {
            if !raw.is_empty() {
                return raw.to_string();
            }
        }
    }
    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}
