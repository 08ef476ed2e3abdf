use dashmap::DashMap;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: i64,
}

/// Fixed-window request counter per client address.
pub struct RateLimiter {
    requests: DashMap<IpAddr, Window>,
    max_requests: u32,
    window_secs: i64,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: i64) -> Self {
        Self {
            requests: DashMap::new(),
            max_requests,
            window_secs: window_secs.max(1),
        }
    }

    pub fn window_secs(&self) -> i64 {
        self.window_secs
    }

    /// Counts one request from `ip` at `current_time` (unix seconds) and
    /// reports whether it is within the limit.
    pub fn check_and_increment(&self, ip: IpAddr, current_time: i64) -> bool {
        // The shard stays write-locked while `window` is alive, so the
        // expiry check and the reset happen as one step.
        let mut window = self.requests.entry(ip).or_insert(Window {
            count: 0,
            started_at: current_time,
        });

        if current_time - window.started_at >= self.window_secs {
            window.started_at = current_time;
            window.count = 0;
        }
        window.count = window.count.saturating_add(1);
        window.count <= self.max_requests
    }

    /// Seconds until the window of `ip` resets.
    pub fn retry_after(&self, ip: IpAddr, current_time: i64) -> i64 {
        self.requests
            .get(&ip)
            .map(|window| (window.started_at + self.window_secs - current_time).max(0))
            .unwrap_or(0)
    }

    pub fn cleanup_old_entries(&self, current_time: i64) {
        self.requests
            .retain(|_, window| current_time - window.started_at < self.window_secs);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }
}
