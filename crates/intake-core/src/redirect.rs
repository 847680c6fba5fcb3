//! Post-submission redirect, guarded by session liveness.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::{DateTime, Duration, Utc};

/// Owner side of a session liveness flag.
#[derive(Debug)]
pub struct SessionGuard {
    alive: Arc<AtomicBool>,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGuard {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn token(&self) -> SessionToken {
        SessionToken {
            alive: Arc::clone(&self.alive),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Marks the session dead. Every token handed out observes this.
    pub fn invalidate(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.invalidate();
    }
}

/// Observer side of a [`SessionGuard`].
#[derive(Debug, Clone)]
pub struct SessionToken {
    alive: Arc<AtomicBool>,
}

impl SessionToken {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

/// One-shot navigation scheduled after a successful submission.
#[derive(Debug, Clone)]
pub struct RedirectTimer {
    due_at: DateTime<Utc>,
    route: String,
    token: SessionToken,
    fired: bool,
}

impl RedirectTimer {
    pub fn arm(
        now: DateTime<Utc>,
        delay: Duration,
        route: impl Into<String>,
        token: SessionToken,
    ) -> Self {
        Self {
            due_at: now + delay,
            route: route.into(),
            token,
            fired: false,
        }
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn is_pending(&self) -> bool {
        !self.fired && self.token.is_alive()
    }

    /// Returns the route once the delay has elapsed, provided the session is
    /// still alive. Never returns it twice.
    pub fn take_if_due(&mut self, now: DateTime<Utc>) -> Option<String> {
        if self.fired || now < self.due_at {
            return None;
        }
        self.fired = true;
        self.token.is_alive().then(|| self.route.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn fires_once_after_delay() {
        let guard = SessionGuard::new();
        let mut timer = RedirectTimer::arm(t0(), Duration::seconds(2), "/cases/1", guard.token());

        assert_eq!(timer.take_if_due(t0() + Duration::milliseconds(1999)), None);
        assert!(timer.is_pending());
        assert_eq!(
            timer.take_if_due(t0() + Duration::seconds(2)).as_deref(),
            Some("/cases/1")
        );
        assert_eq!(timer.take_if_due(t0() + Duration::seconds(10)), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn invalidated_session_never_fires() {
        let guard = SessionGuard::new();
        let mut timer = RedirectTimer::arm(t0(), Duration::seconds(2), "/cases/1", guard.token());
        guard.invalidate();
        assert_eq!(timer.take_if_due(t0() + Duration::seconds(5)), None);
    }

    #[test]
    fn dropping_the_guard_kills_outstanding_tokens() {
        let guard = SessionGuard::new();
        let token = guard.token();
        let handle = std::thread::spawn(move || token);
        let token = handle.join().unwrap();
        assert!(token.is_alive());
        drop(guard);
        assert!(!token.is_alive());
    }
}
