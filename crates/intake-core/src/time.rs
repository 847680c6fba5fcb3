use chrono::{DateTime, Utc};

/// Clock abstracts access to the current timestamp so the wizard remains deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
