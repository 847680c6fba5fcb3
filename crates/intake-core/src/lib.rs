//! intake-core
//!
//! Intake wizard state machine and the services around it.
//! Depends on intake-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod error;
pub mod field_groups;
pub mod gateway;
pub mod page_plan;
pub mod redirect;
pub mod reducer;
pub mod review;
pub mod time;
pub mod validation;
pub mod wizard;

pub use error::CoreError;
pub use field_groups::*;
pub use gateway::*;
pub use page_plan::*;
pub use redirect::*;
pub use reducer::*;
pub use review::*;
pub use time::Clock;
pub use validation::*;
pub use wizard::*;
