#![doc(test(attr(deny(warnings))))]

//! Case Intake hosts the member case-intake wizard in a terminal shell:
//! category picker, page prompts, review, submission and case views.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Case Intake tracing initialized.");
    });
}
