//! Geography cache, location selector and the fetch orchestration between
//! them.

pub mod cache;
pub mod controller;
pub mod error;
pub mod orchestrator;
pub mod selector;
pub mod source;

#[cfg(test)]
mod test_support;

pub use cache::{CacheKey, Completion, FetchTicket, GeographyCache, SlotView};
pub use controller::{Effects, FixedLocation, LocationContext, LocationController};
pub use error::FetchError;
pub use orchestrator::{FetchOrchestrator, FetchOutcome};
pub use selector::{LocationSelector, OptionsView, SelectionEvent, SelectionSnapshot, Transition};
pub use source::GeographySource;
