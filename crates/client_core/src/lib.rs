//! Reactive client core for a remote-backed trip point board.
//!
//! The models own canonical state and notify synchronous observers with
//! tagged update events; presenters derive view state from snapshots and
//! publish [`presenter::events::UiEvent`]s for a host frontend. All remote
//! access goes through the [`gateway::PointsGateway`] seam, and every
//! mutation is confirmed by the gateway before local state changes.

pub mod derive;
pub mod gate;
pub mod gateway;
pub mod model;
pub mod observable;
pub mod presenter;

pub use gate::{BusyState, GateLimits, MutationGate};
pub use gateway::{HttpPointsGateway, PointsGateway};
pub use model::filter::FilterModel;
pub use model::points::{ModelError, PointsEvent, PointsModel, PointsPayload};
pub use presenter::board::BoardPresenter;
pub use presenter::events::{ui_channel, UiEvent};
pub use presenter::filter::FilterPresenter;
pub use presenter::trip_info::TripInfoPresenter;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
