//! Presenter layer: board orchestration, per-item state machines, and the
//! auxiliary filter/summary controls.

pub mod board;
pub mod events;
pub mod filter;
pub mod new_point;
pub mod point;
pub mod trip_info;
pub mod view_state;
