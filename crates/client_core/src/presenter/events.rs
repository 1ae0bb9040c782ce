//! UI events the presenters broadcast to the host frontend.

use tokio::sync::broadcast;

use shared::domain::{FilterType, PointId, SortType};

use crate::presenter::view_state::{FilterOption, PointCard, TripInfo};

/// Rendering instructions for a host frontend. `point_id: None` refers to
/// the creation form.
#[derive(Debug, Clone)]
pub enum UiEvent {
    LoadingShown,
    EmptyShown { message: String },
    BoardRendered { sort_type: SortType, items: Vec<PointCard> },
    ItemPatched { item: PointCard },
    EditorOpened { point_id: Option<PointId> },
    EditorClosed { point_id: Option<PointId> },
    ItemSaving { point_id: Option<PointId> },
    ItemDeleting { point_id: PointId },
    ItemAborted { point_id: Option<PointId> },
    FiltersRendered { options: Vec<FilterOption>, active: FilterType },
    TripInfoRendered { info: TripInfo },
    CreateTriggerEnabled { enabled: bool },
}

pub type UiSender = broadcast::Sender<UiEvent>;

pub fn ui_channel() -> (broadcast::Sender<UiEvent>, broadcast::Receiver<UiEvent>) {
    broadcast::channel(256)
}
