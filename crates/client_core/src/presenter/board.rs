//! Board orchestrator: derives the visible, ordered subset, keys one
//! presenter per point id (updated in place, never reconstructed), and
//! routes user actions through the mutation gate to the model.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, warn};

use shared::domain::{FilterType, Point, PointId, SortType, UpdateType, UserAction};

use crate::derive::{filter_points, sort_points};
use crate::gate::MutationGate;
use crate::model::filter::{FilterEvent, FilterModel};
use crate::model::points::{ModelError, PointsEvent, PointsModel, PointsPayload};
use crate::observable::ObserverId;
use crate::presenter::events::{UiEvent, UiSender};
use crate::presenter::new_point::NewPointPresenter;
use crate::presenter::point::{Mode, PointPresenter};
use crate::presenter::view_state::{EditForm, PointCard};

const LOAD_FAILED_MESSAGE: &str = "Failed to load latest route information";

fn empty_message(filter_type: FilterType) -> &'static str {
    match filter_type {
        FilterType::Everything => "Click New Event to create your first point",
        FilterType::Future => "There are no future events now",
        FilterType::Present => "There are no present events now",
        FilterType::Past => "There are no past events now",
    }
}

struct BoardState {
    sort_type: SortType,
    filter_type: FilterType,
    presenters: HashMap<PointId, PointPresenter>,
    order: Vec<PointId>,
    new_point: Option<NewPointPresenter>,
    is_loading: bool,
    load_failed: bool,
    create_enabled: bool,
}

pub struct BoardPresenter {
    points_model: Arc<PointsModel>,
    filter_model: Arc<FilterModel>,
    gate: MutationGate,
    ui: UiSender,
    state: Mutex<BoardState>,
    observers: Mutex<Option<(ObserverId, ObserverId)>>,
}

impl BoardPresenter {
    pub fn new(
        points_model: Arc<PointsModel>,
        filter_model: Arc<FilterModel>,
        gate: MutationGate,
        ui: UiSender,
    ) -> Arc<Self> {
        let board = Arc::new(Self {
            points_model: Arc::clone(&points_model),
            filter_model: Arc::clone(&filter_model),
            gate,
            ui,
            state: Mutex::new(BoardState {
                sort_type: SortType::Day,
                filter_type: filter_model.filter(),
                presenters: HashMap::new(),
                order: Vec::new(),
                new_point: None,
                is_loading: true,
                load_failed: false,
                create_enabled: true,
            }),
            observers: Mutex::new(None),
        });

        let weak = Arc::downgrade(&board);
        let points_observer = points_model.add_observer(move |event: &PointsEvent| {
            if let Some(board) = weak.upgrade() {
                board.handle_points_event(event);
            }
        });
        let weak = Arc::downgrade(&board);
        let filter_observer = filter_model.add_observer(move |event: &FilterEvent| {
            if let Some(board) = weak.upgrade() {
                board.handle_filter_event(event);
            }
        });
        *board
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((points_observer, filter_observer));

        board
    }

    /// First render; shows the loading placeholder until `Init` arrives.
    pub fn init(&self) {
        self.render();
    }

    /// Unsubscribes from both models.
    pub fn detach(&self) {
        if let Some((points_observer, filter_observer)) = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            self.points_model.remove_observer(points_observer);
            self.filter_model.remove_observer(filter_observer);
        }
    }

    pub fn sort_type(&self) -> SortType {
        self.lock().sort_type
    }

    pub fn filter_type(&self) -> FilterType {
        self.lock().filter_type
    }

    pub fn gate(&self) -> &MutationGate {
        &self.gate
    }

    /// Ids currently in editing mode (at most one by construction).
    pub fn open_editors(&self) -> Vec<PointId> {
        let state = self.lock();
        state
            .order
            .iter()
            .copied()
            .filter(|id| {
                state
                    .presenters
                    .get(id)
                    .is_some_and(|presenter| presenter.mode() == Mode::Editing)
            })
            .collect()
    }

    pub fn is_creating(&self) -> bool {
        self.lock().new_point.is_some()
    }

    pub fn create_enabled(&self) -> bool {
        self.lock().create_enabled
    }

    // ---- model event dispatch -------------------------------------------

    fn handle_points_event(&self, event: &PointsEvent) {
        match event.update_type {
            UpdateType::Patch => {
                if let PointsPayload::Saved(point) = &event.payload {
                    self.patch_item(point);
                }
            }
            UpdateType::Minor => self.rebuild(false),
            UpdateType::Major => self.rebuild(true),
            UpdateType::Init => {
                {
                    let mut state = self.lock();
                    state.is_loading = false;
                    state.load_failed =
                        matches!(&event.payload, PointsPayload::Loaded { error: Some(_) });
                }
                self.render();
            }
        }
    }

    fn handle_filter_event(&self, event: &FilterEvent) {
        self.lock().filter_type = event.filter;
        match event.update_type {
            UpdateType::Major => self.rebuild(true),
            UpdateType::Minor => self.rebuild(false),
            UpdateType::Patch | UpdateType::Init => self.render(),
        }
    }

    fn patch_item(&self, point: &Point) {
        let Some(id) = point.id else { return };
        let destinations = self.points_model.destinations();
        let offer_groups = self.points_model.offer_groups();
        let card = {
            let mut state = self.lock();
            let Some(presenter) = state.presenters.get_mut(&id) else {
                return;
            };
            presenter.init(point.clone(), &destinations, &offer_groups);
            presenter.card().clone()
        };
        let _ = self.ui.send(UiEvent::ItemPatched { item: card });
    }

    /// Full re-render: closes every open editor (and the creation form),
    /// optionally resets the sort, then derives and renders.
    fn rebuild(&self, reset_sort: bool) {
        let destinations = self.points_model.destinations();
        let mut closed = Vec::new();
        let mut create_restored = false;
        {
            let mut state = self.lock();
            if reset_sort {
                state.sort_type = SortType::Day;
            }
            for (id, presenter) in state.presenters.iter_mut() {
                if presenter.reset_view(&destinations) {
                    closed.push(Some(*id));
                }
            }
            if state.new_point.take().is_some() {
                state.create_enabled = true;
                create_restored = true;
                closed.push(None);
            }
        }
        for point_id in closed {
            let _ = self.ui.send(UiEvent::EditorClosed { point_id });
        }
        if create_restored {
            let _ = self.ui.send(UiEvent::CreateTriggerEnabled { enabled: true });
        }
        self.render();
    }

    fn render(&self) {
        let points = self.points_model.points();
        let destinations = self.points_model.destinations();
        let offer_groups = self.points_model.offer_groups();
        let now = Utc::now();

        let mut state = self.lock();
        state.filter_type = self.filter_model.filter();

        if state.is_loading {
            drop(state);
            let _ = self.ui.send(UiEvent::LoadingShown);
            return;
        }
        if state.load_failed {
            drop(state);
            let _ = self.ui.send(UiEvent::EmptyShown {
                message: LOAD_FAILED_MESSAGE.to_string(),
            });
            return;
        }

        let visible = sort_points(
            &filter_points(&points, state.filter_type, now),
            state.sort_type,
            &destinations,
        );

        if visible.is_empty() {
            state.presenters.clear();
            state.order.clear();
            let message = empty_message(state.filter_type).to_string();
            drop(state);
            let _ = self.ui.send(UiEvent::EmptyShown { message });
            return;
        }

        let mut order = Vec::with_capacity(visible.len());
        for point in &visible {
            let Some(id) = point.id else { continue };
            order.push(id);
            match state.presenters.get_mut(&id) {
                Some(presenter) => presenter.init(point.clone(), &destinations, &offer_groups),
                None => {
                    state.presenters.insert(
                        id,
                        PointPresenter::new(point.clone(), &destinations, &offer_groups),
                    );
                }
            }
        }
        state.presenters.retain(|id, _| order.contains(id));
        state.order = order;

        let items: Vec<PointCard> = state
            .order
            .iter()
            .filter_map(|id| state.presenters.get(id))
            .map(|presenter| presenter.card().clone())
            .collect();
        let sort_type = state.sort_type;
        drop(state);
        let _ = self.ui.send(UiEvent::BoardRendered { sort_type, items });
    }

    // ---- user interaction ------------------------------------------------

    /// Sort control change; a repeat selection is a no-op.
    pub fn set_sort(&self, sort_type: SortType) {
        {
            let mut state = self.lock();
            if state.sort_type == sort_type {
                return;
            }
            state.sort_type = sort_type;
        }
        self.render();
    }

    /// Opens the inline editor for `id`, first forcing every other open
    /// editor (and any creation form) back to display mode.
    pub fn open_editor(&self, id: PointId) {
        let destinations = self.points_model.destinations();
        let mut closed = Vec::new();
        let mut create_restored = false;
        let opened = {
            let mut state = self.lock();
            for (other, presenter) in state.presenters.iter_mut() {
                if *other != id && presenter.reset_view(&destinations) {
                    closed.push(Some(*other));
                }
            }
            if state.new_point.take().is_some() {
                state.create_enabled = true;
                create_restored = true;
                closed.push(None);
            }
            match state.presenters.get_mut(&id) {
                Some(presenter) => {
                    presenter.open_editor();
                    true
                }
                None => false,
            }
        };
        for point_id in closed {
            let _ = self.ui.send(UiEvent::EditorClosed { point_id });
        }
        if create_restored {
            let _ = self.ui.send(UiEvent::CreateTriggerEnabled { enabled: true });
        }
        if opened {
            let _ = self.ui.send(UiEvent::EditorOpened { point_id: Some(id) });
        }
    }

    /// Rollup / escape-style dismissal: back to the card, edits dropped.
    pub fn close_editor(&self, id: PointId) {
        let destinations = self.points_model.destinations();
        let closed = {
            let mut state = self.lock();
            state
                .presenters
                .get_mut(&id)
                .is_some_and(|presenter| presenter.reset_view(&destinations))
        };
        if closed {
            let _ = self.ui.send(UiEvent::EditorClosed { point_id: Some(id) });
        }
    }

    /// Runs `edit` against the open editor's form for `id`.
    pub fn with_point_form(&self, id: PointId, edit: impl FnOnce(&mut EditForm)) -> bool {
        let mut state = self.lock();
        match state.presenters.get_mut(&id) {
            Some(presenter) => {
                edit(presenter.form_mut());
                true
            }
            None => false,
        }
    }

    /// Runs `edit` against the creation form, when one is open.
    pub fn with_new_form(&self, edit: impl FnOnce(&mut EditForm)) -> bool {
        let mut state = self.lock();
        match state.new_point.as_mut() {
            Some(presenter) => {
                edit(presenter.form_mut());
                true
            }
            None => false,
        }
    }

    /// Favorite toggle from the card; mode is untouched.
    pub async fn toggle_favorite(&self, id: PointId) {
        let candidate = {
            let state = self.lock();
            let Some(presenter) = state.presenters.get(&id) else {
                return;
            };
            presenter.favorite_toggled()
        };
        self.handle_view_action(UserAction::UpdatePoint, UpdateType::Patch, candidate)
            .await;
    }

    /// Submits the open editor for `id`. Validation failures shake the form
    /// and never reach the model.
    pub async fn submit_edit(&self, id: PointId) {
        let destinations = self.points_model.destinations();
        let candidate = {
            let mut state = self.lock();
            let Some(presenter) = state.presenters.get_mut(&id) else {
                return;
            };
            presenter.submit(&destinations)
        };
        let candidate = match candidate {
            Ok(candidate) => candidate,
            Err(err) => {
                debug!(point = id.0, error = %err, "edit rejected locally");
                let _ = self.ui.send(UiEvent::ItemAborted {
                    point_id: Some(id),
                });
                return;
            }
        };
        let _ = self.ui.send(UiEvent::ItemSaving { point_id: Some(id) });
        self.handle_view_action(UserAction::UpdatePoint, UpdateType::Minor, candidate)
            .await;
    }

    /// Delete from the open editor; shows the deleting state first.
    pub async fn delete_point(&self, id: PointId) {
        let payload = {
            let mut state = self.lock();
            let Some(presenter) = state.presenters.get_mut(&id) else {
                return;
            };
            presenter.set_deleting();
            presenter.point().clone()
        };
        let _ = self.ui.send(UiEvent::ItemDeleting { point_id: id });
        self.handle_view_action(UserAction::DeletePoint, UpdateType::Minor, payload)
            .await;
    }

    /// Opens the creation form. Refuses while one is already open. Resets
    /// sort and filter first, since a fresh point could be filtered out of
    /// view otherwise; the create trigger stays disabled until the form
    /// closes either way.
    pub fn create_point(&self) -> bool {
        {
            let mut state = self.lock();
            if state.new_point.is_some() {
                debug!("creation form already open, refusing a second one");
                return false;
            }
            state.sort_type = SortType::Day;
            state.create_enabled = false;
        }
        let _ = self.ui.send(UiEvent::CreateTriggerEnabled { enabled: false });

        // Notifies back into this presenter synchronously with Major.
        self.filter_model
            .set_filter(UpdateType::Major, FilterType::Everything);

        let destinations = self.points_model.destinations();
        let offer_groups = self.points_model.offer_groups();
        let mut closed = Vec::new();
        {
            let mut state = self.lock();
            for (id, presenter) in state.presenters.iter_mut() {
                if presenter.reset_view(&destinations) {
                    closed.push(Some(*id));
                }
            }
            state.new_point = Some(NewPointPresenter::new(
                &destinations,
                &offer_groups,
                Utc::now(),
            ));
        }
        for point_id in closed {
            let _ = self.ui.send(UiEvent::EditorClosed { point_id });
        }
        let _ = self.ui.send(UiEvent::EditorOpened { point_id: None });
        true
    }

    /// Cancels the creation form (delete/rollup/escape on the new form).
    pub fn cancel_create(&self) {
        let closed = {
            let mut state = self.lock();
            if state.new_point.take().is_some() {
                state.create_enabled = true;
                true
            } else {
                false
            }
        };
        if closed {
            let _ = self.ui.send(UiEvent::EditorClosed { point_id: None });
            let _ = self.ui.send(UiEvent::CreateTriggerEnabled { enabled: true });
            self.render();
        }
    }

    /// Submits the creation form.
    pub async fn submit_new(&self) {
        let destinations = self.points_model.destinations();
        let candidate = {
            let mut state = self.lock();
            let Some(presenter) = state.new_point.as_mut() else {
                return;
            };
            presenter.submit(&destinations)
        };
        let candidate = match candidate {
            Ok(candidate) => candidate,
            Err(err) => {
                debug!(error = %err, "new point rejected locally");
                let _ = self.ui.send(UiEvent::ItemAborted { point_id: None });
                return;
            }
        };
        let _ = self.ui.send(UiEvent::ItemSaving { point_id: None });
        self.handle_view_action(UserAction::AddPoint, UpdateType::Minor, candidate)
            .await;
    }

    /// Routes a user action to the model inside the mutation gate. Failures
    /// never escape: the originating item (or the creation form) is put into
    /// an aborting visual state with its entered values kept for retry.
    pub async fn handle_view_action(
        &self,
        action: UserAction,
        update_type: UpdateType,
        payload: Point,
    ) {
        self.gate.block();
        let point_id = payload.id;
        let outcome = match action {
            UserAction::UpdatePoint => self
                .points_model
                .update_point(update_type, &payload)
                .await
                .map(|_| ()),
            UserAction::AddPoint => self
                .points_model
                .add_point(update_type, &payload)
                .await
                .map(|_| ()),
            UserAction::DeletePoint => match point_id {
                Some(id) => self.points_model.delete_point(update_type, id).await,
                None => Err(ModelError::MissingId),
            },
        };
        if let Err(err) = outcome {
            warn!(?action, error = %err, "mutation failed, local state kept");
            self.abort_action(action, point_id);
        }
        self.gate.unblock().await;
    }

    fn abort_action(&self, action: UserAction, point_id: Option<PointId>) {
        let aborted = {
            let mut state = self.lock();
            match action {
                UserAction::AddPoint => match state.new_point.as_mut() {
                    Some(presenter) => {
                        presenter.set_aborting();
                        Some(None)
                    }
                    None => None,
                },
                UserAction::UpdatePoint | UserAction::DeletePoint => point_id
                    .and_then(|id| state.presenters.get_mut(&id))
                    .map(|presenter| {
                        presenter.set_aborting();
                        point_id
                    }),
            }
        };
        if let Some(point_id) = aborted {
            let _ = self.ui.send(UiEvent::ItemAborted { point_id });
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
