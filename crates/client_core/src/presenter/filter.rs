//! Presenter for the filter control: per-filter counts plus the active
//! selection.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use shared::domain::{FilterType, UpdateType};

use crate::derive::filter_counts;
use crate::model::filter::FilterModel;
use crate::model::points::PointsModel;
use crate::observable::ObserverId;
use crate::presenter::events::{UiEvent, UiSender};
use crate::presenter::view_state::FilterOption;

pub struct FilterPresenter {
    points_model: Arc<PointsModel>,
    filter_model: Arc<FilterModel>,
    ui: UiSender,
    observers: Mutex<Option<(ObserverId, ObserverId)>>,
}

impl FilterPresenter {
    pub fn new(
        points_model: Arc<PointsModel>,
        filter_model: Arc<FilterModel>,
        ui: UiSender,
    ) -> Arc<Self> {
        let presenter = Arc::new(Self {
            points_model: Arc::clone(&points_model),
            filter_model: Arc::clone(&filter_model),
            ui,
            observers: Mutex::new(None),
        });

        let weak = Arc::downgrade(&presenter);
        let points_observer = points_model.add_observer(move |_| {
            if let Some(presenter) = weak.upgrade() {
                presenter.init();
            }
        });
        let weak = Arc::downgrade(&presenter);
        let filter_observer = filter_model.add_observer(move |_| {
            if let Some(presenter) = weak.upgrade() {
                presenter.init();
            }
        });
        *presenter
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((points_observer, filter_observer));

        presenter
    }

    /// Re-derives the control from the current snapshots and publishes it.
    pub fn init(&self) {
        let options: Vec<FilterOption> = filter_counts(&self.points_model.points(), Utc::now())
            .into_iter()
            .map(|(filter, count)| FilterOption { filter, count })
            .collect();
        let _ = self.ui.send(UiEvent::FiltersRendered {
            options,
            active: self.filter_model.filter(),
        });
    }

    /// Toolbar selection. Re-selecting the active filter is a no-op;
    /// anything else is a visible-set change, so it goes out as `Major`.
    pub fn set_filter(&self, filter: FilterType) {
        if self.filter_model.filter() == filter {
            return;
        }
        self.filter_model.set_filter(UpdateType::Major, filter);
    }

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
}
