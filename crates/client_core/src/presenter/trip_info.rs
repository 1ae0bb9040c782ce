//! Summary header over the whole collection: route title, date range, and
//! total cost including selected add-ons.

use std::sync::{Arc, Mutex, PoisonError};

use shared::domain::{Destination, OfferGroup, Point, SortType};

use crate::derive::sort_points;
use crate::model::points::PointsModel;
use crate::observable::ObserverId;
use crate::presenter::events::{UiEvent, UiSender};
use crate::presenter::view_state::TripInfo;

const MAX_SHOWN_DESTINATIONS: usize = 3;

pub struct TripInfoPresenter {
    points_model: Arc<PointsModel>,
    ui: UiSender,
    observer: Mutex<Option<ObserverId>>,
}

impl TripInfoPresenter {
    pub fn new(points_model: Arc<PointsModel>, ui: UiSender) -> Arc<Self> {
        let presenter = Arc::new(Self {
            points_model: Arc::clone(&points_model),
            ui,
            observer: Mutex::new(None),
        });

        let weak = Arc::downgrade(&presenter);
        let observer = points_model.add_observer(move |_| {
            if let Some(presenter) = weak.upgrade() {
                presenter.init();
            }
        });
        *presenter
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(observer);

        presenter
    }

    pub fn init(&self) {
        let info = compose_trip_info(
            &self.points_model.points(),
            &self.points_model.destinations(),
            &self.points_model.offer_groups(),
        );
        let _ = self.ui.send(UiEvent::TripInfoRendered { info });
    }

    pub fn detach(&self) {
        if let Some(observer) = self
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            self.points_model.remove_observer(observer);
        }
    }
}

pub fn compose_trip_info(
    points: &[Point],
    destinations: &[Destination],
    offer_groups: &[OfferGroup],
) -> TripInfo {
    if points.is_empty() {
        return TripInfo {
            title: String::new(),
            dates: String::new(),
            total_cost: 0,
        };
    }

    let ordered = sort_points(points, SortType::Day, destinations);

    let mut names: Vec<String> = Vec::new();
    for point in &ordered {
        let name = point
            .destination
            .and_then(|id| destinations.iter().find(|candidate| candidate.id == id))
            .map(|destination| destination.name.clone())
            .unwrap_or_default();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    let title = if names.len() <= MAX_SHOWN_DESTINATIONS {
        names.join(" — ")
    } else {
        format!(
            "{} — ... — {}",
            names[0],
            names[names.len() - 1]
        )
    };

    let start = ordered[0].date_from;
    let end = ordered[ordered.len() - 1].date_to;
    let dates = format!(
        "{} - {}",
        start.format("%d %b").to_string().to_uppercase(),
        end.format("%d %b").to_string().to_uppercase()
    );

    let total_cost = points
        .iter()
        .map(|point| {
            let offers_cost: u32 = offer_groups
                .iter()
                .find(|group| group.point_type == point.point_type)
                .map(|group| {
                    group
                        .offers
                        .iter()
                        .filter(|offer| point.offer_ids.contains(&offer.id))
                        .map(|offer| offer.price)
                        .sum()
                })
                .unwrap_or(0);
            point.base_price + offers_cost
        })
        .sum();

    TripInfo {
        title,
        dates,
        total_cost,
    }
}

#[cfg(test)]
#[path = "tests/trip_info_tests.rs"]
mod tests;
