//! Plain view-state structs the presenters hand to a host frontend. No
//! markup or widgets here; a frontend renders these however it likes.

use chrono::{DateTime, Duration, Utc};

use shared::domain::{
    Destination, FilterType, Offer, OfferGroup, OfferId, Point, PointId, PointType,
};
use shared::error::ValidationError;

/// Display card for one point: the point itself plus its resolved
/// destination name and selected add-ons.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCard {
    pub point: Point,
    pub destination_name: String,
    pub selected_offers: Vec<Offer>,
}

impl PointCard {
    pub fn compose(
        point: &Point,
        destinations: &[Destination],
        offer_groups: &[OfferGroup],
    ) -> Self {
        let destination_name = point
            .destination
            .and_then(|id| destinations.iter().find(|candidate| candidate.id == id))
            .map(|destination| destination.name.clone())
            .unwrap_or_default();
        let selected_offers = offer_groups
            .iter()
            .find(|group| group.point_type == point.point_type)
            .map(|group| {
                group
                    .offers
                    .iter()
                    .filter(|offer| point.offer_ids.contains(&offer.id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Self {
            point: point.clone(),
            destination_name,
            selected_offers,
        }
    }
}

/// The editable candidate behind an open form. The destination is held as
/// free text and resolved against the known set on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct PointDraft {
    pub id: Option<PointId>,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination_name: String,
    pub is_favorite: bool,
    pub offer_ids: Vec<OfferId>,
    pub point_type: PointType,
}

impl PointDraft {
    pub fn from_point(point: &Point, destinations: &[Destination]) -> Self {
        let destination_name = point
            .destination
            .and_then(|id| destinations.iter().find(|candidate| candidate.id == id))
            .map(|destination| destination.name.clone())
            .unwrap_or_default();
        Self {
            id: point.id,
            base_price: point.base_price,
            date_from: point.date_from,
            date_to: point.date_to,
            destination_name,
            is_favorite: point.is_favorite,
            offer_ids: point.offer_ids.clone(),
            point_type: point.point_type,
        }
    }

    /// Starting state for the creation form: an hour-long event starting
    /// now, priced at 100, at the first known destination.
    pub fn blank(
        destinations: &[Destination],
        offer_groups: &[OfferGroup],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            base_price: 100,
            date_from: now,
            date_to: now + Duration::hours(1),
            destination_name: destinations
                .first()
                .map(|destination| destination.name.clone())
                .unwrap_or_default(),
            is_favorite: false,
            offer_ids: Vec::new(),
            point_type: offer_groups
                .first()
                .map(|group| group.point_type)
                .unwrap_or_default(),
        }
    }

    /// Switching the type invalidates the selected add-ons.
    pub fn set_point_type(&mut self, point_type: PointType) {
        if self.point_type != point_type {
            self.point_type = point_type;
            self.offer_ids.clear();
        }
    }

    /// Toggles an add-on; ids outside the currently available set are
    /// ignored, keeping the selection a subset of the type's offers.
    pub fn toggle_offer(&mut self, offer_id: OfferId, available: &[Offer]) {
        if !available.iter().any(|offer| offer.id == offer_id) {
            return;
        }
        if let Some(index) = self.offer_ids.iter().position(|id| *id == offer_id) {
            self.offer_ids.remove(index);
        } else {
            self.offer_ids.push(offer_id);
        }
    }

    /// Local validation; a passing draft becomes a submittable candidate.
    pub fn validate(&self, destinations: &[Destination]) -> Result<Point, ValidationError> {
        let needle = self.destination_name.trim().to_lowercase();
        let destination = destinations
            .iter()
            .find(|candidate| candidate.name.to_lowercase() == needle)
            .ok_or(ValidationError::UnknownDestination)?;
        if self.base_price == 0 {
            return Err(ValidationError::NonPositivePrice);
        }
        if self.date_to <= self.date_from {
            return Err(ValidationError::InvertedDates);
        }
        Ok(Point {
            id: self.id,
            base_price: self.base_price,
            date_from: self.date_from,
            date_to: self.date_to,
            destination: Some(destination.id),
            is_favorite: self.is_favorite,
            offer_ids: self.offer_ids.clone(),
            point_type: self.point_type,
        })
    }
}

/// An open form plus its transient control state. `shake_count` bumps every
/// time the shake affordance should play.
#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub draft: PointDraft,
    pub is_saving: bool,
    pub is_deleting: bool,
    pub is_disabled: bool,
    pub shake_count: u32,
}

impl EditForm {
    pub fn new(draft: PointDraft) -> Self {
        Self {
            draft,
            is_saving: false,
            is_deleting: false,
            is_disabled: false,
            shake_count: 0,
        }
    }

    pub fn set_saving(&mut self) {
        self.is_saving = true;
        self.is_disabled = true;
    }

    pub fn set_deleting(&mut self) {
        self.is_deleting = true;
        self.is_disabled = true;
    }

    /// Returns to an interactive state and plays the shake affordance; the
    /// draft keeps whatever the user entered.
    pub fn set_aborting(&mut self) {
        self.is_saving = false;
        self.is_deleting = false;
        self.is_disabled = false;
        self.shake_count += 1;
    }

    pub fn shake(&mut self) {
        self.shake_count += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub filter: FilterType,
    pub count: usize,
}

/// Summary header over the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripInfo {
    pub title: String,
    pub dates: String,
    pub total_cost: u32,
}
