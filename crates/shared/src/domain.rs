use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);
    };
}

id_newtype!(PointId);
id_newtype!(DestinationId);
id_newtype!(OfferId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PointType {
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    #[default]
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl PointType {
    pub const ALL: [PointType; 9] = [
        PointType::Taxi,
        PointType::Bus,
        PointType::Train,
        PointType::Ship,
        PointType::Drive,
        PointType::Flight,
        PointType::CheckIn,
        PointType::Sightseeing,
        PointType::Restaurant,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl FilterType {
    pub const ALL: [FilterType; 4] = [
        FilterType::Everything,
        FilterType::Future,
        FilterType::Present,
        FilterType::Past,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortType {
    #[default]
    Day,
    Time,
    Price,
}

impl SortType {
    pub const ALL: [SortType; 3] = [SortType::Day, SortType::Time, SortType::Price];
}

/// Tags every model notification so subscribers can pick the cheapest
/// re-render that still covers the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateType {
    /// One item changed in place (e.g. favorite flag).
    Patch,
    /// A confirmed edit/add/delete; the list re-renders, sort kept.
    Minor,
    /// The visible set changed shape; the list re-renders, sort reset.
    Major,
    /// Initial load finished (successfully or not).
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    UpdatePoint,
    AddPoint,
    DeletePoint,
}

/// A single travel/activity event. `id` stays `None` until the server
/// assigns one; `destination` is `None` only transiently while a form is
/// being filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: Option<PointId>,
    pub base_price: u32,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub destination: Option<DestinationId>,
    pub is_favorite: bool,
    pub offer_ids: Vec<OfferId>,
    pub point_type: PointType,
}

impl Point {
    pub fn duration(&self) -> Duration {
        self.date_to - self.date_from
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    pub description: String,
    pub pictures: Vec<Picture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferGroup {
    pub point_type: PointType,
    pub offers: Vec<Offer>,
}

impl OfferGroup {
    pub fn contains(&self, offer_id: OfferId) -> bool {
        self.offers.iter().any(|offer| offer.id == offer_id)
    }
}
