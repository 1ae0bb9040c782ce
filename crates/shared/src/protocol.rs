//! Wire payloads for the remote collection endpoint and the adapter between
//! the wire shape and the canonical in-memory shape.
//!
//! The remote side names and types fields loosely (optional price, string
//! timestamps, plain integers for ids). `to_canonical`/`to_wire` are total
//! and side-effect-free: missing optional fields collapse to defaults, and
//! `to_wire(to_canonical(x))` preserves every semantic field of `x`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Destination, DestinationId, Offer, OfferGroup, OfferId, Picture, Point, PointId, PointType,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WirePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub base_price: Option<i64>,
    #[serde(default)]
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub destination: Option<i64>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub offers: Vec<i64>,
    #[serde(rename = "type", default)]
    pub point_type: Option<PointType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePicture {
    pub src: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDestination {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pictures: Vec<WirePicture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOffer {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireOfferGroup {
    #[serde(rename = "type")]
    pub point_type: PointType,
    #[serde(default)]
    pub offers: Vec<WireOffer>,
}

fn clamp_price(price: Option<i64>) -> u32 {
    price
        .filter(|value| *value >= 0)
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0)
}

impl WirePoint {
    /// Normalizes a remote item to the canonical shape. Missing or invalid
    /// prices collapse to 0, a missing favorite flag to `false`, a missing
    /// type to [`PointType::Flight`], and missing timestamps to the epoch.
    pub fn to_canonical(&self) -> Point {
        Point {
            id: self.id.map(PointId),
            base_price: clamp_price(self.base_price),
            date_from: self.date_from.unwrap_or(DateTime::UNIX_EPOCH),
            date_to: self.date_to.unwrap_or(DateTime::UNIX_EPOCH),
            destination: self.destination.map(DestinationId),
            is_favorite: self.is_favorite.unwrap_or(false),
            offer_ids: self.offers.iter().copied().map(OfferId).collect(),
            point_type: self.point_type.unwrap_or_default(),
        }
    }
}

impl Point {
    /// Translates the canonical shape back to the wire convention with every
    /// optional field fully specified.
    pub fn to_wire(&self) -> WirePoint {
        WirePoint {
            id: self.id.map(|PointId(id)| id),
            base_price: Some(i64::from(self.base_price)),
            date_from: Some(self.date_from),
            date_to: Some(self.date_to),
            destination: self.destination.map(|DestinationId(id)| id),
            is_favorite: Some(self.is_favorite),
            offers: self.offer_ids.iter().map(|OfferId(id)| *id).collect(),
            point_type: Some(self.point_type),
        }
    }
}

impl WireDestination {
    pub fn to_canonical(&self) -> Destination {
        Destination {
            id: DestinationId(self.id),
            name: self.name.clone(),
            description: self.description.clone(),
            pictures: self
                .pictures
                .iter()
                .map(|picture| Picture {
                    src: picture.src.clone(),
                    description: picture.description.clone(),
                })
                .collect(),
        }
    }
}

impl WireOfferGroup {
    pub fn to_canonical(&self) -> OfferGroup {
        OfferGroup {
            point_type: self.point_type,
            offers: self
                .offers
                .iter()
                .map(|offer| Offer {
                    id: OfferId(offer.id),
                    title: offer.title.clone(),
                    price: clamp_price(offer.price),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn wire_fixture() -> WirePoint {
        WirePoint {
            id: Some(7),
            base_price: Some(1100),
            date_from: Some(Utc.with_ymd_and_hms(2024, 3, 18, 10, 30, 0).unwrap()),
            date_to: Some(Utc.with_ymd_and_hms(2024, 3, 18, 16, 5, 0).unwrap()),
            destination: Some(3),
            is_favorite: Some(true),
            offers: vec![1, 4],
            point_type: Some(PointType::CheckIn),
        }
    }

    #[test]
    fn wire_round_trip_preserves_every_semantic_field() {
        let wire = wire_fixture();
        let back = wire.to_canonical().to_wire();
        assert_eq!(back, wire);
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let point = WirePoint {
            id: None,
            ..WirePoint::default()
        }
        .to_canonical();

        assert_eq!(point.id, None);
        assert_eq!(point.base_price, 0);
        assert!(!point.is_favorite);
        assert!(point.offer_ids.is_empty());
        assert_eq!(point.point_type, PointType::Flight);
        assert_eq!(point.date_from, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn negative_price_collapses_to_zero() {
        let point = WirePoint {
            base_price: Some(-250),
            ..WirePoint::default()
        }
        .to_canonical();
        assert_eq!(point.base_price, 0);
    }

    #[test]
    fn wire_point_parses_remote_field_names() {
        let raw = r#"{
            "id": 12,
            "base_price": 600,
            "date_from": "2024-07-01T09:00:00Z",
            "date_to": "2024-07-01T11:00:00Z",
            "destination": 2,
            "is_favorite": false,
            "offers": [5],
            "type": "check-in"
        }"#;
        let wire: WirePoint = serde_json::from_str(raw).expect("wire point");
        assert_eq!(wire.point_type, Some(PointType::CheckIn));
        assert_eq!(wire.to_canonical().base_price, 600);
    }

    #[test]
    fn offer_group_normalizes_missing_prices() {
        let group = WireOfferGroup {
            point_type: PointType::Taxi,
            offers: vec![WireOffer {
                id: 9,
                title: "Order Uber".into(),
                price: None,
            }],
        }
        .to_canonical();
        assert_eq!(group.offers[0].price, 0);
    }
}
