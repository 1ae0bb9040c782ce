use super::*;
use shared::domain::{DestinationId, Offer, OfferId, PointId, PointType};

fn point(id: i64, from: &str, to: &str, price: u32, destination: i64) -> Point {
    Point {
        id: Some(PointId(id)),
        base_price: price,
        date_from: from.parse().expect("timestamp"),
        date_to: to.parse().expect("timestamp"),
        destination: Some(DestinationId(destination)),
        is_favorite: false,
        offer_ids: Vec::new(),
        point_type: PointType::Flight,
    }
}

fn destination(id: i64, name: &str) -> Destination {
    Destination {
        id: DestinationId(id),
        name: name.to_string(),
        description: String::new(),
        pictures: Vec::new(),
    }
}

#[test]
fn empty_collection_yields_an_empty_summary() {
    let info = compose_trip_info(&[], &[], &[]);
    assert_eq!(info.title, "");
    assert_eq!(info.total_cost, 0);
}

#[test]
fn title_joins_unique_destinations_in_day_order() {
    let destinations = vec![
        destination(1, "Amsterdam"),
        destination(2, "Geneva"),
        destination(3, "Chamonix"),
    ];
    let points = vec![
        point(2, "2024-03-19T10:00:00Z", "2024-03-19T12:00:00Z", 20, 2),
        point(1, "2024-03-18T10:00:00Z", "2024-03-18T12:00:00Z", 10, 1),
        point(3, "2024-03-20T10:00:00Z", "2024-03-20T12:00:00Z", 30, 3),
    ];

    let info = compose_trip_info(&points, &destinations, &[]);
    assert_eq!(info.title, "Amsterdam — Geneva — Chamonix");
    assert_eq!(info.dates, "18 MAR - 20 MAR");
}

#[test]
fn long_routes_abbreviate_to_endpoints() {
    let destinations = vec![
        destination(1, "Amsterdam"),
        destination(2, "Geneva"),
        destination(3, "Chamonix"),
        destination(4, "Oslo"),
    ];
    let points = vec![
        point(1, "2024-03-18T10:00:00Z", "2024-03-18T12:00:00Z", 10, 1),
        point(2, "2024-03-19T10:00:00Z", "2024-03-19T12:00:00Z", 10, 2),
        point(3, "2024-03-20T10:00:00Z", "2024-03-20T12:00:00Z", 10, 3),
        point(4, "2024-03-21T10:00:00Z", "2024-03-21T12:00:00Z", 10, 4),
    ];

    let info = compose_trip_info(&points, &destinations, &[]);
    assert_eq!(info.title, "Amsterdam — ... — Oslo");
}

#[test]
fn total_cost_includes_selected_offers_only() {
    let destinations = vec![destination(1, "Amsterdam")];
    let offer_groups = vec![OfferGroup {
        point_type: PointType::Flight,
        offers: vec![
            Offer {
                id: OfferId(1),
                title: "Extra luggage".into(),
                price: 30,
            },
            Offer {
                id: OfferId(2),
                title: "Upgrade".into(),
                price: 100,
            },
        ],
    }];
    let mut with_offer = point(1, "2024-03-18T10:00:00Z", "2024-03-18T12:00:00Z", 200, 1);
    with_offer.offer_ids = vec![OfferId(1)];
    let plain = point(2, "2024-03-19T10:00:00Z", "2024-03-19T12:00:00Z", 50, 1);

    let info = compose_trip_info(&[with_offer, plain], &destinations, &offer_groups);
    assert_eq!(info.total_cost, 200 + 30 + 50);
}
