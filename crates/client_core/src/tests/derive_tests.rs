use super::*;
use shared::domain::{DestinationId, PointId, PointType};

fn at(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("timestamp")
}

fn point(id: i64, from: &str, to: &str, price: u32) -> Point {
    Point {
        id: Some(PointId(id)),
        base_price: price,
        date_from: at(from),
        date_to: at(to),
        destination: None,
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
fn everything_returns_exactly_the_input() {
    let points = vec![
        point(1, "2024-01-01T08:00:00Z", "2024-01-01T10:00:00Z", 50),
        point(2, "2024-06-01T08:00:00Z", "2024-06-02T10:00:00Z", 70),
    ];
    let now = at("2024-03-01T00:00:00Z");
    assert_eq!(filter_points(&points, FilterType::Everything, now), points);
}

#[test]
fn future_keeps_points_starting_strictly_after_now() {
    let points = vec![point(1, "2024-01-02T00:00:00Z", "2024-01-03T00:00:00Z", 10)];
    let now = at("2024-01-01T00:00:00Z");

    let filtered = filter_points(&points, FilterType::Future, now);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, Some(PointId(1)));

    // Starting exactly at "now" is not strictly after it.
    let now = at("2024-01-02T00:00:00Z");
    assert!(filter_points(&points, FilterType::Future, now).is_empty());
}

#[test]
fn present_covers_the_open_window_and_the_same_day_edge() {
    let running = point(1, "2024-05-09T08:00:00Z", "2024-05-11T08:00:00Z", 10);
    let later_today = point(2, "2024-05-10T20:00:00Z", "2024-05-12T08:00:00Z", 10);
    let long_gone = point(3, "2024-04-01T08:00:00Z", "2024-04-02T08:00:00Z", 10);
    let now = at("2024-05-10T12:00:00Z");

    let filtered = filter_points(
        &[running, later_today, long_gone],
        FilterType::Present,
        now,
    );
    let ids: Vec<_> = filtered.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![Some(PointId(1)), Some(PointId(2))]);
}

#[test]
fn past_keeps_points_that_ended_strictly_before_now() {
    let points = vec![
        point(1, "2024-01-01T08:00:00Z", "2024-01-02T08:00:00Z", 10),
        point(2, "2024-01-01T08:00:00Z", "2024-02-01T08:00:00Z", 10),
    ];
    let now = at("2024-01-15T00:00:00Z");
    let filtered = filter_points(&points, FilterType::Past, now);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, Some(PointId(1)));
}

#[test]
fn every_filter_returns_a_subset() {
    let points = vec![
        point(1, "2024-01-01T08:00:00Z", "2024-01-02T08:00:00Z", 10),
        point(2, "2024-05-10T08:00:00Z", "2024-05-12T08:00:00Z", 20),
        point(3, "2024-09-01T08:00:00Z", "2024-09-02T08:00:00Z", 30),
    ];
    let now = at("2024-05-11T00:00:00Z");
    for filter_type in FilterType::ALL {
        let filtered = filter_points(&points, filter_type, now);
        assert!(filtered.iter().all(|candidate| points.contains(candidate)));
    }
}

#[test]
fn day_sort_is_ascending_with_id_ties() {
    let points = vec![
        point(3, "2024-01-05T08:00:00Z", "2024-01-06T08:00:00Z", 10),
        point(2, "2024-01-01T08:00:00Z", "2024-01-02T08:00:00Z", 10),
        point(1, "2024-01-01T08:00:00Z", "2024-01-03T08:00:00Z", 10),
    ];
    let sorted = sort_points(&points, SortType::Day, &[]);
    let ids: Vec<_> = sorted.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![Some(PointId(1)), Some(PointId(2)), Some(PointId(3))]);
    assert!(sorted.windows(2).all(|pair| pair[0].date_from <= pair[1].date_from));
}

#[test]
fn time_sort_is_descending_duration_with_start_ties() {
    let points = vec![
        point(1, "2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", 10),
        point(2, "2024-01-02T08:00:00Z", "2024-01-05T08:00:00Z", 10),
        point(3, "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", 10),
    ];
    let sorted = sort_points(&points, SortType::Time, &[]);
    let ids: Vec<_> = sorted.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![Some(PointId(2)), Some(PointId(3)), Some(PointId(1))]);
}

#[test]
fn price_sort_is_descending() {
    let points = vec![
        point(1, "2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", 10),
        point(2, "2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", 30),
        point(3, "2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", 20),
    ];
    let sorted = sort_points(&points, SortType::Price, &[]);
    let prices: Vec<_> = sorted.iter().map(|p| p.base_price).collect();
    assert_eq!(prices, vec![30, 20, 10]);
}

#[test]
fn price_ties_break_on_destination_name() {
    let destinations = vec![destination(1, "Geneva"), destination(2, "Amsterdam")];
    let mut a = point(1, "2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", 50);
    a.destination = Some(DestinationId(1));
    let mut b = point(2, "2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z", 50);
    b.destination = Some(DestinationId(2));

    let sorted = sort_points(&[a, b], SortType::Price, &destinations);
    let ids: Vec<_> = sorted.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![Some(PointId(2)), Some(PointId(1))]);
}

#[test]
fn sorting_is_idempotent_on_its_own_output() {
    let points = vec![
        point(2, "2024-01-03T08:00:00Z", "2024-01-04T08:00:00Z", 30),
        point(1, "2024-01-01T08:00:00Z", "2024-01-05T08:00:00Z", 10),
        point(3, "2024-01-02T08:00:00Z", "2024-01-02T09:00:00Z", 20),
    ];
    for sort_type in SortType::ALL {
        let once = sort_points(&points, sort_type, &[]);
        let twice = sort_points(&once, sort_type, &[]);
        assert_eq!(once, twice);
    }
}

#[test]
fn filter_counts_cover_every_filter() {
    let points = vec![
        point(1, "2024-01-01T08:00:00Z", "2024-01-02T08:00:00Z", 10),
        point(2, "2024-09-01T08:00:00Z", "2024-09-02T08:00:00Z", 20),
    ];
    let now = at("2024-05-01T00:00:00Z");
    let counts = filter_counts(&points, now);
    assert_eq!(counts.len(), FilterType::ALL.len());
    assert_eq!(counts[0], (FilterType::Everything, 2));
    assert!(counts.contains(&(FilterType::Future, 1)));
    assert!(counts.contains(&(FilterType::Past, 1)));
}
