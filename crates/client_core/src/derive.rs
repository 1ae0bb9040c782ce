//! Pure filter/sort derivation over point snapshots. Nothing here mutates
//! its input; both passes are stable and idempotent on their own output.

use chrono::{DateTime, Utc};

use shared::domain::{Destination, FilterType, Point, SortType};

pub fn matches_filter(point: &Point, filter_type: FilterType, now: DateTime<Utc>) -> bool {
    match filter_type {
        FilterType::Everything => true,
        FilterType::Future => point.date_from > now,
        // A point starting today counts as present even when its window has
        // not opened yet.
        FilterType::Present => {
            (point.date_from <= now && now <= point.date_to)
                || point.date_from.date_naive() == now.date_naive()
        }
        FilterType::Past => point.date_to < now,
    }
}

pub fn filter_points(points: &[Point], filter_type: FilterType, now: DateTime<Utc>) -> Vec<Point> {
    points
        .iter()
        .filter(|point| matches_filter(point, filter_type, now))
        .cloned()
        .collect()
}

pub fn sort_points(points: &[Point], sort_type: SortType, destinations: &[Destination]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    match sort_type {
        SortType::Day => sorted.sort_by(|a, b| {
            a.date_from
                .cmp(&b.date_from)
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortType::Time => sorted.sort_by(|a, b| {
            b.duration()
                .cmp(&a.duration())
                .then_with(|| a.date_from.cmp(&b.date_from))
        }),
        SortType::Price => sorted.sort_by(|a, b| {
            b.base_price.cmp(&a.base_price).then_with(|| {
                destination_name(a, destinations).cmp(destination_name(b, destinations))
            })
        }),
    }
    sorted
}

pub fn filter_counts(points: &[Point], now: DateTime<Utc>) -> Vec<(FilterType, usize)> {
    FilterType::ALL
        .into_iter()
        .map(|filter_type| {
            let count = points
                .iter()
                .filter(|point| matches_filter(point, filter_type, now))
                .count();
            (filter_type, count)
        })
        .collect()
}

fn destination_name<'a>(point: &Point, destinations: &'a [Destination]) -> &'a str {
    point
        .destination
        .and_then(|id| destinations.iter().find(|candidate| candidate.id == id))
        .map(|destination| destination.name.as_str())
        .unwrap_or("")
}

#[cfg(test)]
#[path = "tests/derive_tests.rs"]
mod tests;
