//! Headless composition root: constructs the gateway, models, and
//! presenters once, wires them explicitly, runs the initial load, and
//! prints the resulting UI event stream.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{
    ui_channel, BoardPresenter, FilterModel, FilterPresenter, GateLimits, HttpPointsGateway,
    MutationGate, PointsModel, TripInfoPresenter, UiEvent,
};

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the remote collection endpoint.
    #[arg(long)]
    server_url: String,
    /// Authorization header value, e.g. "Basic er883jdzbdw".
    #[arg(long)]
    authorization: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let gateway = Arc::new(HttpPointsGateway::new(args.server_url, args.authorization));
    let points_model = PointsModel::new(gateway);
    let filter_model = FilterModel::new();
    let (ui, mut ui_events) = ui_channel();

    let board = BoardPresenter::new(
        Arc::clone(&points_model),
        Arc::clone(&filter_model),
        MutationGate::new(GateLimits::default()),
        ui.clone(),
    );
    let _filters = FilterPresenter::new(
        Arc::clone(&points_model),
        Arc::clone(&filter_model),
        ui.clone(),
    );
    let _trip_info = TripInfoPresenter::new(Arc::clone(&points_model), ui);

    board.init();
    if let Err(err) = points_model.init().await {
        tracing::warn!(error = %err, "initial load failed");
    }

    while let Ok(event) = ui_events.try_recv() {
        print_event(event);
    }

    Ok(())
}

fn print_event(event: UiEvent) {
    match event {
        UiEvent::LoadingShown => println!("[board] loading..."),
        UiEvent::EmptyShown { message } => println!("[board] {message}"),
        UiEvent::BoardRendered { sort_type, items } => {
            println!("[board] {} point(s), sorted by {sort_type:?}", items.len());
            for item in items {
                println!(
                    "  {:>6} | {:<12} | {} -> {} | {} EUR{}",
                    item.point.id.map(|id| id.0).unwrap_or_default(),
                    item.destination_name,
                    item.point.date_from.format("%Y-%m-%d %H:%M"),
                    item.point.date_to.format("%Y-%m-%d %H:%M"),
                    item.point.base_price,
                    if item.point.is_favorite { " *" } else { "" },
                );
            }
        }
        UiEvent::TripInfoRendered { info } => {
            println!(
                "[trip] {} | {} | total {} EUR",
                info.title, info.dates, info.total_cost
            );
        }
        UiEvent::FiltersRendered { options, active } => {
            let summary: Vec<String> = options
                .iter()
                .map(|option| format!("{:?}({})", option.filter, option.count))
                .collect();
            println!("[filters] active {active:?}: {}", summary.join(" "));
        }
        other => tracing::debug!(?other, "ui event"),
    }
}
