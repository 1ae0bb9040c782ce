//! Canonical point collection, backed by the remote gateway.
//!
//! Every mutation is gated on gateway success: the local store changes only
//! after the server confirms, and observers are notified only after the
//! store changed. Failures leave local state untouched and propagate to the
//! caller.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;
use tracing::{debug, info, warn};

use shared::domain::{
    Destination, DestinationId, Offer, OfferGroup, Point, PointId, PointType, UpdateType,
};
use shared::protocol::{WireDestination, WireOfferGroup, WirePoint};

use crate::gateway::PointsGateway;
use crate::observable::{Observable, ObserverId};

#[derive(Debug, Clone)]
pub enum PointsPayload {
    /// Initial load finished; `error` is set when it failed and the store
    /// was emptied.
    Loaded { error: Option<String> },
    /// The affected point after a confirmed update or add.
    Saved(Point),
    /// The id removed by a confirmed delete.
    Removed(PointId),
}

#[derive(Debug, Clone)]
pub struct PointsEvent {
    pub update_type: UpdateType,
    pub payload: PointsPayload,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("point mutation is missing an id")]
    MissingId,
    #[error("point {0:?} is not in the store")]
    NotFound(PointId),
    #[error("failed to load the point collection: {0}")]
    Load(anyhow::Error),
    #[error("gateway request failed: {0}")]
    Gateway(anyhow::Error),
}

#[derive(Default)]
struct Store {
    points: Vec<Point>,
    destinations: Vec<Destination>,
    offer_groups: Vec<OfferGroup>,
}

pub struct PointsModel {
    gateway: Arc<dyn PointsGateway>,
    store: RwLock<Store>,
    observable: Observable<PointsEvent>,
}

impl PointsModel {
    pub fn new(gateway: Arc<dyn PointsGateway>) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            store: RwLock::new(Store::default()),
            observable: Observable::new(),
        })
    }

    pub fn add_observer(
        &self,
        callback: impl Fn(&PointsEvent) + Send + Sync + 'static,
    ) -> ObserverId {
        self.observable.add_observer(callback)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observable.remove_observer(id)
    }

    /// Fetches all three collections, replaces the local store, and notifies
    /// with `Init`. On failure the store is emptied, observers still get the
    /// `Init` notification (carrying the error), and the error is returned.
    pub async fn init(&self) -> Result<(), ModelError> {
        match self.load_remote().await {
            Ok((points, destinations, offer_groups)) => {
                info!(
                    points = points.len(),
                    destinations = destinations.len(),
                    offer_groups = offer_groups.len(),
                    "loaded remote collections"
                );
                {
                    let mut store = self.write();
                    store.points = points;
                    store.destinations = destinations;
                    store.offer_groups = offer_groups;
                }
                self.observable.notify(&PointsEvent {
                    update_type: UpdateType::Init,
                    payload: PointsPayload::Loaded { error: None },
                });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "initial load failed, store emptied");
                *self.write() = Store::default();
                self.observable.notify(&PointsEvent {
                    update_type: UpdateType::Init,
                    payload: PointsPayload::Loaded {
                        error: Some(err.to_string()),
                    },
                });
                Err(ModelError::Load(err))
            }
        }
    }

    async fn load_remote(
        &self,
    ) -> anyhow::Result<(Vec<Point>, Vec<Destination>, Vec<OfferGroup>)> {
        let (points, destinations, offers) = futures::future::try_join3(
            self.gateway.points(),
            self.gateway.destinations(),
            self.gateway.offer_groups(),
        )
        .await?;
        Ok((
            points.iter().map(WirePoint::to_canonical).collect(),
            destinations
                .iter()
                .map(WireDestination::to_canonical)
                .collect(),
            offers.iter().map(WireOfferGroup::to_canonical).collect(),
        ))
    }

    pub fn points(&self) -> Vec<Point> {
        self.read().points.clone()
    }

    pub fn destinations(&self) -> Vec<Destination> {
        self.read().destinations.clone()
    }

    pub fn offer_groups(&self) -> Vec<OfferGroup> {
        self.read().offer_groups.clone()
    }

    pub fn destination_by_id(&self, id: DestinationId) -> Option<Destination> {
        self.read()
            .destinations
            .iter()
            .find(|destination| destination.id == id)
            .cloned()
    }

    pub fn destination_by_name(&self, name: &str) -> Option<Destination> {
        let needle = name.trim().to_lowercase();
        self.read()
            .destinations
            .iter()
            .find(|destination| destination.name.to_lowercase() == needle)
            .cloned()
    }

    pub fn offers_for_type(&self, point_type: PointType) -> Vec<Offer> {
        self.read()
            .offer_groups
            .iter()
            .find(|group| group.point_type == point_type)
            .map(|group| group.offers.clone())
            .unwrap_or_default()
    }

    /// Replaces a stored point with the server-confirmed version. The
    /// gateway is not contacted when the id is unknown.
    pub async fn update_point(
        &self,
        update_type: UpdateType,
        point: &Point,
    ) -> Result<Point, ModelError> {
        let id = point.id.ok_or(ModelError::MissingId)?;
        if !self.contains(id) {
            return Err(ModelError::NotFound(id));
        }

        let confirmed = self
            .gateway
            .update_point(id, point.to_wire())
            .await
            .map_err(ModelError::Gateway)?
            .to_canonical();

        {
            let mut store = self.write();
            match store
                .points
                .iter()
                .position(|stored| stored.id == Some(id))
            {
                Some(index) => store.points[index] = confirmed.clone(),
                None => return Err(ModelError::NotFound(id)),
            }
        }
        debug!(point = id.0, "point updated");
        self.observable.notify(&PointsEvent {
            update_type,
            payload: PointsPayload::Saved(confirmed.clone()),
        });
        Ok(confirmed)
    }

    /// Creates a point remotely and inserts the server's version (with its
    /// assigned id) at the front of the store.
    pub async fn add_point(
        &self,
        update_type: UpdateType,
        point: &Point,
    ) -> Result<Point, ModelError> {
        let mut wire = point.to_wire();
        wire.id = None; // the server assigns ids

        let created = self
            .gateway
            .create_point(wire)
            .await
            .map_err(ModelError::Gateway)?
            .to_canonical();

        self.write().points.insert(0, created.clone());
        debug!(point = ?created.id, "point created");
        self.observable.notify(&PointsEvent {
            update_type,
            payload: PointsPayload::Saved(created.clone()),
        });
        Ok(created)
    }

    pub async fn delete_point(
        &self,
        update_type: UpdateType,
        id: PointId,
    ) -> Result<(), ModelError> {
        if !self.contains(id) {
            return Err(ModelError::NotFound(id));
        }

        self.gateway
            .delete_point(id)
            .await
            .map_err(ModelError::Gateway)?;

        self.write().points.retain(|stored| stored.id != Some(id));
        debug!(point = id.0, "point deleted");
        self.observable.notify(&PointsEvent {
            update_type,
            payload: PointsPayload::Removed(id),
        });
        Ok(())
    }

    fn contains(&self, id: PointId) -> bool {
        self.read()
            .points
            .iter()
            .any(|stored| stored.id == Some(id))
    }

    // The store lock is only ever held for synchronous sections; it is
    // released before any notification or await point.
    fn read(&self) -> RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}
