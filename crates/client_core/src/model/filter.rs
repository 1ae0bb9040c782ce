//! Holder for the active time-relation filter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::domain::{FilterType, UpdateType};

use crate::observable::{Observable, ObserverId};

#[derive(Debug, Clone)]
pub struct FilterEvent {
    pub update_type: UpdateType,
    pub filter: FilterType,
}

pub struct FilterModel {
    current: Mutex<FilterType>,
    observable: Observable<FilterEvent>,
}

impl FilterModel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(FilterType::Everything),
            observable: Observable::new(),
        })
    }

    pub fn filter(&self) -> FilterType {
        *self.lock()
    }

    pub fn set_filter(&self, update_type: UpdateType, filter: FilterType) {
        *self.lock() = filter;
        self.observable.notify(&FilterEvent {
            update_type,
            filter,
        });
    }

    pub fn add_observer(
        &self,
        callback: impl Fn(&FilterEvent) + Send + Sync + 'static,
    ) -> ObserverId {
        self.observable.add_observer(callback)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observable.remove_observer(id)
    }

    fn lock(&self) -> MutexGuard<'_, FilterType> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
