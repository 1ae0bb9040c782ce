//! Presenter for the creation form.

use chrono::{DateTime, Utc};

use shared::domain::{Destination, OfferGroup, Point};
use shared::error::ValidationError;

use crate::presenter::view_state::{EditForm, PointDraft};

pub struct NewPointPresenter {
    form: EditForm,
}

impl NewPointPresenter {
    pub fn new(
        destinations: &[Destination],
        offer_groups: &[OfferGroup],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            form: EditForm::new(PointDraft::blank(destinations, offer_groups, now)),
        }
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditForm {
        &mut self.form
    }

    /// Validates the draft into an `AddPoint` candidate (id stays unset; the
    /// server assigns one). A failing draft shakes and keeps its values.
    pub fn submit(&mut self, destinations: &[Destination]) -> Result<Point, ValidationError> {
        match self.form.draft.validate(destinations) {
            Ok(mut candidate) => {
                candidate.id = None;
                self.form.set_saving();
                Ok(candidate)
            }
            Err(err) => {
                self.form.shake();
                Err(err)
            }
        }
    }

    pub fn set_saving(&mut self) {
        self.form.set_saving();
    }

    pub fn set_aborting(&mut self) {
        self.form.set_aborting();
    }
}
