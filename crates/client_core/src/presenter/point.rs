//! Per-item presenter: a small state machine between the display card and
//! the inline edit form.

use shared::domain::{Destination, OfferGroup, Point};
use shared::error::ValidationError;

use crate::presenter::view_state::{EditForm, PointCard, PointDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Default,
    Editing,
}

pub struct PointPresenter {
    point: Point,
    mode: Mode,
    card: PointCard,
    form: EditForm,
}

impl PointPresenter {
    pub fn new(point: Point, destinations: &[Destination], offer_groups: &[OfferGroup]) -> Self {
        let card = PointCard::compose(&point, destinations, offer_groups);
        let form = EditForm::new(PointDraft::from_point(&point, destinations));
        Self {
            point,
            mode: Mode::Default,
            card,
            form,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn card(&self) -> &PointCard {
        &self.card
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditForm {
        &mut self.form
    }

    /// Rebuilds both representations from a fresh snapshot. An open form
    /// keeps its in-progress draft when the incoming point is a different
    /// item; otherwise the form resets to the confirmed values.
    pub fn init(
        &mut self,
        point: Point,
        destinations: &[Destination],
        offer_groups: &[OfferGroup],
    ) {
        self.card = PointCard::compose(&point, destinations, offer_groups);
        let keep_draft = self.mode == Mode::Editing && self.form.draft.id != point.id;
        if !keep_draft {
            self.form = EditForm::new(PointDraft::from_point(&point, destinations));
        }
        self.point = point;
    }

    pub fn open_editor(&mut self) {
        self.mode = Mode::Editing;
    }

    /// Editing → Default, dropping draft edits. Returns whether anything
    /// actually closed.
    pub fn reset_view(&mut self, destinations: &[Destination]) -> bool {
        if self.mode == Mode::Default {
            return false;
        }
        self.mode = Mode::Default;
        self.form = EditForm::new(PointDraft::from_point(&self.point, destinations));
        true
    }

    /// The update candidate for a favorite toggle; mode is untouched.
    pub fn favorite_toggled(&self) -> Point {
        let mut point = self.point.clone();
        point.is_favorite = !point.is_favorite;
        point
    }

    /// Validates the draft. A passing candidate flips the form into its
    /// saving state; a failing one shakes and never reaches the model.
    pub fn submit(&mut self, destinations: &[Destination]) -> Result<Point, ValidationError> {
        match self.form.draft.validate(destinations) {
            Ok(candidate) => {
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

    pub fn set_deleting(&mut self) {
        self.form.set_deleting();
    }

    pub fn set_aborting(&mut self) {
        self.form.set_aborting();
    }
}
