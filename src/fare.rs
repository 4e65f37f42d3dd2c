// Price breakdown shown on the add-ons and payment steps

use crate::addons::{AddOnCategory, AddOnSelector};
use crate::aggregator::Fare;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareSummary {
    pub base_fare: f64,
    pub tax: f64,
    pub published_fare: f64,
    pub baggage: f64,
    pub meals: f64,
    pub seats: f64,
    pub total: f64,
}

impl FareSummary {
    // Recomputed from scratch on every call; nothing is cached
    pub fn compute(fare: &Fare, selector: &AddOnSelector) -> Self {
        let baggage = selector.subtotal(AddOnCategory::Baggage);
        let meals = selector.subtotal(AddOnCategory::Meal);
        let seats = selector.subtotal(AddOnCategory::Seat);

        Self {
            base_fare: fare.base_fare,
            tax: fare.tax,
            published_fare: fare.published_fare,
            baggage,
            meals,
            seats,
            total: fare.published_fare + baggage + meals + seats,
        }
    }

    pub fn add_ons(&self) -> f64 {
        self.baggage + self.meals + self.seats
    }
}
