// Three-step booking form: passenger details, add-ons review, payment

use crate::addons::{AddOnCatalog, AddOnCategory, AddOnSelector};
use crate::aggregator::{BookRequest, BookingDetails, BookingDetailsRequest, BookingReference};
use crate::client::FlightApi;
use crate::error::{PortalError, PortalResult};
use crate::fare::FareSummary;
use crate::passengers::{
    build_passenger_list, DocumentRequirements, PassengerField, PassengerList,
};
use crate::session::SelectedFlight;
use serde::{Deserialize, Serialize};

pub const MIN_CONTACT_DIGITS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    PassengerDetails,
    AddOnsReview,
    Payment,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::PassengerDetails => 1,
            WizardStep::AddOnsReview => 2,
            WizardStep::Payment => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub reference: BookingReference,
    // Absent when the follow-up lookup failed; the booking itself stands
    pub details: Option<BookingDetails>,
}

#[derive(Debug)]
pub struct BookingWizard {
    selected: SelectedFlight,
    passengers: PassengerList,
    catalog: AddOnCatalog,
    add_ons: AddOnSelector,
    step: WizardStep,
    is_submitting: bool,
    confirmation: Option<BookingConfirmation>,
}

impl BookingWizard {
    pub fn new(selected: SelectedFlight) -> PortalResult<Self> {
        let docs = DocumentRequirements::for_itinerary(&selected.flight, &selected.fare_quote);
        let passengers = build_passenger_list(selected.counts, docs)?;
        let catalog = AddOnCatalog::from_ssr(&selected.ssr);

        Ok(Self {
            selected,
            passengers,
            catalog,
            add_ons: AddOnSelector::new(),
            step: WizardStep::PassengerDetails,
            is_submitting: false,
            confirmation: None,
        })
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn selected(&self) -> &SelectedFlight {
        &self.selected
    }

    pub fn passengers(&self) -> &PassengerList {
        &self.passengers
    }

    pub fn catalog(&self) -> &AddOnCatalog {
        &self.catalog
    }

    pub fn add_ons(&self) -> &AddOnSelector {
        &self.add_ons
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn update_passenger(
        &mut self,
        index: usize,
        field: PassengerField,
        value: &str,
    ) -> PortalResult<()> {
        self.passengers.update(index, field, value)
    }

    pub fn select_add_on(&mut self, segment: usize, category: AddOnCategory, code: &str) -> bool {
        self.catalog
            .select_code(&mut self.add_ons, segment, category, code)
    }

    pub fn clear_add_on(&mut self, segment: usize, category: AddOnCategory) {
        self.add_ons.clear(segment, category);
    }

    // Priced from the fare quote, which supersedes the search-time fare
    pub fn fare_summary(&self) -> FareSummary {
        FareSummary::compute(&self.selected.fare_quote.fare, &self.add_ons)
    }

    /// Moves one step forward. Leaving passenger details requires a usable
    /// lead contact; on failure nothing entered so far is lost.
    pub fn advance(&mut self) -> PortalResult<WizardStep> {
        self.step = match self.step {
            WizardStep::PassengerDetails => {
                self.validate_passenger_details()?;
                WizardStep::AddOnsReview
            }
            WizardStep::AddOnsReview => WizardStep::Payment,
            WizardStep::Payment => {
                return Err(PortalError::validation("Payment is the final step"));
            }
        };
        tracing::info!(step = self.step.number(), "booking step advanced");
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::AddOnsReview => WizardStep::PassengerDetails,
            other => other,
        };
        self.step
    }

    pub fn validate_passenger_details(&self) -> PortalResult<()> {
        let lead = self
            .passengers
            .lead()
            .ok_or_else(|| PortalError::validation("Lead passenger is missing"))?;

        let digits = lead.contact_no.chars().filter(char::is_ascii_digit).count();
        if digits < MIN_CONTACT_DIGITS {
            return Err(PortalError::validation("Valid phone number is mandatory"));
        }

        if self.selected.flight.is_lcc {
            if lead.email.trim().is_empty() {
                return Err(PortalError::validation("Email is mandatory for LCC flights"));
            }
            if lead.address_line1.trim().is_empty() {
                return Err(PortalError::validation(
                    "Address is mandatory for LCC flights",
                ));
            }
        }
        Ok(())
    }

    /// Books the itinerary, then fetches the booking record. A failed lookup
    /// is logged and leaves the booking confirmed without details. A failed
    /// booking can be submitted again.
    pub async fn submit(&mut self, api: &dyn FlightApi) -> PortalResult<BookingConfirmation> {
        if self.step != WizardStep::Payment {
            return Err(PortalError::validation(
                "Complete passenger details and add-ons before payment",
            ));
        }
        if self.confirmation.is_some() {
            return Err(PortalError::validation("This booking is already confirmed"));
        }

        let request = BookRequest {
            trace_id: self.selected.trace_id.clone(),
            result_index: self.selected.flight.result_index.clone(),
            passengers: self.passengers.as_slice().to_vec(),
            fare_quote_data: self.selected.fare_quote.clone(),
            is_lcc: self.selected.flight.is_lcc,
            add_ons: self.add_ons.selections(),
        };

        let (reference, details) = {
            // Lowered on every exit, including a dropped future
            let _submitting = SubmittingFlag::raise(&mut self.is_submitting);

            let reference = match api.book(&request).await {
                Ok(reference) => reference,
                Err(err) => {
                    tracing::warn!(error = %err, result_index = %request.result_index, "booking failed");
                    return Err(err);
                }
            };

            let details_request = BookingDetailsRequest {
                trace_id: request.trace_id,
                booking_id: reference.booking_id.clone(),
            };
            let details = match api.booking_details(&details_request).await {
                Ok(details) => Some(details),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        booking_id = %reference.booking_id,
                        "booking details lookup failed"
                    );
                    None
                }
            };
            (reference, details)
        };

        let confirmation = BookingConfirmation { reference, details };
        self.confirmation = Some(confirmation.clone());
        tracing::info!(
            pnr = %confirmation.reference.pnr,
            total = self.fare_summary().total,
            "booking confirmed"
        );
        Ok(confirmation)
    }
}

struct SubmittingFlag<'a>(&'a mut bool);

impl<'a> SubmittingFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        SubmittingFlag(flag)
    }
}

impl Drop for SubmittingFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
