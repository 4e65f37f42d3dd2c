// Booking flow orchestration: search -> select -> booking form -> confirmation

use crate::aggregator::{FlightOption, ItineraryRequest};
use crate::client::FlightApi;
use crate::error::{PortalError, PortalResult};
use crate::search::{sort_and_filter, ResultFilter, SearchCriteria, SortBy};
use crate::session::{SearchOutcome, SelectedFlight, SessionId, SessionStore};
use crate::wizard::{BookingConfirmation, BookingWizard};
use std::sync::Arc;

pub struct FlightPortal<A: FlightApi> {
    api: Arc<A>,
    sessions: Arc<SessionStore>,
}

impl<A: FlightApi> FlightPortal<A> {
    pub fn new(api: Arc<A>, sessions: Arc<SessionStore>) -> Self {
        Self { api, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn start_session(&self) -> SessionId {
        self.sessions.create()
    }

    pub async fn search(
        &self,
        session: &SessionId,
        criteria: SearchCriteria,
    ) -> PortalResult<SearchOutcome> {
        // Fail before the network call if the session is already gone
        self.sessions.get(session)?;

        let response = self.api.search(&criteria.to_request()).await?;
        let flights = response.outbound().to_vec();
        if flights.is_empty() {
            return Err(PortalError::NoResults);
        }

        let outcome = SearchOutcome {
            trace_id: response.trace_id,
            flights,
            counts: criteria.passengers(),
        };
        let stored = outcome.clone();
        self.sessions
            .update(session, move |s| s.record_search(criteria, stored))?;
        Ok(outcome)
    }

    pub fn results(
        &self,
        session: &SessionId,
        sort_by: SortBy,
        filter: ResultFilter,
    ) -> PortalResult<Vec<FlightOption>> {
        self.sessions.update(session, |s| {
            s.search()
                .map(|outcome| sort_and_filter(&outcome.flights, sort_by, filter))
        })?
    }

    /// Fetches fare rules, fare quote and SSR options for one search result
    /// and stores them as the session's selected flight.
    pub async fn select_flight(
        &self,
        session: &SessionId,
        result_index: &str,
    ) -> PortalResult<SelectedFlight> {
        let outcome = self.sessions.get(session)?.search()?.clone();
        let flight = outcome
            .flights
            .iter()
            .find(|f| f.result_index == result_index)
            .cloned()
            .ok_or_else(|| {
                PortalError::validation(format!("Flight {} is no longer available", result_index))
            })?;

        let request = ItineraryRequest {
            trace_id: outcome.trace_id.clone(),
            result_index: flight.result_index.clone(),
        };
        let (fare_rules, fare_quote, ssr) = futures::try_join!(
            self.api.fare_rule(&request),
            self.api.fare_quote(&request),
            self.api.ssr(&request),
        )?;

        let selected = SelectedFlight {
            flight,
            fare_quote,
            fare_rules,
            ssr,
            trace_id: outcome.trace_id,
            counts: outcome.counts,
        };
        let stored = selected.clone();
        self.sessions.update(session, move |s| s.select(stored))?;
        tracing::info!(session = %session, result_index, "flight selected");
        Ok(selected)
    }

    pub fn begin_booking(&self, session: &SessionId) -> PortalResult<BookingWizard> {
        let selected = self.sessions.get(session)?.selected()?.clone();
        BookingWizard::new(selected)
    }

    // Session search/selection state is dropped once the booking is confirmed
    pub async fn complete_booking(
        &self,
        session: &SessionId,
        wizard: &mut BookingWizard,
    ) -> PortalResult<BookingConfirmation> {
        let confirmation = wizard.submit(self.api.as_ref()).await?;
        if let Err(err) = self.sessions.update(session, |s| s.complete()) {
            tracing::warn!(session = %session, error = %err, "session gone before booking cleanup");
        }
        Ok(confirmation)
    }
}
