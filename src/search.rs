// Search criteria validation and result ordering/filtering

use crate::aggregator::{FlightOption, SearchRequest, SearchSegment};
use crate::error::{PortalError, PortalResult};
use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

impl TripType {
    pub fn journey_type(self) -> u8 {
        match self {
            TripType::OneWay => 1,
            TripType::RoundTrip => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    #[default]
    Any,
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    // Aggregator cabin codes
    pub fn code(self) -> u8 {
        match self {
            CabinClass::Any => 1,
            CabinClass::Economy => 2,
            CabinClass::PremiumEconomy => 3,
            CabinClass::Business => 4,
            CabinClass::First => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerCounts {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Default for PassengerCounts {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

impl PassengerCounts {
    pub fn new(adults: u32, children: u32, infants: u32) -> PortalResult<Self> {
        let counts = Self {
            adults,
            children,
            infants,
        };
        counts.validate()?;
        Ok(counts)
    }

    // Infants travel on an adult's lap, one per adult
    pub fn validate(&self) -> PortalResult<()> {
        if self.adults < 1 {
            return Err(PortalError::validation("At least one adult is required"));
        }
        if self.infants > self.adults {
            return Err(PortalError::validation(
                "Number of infants cannot exceed number of adults",
            ));
        }
        Ok(())
    }

    pub fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    origin: String,
    destination: String,
    trip_type: TripType,
    depart_date: NaiveDate,
    return_date: Option<NaiveDate>,
    cabin_class: CabinClass,
    passengers: PassengerCounts,
}

impl SearchCriteria {
    pub fn new(
        origin: &str,
        destination: &str,
        trip_type: TripType,
        depart_date: NaiveDate,
        return_date: Option<NaiveDate>,
        cabin_class: CabinClass,
        passengers: PassengerCounts,
    ) -> PortalResult<Self> {
        let origin = normalize_airport(origin)?;
        let destination = normalize_airport(destination)?;
        if origin == destination {
            return Err(PortalError::validation(
                "Origin and destination cannot be the same",
            ));
        }

        passengers.validate()?;

        let return_date = match (trip_type, return_date) {
            (TripType::OneWay, _) => None,
            (TripType::RoundTrip, None) => {
                return Err(PortalError::validation(
                    "Return date is required for round trips",
                ))
            }
            (TripType::RoundTrip, Some(date)) if date < depart_date => {
                return Err(PortalError::validation(
                    "Return date cannot be before departure date",
                ))
            }
            (TripType::RoundTrip, Some(date)) => Some(date),
        };

        Ok(Self {
            origin,
            destination,
            trip_type,
            depart_date,
            return_date,
            cabin_class,
            passengers,
        })
    }

    pub fn one_way(
        origin: &str,
        destination: &str,
        depart_date: NaiveDate,
        passengers: PassengerCounts,
    ) -> PortalResult<Self> {
        Self::new(
            origin,
            destination,
            TripType::OneWay,
            depart_date,
            None,
            CabinClass::Any,
            passengers,
        )
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn trip_type(&self) -> TripType {
        self.trip_type
    }

    pub fn depart_date(&self) -> NaiveDate {
        self.depart_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn passengers(&self) -> PassengerCounts {
        self.passengers
    }

    pub fn to_request(&self) -> SearchRequest {
        let mut segments = vec![self.segment(&self.origin, &self.destination, self.depart_date)];
        if let Some(return_date) = self.return_date {
            segments.push(self.segment(&self.destination, &self.origin, return_date));
        }

        SearchRequest {
            journey_type: self.trip_type.journey_type(),
            preferred_airlines: None,
            segments,
            adult_count: self.passengers.adults,
            child_count: self.passengers.children,
            infant_count: self.passengers.infants,
        }
    }

    fn segment(&self, origin: &str, destination: &str, date: NaiveDate) -> SearchSegment {
        let time = format!("{}T00:00:00", date.format("%Y-%m-%d"));
        SearchSegment {
            origin: origin.to_string(),
            destination: destination.to_string(),
            flight_cabin_class: self.cabin_class.code(),
            preferred_departure_time: time.clone(),
            preferred_arrival_time: time,
        }
    }
}

fn normalize_airport(code: &str) -> PortalResult<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(PortalError::validation(
            "Please select both origin and destination airports",
        ));
    }
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(PortalError::validation(format!(
            "Invalid airport code: {}",
            code
        )));
    }
    Ok(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Price,
    Duration,
    Departure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFilter {
    #[default]
    All,
    NonStop,
    // 06:00-11:59
    Morning,
    // 12:00-17:59
    Afternoon,
    // 18:00 onwards
    Evening,
}

impl ResultFilter {
    pub fn matches(self, flight: &FlightOption) -> bool {
        let hour = || flight.departure_time().map(|t| t.hour());
        match self {
            ResultFilter::All => true,
            ResultFilter::NonStop => flight.is_non_stop(),
            ResultFilter::Morning => hour().map_or(false, |h| (6..12).contains(&h)),
            ResultFilter::Afternoon => hour().map_or(false, |h| (12..18).contains(&h)),
            ResultFilter::Evening => hour().map_or(false, |h| h >= 18),
        }
    }
}

// Stable sort, so equal keys keep the aggregator's order
pub fn sort_and_filter(
    flights: &[FlightOption],
    sort_by: SortBy,
    filter: ResultFilter,
) -> Vec<FlightOption> {
    let mut selected: Vec<FlightOption> = flights
        .iter()
        .filter(|flight| filter.matches(flight))
        .cloned()
        .collect();

    selected.sort_by(|a, b| match sort_by {
        SortBy::Price => a
            .fare
            .published_fare
            .partial_cmp(&b.fare.published_fare)
            .unwrap_or(Ordering::Equal),
        SortBy::Duration => a.duration_minutes().cmp(&b.duration_minutes()),
        SortBy::Departure => a.departure_time().cmp(&b.departure_time()),
    });

    selected
}
