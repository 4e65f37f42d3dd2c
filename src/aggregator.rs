// Typed request/response structures for the flight aggregator API.
//
// Field names follow the aggregator's PascalCase wire format. Every response
// type that reaches the booking flow is checked with `validate()` so missing
// or nonsensical fields are rejected at the boundary instead of surfacing as
// blanks later on.

use crate::error::{PortalError, PortalResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Envelope used by every portal backend endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> PortalResult<T> {
        if self.status != "success" {
            return Err(PortalError::api(200, self.message.unwrap_or_default()));
        }
        self.data.ok_or_else(|| {
            PortalError::MalformedResponse("successful response without data".to_string())
        })
    }
}

// ---- search ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchRequest {
    pub journey_type: u8,
    pub preferred_airlines: Option<Vec<String>>,
    pub segments: Vec<SearchSegment>,
    pub adult_count: u32,
    pub child_count: u32,
    pub infant_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchSegment {
    pub origin: String,
    pub destination: String,
    pub flight_cabin_class: u8,
    pub preferred_departure_time: String,
    pub preferred_arrival_time: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResponse {
    pub trace_id: String,
    #[serde(default)]
    pub results: Vec<Vec<FlightOption>>,
}

impl SearchResponse {
    pub fn validate(&self) -> PortalResult<()> {
        if self.trace_id.trim().is_empty() {
            return Err(malformed("search response has an empty TraceId"));
        }
        for flight in self.results.iter().flatten() {
            flight.validate()?;
        }
        Ok(())
    }

    // Outbound options; the portal only ever lists the first result group
    pub fn outbound(&self) -> &[FlightOption] {
        self.results.first().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlightOption {
    pub result_index: String,
    #[serde(rename = "IsLCC", default)]
    pub is_lcc: bool,
    #[serde(default)]
    pub is_refundable: bool,
    pub fare: Fare,
    pub segments: Vec<Vec<Segment>>,
}

impl FlightOption {
    pub fn validate(&self) -> PortalResult<()> {
        if self.result_index.trim().is_empty() {
            return Err(malformed("flight option has an empty ResultIndex"));
        }
        if self.first_leg().is_none() {
            return Err(malformed(format!(
                "flight option {} has no segments",
                self.result_index
            )));
        }
        self.fare.validate()
    }

    pub fn first_leg(&self) -> Option<&Segment> {
        self.segments.first().and_then(|legs| legs.first())
    }

    // Origin and destination of the first leg sit in different countries
    pub fn is_international(&self) -> bool {
        self.first_leg().map_or(false, |leg| {
            leg.origin.airport.country_code != leg.destination.airport.country_code
        })
    }

    pub fn duration_minutes(&self) -> u32 {
        self.first_leg().map_or(0, |leg| leg.duration)
    }

    pub fn departure_time(&self) -> Option<NaiveDateTime> {
        self.first_leg().and_then(|leg| leg.origin.departure())
    }

    pub fn is_non_stop(&self) -> bool {
        self.first_leg().map_or(false, |leg| !leg.stop_over)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fare {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub base_fare: f64,
    pub tax: f64,
    pub published_fare: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offered_fare: Option<f64>,
    // Breakdown fields the portal does not price with
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Fare {
    pub fn validate(&self) -> PortalResult<()> {
        for (name, value) in [
            ("BaseFare", self.base_fare),
            ("Tax", self.tax),
            ("PublishedFare", self.published_fare),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(malformed(format!("fare field {} is invalid: {}", name, value)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Segment {
    pub airline: Airline,
    pub origin: Endpoint,
    pub destination: Endpoint,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub stop_over: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Airline {
    pub airline_code: String,
    pub airline_name: String,
    #[serde(default)]
    pub flight_number: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    pub airport: Airport,
    #[serde(default)]
    pub dep_time: Option<String>,
    #[serde(default)]
    pub arr_time: Option<String>,
}

impl Endpoint {
    pub fn departure(&self) -> Option<NaiveDateTime> {
        self.dep_time.as_deref().and_then(parse_aggregator_time)
    }

    pub fn arrival(&self) -> Option<NaiveDateTime> {
        self.arr_time.as_deref().and_then(parse_aggregator_time)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Airport {
    pub airport_code: String,
    #[serde(default)]
    pub airport_name: String,
    #[serde(default)]
    pub city_name: String,
    pub country_code: String,
}

// Aggregator timestamps carry no offset: "2025-06-01T06:30:00"
pub fn parse_aggregator_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}

// ---- fare quote / fare rule -----------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRequest {
    pub trace_id: String,
    pub result_index: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FareQuote {
    pub fare: Fare,
    #[serde(default)]
    pub is_pan_required_at_book: bool,
    #[serde(default)]
    pub is_pan_required_at_ticket: bool,
    #[serde(default)]
    pub is_passport_required_at_book: bool,
    #[serde(default)]
    pub is_price_changed: bool,
    // Kept so the quote goes back to /tbo/book exactly as it was received
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FareQuote {
    pub fn validate(&self) -> PortalResult<()> {
        self.fare.validate()
    }

    pub fn pan_required(&self) -> bool {
        self.is_pan_required_at_book || self.is_pan_required_at_ticket
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FareRules {
    #[serde(default)]
    pub fare_rules: Vec<FareRule>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FareRule {
    pub origin: String,
    pub destination: String,
    pub airline: String,
    #[serde(default)]
    pub fare_basis_code: String,
    #[serde(default)]
    pub fare_rule_detail: String,
}

// ---- SSR ------------------------------------------------------------------

// Option lists are indexed by segment: Baggage[segment][option]
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SsrResponse {
    #[serde(default)]
    pub baggage: Vec<Vec<BaggageOption>>,
    #[serde(default)]
    pub meal_dynamic: Vec<Vec<MealOption>>,
    #[serde(default)]
    pub seat_dynamic: Vec<SeatDynamic>,
}

impl SsrResponse {
    pub fn validate(&self) -> PortalResult<()> {
        let prices = self
            .baggage
            .iter()
            .flatten()
            .map(|b| (&b.code, b.price))
            .chain(self.meal_dynamic.iter().flatten().map(|m| (&m.code, m.price)))
            .chain(self.seats().map(|seat| (&seat.code, seat.price)));

        for (code, price) in prices {
            if !price.is_finite() || price < 0.0 {
                return Err(malformed(format!("SSR option {} has invalid price {}", code, price)));
            }
        }
        Ok(())
    }

    // Seat rows per segment, without the aggregator's leading placeholder row
    pub fn seat_rows(&self, segment: usize) -> &[RowSeats] {
        self.seat_dynamic
            .first()
            .and_then(|dynamic| dynamic.segment_seat.get(segment))
            .map(|seg| seg.row_seats.get(1..).unwrap_or(&[]))
            .unwrap_or(&[])
    }

    fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.seat_dynamic
            .iter()
            .flat_map(|dynamic| dynamic.segment_seat.iter())
            .flat_map(|seg| seg.row_seats.iter())
            .flat_map(|row| row.seats.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaggageOption {
    pub code: String,
    #[serde(default)]
    pub weight: u32,
    pub price: f64,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MealOption {
    pub code: String,
    #[serde(default)]
    pub airline_description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeatDynamic {
    #[serde(default)]
    pub segment_seat: Vec<SegmentSeat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentSeat {
    #[serde(default)]
    pub row_seats: Vec<RowSeats>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RowSeats {
    #[serde(default)]
    pub seats: Vec<Seat>,
}

pub const SEAT_AVAILABLE: u8 = 1;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Seat {
    pub code: String,
    #[serde(default)]
    pub seat_no: String,
    #[serde(default)]
    pub row_no: String,
    #[serde(default)]
    pub price: f64,
    // The aggregator spells it this way
    #[serde(rename = "AvailablityType", default)]
    pub availability_type: u8,
    #[serde(default)]
    pub seat_type: u8,
}

impl Seat {
    pub fn is_available(&self) -> bool {
        self.availability_type == SEAT_AVAILABLE
    }

    pub fn position_label(&self) -> &'static str {
        match self.seat_type {
            1 => "W",
            2 => "A",
            3 => "M",
            _ => "",
        }
    }
}

// ---- booking --------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub trace_id: String,
    pub result_index: String,
    pub passengers: Vec<crate::passengers::Passenger>,
    pub fare_quote_data: FareQuote,
    #[serde(rename = "isLCC")]
    pub is_lcc: bool,
    pub add_ons: Vec<crate::addons::SelectedAddOn>,
}

// The aggregator answers either flat or wrapped in `Response`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookResponse {
    #[serde(rename = "PNR", default)]
    pub pnr: Option<String>,
    #[serde(rename = "BookingId", default)]
    pub booking_id: Option<serde_json::Value>,
    #[serde(rename = "Response", default)]
    pub response: Option<Box<BookResponse>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReference {
    pub pnr: String,
    pub booking_id: String,
}

impl BookResponse {
    // Empty or zero values on the flat record fall through to `Response`
    pub fn into_reference(self) -> PortalResult<BookingReference> {
        let nested = self.response.map(|r| *r).unwrap_or_default();
        let pnr = non_blank(self.pnr)
            .or_else(|| non_blank(nested.pnr))
            .ok_or_else(|| malformed("booking response has no PNR"))?;
        let booking_id = booking_id_text(self.booking_id)
            .or_else(|| booking_id_text(nested.booking_id))
            .ok_or_else(|| malformed("booking response has no BookingId"))?;

        Ok(BookingReference { pnr, booking_id })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn booking_id_text(id: Option<serde_json::Value>) -> Option<String> {
    match id? {
        serde_json::Value::String(s) => non_blank(Some(s)).filter(|s| s != "0"),
        serde_json::Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailsRequest {
    pub trace_id: String,
    pub booking_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookingDetails {
    #[serde(rename = "PNR", default)]
    pub pnr: Option<String>,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub invoice_amount: Option<f64>,
    #[serde(default)]
    pub invoice_no: Option<String>,
}

fn malformed(message: impl Into<String>) -> PortalError {
    PortalError::MalformedResponse(message.into())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn segment(origin: (&str, &str), destination: (&str, &str), dep_time: &str) -> Segment {
        Segment {
            airline: Airline {
                airline_code: "6E".to_string(),
                airline_name: "IndiGo".to_string(),
                flight_number: "2131".to_string(),
            },
            origin: Endpoint {
                airport: Airport {
                    airport_code: origin.0.to_string(),
                    airport_name: String::new(),
                    city_name: String::new(),
                    country_code: origin.1.to_string(),
                },
                dep_time: Some(dep_time.to_string()),
                arr_time: None,
            },
            destination: Endpoint {
                airport: Airport {
                    airport_code: destination.0.to_string(),
                    airport_name: String::new(),
                    city_name: String::new(),
                    country_code: destination.1.to_string(),
                },
                dep_time: None,
                arr_time: None,
            },
            duration: 130,
            stop_over: false,
        }
    }

    pub fn fare(base: f64, tax: f64) -> Fare {
        Fare {
            currency: Some("INR".to_string()),
            base_fare: base,
            tax,
            published_fare: base + tax,
            offered_fare: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn flight(result_index: &str, is_lcc: bool, published: f64) -> FlightOption {
        FlightOption {
            result_index: result_index.to_string(),
            is_lcc,
            is_refundable: true,
            fare: fare(published - 500.0, 500.0),
            segments: vec![vec![segment(
                ("DEL", "IN"),
                ("BOM", "IN"),
                "2025-06-01T06:30:00",
            )]],
        }
    }

    pub fn fare_quote(base: f64, tax: f64) -> FareQuote {
        FareQuote {
            fare: fare(base, tax),
            is_pan_required_at_book: false,
            is_pan_required_at_ticket: false,
            is_passport_required_at_book: false,
            is_price_changed: false,
            extra: serde_json::Map::new(),
        }
    }

    pub fn seat(code: &str, price: f64, available: bool) -> Seat {
        Seat {
            code: code.to_string(),
            seat_no: code.to_string(),
            row_no: code.trim_end_matches(char::is_alphabetic).to_string(),
            price,
            availability_type: if available { SEAT_AVAILABLE } else { 3 },
            seat_type: 1,
        }
    }

    pub fn ssr() -> SsrResponse {
        SsrResponse {
            baggage: vec![vec![
                BaggageOption {
                    code: "NoBaggage".to_string(),
                    weight: 0,
                    price: 0.0,
                    origin: "DEL".to_string(),
                    destination: "BOM".to_string(),
                    text: None,
                },
                BaggageOption {
                    code: "XBPA".to_string(),
                    weight: 5,
                    price: 1900.0,
                    origin: "DEL".to_string(),
                    destination: "BOM".to_string(),
                    text: Some("Prepaid Excess Baggage - 5 Kg".to_string()),
                },
                BaggageOption {
                    code: "XBPB".to_string(),
                    weight: 10,
                    price: 3800.0,
                    origin: "DEL".to_string(),
                    destination: "BOM".to_string(),
                    text: None,
                },
            ]],
            meal_dynamic: vec![vec![
                MealOption {
                    code: "NoMeal".to_string(),
                    airline_description: None,
                    price: 0.0,
                    origin: "DEL".to_string(),
                    destination: "BOM".to_string(),
                },
                MealOption {
                    code: "VGML".to_string(),
                    airline_description: Some("Veg Meal".to_string()),
                    price: 350.0,
                    origin: "DEL".to_string(),
                    destination: "BOM".to_string(),
                },
            ]],
            seat_dynamic: vec![SeatDynamic {
                segment_seat: vec![SegmentSeat {
                    row_seats: vec![
                        RowSeats {
                            seats: vec![seat("NoSeat", 0.0, true)],
                        },
                        RowSeats {
                            seats: vec![seat("1A", 450.0, true), seat("1B", 400.0, false)],
                        },
                        RowSeats {
                            seats: vec![seat("2A", 250.0, true), seat("2B", 0.0, true)],
                        },
                    ],
                }],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_JSON: &str = r#"{
        "status": "success",
        "data": {
            "TraceId": "f6c1-trace",
            "Results": [[
                {
                    "ResultIndex": "OB1",
                    "IsLCC": true,
                    "IsRefundable": false,
                    "Fare": { "Currency": "INR", "BaseFare": 4200, "Tax": 812.5, "PublishedFare": 5012.5, "OfferedFare": 4890 },
                    "Segments": [[
                        {
                            "Airline": { "AirlineCode": "6E", "AirlineName": "IndiGo", "FlightNumber": "2131" },
                            "Origin": { "Airport": { "AirportCode": "DEL", "CityName": "Delhi", "CountryCode": "IN" }, "DepTime": "2025-06-01T06:30:00" },
                            "Destination": { "Airport": { "AirportCode": "DXB", "CityName": "Dubai", "CountryCode": "AE" }, "ArrTime": "2025-06-01T08:45:00" },
                            "Duration": 225,
                            "StopOver": false
                        }
                    ]]
                }
            ]]
        }
    }"#;

    #[test]
    fn test_search_envelope_parses_into_typed_options() {
        let envelope: ApiEnvelope<SearchResponse> = serde_json::from_str(SEARCH_JSON).unwrap();
        let response = envelope.into_data().unwrap();
        assert!(response.validate().is_ok());

        let flight = &response.outbound()[0];
        assert_eq!(flight.result_index, "OB1");
        assert!(flight.is_lcc);
        assert!(flight.is_international());
        assert!(flight.is_non_stop());
        assert_eq!(flight.duration_minutes(), 225);
        assert_eq!(flight.fare.published_fare, 5012.5);
        assert_eq!(
            flight.departure_time(),
            parse_aggregator_time("2025-06-01T06:30:00")
        );
    }

    #[test]
    fn test_failed_envelope_carries_server_message() {
        let json = r#"{"status": "error", "message": "Session expired"}"#;
        let envelope: ApiEnvelope<SearchResponse> = serde_json::from_str(json).unwrap();
        match envelope.into_data() {
            Err(PortalError::Api { message, .. }) => assert_eq!(message, "Session expired"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_flight_without_segments_is_rejected() {
        let mut flight = fixtures::flight("OB1", false, 5000.0);
        flight.segments = vec![vec![]];
        assert!(matches!(
            flight.validate(),
            Err(PortalError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_negative_fare_is_rejected() {
        let mut flight = fixtures::flight("OB1", false, 5000.0);
        flight.fare.tax = -10.0;
        assert!(flight.validate().is_err());
    }

    #[test]
    fn test_ssr_negative_price_is_rejected() {
        let mut ssr = fixtures::ssr();
        assert!(ssr.validate().is_ok());
        ssr.meal_dynamic[0][1].price = -1.0;
        assert!(ssr.validate().is_err());
    }

    #[test]
    fn test_seat_rows_skip_placeholder_row() {
        let ssr = fixtures::ssr();
        let rows = ssr.seat_rows(0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].seats[0].code, "1A");
        assert!(ssr.seat_rows(1).is_empty());
    }

    #[test]
    fn test_book_response_flat_and_nested() {
        let flat: BookResponse =
            serde_json::from_str(r#"{"PNR": "ABC123", "BookingId": 1789342}"#).unwrap();
        assert_eq!(
            flat.into_reference().unwrap(),
            BookingReference {
                pnr: "ABC123".to_string(),
                booking_id: "1789342".to_string()
            }
        );

        let nested: BookResponse =
            serde_json::from_str(r#"{"Response": {"PNR": "XYZ789", "BookingId": "B-42"}}"#)
                .unwrap();
        let reference = nested.into_reference().unwrap();
        assert_eq!(reference.pnr, "XYZ789");
        assert_eq!(reference.booking_id, "B-42");
    }

    #[test]
    fn test_blank_flat_fields_fall_through_to_nested() {
        let response: BookResponse = serde_json::from_str(
            r#"{"PNR": "", "BookingId": 0, "Response": {"PNR": "QX7K2M", "BookingId": 48213}}"#,
        )
        .unwrap();
        assert_eq!(
            response.into_reference().unwrap(),
            BookingReference {
                pnr: "QX7K2M".to_string(),
                booking_id: "48213".to_string()
            }
        );

        let response: BookResponse = serde_json::from_str(
            r#"{"PNR": " ", "BookingId": "", "Response": {"PNR": "AB12CD", "BookingId": "B-7"}}"#,
        )
        .unwrap();
        let reference = response.into_reference().unwrap();
        assert_eq!(reference.pnr, "AB12CD");
        assert_eq!(reference.booking_id, "B-7");
    }

    #[test]
    fn test_zero_booking_id_everywhere_is_malformed() {
        let response: BookResponse =
            serde_json::from_str(r#"{"PNR": "ABC123", "BookingId": 0}"#).unwrap();
        assert!(matches!(
            response.into_reference(),
            Err(PortalError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_success_envelope_without_data_is_malformed() {
        let envelope: ApiEnvelope<FareQuote> =
            serde_json::from_str(r#"{"status": "success"}"#).unwrap();
        assert!(matches!(
            envelope.into_data(),
            Err(PortalError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_fare_quote_forwards_unmodelled_fields() {
        let raw = serde_json::json!({
            "ResultIndex": "OB1",
            "Fare": { "BaseFare": 4000.0, "Tax": 612.0, "PublishedFare": 4612.0, "YQTax": 350.0 },
            "FareBreakdown": [ { "PassengerType": 1, "PassengerCount": 1, "BaseFare": 4000.0 } ],
            "IsPanRequiredAtBook": true
        });
        let quote: FareQuote = serde_json::from_value(raw.clone()).unwrap();
        assert!(quote.pan_required());
        assert_eq!(quote.fare.published_fare, 4612.0);

        let forwarded = serde_json::to_value(&quote).unwrap();
        assert_eq!(forwarded["ResultIndex"], raw["ResultIndex"]);
        assert_eq!(forwarded["FareBreakdown"], raw["FareBreakdown"]);
        assert_eq!(forwarded["Fare"]["YQTax"], 350.0);
        assert!(forwarded["Fare"].get("Currency").is_none());
        assert!(forwarded["Fare"].get("OfferedFare").is_none());
    }

    #[test]
    fn test_book_response_without_pnr_is_malformed() {
        let response: BookResponse = serde_json::from_str(r#"{"BookingId": 17}"#).unwrap();
        assert!(matches!(
            response.into_reference(),
            Err(PortalError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_fare_quote_pan_flags() {
        let mut quote = fixtures::fare_quote(4000.0, 600.0);
        assert!(!quote.pan_required());
        quote.is_pan_required_at_ticket = true;
        assert!(quote.pan_required());
    }
}
