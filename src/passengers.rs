// Passenger list construction and editing for the booking form

use crate::aggregator::{FareQuote, FlightOption};
use crate::error::{PortalError, PortalResult};
use crate::search::PassengerCounts;
use serde::{Deserialize, Serialize};

// Sent to the aggregator as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PaxType {
    Adult,
    Child,
    Infant,
}

impl PaxType {
    // Aggregator pax type codes
    pub fn code(self) -> u8 {
        match self {
            PaxType::Adult => 1,
            PaxType::Child => 2,
            PaxType::Infant => 3,
        }
    }

    fn default_title(self) -> Title {
        match self {
            PaxType::Adult => Title::Mr,
            PaxType::Child => Title::Miss,
            PaxType::Infant => Title::Mstr,
        }
    }
}

impl From<PaxType> for u8 {
    fn from(pax_type: PaxType) -> u8 {
        pax_type.code()
    }
}

impl TryFrom<u8> for PaxType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(PaxType::Adult),
            2 => Ok(PaxType::Child),
            3 => Ok(PaxType::Infant),
            other => Err(format!("unknown pax type code {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Title {
    Mr,
    Mrs,
    Ms,
    Miss,
    Mstr,
}

impl Title {
    pub fn gender(self) -> Gender {
        match self {
            Title::Mr | Title::Mstr => Gender::Male,
            Title::Mrs | Title::Ms | Title::Miss => Gender::Female,
        }
    }
}

impl std::str::FromStr for Title {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Mr" => Ok(Title::Mr),
            "Mrs" => Ok(Title::Mrs),
            "Ms" => Ok(Title::Ms),
            "Miss" => Ok(Title::Miss),
            "Mstr" => Ok(Title::Mstr),
            other => Err(PortalError::validation(format!("Unknown title: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }
}

impl From<Gender> for u8 {
    fn from(gender: Gender) -> u8 {
        gender.code()
    }
}

impl TryFrom<u8> for Gender {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            other => Err(format!("unknown gender code {}", other)),
        }
    }
}

// Aggregator passenger record, forwarded as-is in the book request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Passenger {
    pub title: Title,
    pub first_name: String,
    pub last_name: String,
    pub pax_type: PaxType,
    pub date_of_birth: String,
    pub gender: Gender,
    pub address_line1: String,
    pub city: String,
    pub country_code: String,
    pub country_name: String,
    pub nationality: String,
    pub contact_no: String,
    pub email: String,
    #[serde(rename = "IsLeadPax")]
    pub is_lead: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport_expiry: Option<String>,
    #[serde(rename = "PAN", skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
}

impl Passenger {
    fn blank(pax_type: PaxType, is_lead: bool, docs: DocumentRequirements) -> Self {
        let title = pax_type.default_title();
        let pan = docs.pan_required && pax_type == PaxType::Adult;

        Self {
            title,
            first_name: String::new(),
            last_name: String::new(),
            pax_type,
            date_of_birth: String::new(),
            gender: title.gender(),
            address_line1: String::new(),
            city: String::new(),
            country_code: "IN".to_string(),
            country_name: "India".to_string(),
            nationality: "IN".to_string(),
            contact_no: String::new(),
            email: String::new(),
            is_lead,
            passport_no: docs.international.then(String::new),
            passport_expiry: docs.international.then(String::new),
            pan: pan.then(String::new),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentRequirements {
    pub international: bool,
    pub pan_required: bool,
}

impl DocumentRequirements {
    pub fn for_itinerary(flight: &FlightOption, quote: &FareQuote) -> Self {
        Self {
            international: is_international(flight),
            pan_required: quote.pan_required(),
        }
    }
}

pub fn is_international(flight: &FlightOption) -> bool {
    flight.is_international()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerField {
    Title,
    FirstName,
    LastName,
    DateOfBirth,
    AddressLine1,
    City,
    CountryCode,
    CountryName,
    Nationality,
    ContactNo,
    Email,
    PassportNo,
    PassportExpiry,
    Pan,
}

// Deserialized lists are checked the same way built ones are shaped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Passenger>", try_from = "Vec<Passenger>")]
pub struct PassengerList {
    passengers: Vec<Passenger>,
}

impl TryFrom<Vec<Passenger>> for PassengerList {
    type Error = PortalError;

    fn try_from(passengers: Vec<Passenger>) -> Result<Self, Self::Error> {
        let leads = passengers.iter().filter(|p| p.is_lead).count();
        if leads != 1 {
            return Err(PortalError::validation(format!(
                "Passenger list needs exactly one lead passenger, found {}",
                leads
            )));
        }
        match passengers.first() {
            Some(first) if first.is_lead && first.pax_type == PaxType::Adult => {
                Ok(Self { passengers })
            }
            _ => Err(PortalError::validation(
                "Lead passenger must be the first adult",
            )),
        }
    }
}

impl From<PassengerList> for Vec<Passenger> {
    fn from(list: PassengerList) -> Self {
        list.passengers
    }
}

/// Builds one blank passenger per traveller: adults first, then children,
/// then infants. The first adult is the lead passenger.
pub fn build_passenger_list(
    counts: PassengerCounts,
    docs: DocumentRequirements,
) -> PortalResult<PassengerList> {
    counts.validate()?;

    let adults = (0..counts.adults).map(|i| Passenger::blank(PaxType::Adult, i == 0, docs));
    let children = (0..counts.children).map(|_| Passenger::blank(PaxType::Child, false, docs));
    let infants = (0..counts.infants).map(|_| Passenger::blank(PaxType::Infant, false, docs));

    Ok(PassengerList {
        passengers: adults.chain(children).chain(infants).collect(),
    })
}

impl PassengerList {
    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn as_slice(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn into_vec(self) -> Vec<Passenger> {
        self.passengers
    }

    pub fn get(&self, index: usize) -> Option<&Passenger> {
        self.passengers.get(index)
    }

    // A list always has its lead at index 0
    pub fn lead(&self) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.is_lead)
    }

    pub fn update(&mut self, index: usize, field: PassengerField, value: &str) -> PortalResult<()> {
        let passenger = self.passengers.get_mut(index).ok_or_else(|| {
            PortalError::validation(format!("No passenger at position {}", index + 1))
        })?;

        let value = value.to_string();
        match field {
            PassengerField::Title => {
                let title: Title = value.parse()?;
                passenger.title = title;
                passenger.gender = title.gender();
            }
            PassengerField::FirstName => passenger.first_name = value,
            PassengerField::LastName => passenger.last_name = value,
            PassengerField::DateOfBirth => passenger.date_of_birth = value,
            PassengerField::AddressLine1 => passenger.address_line1 = value,
            PassengerField::City => passenger.city = value,
            PassengerField::CountryCode => passenger.country_code = value,
            PassengerField::CountryName => passenger.country_name = value,
            PassengerField::Nationality => passenger.nationality = value,
            PassengerField::ContactNo => passenger.contact_no = value,
            PassengerField::Email => passenger.email = value,
            PassengerField::PassportNo => set_document(&mut passenger.passport_no, value),
            PassengerField::PassportExpiry => set_document(&mut passenger.passport_expiry, value),
            PassengerField::Pan => set_document(&mut passenger.pan, value),
        }
        Ok(())
    }
}

// Document fields exist only when the itinerary asks for them
fn set_document(slot: &mut Option<String>, value: String) {
    if let Some(current) = slot {
        *current = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::fixtures;
    use test_case::test_case;

    fn domestic() -> DocumentRequirements {
        DocumentRequirements::default()
    }

    #[test]
    fn test_list_order_and_lead() {
        let list = build_passenger_list(PassengerCounts::new(2, 1, 1).unwrap(), domestic()).unwrap();

        let types: Vec<PaxType> = list.as_slice().iter().map(|p| p.pax_type).collect();
        assert_eq!(
            types,
            vec![PaxType::Adult, PaxType::Adult, PaxType::Child, PaxType::Infant]
        );
        assert_eq!(list.as_slice().iter().filter(|p| p.is_lead).count(), 1);
        assert!(list.as_slice()[0].is_lead);
        assert_eq!(list.lead(), list.get(0));
    }

    #[test]
    fn test_more_infants_than_adults_rejected() {
        let counts = PassengerCounts {
            adults: 1,
            children: 0,
            infants: 2,
        };
        let err = build_passenger_list(counts, domestic()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test_case(1, 0, 0; "single adult")]
    #[test_case(3, 2, 0; "adults and children")]
    #[test_case(4, 1, 4; "full lap infants")]
    #[test_case(9, 0, 1; "large group")]
    fn test_list_length_matches_counts(adults: u32, children: u32, infants: u32) {
        let counts = PassengerCounts::new(adults, children, infants).unwrap();
        let list = build_passenger_list(counts, domestic()).unwrap();
        assert_eq!(list.len() as u32, counts.total());
        assert_eq!(list.lead().map(|p| p.pax_type), Some(PaxType::Adult));
    }

    #[test]
    fn test_defaults_per_pax_type() {
        let list = build_passenger_list(PassengerCounts::new(1, 1, 1).unwrap(), domestic()).unwrap();
        let adult = &list.as_slice()[0];
        let child = &list.as_slice()[1];
        let infant = &list.as_slice()[2];

        assert_eq!((adult.title, adult.gender), (Title::Mr, Gender::Male));
        assert_eq!((child.title, child.gender), (Title::Miss, Gender::Female));
        assert_eq!((infant.title, infant.gender), (Title::Mstr, Gender::Male));
        assert_eq!(adult.country_code, "IN");
        assert_eq!(adult.country_name, "India");
        assert_eq!(adult.nationality, "IN");
        assert!(adult.passport_no.is_none());
        assert!(adult.pan.is_none());
    }

    #[test]
    fn test_document_fields_follow_requirements() {
        let docs = DocumentRequirements {
            international: true,
            pan_required: true,
        };
        let list = build_passenger_list(PassengerCounts::new(1, 1, 0).unwrap(), docs).unwrap();

        let adult = &list.as_slice()[0];
        let child = &list.as_slice()[1];
        assert_eq!(adult.passport_no.as_deref(), Some(""));
        assert_eq!(child.passport_expiry.as_deref(), Some(""));
        assert_eq!(adult.pan.as_deref(), Some(""));
        assert!(child.pan.is_none());
    }

    #[test]
    fn test_requirements_from_itinerary() {
        let mut flight = fixtures::flight("OB1", false, 5000.0);
        let mut quote = fixtures::fare_quote(4500.0, 500.0);
        assert_eq!(
            DocumentRequirements::for_itinerary(&flight, &quote),
            DocumentRequirements::default()
        );

        flight.segments[0][0].destination.airport.country_code = "AE".to_string();
        quote.is_pan_required_at_book = true;
        let docs = DocumentRequirements::for_itinerary(&flight, &quote);
        assert!(docs.international);
        assert!(docs.pan_required);
    }

    #[test]
    fn test_title_change_sets_gender() {
        let mut list = build_passenger_list(PassengerCounts::default(), domestic()).unwrap();
        list.update(0, PassengerField::Title, "Mrs").unwrap();
        assert_eq!(list.as_slice()[0].gender, Gender::Female);

        list.update(0, PassengerField::Title, "Mr").unwrap();
        assert_eq!(list.as_slice()[0].gender, Gender::Male);

        assert!(list.update(0, PassengerField::Title, "Dr").is_err());
    }

    #[test]
    fn test_update_fields_and_bounds() {
        let mut list = build_passenger_list(PassengerCounts::default(), domestic()).unwrap();
        list.update(0, PassengerField::FirstName, "Asha").unwrap();
        list.update(0, PassengerField::ContactNo, "9876543210").unwrap();
        // Document fields not requested for this itinerary stay absent
        list.update(0, PassengerField::PassportNo, "Z1234567").unwrap();

        let lead = list.lead().unwrap();
        assert_eq!(lead.first_name, "Asha");
        assert_eq!(lead.contact_no, "9876543210");
        assert!(lead.passport_no.is_none());

        assert!(list.update(5, PassengerField::City, "Pune").is_err());
    }

    #[test]
    fn test_serializes_aggregator_wire_format() {
        let list = build_passenger_list(PassengerCounts::new(1, 1, 0).unwrap(), domestic()).unwrap();
        let lead = serde_json::to_value(&list.as_slice()[0]).unwrap();
        assert_eq!(lead["Title"], "Mr");
        assert_eq!(lead["PaxType"], 1);
        assert_eq!(lead["Gender"], 1);
        assert_eq!(lead["IsLeadPax"], true);
        assert_eq!(lead["CountryCode"], "IN");
        assert!(lead.get("AddressLine1").is_some());
        assert!(lead.get("ContactNo").is_some());
        assert!(lead.get("PassportNo").is_none());
        assert!(lead.get("PAN").is_none());

        let child = serde_json::to_value(&list.as_slice()[1]).unwrap();
        assert_eq!(child["PaxType"], 2);
        assert_eq!(child["Gender"], 2);
        assert_eq!(child["IsLeadPax"], false);
    }

    #[test]
    fn test_document_fields_use_aggregator_names() {
        let docs = DocumentRequirements {
            international: true,
            pan_required: true,
        };
        let list = build_passenger_list(PassengerCounts::default(), docs).unwrap();
        let json = serde_json::to_value(&list.as_slice()[0]).unwrap();
        assert_eq!(json["PassportNo"], "");
        assert_eq!(json["PassportExpiry"], "");
        assert_eq!(json["PAN"], "");

        let back: Passenger = serde_json::from_value(json).unwrap();
        assert_eq!(&back, &list.as_slice()[0]);
    }

    #[test]
    fn test_unknown_pax_type_code_rejected() {
        assert_eq!(PaxType::try_from(3u8), Ok(PaxType::Infant));
        assert!(PaxType::try_from(4u8).is_err());
        assert!(Gender::try_from(0u8).is_err());
    }

    #[test]
    fn test_deserialized_list_needs_single_leading_adult() {
        let list = build_passenger_list(PassengerCounts::new(2, 1, 0).unwrap(), domestic()).unwrap();
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.is_array());
        let back: PassengerList = serde_json::from_value(json).unwrap();
        assert_eq!(back, list);

        let mut two_leads = list.clone().into_vec();
        two_leads[1].is_lead = true;
        let json = serde_json::to_value(&two_leads).unwrap();
        assert!(serde_json::from_value::<PassengerList>(json).is_err());

        let mut no_lead = list.clone().into_vec();
        no_lead[0].is_lead = false;
        assert!(PassengerList::try_from(no_lead).is_err());

        let mut child_first = list.into_vec();
        child_first.swap(0, 2);
        child_first[0].is_lead = true;
        child_first[2].is_lead = false;
        assert!(PassengerList::try_from(child_first).is_err());
    }
}
