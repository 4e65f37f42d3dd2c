// Flight booking core for the B2B agent portal

pub mod addons;
pub mod aggregator;
pub mod billing;
pub mod bookings;
pub mod client;
pub mod config;
pub mod error;
pub mod fare;
pub mod http;
pub mod logging;
pub mod passengers;
pub mod permissions;
pub mod portal;
pub mod search;
pub mod session;
pub mod wallet;
pub mod wizard;

// Re-export key types for convenience
pub use addons::{AddOnCatalog, AddOnCategory, AddOnOption, AddOnSelector, SelectedAddOn};
pub use aggregator::{BookingReference, FareQuote, FlightOption, SsrResponse};
pub use billing::{BillingClient, Invoice, Payment, PaymentMethod, PaymentStatus};
pub use bookings::{BookingHistoryClient, BookingRecord, DashboardStats};
pub use client::{AggregatorClient, FlightApi};
pub use config::PortalConfig;
pub use error::{PortalError, PortalResult};
pub use fare::FareSummary;
pub use http::{ClientStats, HttpTransport};
pub use passengers::{
    build_passenger_list, DocumentRequirements, Passenger, PassengerField, PassengerList, PaxType,
};
pub use permissions::{AccessRule, Permission, Role};
pub use portal::FlightPortal;
pub use search::{PassengerCounts, ResultFilter, SearchCriteria, SortBy, TripType};
pub use session::{BookingSession, SelectedFlight, SessionId, SessionStore};
pub use wallet::{WalletClient, WalletOverview};
pub use wizard::{BookingConfirmation, BookingWizard, WizardStep};
