// Booking history and dashboard figures for the signed-in agent

use crate::error::PortalResult;
use crate::http::HttpTransport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BookingRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub pnr: String,
    #[serde(deserialize_with = "string_or_number")]
    pub booking_id: String,
    pub status: String,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn is_cancelled(&self) -> bool {
        self.status.eq_ignore_ascii_case("cancelled")
    }
}

#[derive(Debug, Deserialize)]
struct BookingList {
    #[serde(default)]
    bookings: Vec<BookingRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_bookings: u64,
    pub month_bookings: u64,
    pub total_revenue: f64,
    pub wallet_balance: f64,
}

// Backend ids arrive as either JSON strings or integers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

pub struct BookingHistoryClient {
    transport: Arc<HttpTransport>,
}

impl BookingHistoryClient {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    // Newest first
    pub async fn list(&self) -> PortalResult<Vec<BookingRecord>> {
        let list: BookingList = self.transport.get_envelope("/bookings").await?;
        let mut bookings = list.bookings;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    pub async fn stats(&self) -> PortalResult<DashboardStats> {
        self.transport.get_envelope("/bookings/stats").await
    }
}
