// Flight aggregator client: search, pricing lookups and booking

use crate::aggregator::{
    BookRequest, BookResponse, BookingDetails, BookingDetailsRequest, BookingReference, FareQuote,
    FareRules, ItineraryRequest, SearchRequest, SearchResponse, SsrResponse,
};
use crate::config::PortalConfig;
use crate::error::PortalResult;
use crate::http::{ClientStats, HttpTransport};
use async_trait::async_trait;

// Every call is a single attempt; callers decide whether to re-trigger
#[async_trait]
pub trait FlightApi: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> PortalResult<SearchResponse>;

    async fn fare_quote(&self, request: &ItineraryRequest) -> PortalResult<FareQuote>;

    async fn fare_rule(&self, request: &ItineraryRequest) -> PortalResult<FareRules>;

    async fn ssr(&self, request: &ItineraryRequest) -> PortalResult<SsrResponse>;

    async fn book(&self, request: &BookRequest) -> PortalResult<BookingReference>;

    async fn booking_details(&self, request: &BookingDetailsRequest)
        -> PortalResult<BookingDetails>;
}

pub struct AggregatorClient {
    transport: HttpTransport,
}

impl AggregatorClient {
    pub fn new(config: &PortalConfig) -> PortalResult<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    pub fn stats(&self) -> ClientStats {
        self.transport.stats()
    }
}

#[async_trait]
impl FlightApi for AggregatorClient {
    async fn search(&self, request: &SearchRequest) -> PortalResult<SearchResponse> {
        let response: SearchResponse = self.transport.post_envelope("/tbo/search", request).await?;
        response.validate()?;
        tracing::info!(
            trace_id = %response.trace_id,
            options = response.outbound().len(),
            "flight search completed"
        );
        Ok(response)
    }

    async fn fare_quote(&self, request: &ItineraryRequest) -> PortalResult<FareQuote> {
        let quote: FareQuote = self.transport.post_envelope("/tbo/fare-quote", request).await?;
        quote.validate()?;
        if quote.is_price_changed {
            tracing::warn!(result_index = %request.result_index, "fare changed since search");
        }
        Ok(quote)
    }

    async fn fare_rule(&self, request: &ItineraryRequest) -> PortalResult<FareRules> {
        self.transport.post_envelope("/tbo/fare-rule", request).await
    }

    async fn ssr(&self, request: &ItineraryRequest) -> PortalResult<SsrResponse> {
        let ssr: SsrResponse = self.transport.post_envelope("/tbo/ssr", request).await?;
        ssr.validate()?;
        Ok(ssr)
    }

    async fn book(&self, request: &BookRequest) -> PortalResult<BookingReference> {
        let response: BookResponse = self.transport.post_envelope("/tbo/book", request).await?;
        let reference = response.into_reference()?;
        tracing::info!(pnr = %reference.pnr, booking_id = %reference.booking_id, "booking created");
        Ok(reference)
    }

    async fn booking_details(
        &self,
        request: &BookingDetailsRequest,
    ) -> PortalResult<BookingDetails> {
        self.transport
            .post_envelope("/tbo/booking-details", request)
            .await
    }
}
