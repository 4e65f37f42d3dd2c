// Organization billing: payment methods, payments and invoices.
//
// These endpoints answer with bare JSON documents rather than the
// `{status, data}` envelope used by the booking API.

use crate::config::PortalConfig;
use crate::error::{PortalError, PortalResult};
use crate::http::HttpTransport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    CreditCard,
    CorporateCard,
    BankTransfer,
    Wallet,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    pub name: String,
    #[serde(default)]
    pub last4: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub expiry_month: Option<u8>,
    #[serde(default)]
    pub expiry_year: Option<u16>,
    #[serde(default)]
    pub is_default: bool,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentMethod {
    #[serde(rename = "type")]
    pub kind: PaymentMethodType,
    pub name: String,
    // Gateway token for the card; raw card numbers never pass through here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
    Cancelled,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method_id: String,
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[serde(default)]
    pub booking_id: Option<String>,
    pub organization_id: String,
    #[serde(default)]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: f64,
    pub currency: String,
    pub payment_method_id: String,
    pub organization_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
}

impl PaymentRequest {
    pub fn validate(&self) -> PortalResult<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(PortalError::validation("Payment amount must be positive"));
        }
        if self.payment_method_id.trim().is_empty() {
            return Err(PortalError::validation("Select a payment method"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
    #[serde(default)]
    pub booking_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub number: String,
    pub organization_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: InvoiceStatus,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub tax_amount: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn is_payable(&self) -> bool {
        matches!(self.status, InvoiceStatus::Pending | InvoiceStatus::Overdue)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSettings {
    pub organization_id: String,
    pub billing_email: String,
    pub billing_address: Address,
    #[serde(default)]
    pub tax_id: Option<String>,
    pub currency: String,
    // Days
    pub payment_terms: u32,
    pub auto_pay_enabled: bool,
    pub credit_limit: f64,
    pub current_balance: f64,
}

impl BillingSettings {
    pub fn available_credit(&self) -> f64 {
        (self.credit_limit - self.current_balance).max(0.0)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateInvoiceRequest<'a> {
    booking_ids: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PayInvoiceRequest<'a> {
    payment_method_id: &'a str,
}

pub struct BillingClient {
    transport: Arc<HttpTransport>,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl BillingClient {
    pub fn new(transport: Arc<HttpTransport>, config: &PortalConfig) -> Self {
        Self {
            transport,
            poll_attempts: config.payment_poll_attempts,
            poll_interval: config.payment_poll_interval(),
        }
    }

    pub async fn payment_methods(&self, organization_id: &str) -> PortalResult<Vec<PaymentMethod>> {
        let path = format!("/organizations/{}/payment-methods", organization_id);
        self.transport.get_json(&path).await
    }

    pub async fn add_payment_method(
        &self,
        organization_id: &str,
        method: &NewPaymentMethod,
    ) -> PortalResult<PaymentMethod> {
        let path = format!("/organizations/{}/payment-methods", organization_id);
        self.transport.post_json(&path, method).await
    }

    /// Submits a payment and, while the processor reports it as
    /// `processing`, polls its status until it settles or polling runs out.
    pub async fn process_payment(&self, request: &PaymentRequest) -> PortalResult<Payment> {
        request.validate()?;

        let payment: Payment = self.transport.post_json("/payments", request).await?;
        tracing::info!(payment_id = %payment.id, status = ?payment.status, "payment submitted");

        if payment.status == PaymentStatus::Processing {
            return self.wait_for_settlement(&payment.id).await;
        }
        Ok(payment)
    }

    pub async fn payment_status(&self, payment_id: &str) -> PortalResult<Payment> {
        self.transport
            .get_json(&format!("/payments/{}", payment_id))
            .await
    }

    async fn wait_for_settlement(&self, payment_id: &str) -> PortalResult<Payment> {
        for attempt in 1..=self.poll_attempts {
            let payment = self.payment_status(payment_id).await?;
            if payment.status != PaymentStatus::Processing {
                tracing::info!(payment_id, status = ?payment.status, attempt, "payment settled");
                return Ok(payment);
            }
            if attempt < self.poll_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        tracing::warn!(payment_id, attempts = self.poll_attempts, "payment still processing");
        Err(PortalError::Timeout("Payment processing timeout".to_string()))
    }

    pub async fn invoices(&self, organization_id: &str) -> PortalResult<Vec<Invoice>> {
        let path = format!("/organizations/{}/invoices", organization_id);
        self.transport.get_json(&path).await
    }

    pub async fn generate_invoice(
        &self,
        organization_id: &str,
        booking_ids: &[String],
    ) -> PortalResult<Invoice> {
        if booking_ids.is_empty() {
            return Err(PortalError::validation(
                "Select at least one booking to invoice",
            ));
        }
        let path = format!("/organizations/{}/invoices", organization_id);
        self.transport
            .post_json(&path, &GenerateInvoiceRequest { booking_ids })
            .await
    }

    pub async fn pay_invoice(&self, invoice_id: &str, payment_method_id: &str) -> PortalResult<Payment> {
        let path = format!("/invoices/{}/pay", invoice_id);
        let payment: Payment = self
            .transport
            .post_json(&path, &PayInvoiceRequest { payment_method_id })
            .await?;
        tracing::info!(invoice_id, payment_id = %payment.id, "invoice payment submitted");
        Ok(payment)
    }
}
