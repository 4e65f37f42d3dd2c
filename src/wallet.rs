// Agent wallet: balance, recent transactions and gateway-backed recharges

use crate::config::PortalConfig;
use crate::error::{PortalError, PortalResult};
use crate::http::HttpTransport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const WALLET_RECHARGE: &str = "wallet_recharge";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WalletBalance {
    pub balance: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Credit,
    Debit,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WalletTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<String>,
}

impl WalletTransaction {
    // Signed effect on the balance
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Credit => self.amount,
            TransactionType::Debit => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStats {
    pub month_spent: f64,
    pub total_transactions: u64,
    pub avg_transaction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletOverview {
    pub balance: WalletBalance,
    pub transactions: Vec<WalletTransaction>,
    pub stats: WalletStats,
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    amount: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RechargeOrder {
    pub order_id: String,
    pub key_id: String,
}

/// Parameters handed to the payment gateway checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RechargeCheckout {
    pub key: String,
    pub order_id: String,
    /// Amount in the smallest currency unit (paise for INR).
    pub amount: u64,
    pub currency: String,
    pub description: String,
}

/// Gateway callback values returned to us after checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl PaymentVerification {
    pub fn wallet_recharge(order_id: &str, payment_id: &str, signature: &str) -> Self {
        Self {
            order_id: order_id.to_string(),
            payment_id: payment_id.to_string(),
            signature: signature.to_string(),
            kind: WALLET_RECHARGE.to_string(),
        }
    }
}

pub struct WalletClient {
    transport: Arc<HttpTransport>,
    min_recharge: f64,
    max_recharge: f64,
    currency: String,
    page_size: u32,
}

impl WalletClient {
    pub fn new(transport: Arc<HttpTransport>, config: &PortalConfig) -> Self {
        Self {
            transport,
            min_recharge: config.min_recharge_amount,
            max_recharge: config.max_recharge_amount,
            currency: config.currency.clone(),
            page_size: config.transactions_page_size,
        }
    }

    pub async fn balance(&self) -> PortalResult<WalletBalance> {
        self.transport.get_envelope("/wallet/balance").await
    }

    pub async fn transactions(&self, limit: u32) -> PortalResult<Vec<WalletTransaction>> {
        let path = format!("/wallet/transactions?limit={}", limit);
        self.transport.get_envelope(&path).await
    }

    pub async fn stats(&self) -> PortalResult<WalletStats> {
        self.transport.get_envelope("/wallet/stats").await
    }

    // The three wallet panels load together and fail together
    pub async fn overview(&self) -> PortalResult<WalletOverview> {
        let (balance, transactions, stats) = futures::try_join!(
            self.balance(),
            self.transactions(self.page_size),
            self.stats(),
        )?;
        Ok(WalletOverview {
            balance,
            transactions,
            stats,
        })
    }

    pub fn validate_recharge(&self, amount: f64) -> PortalResult<()> {
        if !amount.is_finite() || amount < self.min_recharge {
            return Err(PortalError::validation(format!(
                "Minimum recharge amount is {} {}",
                self.currency, self.min_recharge
            )));
        }
        if amount > self.max_recharge {
            return Err(PortalError::validation(format!(
                "Maximum recharge amount is {} {}",
                self.currency, self.max_recharge
            )));
        }
        Ok(())
    }

    /// Creates a gateway order for a recharge and returns what the checkout
    /// needs to collect the payment.
    pub async fn create_recharge_order(&self, amount: f64) -> PortalResult<RechargeCheckout> {
        self.validate_recharge(amount)?;

        let order: RechargeOrder = self
            .transport
            .post_envelope("/wallet/recharge/create-order", &CreateOrderRequest { amount })
            .await?;
        if order.order_id.trim().is_empty() {
            return Err(PortalError::MalformedResponse(
                "recharge order has no orderId".to_string(),
            ));
        }
        tracing::info!(order_id = %order.order_id, amount, "wallet recharge order created");

        Ok(RechargeCheckout {
            key: order.key_id,
            order_id: order.order_id,
            amount: (amount * 100.0).round() as u64,
            currency: self.currency.clone(),
            description: "Wallet Recharge".to_string(),
        })
    }

    pub async fn verify_payment(&self, verification: &PaymentVerification) -> PortalResult<()> {
        let _: serde_json::Value = self
            .transport
            .post_envelope("/payment/verify", verification)
            .await?;
        tracing::info!(order_id = %verification.order_id, "payment verified");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> WalletClient {
        let config = PortalConfig::default().with_base_url(base_url);
        let transport = Arc::new(HttpTransport::new(&config).unwrap());
        WalletClient::new(transport, &config)
    }

    fn success(data: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({ "status": "success", "data": data }))
    }

    #[test_case(0.0, false; "zero")]
    #[test_case(0.5, false; "below minimum")]
    #[test_case(1.0, true; "minimum")]
    #[test_case(100_000.0, true; "maximum")]
    #[test_case(100_000.01, false; "above maximum")]
    #[test_case(f64::NAN, false; "not a number")]
    fn test_recharge_bounds(amount: f64, valid: bool) {
        let wallet = client("http://localhost:5000/api");
        assert_eq!(wallet.validate_recharge(amount).is_ok(), valid);
    }

    #[tokio::test]
    async fn test_overview_loads_all_panels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wallet/balance"))
            .respond_with(success(json!({ "balance": 25000.5 })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wallet/transactions"))
            .and(query_param("limit", "10"))
            .respond_with(success(json!([
                {
                    "id": "t1",
                    "type": "debit",
                    "amount": 5012.5,
                    "description": "Booking QX7K2M",
                    "created_at": "2025-05-20T10:15:00Z",
                    "status": "completed"
                },
                {
                    "id": "t2",
                    "type": "credit",
                    "amount": 10000,
                    "description": "Wallet recharge",
                    "created_at": "2025-05-19T08:00:00Z"
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wallet/stats"))
            .respond_with(success(json!({
                "monthSpent": 5012.5,
                "totalTransactions": 2,
                "avgTransaction": 7506.25
            })))
            .mount(&server)
            .await;

        let overview = client(&server.uri()).overview().await.unwrap();
        assert_eq!(overview.balance.balance, 25000.5);
        assert_eq!(overview.transactions.len(), 2);
        assert_eq!(overview.transactions[0].signed_amount(), -5012.5);
        assert_eq!(overview.transactions[1].kind, TransactionType::Credit);
        assert_eq!(overview.stats.total_transactions, 2);
    }

    #[tokio::test]
    async fn test_recharge_order_converts_to_paise() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/wallet/recharge/create-order"))
            .and(body_json(json!({ "amount": 2500.75 })))
            .respond_with(success(json!({ "orderId": "order_Nx1", "keyId": "rzp_test_key" })))
            .expect(1)
            .mount(&server)
            .await;

        let checkout = client(&server.uri())
            .create_recharge_order(2500.75)
            .await
            .unwrap();
        assert_eq!(checkout.amount, 250_075);
        assert_eq!(checkout.order_id, "order_Nx1");
        assert_eq!(checkout.key, "rzp_test_key");
        assert_eq!(checkout.currency, "INR");
    }

    #[tokio::test]
    async fn test_out_of_range_recharge_never_hits_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(success(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .create_recharge_order(250_000.0)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_verify_payment_sends_wallet_recharge_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment/verify"))
            .and(body_json(json!({
                "orderId": "order_Nx1",
                "paymentId": "pay_Q2",
                "signature": "c0ffee",
                "type": "wallet_recharge"
            })))
            .respond_with(success(json!({ "verified": true })))
            .expect(1)
            .mount(&server)
            .await;

        let verification = PaymentVerification::wallet_recharge("order_Nx1", "pay_Q2", "c0ffee");
        client(&server.uri())
            .verify_payment(&verification)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_verification_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment/verify"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "Invalid signature"
            })))
            .mount(&server)
            .await;

        let verification = PaymentVerification::wallet_recharge("order_Nx1", "pay_Q2", "bad");
        let err = client(&server.uri())
            .verify_payment(&verification)
            .await
            .unwrap_err();
        assert_eq!(err.banner("Payment verification failed"), "Invalid signature");
    }
}
