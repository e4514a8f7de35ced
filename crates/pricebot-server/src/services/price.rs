use std::time::Duration;

const QUOTE_CURRENCY: &str = "usd";

#[derive(Debug, Clone)]
pub struct Service {
    client: reqwest::Client,
    api_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("quote API responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed quote response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no {currency} quote for '{asset}' in response")]
    MissingQuote { asset: String, currency: &'static str },
}

impl Service {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("pricebot/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the USD price of `asset_id`, or an `Error fetching price: ...` line when the quote
    /// cannot be obtained. Never fails.
    #[tracing::instrument]
    pub async fn fetch_price(&self, asset_id: &str) -> String {
        match self.quote(asset_id).await {
            Ok(price) => price.to_string(),
            Err(err) => {
                tracing::warn!("Failed to fetch price for {}: {}", asset_id, err);
                format!("Error fetching price: {}", err)
            }
        }
    }

    /// Fetches the USD quote for `asset_id`, keeping the number exactly as the API serialized it.
    #[tracing::instrument]
    pub async fn quote(&self, asset_id: &str) -> Result<serde_json::Number, Error> {
        let response = self.client
            .get(format!("{}/simple/price", self.api_url))
            .query(&[("ids", asset_id), ("vs_currencies", QUOTE_CURRENCY)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body = response.text().await?;
        let quotes: serde_json::Value = serde_json::from_str(&body)?;

        // other keys in the body are ignored, only `<asset>.usd` matters
        quotes
            .get(asset_id)
            .and_then(|quote| quote.get(QUOTE_CURRENCY))
            .and_then(|price| match price {
                serde_json::Value::Number(price) => Some(price.clone()),
                _ => None,
            })
            .ok_or_else(|| Error::MissingQuote {
                asset: asset_id.to_string(),
                currency: QUOTE_CURRENCY,
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn service_for(server: &MockServer, timeout: Duration) -> Service {
        Service::new(format!("{}/api/v3/", server.uri()), timeout).unwrap()
    }

    async fn mount_body(server: &MockServer, asset: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .and(query_param("ids", asset))
            .and(query_param("vs_currencies", "usd"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn returns_the_price_as_serialized() {
        let server = MockServer::start().await;
        mount_body(&server, "solana", r#"{"solana":{"usd":142.37}}"#).await;

        let service = service_for(&server, Duration::from_secs(5));
        assert_eq!(service.fetch_price("solana").await, "142.37");
    }

    #[tokio::test]
    async fn integer_prices_keep_their_shape() {
        let server = MockServer::start().await;
        mount_body(&server, "bitcoin", r#"{"bitcoin":{"usd":67012}}"#).await;

        let service = service_for(&server, Duration::from_secs(5));
        assert_eq!(service.fetch_price("bitcoin").await, "67012");
    }

    #[tokio::test]
    async fn malformed_body_becomes_error_string() {
        let server = MockServer::start().await;
        mount_body(&server, "bitcoin", "<html>rate limited</html>").await;

        let service = service_for(&server, Duration::from_secs(5));
        let price = service.fetch_price("bitcoin").await;
        assert!(price.starts_with("Error fetching price:"), "{}", price);
    }

    #[tokio::test]
    async fn missing_asset_is_reported() {
        let server = MockServer::start().await;
        mount_body(&server, "bitcoin", r#"{"ethereum":{"usd":3100.5}}"#).await;

        let service = service_for(&server, Duration::from_secs(5));
        let err = service.quote("bitcoin").await.unwrap_err();
        assert!(matches!(err, Error::MissingQuote { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn unrelated_keys_do_not_break_parsing() {
        let server = MockServer::start().await;
        mount_body(&server, "bitcoin", r#"{"bitcoin":{"usd":67012.5,"usd_24h_vol":"n/a"},"status":"ok"}"#).await;

        let service = service_for(&server, Duration::from_secs(5));
        assert_eq!(service.fetch_price("bitcoin").await, "67012.5");
    }

    #[tokio::test]
    async fn non_numeric_usd_is_reported() {
        let server = MockServer::start().await;
        mount_body(&server, "bitcoin", r#"{"bitcoin":{"usd":"67012.5"}}"#).await;

        let service = service_for(&server, Duration::from_secs(5));
        let err = service.quote("bitcoin").await.unwrap_err();
        assert!(matches!(err, Error::MissingQuote { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn missing_usd_field_is_reported() {
        let server = MockServer::start().await;
        mount_body(&server, "bitcoin", r#"{"bitcoin":{"eur":61000}}"#).await;

        let service = service_for(&server, Duration::from_secs(5));
        let price = service.fetch_price("bitcoin").await;
        assert_eq!(price, "Error fetching price: no usd quote for 'bitcoin' in response");
    }

    #[tokio::test]
    async fn non_success_status_becomes_error_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let service = service_for(&server, Duration::from_secs(5));
        let err = service.quote("bitcoin").await.unwrap_err();
        assert!(matches!(err, Error::Status(status) if status.as_u16() == 429));
        assert!(service.fetch_price("bitcoin").await.starts_with("Error fetching price:"));
    }

    #[tokio::test]
    async fn timeout_becomes_error_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"bitcoin":{"usd":1}}"#)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let service = service_for(&server, Duration::from_millis(200));
        let err = service.quote("bitcoin").await.unwrap_err();
        assert!(matches!(&err, Error::Request(e) if e.is_timeout()), "{:?}", err);
        assert!(service.fetch_price("bitcoin").await.starts_with("Error fetching price:"));
    }
}
