//! Quote proxy client
//!
//! API: GET {base_url}/{SYMBOL}/quote
//! Known symbols answer with an object carrying `latestPrice`; unknown ones
//! answer with a bare JSON string such as "Unknown symbol".

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{QuoteError, QuoteSource};
use crate::core::Symbol;
use crate::infrastructure::config::QuoteConfig;

/// Default quote proxy
pub const DEFAULT_BASE_URL: &str = "https://stock-price-checker-proxy.freecodecamp.rocks/v1/stock";

pub struct HttpQuoteClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpQuoteClient {
    /// Create a client for the configured proxy
    pub fn new(config: &QuoteConfig) -> Result<Self, QuoteError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| QuoteError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(QuoteError::InvalidUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("stock-price-checker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// URL of the quote resource for a symbol
    pub fn quote_url(&self, symbol: &Symbol) -> Result<Url, QuoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| QuoteError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(symbol.as_str())
            .push("quote");
        Ok(url)
    }
}

impl QuoteSource for HttpQuoteClient {
    async fn latest_price(&self, symbol: &Symbol) -> Result<f64, QuoteError> {
        let url = self.quote_url(symbol)?;

        crate::log_quotes!(tracing::Level::DEBUG, %url, "Fetching quote");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(QuoteError::Http(response.status().as_u16()));
        }

        let payload: QuotePayload = response
            .json()
            .await
            .map_err(|e| QuoteError::Parse(e.to_string()))?;

        extract_price(symbol, payload)
    }
}

fn extract_price(symbol: &Symbol, payload: QuotePayload) -> Result<f64, QuoteError> {
    match payload {
        QuotePayload::Quote(QuoteResponse {
            latest_price: Some(price),
        }) if price.is_finite() => Ok(price),
        QuotePayload::Quote(_) => Err(QuoteError::UnknownSymbol(symbol.to_string())),
        QuotePayload::Message(msg) => {
            crate::log_quotes!(tracing::Level::WARN, symbol = %symbol, %msg, "Quote proxy refused symbol");
            Err(QuoteError::UnknownSymbol(symbol.to_string()))
        }
    }
}

// === API Response Types ===

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuotePayload {
    Quote(QuoteResponse),
    Message(String),
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "latestPrice")]
    latest_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpQuoteClient {
        HttpQuoteClient::new(&QuoteConfig {
            base_url: base.to_string(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_quote_url() {
        let symbol = Symbol::parse("goog").unwrap();
        assert_eq!(
            client(DEFAULT_BASE_URL).quote_url(&symbol).unwrap().as_str(),
            "https://stock-price-checker-proxy.freecodecamp.rocks/v1/stock/GOOG/quote"
        );
        assert_eq!(
            client("http://localhost:8080/v1/stock/").quote_url(&symbol).unwrap().as_str(),
            "http://localhost:8080/v1/stock/GOOG/quote"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = QuoteConfig {
            base_url: "not a url".to_string(),
            timeout_secs: 1,
        };
        assert!(matches!(
            HttpQuoteClient::new(&config),
            Err(QuoteError::InvalidUrl(_))
        ));

        let config = QuoteConfig {
            base_url: "mailto:quotes@example.com".to_string(),
            timeout_secs: 1,
        };
        assert!(HttpQuoteClient::new(&config).is_err());
    }

    #[test]
    fn test_quote_payload_deserialize() {
        let json = r#"{"symbol":"GOOG","latestPrice":172.63,"change":1.2}"#;
        let payload: QuotePayload = serde_json::from_str(json).unwrap();
        let symbol = Symbol::parse("GOOG").unwrap();
        assert_eq!(extract_price(&symbol, payload).unwrap(), 172.63);
    }

    #[test]
    fn test_unknown_symbol_payload() {
        let symbol = Symbol::parse("ZZZZ").unwrap();

        let payload: QuotePayload = serde_json::from_str(r#""Unknown symbol""#).unwrap();
        assert!(matches!(
            extract_price(&symbol, payload),
            Err(QuoteError::UnknownSymbol(_))
        ));

        let payload: QuotePayload = serde_json::from_str(r#"{"symbol":"ZZZZ"}"#).unwrap();
        assert!(matches!(
            extract_price(&symbol, payload),
            Err(QuoteError::UnknownSymbol(_))
        ));
    }
}
