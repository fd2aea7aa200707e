use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::{Coordinates, WeatherReading};

/// Versioned root of the Tomorrow.io API.
pub const BASE_URL: &str = "https://api.tomorrow.io/v4";

/// Failure of a single fetch. Everything the transport or the parser can
/// go wrong with is converted here; nothing propagates as a panic.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, timeout, or a non-2xx status.
    #[error("network failure: {0}")]
    Network(String),

    /// The provider answered, but the body did not match the expected schema.
    #[error("unexpected response: {0}")]
    Parse(String),
}

/// Seam between the load-state machine and the actual provider, so the
/// machine can be driven by a test double.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        location: &Coordinates,
    ) -> Result<WeatherReading, FetchError>;
}

/// Realtime-weather client for Tomorrow.io.
///
/// One `GET {base}/weather/realtime?location=..&apikey=..` per call. No
/// retries, no caching, transport-default timeout. The key is held as an
/// opaque secret and never logged.
#[derive(Debug, Clone)]
pub struct TomorrowClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl TomorrowClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Point the client at a different root, e.g. a proxy.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherClient for TomorrowClient {
    async fn fetch_current(
        &self,
        location: &Coordinates,
    ) -> Result<WeatherReading, FetchError> {
        if location.as_str().is_empty() {
            return Err(FetchError::Network("location must not be empty".to_string()));
        }
        if self.api_key.is_empty() {
            return Err(FetchError::Network("api key must not be empty".to_string()));
        }

        let url = format!("{}/weather/realtime", self.base_url.trim_end_matches('/'));

        let res = self
            .http
            .get(&url)
            .query(&[("location", location.as_str()), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "realtime request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        parse_realtime_body(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RealtimeResponse {
    data: RealtimeData,
}

#[derive(Debug, Deserialize)]
struct RealtimeData {
    values: RealtimeValues,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RealtimeValues {
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    weather_code: i32,
}

/// Parse a realtime response body. All four leaf fields are required;
/// anything missing or mistyped is a `Parse` failure.
fn parse_realtime_body(body: &str) -> Result<WeatherReading, FetchError> {
    let parsed: RealtimeResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let values = parsed.data.values;

    Ok(WeatherReading {
        temperature_c: values.temperature,
        humidity_pct: values.humidity,
        wind_speed_kmh: values.wind_speed,
        condition_code: values.weather_code,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Back off to a char boundary; MAX may land inside a multibyte
        // character in an accented provider message.
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        r#"{"data":{"values":{"temperature":21.5,"humidity":60,"windSpeed":10,"weatherCode":1000}}}"#;

    #[test]
    fn parses_schema_conformant_body_exactly() {
        let reading = parse_realtime_body(SAMPLE).expect("sample body must parse");

        assert_eq!(reading.temperature_c, 21.5);
        assert_eq!(reading.humidity_pct, 60.0);
        assert_eq!(reading.wind_speed_kmh, 10.0);
        assert_eq!(reading.condition_code, 1000);
    }

    #[test]
    fn ignores_extra_provider_fields() {
        let body = r#"{"data":{"values":{"temperature":3.0,"humidity":80,"windSpeed":25.2,
            "weatherCode":4201,"uvIndex":1}},"location":{"lat":20.2767,"lon":-97.96}}"#;

        let reading = parse_realtime_body(body).expect("extra fields must not fail parsing");
        assert_eq!(reading.condition_code, 4201);
    }

    #[test]
    fn missing_leaf_field_is_a_parse_failure() {
        let body = r#"{"data":{"values":{"temperature":21.5,"humidity":60,"windSpeed":10}}}"#;

        let err = parse_realtime_body(body).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
        assert!(err.to_string().contains("weatherCode"));
    }

    #[test]
    fn mistyped_leaf_field_is_a_parse_failure() {
        let body = r#"{"data":{"values":{"temperature":"warm","humidity":60,
            "windSpeed":10,"weatherCode":1000}}}"#;

        let err = parse_realtime_body(body).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn fractional_weather_code_is_a_parse_failure() {
        let body = r#"{"data":{"values":{"temperature":21.5,"humidity":60,
            "windSpeed":10,"weatherCode":1000.5}}}"#;

        let err = parse_realtime_body(body).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        let err = parse_realtime_body("not json at all").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn missing_envelope_is_a_parse_failure() {
        let err = parse_realtime_body(r#"{"values":{"temperature":21.5}}"#).unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = format!("{}ñublado y más texto", "x".repeat(199));

        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.starts_with("x"));
        assert!(!truncated.contains('ñ'));
    }

    #[test]
    fn short_body_is_not_truncated() {
        assert_eq!(truncate_body("Invalid API key"), "Invalid API key");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_failure() {
        // Reserve an ephemeral port, then drop the listener so the
        // connection is refused without touching the real provider.
        let port = {
            let listener =
                std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
            listener.local_addr().expect("listener address").port()
        };
        let client =
            TomorrowClient::with_base_url("KEY".to_string(), format!("http://127.0.0.1:{port}"));

        let err = client
            .fetch_current(&Coordinates::new("20.2767,-97.960"))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn empty_location_is_rejected_before_any_request() {
        let client = TomorrowClient::new("KEY".to_string());

        let err = client.fetch_current(&Coordinates::new("")).await.unwrap_err();
        assert!(err.to_string().contains("location must not be empty"));
    }
}
