//! HTTP client for the Yandex geocoder.

use super::{GeocodeError, Geocoder};
use crate::config::GeocoderConfig;
use crate::model::Coordinate;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

// Only the fields on the path to the first position are modelled.
#[derive(Debug, Deserialize)]
struct Envelope {
    response: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(rename = "GeoObjectCollection")]
    collection: GeoObjectCollection,
}

#[derive(Debug, Deserialize)]
struct GeoObjectCollection {
    #[serde(rename = "featureMember", default)]
    members: Vec<FeatureMember>,
}

#[derive(Debug, Deserialize)]
struct FeatureMember {
    #[serde(rename = "GeoObject")]
    geo_object: GeoObject,
}

#[derive(Debug, Deserialize)]
struct GeoObject {
    #[serde(rename = "Point")]
    point: Point,
}

#[derive(Debug, Deserialize)]
struct Point {
    pos: String,
}

/// Parses a `"lon lat"` position string.
fn parse_pos(pos: &str) -> Result<Coordinate, GeocodeError> {
    let mut parts = pos.split_whitespace();
    let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GeocodeError::Payload(format!("malformed position {pos:?}")));
    };
    let lon: f64 = lon
        .parse()
        .map_err(|_| GeocodeError::Payload(format!("bad longitude {lon:?}")))?;
    let lat: f64 = lat
        .parse()
        .map_err(|_| GeocodeError::Payload(format!("bad latitude {lat:?}")))?;
    Coordinate::from_lon_lat(lon, lat).map_err(|e| GeocodeError::Payload(e.to_string()))
}

/// Geocoder backed by the Yandex HTTP API.
#[derive(Clone)]
pub struct YandexGeocoder {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl YandexGeocoder {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn from_config(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        Self::new(&config.base_url, &config.api_key, config.timeout)
    }
}

impl std::fmt::Debug for YandexGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YandexGeocoder")
            .field("base_url", &self.base_url)
            .field("api_key", &"REDACTED")
            .finish()
    }
}

#[async_trait]
impl Geocoder for YandexGeocoder {
    #[instrument(skip(self))]
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("address", address),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| GeocodeError::Payload(e.to_string()))?;

        let Some(first) = envelope.response.collection.members.into_iter().next() else {
            debug!("No match");
            return Ok(None);
        };
        let coordinate = parse_pos(&first.geo_object.point.pos)?;
        debug!(%coordinate, "Resolved");
        Ok(Some(coordinate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use serde_json::json;
    use std::collections::HashMap;

    fn geocoder(base_url: impl Into<String>, api_key: &str) -> YandexGeocoder {
        YandexGeocoder::new(base_url, api_key, Duration::from_secs(5)).unwrap()
    }

    async fn spawn_server(status: StatusCode, body: serde_json::Value) -> String {
        let app = Router::new().route(
            "/1.x",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let body = body.clone();
                async move {
                    if params.get("format").map(String::as_str) != Some("json")
                        || params.get("api_key").map(String::as_str) != Some("secret")
                    {
                        return (StatusCode::FORBIDDEN, axum::Json(json!({ "error": "bad query" })));
                    }
                    (status, axum::Json(body))
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        format!("http://{addr}/1.x")
    }

    fn collection(positions: &[&str]) -> serde_json::Value {
        let members: Vec<serde_json::Value> = positions
            .iter()
            .map(|pos| json!({ "GeoObject": { "Point": { "pos": pos } } }))
            .collect();
        json!({ "response": { "GeoObjectCollection": { "featureMember": members } } })
    }

    #[tokio::test]
    async fn resolve_takes_first_candidate_in_lon_lat_order() {
        let url = spawn_server(
            StatusCode::OK,
            collection(&["37.617698 55.755864", "30.315868 59.939095"]),
        )
        .await;
        let geocoder = geocoder(url, "secret");

        let coordinate = geocoder.resolve("Moscow").await.unwrap().unwrap();
        assert_eq!(coordinate.latitude(), 55.755864);
        assert_eq!(coordinate.longitude(), 37.617698);
    }

    #[tokio::test]
    async fn resolve_empty_collection_is_unresolved() {
        let url = spawn_server(StatusCode::OK, collection(&[])).await;
        let geocoder = geocoder(url, "secret");

        assert_eq!(geocoder.resolve("nowhere").await.unwrap(), None);
    }

    #[tokio::test]
    async fn resolve_maps_error_status() {
        let url = spawn_server(StatusCode::OK, collection(&[])).await;
        let geocoder = geocoder(url, "wrong-key");

        let err = geocoder.resolve("Moscow").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn resolve_rejects_malformed_payload() {
        let url = spawn_server(StatusCode::OK, json!({ "unexpected": true })).await;
        let geocoder = geocoder(url, "secret");

        let err = geocoder.resolve("Moscow").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Payload(_)));
    }

    #[tokio::test]
    async fn resolve_maps_connection_failure_to_transport() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let geocoder =
            geocoder(format!("http://{addr}/1.x"), "secret");
        let err = geocoder.resolve("Moscow").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Transport(_)));
    }

    #[test]
    fn parse_pos_rejects_garbage() {
        assert!(parse_pos("37.6").is_err());
        assert!(parse_pos("abc 55.7").is_err());
        assert!(parse_pos("37.6 95.0").is_err());
        assert!(parse_pos("37.6 55.7 1").is_err());
    }
}
