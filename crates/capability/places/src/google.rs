//! 基于 reqwest 的上游地点服务实现。

use crate::error::PlacesError;
use crate::provider::{NearbySearchParams, PlacesProvider};
use api_contract::{
    DirectionsDto, NearbySearchResponse, PlaceDetailsDto, PlaceSummaryDto, RouteDto, STATUS_OK,
    STATUS_ZERO_RESULTS,
};
use finder_telemetry::{record_upstream_failure, record_upstream_request};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// 详情查询请求的字段。
const DETAIL_FIELDS: &str =
    "name,rating,formatted_phone_number,formatted_address,opening_hours,website,photos,types,geometry";

/// 客户端参数。
#[derive(Debug, Clone)]
pub struct PlacesSettings {
    pub api_key: String,
    pub base_url: String,
    pub language: String,
    pub photo_max_width: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct NearbyEnvelope {
    status: String,
    #[serde(default)]
    results: Vec<PlaceSummaryDto>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsEnvelope {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetailsDto>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsEnvelope {
    status: String,
    #[serde(default)]
    routes: Vec<RouteDto>,
    #[serde(default)]
    error_message: Option<String>,
}

/// 上游地点服务客户端。
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    settings: PlacesSettings,
}

impl GooglePlacesClient {
    pub fn new(settings: PlacesSettings) -> Result<Self, PlacesError> {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(Duration::from_secs(settings.timeout_seconds.max(1)))
            .build()
            .map_err(|err| PlacesError::Http(err.to_string()))?;
        let settings = PlacesSettings {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            ..settings
        };
        Ok(Self { http, settings })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, PlacesError> {
        let url = format!("{}/{}", self.settings.base_url, path);
        record_upstream_request();
        debug!(target: "finder.places", path, "upstream_request");

        let resp = self.http.get(&url).query(query).send().await.map_err(|err| {
            record_upstream_failure();
            warn!(target: "finder.places", path, error = %err, "upstream_transport_failed");
            PlacesError::Http(err.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            record_upstream_failure();
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(300).collect();
            warn!(target: "finder.places", path, status = status.as_u16(), "upstream_http_status");
            return Err(PlacesError::Http(format!("{} returned {}: {}", path, status, snippet)));
        }

        resp.json::<T>().await.map_err(|err| {
            record_upstream_failure();
            PlacesError::Decode(err.to_string())
        })
    }
}

#[async_trait::async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn nearby_search(
        &self,
        params: &NearbySearchParams,
    ) -> Result<NearbySearchResponse, PlacesError> {
        let query = nearby_query(params, &self.settings);
        let envelope: NearbyEnvelope = self.get_json("place/nearbysearch/json", &query).await?;
        let result = nearby_from_envelope(envelope);
        if let Err(err) = &result {
            record_upstream_failure();
            warn!(target: "finder.places", error = %err, "nearby_search_rejected");
        }
        result
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsDto, PlacesError> {
        let query = vec![
            ("place_id", place_id.to_string()),
            ("fields", DETAIL_FIELDS.to_string()),
            ("key", self.settings.api_key.clone()),
            ("language", self.settings.language.clone()),
        ];
        let envelope: DetailsEnvelope = self.get_json("place/details/json", &query).await?;
        let result = details_from_envelope(envelope);
        match &result {
            Ok(_) => debug!(target: "finder.places", place_id, "place_details_fetched"),
            Err(err) => {
                record_upstream_failure();
                warn!(target: "finder.places", place_id, error = %err, "place_details_rejected");
            }
        }
        result
    }

    fn photo_url(&self, photo_reference: &str) -> Result<String, PlacesError> {
        build_photo_url(&self.settings, photo_reference)
    }

    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        travel_mode: &str,
    ) -> Result<DirectionsDto, PlacesError> {
        let query = vec![
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", travel_mode.to_ascii_lowercase()),
            ("key", self.settings.api_key.clone()),
            ("language", self.settings.language.clone()),
        ];
        let envelope: DirectionsEnvelope = self.get_json("directions/json", &query).await?;
        let result = directions_from_envelope(envelope);
        if let Err(err) = &result {
            record_upstream_failure();
            warn!(target: "finder.places", error = %err, "directions_rejected");
        }
        result
    }
}

fn nearby_query(
    params: &NearbySearchParams,
    settings: &PlacesSettings,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        (
            "location",
            format!("{},{}", params.location.lat, params.location.lng),
        ),
        ("radius", params.radius_m.to_string()),
    ];
    if let Some(facility_type) = params
        .facility_type
        .as_deref()
        .filter(|value| !value.is_empty())
    {
        query.push(("type", facility_type.to_string()));
    }
    if params.open_now {
        query.push(("opennow", "true".to_string()));
    }
    query.push(("key", settings.api_key.clone()));
    query.push(("language", settings.language.clone()));
    query
}

fn build_photo_url(settings: &PlacesSettings, photo_reference: &str) -> Result<String, PlacesError> {
    let base = format!("{}/place/photo", settings.base_url);
    let url = reqwest::Url::parse_with_params(
        &base,
        &[
            ("maxwidth", settings.photo_max_width.to_string()),
            ("photoreference", photo_reference.to_string()),
            ("key", settings.api_key.clone()),
        ],
    )
    .map_err(|err| PlacesError::Http(format!("invalid photo url: {}", err)))?;
    Ok(url.to_string())
}

fn status_error(status: String, error_message: Option<String>) -> PlacesError {
    PlacesError::Status {
        message: error_message.unwrap_or_else(|| status.clone()),
        status,
    }
}

fn nearby_from_envelope(envelope: NearbyEnvelope) -> Result<NearbySearchResponse, PlacesError> {
    match envelope.status.as_str() {
        STATUS_OK => Ok(NearbySearchResponse {
            status: envelope.status,
            results: envelope.results,
        }),
        STATUS_ZERO_RESULTS => Ok(NearbySearchResponse {
            status: envelope.status,
            results: Vec::new(),
        }),
        _ => Err(status_error(envelope.status, envelope.error_message)),
    }
}

fn details_from_envelope(envelope: DetailsEnvelope) -> Result<PlaceDetailsDto, PlacesError> {
    if envelope.status != STATUS_OK {
        return Err(status_error(envelope.status, envelope.error_message));
    }
    envelope
        .result
        .ok_or_else(|| PlacesError::Decode("details result missing".to_string()))
}

fn directions_from_envelope(envelope: DirectionsEnvelope) -> Result<DirectionsDto, PlacesError> {
    if envelope.status != STATUS_OK {
        return Err(status_error(envelope.status, envelope.error_message));
    }
    Ok(DirectionsDto {
        status: envelope.status,
        routes: envelope.routes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::LatLng;

    fn settings() -> PlacesSettings {
        PlacesSettings {
            api_key: "test-key".to_string(),
            base_url: "https://maps.example.com/maps/api".to_string(),
            language: "ko".to_string(),
            photo_max_width: 400,
            timeout_seconds: 5,
        }
    }

    #[test]
    fn photo_url_contains_width_reference_and_key() {
        let url = build_photo_url(&settings(), "ref/abc").expect("url");
        assert!(url.starts_with("https://maps.example.com/maps/api/place/photo?"));
        assert!(url.contains("maxwidth=400"));
        assert!(url.contains("photoreference=ref%2Fabc"));
        assert!(url.contains("key=test-key"));
    }

    #[test]
    fn nearby_query_skips_empty_type_and_closed_flag() {
        let params = NearbySearchParams {
            location: LatLng::new(37.5, 127.0),
            radius_m: 1500,
            facility_type: Some(String::new()),
            open_now: false,
        };
        let query = nearby_query(&params, &settings());
        let keys: Vec<&str> = query.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["location", "radius", "key", "language"]);
        assert_eq!(query[0].1, "37.5,127");
    }

    #[test]
    fn nearby_query_includes_type_and_opennow() {
        let params = NearbySearchParams {
            location: LatLng::new(37.5, 127.0),
            radius_m: 500,
            facility_type: Some("library".to_string()),
            open_now: true,
        };
        let query = nearby_query(&params, &settings());
        assert!(query.contains(&("type", "library".to_string())));
        assert!(query.contains(&("opennow", "true".to_string())));
    }

    #[test]
    fn nearby_zero_results_is_not_an_error() {
        let envelope: NearbyEnvelope =
            serde_json::from_str(r#"{"status":"ZERO_RESULTS","results":[]}"#).expect("json");
        let response = nearby_from_envelope(envelope).expect("ok");
        assert_eq!(response.status, STATUS_ZERO_RESULTS);
        assert!(response.results.is_empty());
    }

    #[test]
    fn nearby_other_status_maps_to_status_error() {
        let envelope: NearbyEnvelope = serde_json::from_str(
            r#"{"status":"OVER_QUERY_LIMIT","error_message":"quota exceeded"}"#,
        )
        .expect("json");
        let err = nearby_from_envelope(envelope).expect_err("status error");
        assert_eq!(err.upstream_status(), Some("OVER_QUERY_LIMIT"));
        assert_eq!(
            err,
            PlacesError::Status {
                status: "OVER_QUERY_LIMIT".to_string(),
                message: "quota exceeded".to_string(),
            }
        );
    }

    #[test]
    fn details_ok_without_result_is_decode_error() {
        let envelope: DetailsEnvelope = serde_json::from_str(r#"{"status":"OK"}"#).expect("json");
        assert!(matches!(
            details_from_envelope(envelope),
            Err(PlacesError::Decode(_))
        ));
    }

    #[test]
    fn details_open_now_is_read_from_result() {
        let envelope: DetailsEnvelope = serde_json::from_str(
            r#"{"status":"OK","result":{"name":"Library","opening_hours":{"open_now":true}}}"#,
        )
        .expect("json");
        let details = details_from_envelope(envelope).expect("details");
        assert!(details.is_open_now());
    }

    #[test]
    fn directions_zero_results_is_status_error() {
        let envelope: DirectionsEnvelope =
            serde_json::from_str(r#"{"status":"ZERO_RESULTS","routes":[]}"#).expect("json");
        let err = directions_from_envelope(envelope).expect_err("status error");
        assert_eq!(err.upstream_status(), Some("ZERO_RESULTS"));
    }
}
