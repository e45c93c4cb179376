//! 后端 REST 接口。

use crate::error::ClientError;
use api_contract::{
    ApiResponse, CongestionAverageDto, DirectionsDto, DirectionsRequest, NearbySearchQuery,
    NearbySearchResponse, OpenStatusRecordDto, PhotoUrlDto, PlaceDetailsDto, StatusCheckRequest,
};
use async_trait::async_trait;
use domain::LatLng;
use finder_config::ClientConfig;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const UPSTREAM_CODE_PREFIX: &str = "UPSTREAM.";
const UPSTREAM_UNAVAILABLE: &str = "UPSTREAM.UNAVAILABLE";
const INVALID_REQUEST: &str = "INVALID.REQUEST";

#[async_trait]
pub trait FacilityBackend: Send + Sync {
    /// 附近搜索；`OK` 与 `ZERO_RESULTS` 都以 `Ok` 返回。
    async fn nearby_search(
        &self,
        query: &NearbySearchQuery,
    ) -> Result<NearbySearchResponse, ClientError>;

    async fn facility_details(&self, place_id: &str) -> Result<PlaceDetailsDto, ClientError>;

    async fn photo_url(&self, photo_reference: &str) -> Result<String, ClientError>;

    async fn congestion_average(
        &self,
        place_id: &str,
    ) -> Result<CongestionAverageDto, ClientError>;

    /// 写入一条营业状态记录。
    async fn record_status(
        &self,
        place_id: &str,
        facility_name: &str,
        is_open: bool,
    ) -> Result<OpenStatusRecordDto, ClientError>;

    async fn status_log(&self) -> Result<Vec<OpenStatusRecordDto>, ClientError>;

    async fn directions(
        &self,
        origin: LatLng,
        destination: LatLng,
        travel_mode: &str,
    ) -> Result<DirectionsDto, ClientError>;
}

/// 基于 reqwest 的后端实现。
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds.max(1)))
            .build()
            .map_err(|err| ClientError::Backend(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 按路径段拼接 URL，每段单独转义（设施 ID 中的 `/`、`?` 不会改变路由）。
    fn segment_url(&self, segments: &[&str]) -> Result<reqwest::Url, ClientError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|err| ClientError::Validation(format!("invalid backend url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Validation("backend url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let resp = request
            .send()
            .await
            .map_err(|err| ClientError::Backend(err.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| ClientError::Backend(err.to_string()))?;
        debug!(target: "finder.client", status = status.as_u16(), "backend_response");
        decode_envelope(status.as_u16(), &body)
    }
}

/// 解析 `ApiResponse` 封装并映射错误码。
fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ClientError> {
    let envelope: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(err) if (200..300).contains(&status) => {
            return Err(ClientError::Decode(err.to_string()));
        }
        Err(_) => return Err(ClientError::Backend(format!("http status {}", status))),
    };

    if envelope.success {
        return envelope
            .data
            .ok_or_else(|| ClientError::Decode("response data missing".to_string()));
    }

    let Some(error) = envelope.error else {
        return Err(ClientError::Backend(format!("http status {}", status)));
    };
    if error.code == INVALID_REQUEST {
        return Err(ClientError::Validation(error.message));
    }
    if error.code != UPSTREAM_UNAVAILABLE
        && let Some(upstream) = error.code.strip_prefix(UPSTREAM_CODE_PREFIX)
    {
        return Err(ClientError::Upstream {
            status: upstream.to_string(),
            message: error.message,
        });
    }
    Err(ClientError::Backend(format!("{}: {}", error.code, error.message)))
}

fn format_lat_lng(location: LatLng) -> String {
    format!("{},{}", location.lat, location.lng)
}

#[async_trait]
impl FacilityBackend for HttpBackend {
    async fn nearby_search(
        &self,
        query: &NearbySearchQuery,
    ) -> Result<NearbySearchResponse, ClientError> {
        let request = self
            .http
            .get(self.url("/routes/facilities/nearby"))
            .query(query);
        self.send(request).await
    }

    async fn facility_details(&self, place_id: &str) -> Result<PlaceDetailsDto, ClientError> {
        let request = self
            .http
            .get(self.url("/routes/facilities/details"))
            .query(&[("placeId", place_id)]);
        self.send(request).await
    }

    async fn photo_url(&self, photo_reference: &str) -> Result<String, ClientError> {
        let request = self
            .http
            .get(self.url("/routes/facilities/photo"))
            .query(&[("photoReference", photo_reference)]);
        let dto: PhotoUrlDto = self.send(request).await?;
        Ok(dto.url)
    }

    async fn congestion_average(
        &self,
        place_id: &str,
    ) -> Result<CongestionAverageDto, ClientError> {
        let request = self
            .http
            .get(self.url("/routes/facilities/congestion/average"))
            .query(&[("placeId", place_id)]);
        self.send(request).await
    }

    async fn record_status(
        &self,
        place_id: &str,
        facility_name: &str,
        is_open: bool,
    ) -> Result<OpenStatusRecordDto, ClientError> {
        let body = StatusCheckRequest {
            facility_name: Some(facility_name.to_string()),
            is_open: Some(serde_json::Value::Bool(is_open)),
        };
        let url = self.segment_url(&["routes", "metrics", "facilities", place_id, "measure"])?;
        let request = self.http.post(url).json(&body);
        self.send(request).await
    }

    async fn status_log(&self) -> Result<Vec<OpenStatusRecordDto>, ClientError> {
        let request = self.http.get(self.url("/routes/metrics/facilities/view"));
        self.send(request).await
    }

    async fn directions(
        &self,
        origin: LatLng,
        destination: LatLng,
        travel_mode: &str,
    ) -> Result<DirectionsDto, ClientError> {
        let body = DirectionsRequest {
            origin: Some(format_lat_lng(origin)),
            destination: Some(format_lat_lng(destination)),
            travel_mode: Some(travel_mode.to_string()),
        };
        let request = self
            .http
            .post(self.url("/routes/directions/directions"))
            .json(&body);
        self.send(request).await
    }
}
