//! 稳定的 DTO 与 API 响应契约。
//!
//! 上游地点数据（搜索结果、详情、路线）保持上游的 snake_case 字段名原样透传；
//! 本服务自有的载荷使用 camelCase。

use serde::{Deserialize, Serialize};

/// 上游“成功”状态。
pub const STATUS_OK: &str = "OK";
/// 上游“无结果”状态（正常的空状态，不是错误）。
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// 标准 API 响应封装。
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

// ============================================
// 上游地点数据（透传）
// ============================================

/// 坐标。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngDto {
    pub lat: f64,
    pub lng: f64,
}

/// 几何信息。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryDto {
    #[serde(default)]
    pub location: Option<LatLngDto>,
}

/// 营业时间。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHoursDto {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekday_text: Vec<String>,
}

/// 照片引用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoDto {
    pub photo_reference: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// 附近搜索的单条结果。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummaryDto {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub geometry: Option<GeometryDto>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHoursDto>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<PhotoDto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl PlaceSummaryDto {
    pub fn location(&self) -> Option<LatLngDto> {
        self.geometry.as_ref().and_then(|geometry| geometry.location)
    }
}

/// 附近搜索响应（`status` 为 OK 或 ZERO_RESULTS）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceSummaryDto>,
}

/// 设施详情。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetailsDto {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHoursDto>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<PhotoDto>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(default)]
    pub geometry: Option<GeometryDto>,
}

impl PlaceDetailsDto {
    /// 当前是否营业；上游未给出时视为未营业。
    pub fn is_open_now(&self) -> bool {
        self.opening_hours
            .as_ref()
            .and_then(|hours| hours.open_now)
            .unwrap_or(false)
    }
}

/// 文本 + 数值（路线距离、耗时）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextValueDto {
    pub text: String,
    #[serde(default)]
    pub value: f64,
}

/// 路线分段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLegDto {
    pub distance: TextValueDto,
    pub duration: TextValueDto,
    #[serde(default)]
    pub start_address: Option<String>,
    #[serde(default)]
    pub end_address: Option<String>,
}

/// 路线。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDto {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub legs: Vec<RouteLegDto>,
}

/// 路线计算结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionsDto {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<RouteDto>,
}

// ============================================
// 设施接口查询参数与返回
// ============================================

/// 附近搜索查询参数。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbySearchQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<u32>,
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    pub opennow: Option<bool>,
    pub minrating: Option<f64>,
}

/// 详情查询参数。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceIdQuery {
    pub place_id: Option<String>,
}

/// 照片查询参数。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoQuery {
    pub photo_reference: Option<String>,
}

/// 照片 URL。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoUrlDto {
    pub url: String,
}

/// 平均拥挤度；`average_congestion` 为 null 表示“无数据”。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CongestionAverageDto {
    pub average_congestion: Option<f64>,
    pub sample_count: u64,
}

// ============================================
// 营业状态与拥挤度
// ============================================

/// 营业状态记录请求体。
///
/// `is_open` 以原始 JSON 接收，非布尔值由 handler 返回 400。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCheckRequest {
    pub facility_name: Option<String>,
    pub is_open: Option<serde_json::Value>,
}

/// 营业状态记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenStatusRecordDto {
    pub place_id: String,
    pub facility_name: String,
    pub is_open: bool,
    pub open_status: String,
    pub ts_ms: i64,
}

/// 拥挤度上报请求体。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CongestionSampleRequest {
    pub congestion_level: Option<f64>,
}

/// 拥挤度采样返回结构。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CongestionSampleDto {
    pub congestion_level: f64,
    pub ts_ms: i64,
}

// ============================================
// 反馈
// ============================================

/// 反馈提交请求体（沿用 place_id 字段名）。
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub place_id: Option<String>,
    pub rating: Option<serde_json::Value>,
    pub review: Option<String>,
}

/// 单条反馈。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDto {
    pub review: String,
    pub rating: u8,
    pub ts_ms: i64,
}

/// 反馈汇总。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSummaryDto {
    pub average_rating: f64,
    pub reviews: Vec<FeedbackDto>,
}

// ============================================
// 路线、活动、传感器、杂项
// ============================================

/// 路线计算请求体。
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub travel_mode: Option<String>,
}

/// 活动创建请求体。
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

/// 活动返回结构。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
}

/// 活动创建结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEventDto {
    pub event_id: String,
}

/// 地图加载用的 API key。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyDto {
    pub api_key: String,
}
