/// 地理坐标（WGS84，单位：度）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// 两个分量都是有限值且落在合法经纬度范围内。
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// 已注册的公共设施（附近搜索时写入）。
#[derive(Debug, Clone)]
pub struct RegisteredFacility {
    pub place_id: String,
    pub name: String,
    pub types: Vec<String>,
    pub location: LatLng,
}

/// 营业状态观测记录（只追加，不更新、不删除）。
#[derive(Debug, Clone, PartialEq)]
pub struct OpenStatusObservation {
    pub place_id: String,
    pub facility_name: Option<String>,
    pub is_open: bool,
    pub ts_ms: i64,
}

/// 拥挤度采样。
#[derive(Debug, Clone, PartialEq)]
pub struct CongestionSample {
    pub congestion_level: f64,
    pub ts_ms: i64,
}

/// 用户反馈。
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEntry {
    pub rating: u8,
    pub review: String,
    pub ts_ms: i64,
}

/// 公共活动。
#[derive(Debug, Clone, PartialEq)]
pub struct PublicEvent {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub location: String,
}

/// 传感器上报数据（原样保存 JSON 文本）。
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub payload: String,
    pub received_at_ms: i64,
}
