//! 地点服务接口。

use crate::error::PlacesError;
use api_contract::{DirectionsDto, NearbySearchResponse, PlaceDetailsDto};
use async_trait::async_trait;
use domain::LatLng;

/// 未指定出行方式时使用驾车。
pub const DEFAULT_TRAVEL_MODE: &str = "DRIVING";

/// 附近搜索参数。
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearchParams {
    pub location: LatLng,
    pub radius_m: u32,
    pub facility_type: Option<String>,
    pub open_now: bool,
}

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// `OK` 与 `ZERO_RESULTS` 都返回 `Ok`，由调用方根据 `status` 区分。
    async fn nearby_search(
        &self,
        params: &NearbySearchParams,
    ) -> Result<NearbySearchResponse, PlacesError>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetailsDto, PlacesError>;

    /// 拼接照片地址，不发起网络请求。
    fn photo_url(&self, photo_reference: &str) -> Result<String, PlacesError>;

    /// 只有 `OK` 返回 `Ok`。
    async fn directions(
        &self,
        origin: &str,
        destination: &str,
        travel_mode: &str,
    ) -> Result<DirectionsDto, PlacesError>;
}
