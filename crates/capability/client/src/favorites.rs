//! 会话内收藏。

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added,
    AlreadyPresent,
    /// 设施不在当前渲染中。
    Unknown,
}

/// 按 ID 去重加入收藏。
pub fn add_favorite(session: &mut Session, place_id: &str) -> FavoriteOutcome {
    let Some(source) = session
        .facility(place_id)
        .map(|facility| facility.source.clone())
    else {
        return FavoriteOutcome::Unknown;
    };
    if session
        .favorites()
        .iter()
        .any(|favorite| favorite.place_id.as_deref() == Some(place_id))
    {
        return FavoriteOutcome::AlreadyPresent;
    }
    session.favorites_mut().push(source);
    FavoriteOutcome::Added
}
