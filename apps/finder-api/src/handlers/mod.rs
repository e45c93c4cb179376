//! Handlers 模块

pub mod data;
pub mod directions;
pub mod events;
pub mod facilities;
pub mod feedback;
pub mod metrics;
pub mod misc;

#[cfg(test)]
pub(crate) mod test_support;

pub use data::*;
pub use directions::*;
pub use events::*;
pub use facilities::*;
pub use feedback::*;
pub use metrics::*;
pub use misc::*;
