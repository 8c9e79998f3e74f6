//! 业务模型与 API 数据传输对象

pub mod common;
pub mod notes;

pub use common::{ApiResponse, ErrorCode};
