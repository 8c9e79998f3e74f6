//! 应用配置
//!
//! 启动时加载一次并保存在全局 `OnceLock` 中，仅供服务器外壳读取。

mod loader;
mod structs;

pub use structs::*;
