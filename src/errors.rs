//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_notesystem_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum NoteSystemError {
            $($variant(String),)*
        }

        impl NoteSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(NoteSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(NoteSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(NoteSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl NoteSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        NoteSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_notesystem_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    StorageFailure("E003", "Storage Failure"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Serialization("E006", "Serialization Error"),
    ConfigurationNotFound("E007", "Grade Configuration Not Found"),
    InvalidConfiguration("E008", "Invalid Grade Configuration"),
    InvalidScoreRange("E009", "Invalid Score Range"),
}

impl NoteSystemError {
    /// 配置级错误会中止整个操作（包括整批更新）
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            NoteSystemError::ConfigurationNotFound(_) | NoteSystemError::InvalidConfiguration(_)
        )
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for NoteSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for NoteSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for NoteSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        NoteSystemError::StorageFailure(err.to_string())
    }
}

impl From<std::io::Error> for NoteSystemError {
    fn from(err: std::io::Error) -> Self {
        NoteSystemError::StorageFailure(err.to_string())
    }
}

impl From<serde_json::Error> for NoteSystemError {
    fn from(err: serde_json::Error) -> Self {
        NoteSystemError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for NoteSystemError {
    fn from(err: csv::Error) -> Self {
        NoteSystemError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NoteSystemError>;
