// 业务错误码，随 ApiResponse 一起返回给前端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    InternalServerError = 1500,
    StorageFailure = 1501,

    // 目录数据
    SubjectNotFound = 2001,
    ClassNotFound = 2002,
    StudentNotFound = 2003,

    // 成绩配置
    NoteConfigNotFound = 3001,
    NoteConfigInvalid = 3002,

    // 成绩录入
    NoteScoreOutOfRange = 3101,
    NoteUpdateEmpty = 3102,
    BatchTooLarge = 3103,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i32)
    }
}
