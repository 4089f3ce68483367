use http::StatusCode;
use serde::{Deserialize, Serialize};

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    UnknownError = 1000,
    UnsupportedLanguage = 1001,
    TemplateMissing = 1002,
    QuestionNotFound = 1003,
    RiskyCode = 1004,
    CompileFailure = 1005,
    FileSystemError = 1006,
    StoreError = 1007,
}

impl ErrorCode {
    pub fn as_status(self) -> StatusCode {
        match self {
            ErrorCode::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::UnsupportedLanguage => StatusCode::BAD_REQUEST,
            ErrorCode::TemplateMissing => StatusCode::BAD_REQUEST,
            ErrorCode::QuestionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::RiskyCode => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::CompileFailure => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::FileSystemError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::StoreError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire form of an engine failure.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("judge error: code = {code:?}, message = {message:?}")]
pub struct ErrorInfo {
    pub code: ErrorCode,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_faults_are_not_server_errors() {
        for code in [
            ErrorCode::UnsupportedLanguage,
            ErrorCode::TemplateMissing,
            ErrorCode::QuestionNotFound,
            ErrorCode::RiskyCode,
            ErrorCode::CompileFailure,
        ] {
            assert!(code.as_status().is_client_error(), "{:?}", code);
        }
        assert!(ErrorCode::FileSystemError.as_status().is_server_error());
    }
}
