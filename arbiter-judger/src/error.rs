use arbiter_protocol::error::{ErrorCode, ErrorInfo};

use thiserror::Error;

/// Everything that can abort a judging invocation before or between test
/// cases. Per-case outcomes (wrong answer, runtime error, timeout) are not
/// errors; they surface as verdicts.
#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("question has no code template for language: {0}")]
    TemplateMissing(String),

    #[error("question not found: {0}")]
    QuestionNotFound(String),

    #[error("risky import rejected: {0}")]
    RiskyCode(String),

    #[error("compilation failed:\n{diagnostics}")]
    CompileFailure { diagnostics: String },

    #[error("i/o failure")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl JudgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            JudgeError::UnsupportedLanguage(_) => ErrorCode::UnsupportedLanguage,
            JudgeError::TemplateMissing(_) => ErrorCode::TemplateMissing,
            JudgeError::QuestionNotFound(_) => ErrorCode::QuestionNotFound,
            JudgeError::RiskyCode(_) => ErrorCode::RiskyCode,
            JudgeError::CompileFailure { .. } => ErrorCode::CompileFailure,
            JudgeError::Io(_) => ErrorCode::FileSystemError,
            JudgeError::Store(_) => ErrorCode::StoreError,
        }
    }

    /// true for failures caused by the submitted code rather than the host
    pub fn is_user_fault(&self) -> bool {
        !matches!(self, JudgeError::Io(_) | JudgeError::Store(_))
    }

    pub fn into_info(self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: Some(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_split_into_user_and_host() {
        assert!(JudgeError::UnsupportedLanguage("x".to_owned()).is_user_fault());
        assert!(JudgeError::CompileFailure {
            diagnostics: String::new()
        }
        .is_user_fault());
        assert!(!JudgeError::Io(std::io::Error::from(std::io::ErrorKind::Other)).is_user_fault());
    }

    #[test]
    fn info_carries_code_and_message() {
        let info = JudgeError::RiskyCode("os".to_owned()).into_info();
        assert_eq!(info.code, ErrorCode::RiskyCode);
        assert!(info.message.unwrap().contains("os"));
    }
}
