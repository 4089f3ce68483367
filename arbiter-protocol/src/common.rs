use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One judging request: a code body, the language tag it is written in and
/// the question it should be judged against.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[validate(length(min = 1))]
    pub language: String,

    #[validate(length(min = 1))]
    pub code: String,

    #[validate(length(min = 1))]
    pub question_id: String,

    pub user_id: Option<String>,
}

/// Per-language boilerplate stored on a question. The engine renders
/// `precode + code + postcode`; `template` is the stub shown to users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeTemplate {
    pub precode: String,
    pub template: String,
    pub postcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoPair {
    pub input: String,
    pub output: String,
}

/// Read-only view of a question, as served by the question store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub code_templates: HashMap<String, CodeTemplate>,
    pub sample_cases: Vec<IoPair>,
    pub time_limit_ms: Option<u64>,
    pub memory_limit_kb: Option<u64>,
}

/// Persisted batch of test cases. Only approved batches feed submission
/// judging; the store applies that filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRecord {
    pub question_id: String,
    pub io_pairs: Vec<IoPair>,
    pub approved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseVerdict {
    Accepted,
    WrongAnswer,
    RuntimeError,
    TimeLimitExceeded,
}

/// Verdict of one test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// 1-based position of the case in its declared order
    pub index: u32,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub passed: bool,
    pub verdict: CaseVerdict,
    pub time_ms: Option<u64>,
    /// memory is not metered by the engine; the slot is part of the shape
    pub memory_kb: Option<u64>,
}

/// Aggregate verdict of a fail-fast submission run.
///
/// `first_failure` is absent exactly when every case passed, in which case
/// `passed_count == total_count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub first_failure: Option<TestResult>,
    pub passed_count: u32,
    pub total_count: u32,
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        self.first_failure.is_none()
    }
}

/// Shape of the record the persistence layer stores for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub user_id: String,
    pub question_id: String,
    pub code: String,
    pub language: String,
    pub passed_count: u32,
    pub total_count: u32,
    pub failed_case: Option<TestResult>,
    pub err: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_request_requires_fields() {
        let req = SubmissionRequest {
            language: "py".to_owned(),
            code: String::new(),
            question_id: "q1".to_owned(),
            user_id: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_result_uses_camel_case_keys() {
        let result = TestResult {
            index: 1,
            input: "1".to_owned(),
            expected_output: "1".to_owned(),
            actual_output: "1".to_owned(),
            passed: true,
            verdict: CaseVerdict::Accepted,
            time_ms: Some(3),
            memory_kb: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["expectedOutput"], "1");
        assert_eq!(value["actualOutput"], "1");
        assert_eq!(value["timeMs"], 3);
    }

    #[test]
    fn outcome_acceptance_tracks_first_failure() {
        let accepted = SubmissionOutcome {
            first_failure: None,
            passed_count: 4,
            total_count: 4,
        };
        assert!(accepted.is_accepted());
        assert_eq!(accepted.passed_count, accepted.total_count);
    }
}
