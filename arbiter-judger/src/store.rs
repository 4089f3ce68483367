use arbiter_protocol::common::{IoPair, Question, TestCaseRecord};

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Read-only view of the question/test-case store. The engine never writes
/// through this seam; persistence of submissions is the caller's job.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn question_by_id(&self, id: &str) -> Result<Option<Question>>;

    /// io pairs of every approved test-case record for the question, in
    /// declared order
    async fn approved_cases(&self, question_id: &str) -> Result<Vec<IoPair>>;
}

/// In-memory store for tests and embedders.
#[derive(Default)]
pub struct MemoryStore {
    questions: RwLock<HashMap<String, Question>>,
    test_cases: RwLock<Vec<TestCaseRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_question(&self, question: Question) {
        self.questions
            .write()
            .await
            .insert(question.id.clone(), question);
    }

    pub async fn put_test_cases(&self, record: TestCaseRecord) {
        self.test_cases.write().await.push(record);
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn question_by_id(&self, id: &str) -> Result<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn approved_cases(&self, question_id: &str) -> Result<Vec<IoPair>> {
        let records = self.test_cases.read().await;
        let mut pairs = Vec::new();
        for record in records.iter() {
            if record.question_id == question_id && record.approved {
                pairs.extend(record.io_pairs.iter().cloned());
            }
        }
        Ok(pairs)
    }
}
