use crate::config::Config;
use crate::error::JudgeError;
use crate::exec::{self, RunOutcome};
use crate::lang::{self, Language};
use crate::screen;
use crate::store::QuestionStore;
use crate::template;
use crate::workspace::{self, StemSource, Workspace};

use arbiter_protocol::common::{
    CaseVerdict, IoPair, Question, SubmissionOutcome, SubmissionRecord, SubmissionRequest,
    TestResult,
};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future;
use scopeguard::ScopeGuard;
use tracing::{error, info, warn};

/// The judging engine. One instance serves any number of concurrent
/// invocations; the staging namespace is the only shared resource and its
/// names are collision-free.
pub struct Judger {
    config: Arc<Config>,
    store: Arc<dyn QuestionStore>,
    workspace: Workspace,
}

/// One invocation's staged artifact set, compiled and ready to run. Dropping
/// it removes everything from disk, whichever way the invocation exits.
struct Staged {
    lang: &'static dyn Language,
    question: Question,
    artifact: PathBuf,
    case_limit: Duration,
    _cleanup: ScopeGuard<PathBuf, Box<dyn FnOnce(PathBuf) + Send>>,
}

impl Judger {
    pub fn new(config: Arc<Config>, store: Arc<dyn QuestionStore>) -> Result<Self, JudgeError> {
        let workspace = Workspace::new(&config)?;
        Ok(Self {
            config,
            store,
            workspace,
        })
    }

    /// Like [`Judger::new`] with a caller-chosen staged-file name source.
    pub fn with_stems(
        config: Arc<Config>,
        store: Arc<dyn QuestionStore>,
        stems: Box<dyn StemSource>,
    ) -> Result<Self, JudgeError> {
        let workspace = Workspace::with_stems(&config, stems)?;
        Ok(Self {
            config,
            store,
            workspace,
        })
    }

    /// Judges the submission against the question's sample cases. Every case
    /// runs regardless of earlier outcomes; results are in case order.
    #[tracing::instrument(skip_all, fields(language = %req.language, question = %req.question_id))]
    pub async fn run_sample(&self, req: &SubmissionRequest) -> Result<Vec<TestResult>, JudgeError> {
        trace_fault(self.sample(req).await)
    }

    /// Judges the submission against the question's approved cases, strictly
    /// in order, stopping at the first case that does not pass.
    #[tracing::instrument(skip_all, fields(language = %req.language, question = %req.question_id))]
    pub async fn run_submission(
        &self,
        req: &SubmissionRequest,
    ) -> Result<SubmissionOutcome, JudgeError> {
        trace_fault(self.submission(req).await)
    }

    async fn sample(&self, req: &SubmissionRequest) -> Result<Vec<TestResult>, JudgeError> {
        let staged = self.prepare(req).await?;

        let runs = staged
            .question
            .sample_cases
            .iter()
            .enumerate()
            .map(|(i, case)| self.run_case(&staged, case, (i + 1) as u32));
        let results = future::join_all(runs).await;

        let results: Result<Vec<_>, _> = results.into_iter().collect();
        let results = results?;
        info!(cases = results.len(), "sample run finished");
        Ok(results)
    }

    async fn submission(&self, req: &SubmissionRequest) -> Result<SubmissionOutcome, JudgeError> {
        let staged = self.prepare(req).await?;
        let cases = self.store.approved_cases(&req.question_id).await?;

        let total_count = cases.len() as u32;
        let mut passed_count = 0;
        let mut first_failure = None;

        for (i, case) in cases.iter().enumerate() {
            let result = self.run_case(&staged, case, (i + 1) as u32).await?;
            if result.passed {
                passed_count += 1;
            } else {
                first_failure = Some(result);
                break;
            }
        }

        info!(passed_count, total_count, "submission run finished");
        Ok(SubmissionOutcome {
            first_failure,
            passed_count,
            total_count,
        })
    }

    /// Screens, renders, stages and builds the submission. The returned
    /// guard owns the on-disk artifact set.
    async fn prepare(&self, req: &SubmissionRequest) -> Result<Staged, JudgeError> {
        let lang = lang::from_tag(&req.language)
            .ok_or_else(|| JudgeError::UnsupportedLanguage(req.language.clone()))?;

        // screen before anything touches the disk
        if let Some(import) = screen::find_risky_import(lang, &req.code, &self.config) {
            if self.config.screen.enforce {
                return Err(JudgeError::RiskyCode(import));
            }
            warn!(language = lang.tag(), %import, "risky import (advisory)");
        }

        let question = self
            .store
            .question_by_id(&req.question_id)
            .await?
            .ok_or_else(|| JudgeError::QuestionNotFound(req.question_id.clone()))?;

        let tpl = question
            .code_templates
            .get(lang.tag())
            .cloned()
            .ok_or_else(|| JudgeError::TemplateMissing(req.language.clone()))?;

        let (stem, src) = self.workspace.allocate(lang);
        let bind = if lang.binds_file_stem() {
            Some(stem.as_str())
        } else {
            None
        };
        let source = template::render(&tpl, &req.code, bind);
        self.workspace.write(&src, &source)?;

        let cleanup: ScopeGuard<PathBuf, Box<dyn FnOnce(PathBuf) + Send>> = scopeguard::guard(
            src.clone(),
            Box::new(move |path: PathBuf| workspace::cleanup(lang, &path)),
        );

        if let Some(cmd) = lang.compile_cmd(&self.config.executor.toolchain, &src) {
            let limit = Duration::from_millis(self.config.executor.compile_time_limit);
            match exec::run(&cmd, "", limit).await? {
                RunOutcome::Completed { success: true, .. } => {}
                RunOutcome::Completed { output, .. } => {
                    return Err(JudgeError::CompileFailure {
                        diagnostics: output,
                    });
                }
                RunOutcome::TimedOut => {
                    return Err(JudgeError::CompileFailure {
                        diagnostics: "compiler exceeded the time bound".to_owned(),
                    });
                }
            }
        }

        let case_limit = Duration::from_millis(
            question
                .time_limit_ms
                .unwrap_or(self.config.executor.case_time_limit),
        );

        Ok(Staged {
            lang,
            artifact: lang.artifact_path(&src),
            question,
            case_limit,
            _cleanup: cleanup,
        })
    }

    /// Runs one test case to a verdict. Only an i/o fault of the host is an
    /// error; everything the submission does wrong is a verdict.
    async fn run_case(
        &self,
        staged: &Staged,
        case: &IoPair,
        index: u32,
    ) -> Result<TestResult, JudgeError> {
        let cmd = staged
            .lang
            .run_cmd(&self.config.executor.toolchain, &staged.artifact);

        let (verdict, actual_output, time_ms) =
            match exec::run(&cmd, &case.input, staged.case_limit).await? {
                RunOutcome::Completed {
                    success: true,
                    output,
                    time_ms,
                } => {
                    let actual = output.trim().to_owned();
                    let verdict = if actual == case.output.trim() {
                        CaseVerdict::Accepted
                    } else {
                        CaseVerdict::WrongAnswer
                    };
                    (verdict, actual, Some(time_ms))
                }
                RunOutcome::Completed {
                    output, time_ms, ..
                } => (
                    CaseVerdict::RuntimeError,
                    output.trim().to_owned(),
                    Some(time_ms),
                ),
                RunOutcome::TimedOut => (
                    CaseVerdict::TimeLimitExceeded,
                    String::new(),
                    Some(staged.case_limit.as_millis() as u64),
                ),
            };

        Ok(TestResult {
            index,
            input: case.input.clone(),
            expected_output: case.output.clone(),
            actual_output,
            passed: verdict == CaseVerdict::Accepted,
            verdict,
            time_ms,
            memory_kb: None,
        })
    }

}

/// User faults travel back as verdict errors; host faults are additionally
/// an operator concern and get logged here.
fn trace_fault<T>(result: Result<T, JudgeError>) -> Result<T, JudgeError> {
    if let Err(err) = &result {
        if !err.is_user_fault() {
            error!(%err, "infrastructure fault during judging");
        }
    }
    result
}

/// Shape of the record the persistence layer stores for one submission,
/// successful or not.
pub fn submission_record(
    req: &SubmissionRequest,
    outcome: &Result<SubmissionOutcome, JudgeError>,
) -> SubmissionRecord {
    let now = Utc::now();
    let (failed_case, passed_count, total_count, err) = match outcome {
        Ok(outcome) => (
            outcome.first_failure.clone(),
            outcome.passed_count,
            outcome.total_count,
            None,
        ),
        Err(err) => (None, 0, 0, Some(err.to_string())),
    };

    SubmissionRecord {
        user_id: req.user_id.clone().unwrap_or_default(),
        question_id: req.question_id.clone(),
        code: req.code.clone(),
        language: req.language.clone(),
        passed_count,
        total_count,
        failed_case,
        err,
        created_at: now,
        updated_at: now,
    }
}
