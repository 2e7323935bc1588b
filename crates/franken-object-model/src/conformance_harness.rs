use std::collections::BTreeSet;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::object_model::ObjectError;

// ---------------------------------------------------------------------------
// Case outcomes and assertion primitives
// ---------------------------------------------------------------------------

/// Why a case did not pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaseFailure {
    /// An assertion in the case body did not hold.
    #[error("{message}: expected {expected}, got {actual}")]
    Assertion {
        message: String,
        expected: String,
        actual: String,
    },
    /// An error escaped the case body that no assertion was waiting for.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CaseFailure {
    pub fn assertion(
        message: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::Assertion {
            message: message.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn outcome(&self) -> CaseOutcome {
        match self {
            Self::Assertion { .. } => CaseOutcome::Failed,
            Self::Unexpected(_) => CaseOutcome::Errored,
        }
    }
}

impl From<ObjectError> for CaseFailure {
    fn from(err: ObjectError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

pub type CaseResult = Result<(), CaseFailure>;

pub fn ensure(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(CaseFailure::assertion(message, "true", "false"))
    }
}

pub fn ensure_eq<T: PartialEq + fmt::Debug>(
    actual: T,
    expected: T,
    message: impl Into<String>,
) -> CaseResult {
    if actual == expected {
        Ok(())
    } else {
        Err(CaseFailure::assertion(
            message,
            format!("{expected:?}"),
            format!("{actual:?}"),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed,
    Errored,
    Skipped,
}

impl CaseOutcome {
    /// Label written to the `outcome` field of log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "pass",
            Self::Failed => "fail",
            Self::Errored => "error",
            Self::Skipped => "skip",
        }
    }

    fn parse(input: &str) -> Option<Self> {
        match input {
            "pass" => Some(Self::Passed),
            "fail" => Some(Self::Failed),
            "error" => Some(Self::Errored),
            "skip" => Some(Self::Skipped),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Suite registration
// ---------------------------------------------------------------------------

type CaseBody<C> = Box<dyn Fn(&mut C) -> CaseResult>;

enum CaseAction<C> {
    Run(CaseBody<C>),
    Skip(String),
}

pub struct ConformanceCase<C> {
    pub case_id: String,
    pub suite: String,
    pub title: String,
    action: CaseAction<C>,
}

impl<C> ConformanceCase<C> {
    pub fn skip_reason(&self) -> Option<&str> {
        match &self.action {
            CaseAction::Run(_) => None,
            CaseAction::Skip(reason) => Some(reason),
        }
    }
}

impl<C> fmt::Debug for ConformanceCase<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConformanceCase")
            .field("case_id", &self.case_id)
            .field("suite", &self.suite)
            .field("skip_reason", &self.skip_reason())
            .finish()
    }
}

/// Hierarchical `describe`/`it` registration.
///
/// Groups registered under a failed `describe_if` condition still register
/// their cases, as skipped, so reports show them instead of dropping them.
pub struct SuiteBuilder<C> {
    name: String,
    path: Vec<String>,
    skip_reason: Option<String>,
    cases: Vec<ConformanceCase<C>>,
}

impl<C> SuiteBuilder<C> {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: vec![name.clone()],
            name,
            skip_reason: None,
            cases: Vec::new(),
        }
    }

    pub fn describe(&mut self, name: &str, register: impl FnOnce(&mut Self)) -> &mut Self {
        self.path.push(name.to_string());
        register(self);
        self.path.pop();
        self
    }

    pub fn describe_if(
        &mut self,
        condition: bool,
        skip_reason: &str,
        name: &str,
        register: impl FnOnce(&mut Self),
    ) -> &mut Self {
        let outer = self.skip_reason.clone();
        if !condition && outer.is_none() {
            self.skip_reason = Some(skip_reason.to_string());
        }
        self.describe(name, register);
        self.skip_reason = outer;
        self
    }

    pub fn it(
        &mut self,
        title: &str,
        body: impl Fn(&mut C) -> CaseResult + 'static,
    ) -> &mut Self {
        let action = match &self.skip_reason {
            Some(reason) => CaseAction::Skip(reason.clone()),
            None => CaseAction::Run(Box::new(body)),
        };
        self.push(title, action)
    }

    pub fn xit(&mut self, title: &str, reason: &str) -> &mut Self {
        let reason = self.skip_reason.clone().unwrap_or_else(|| reason.to_string());
        self.push(title, CaseAction::Skip(reason))
    }

    pub fn it_if(
        &mut self,
        condition: bool,
        skip_reason: &str,
        title: &str,
        body: impl Fn(&mut C) -> CaseResult + 'static,
    ) -> &mut Self {
        if condition {
            self.it(title, body)
        } else {
            self.xit(title, skip_reason)
        }
    }

    fn push(&mut self, title: &str, action: CaseAction<C>) -> &mut Self {
        let suite = self.path.join(" ");
        self.cases.push(ConformanceCase {
            case_id: format!("{suite} {title}"),
            suite,
            title: title.to_string(),
            action,
        });
        self
    }

    pub fn build(self) -> Result<Suite<C>, ConformanceRunError> {
        if self.cases.is_empty() {
            return Err(ConformanceRunError::EmptySuite(self.name));
        }
        let mut seen = BTreeSet::new();
        for case in &self.cases {
            if !seen.insert(case.case_id.as_str()) {
                return Err(ConformanceRunError::DuplicateCaseId(case.case_id.clone()));
            }
        }
        Ok(Suite {
            name: self.name,
            cases: self.cases,
        })
    }
}

pub struct Suite<C> {
    pub name: String,
    cases: Vec<ConformanceCase<C>>,
}

impl<C> Suite<C> {
    pub fn cases(&self) -> &[ConformanceCase<C>] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Hash over the ordered case ids and skip decisions.
    pub fn suite_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        for case in &self.cases {
            hasher.update(b"\n");
            hasher.update(case.case_id.as_bytes());
            if case.skip_reason().is_some() {
                hasher.update(b"|skip");
            }
        }
        hex::encode(hasher.finalize())
    }
}

// ---------------------------------------------------------------------------
// Runner configuration, log events and results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConformanceRunnerConfig {
    pub trace_prefix: String,
    pub policy_id: String,
    pub component: String,
}

impl Default for ConformanceRunnerConfig {
    fn default() -> Self {
        Self {
            trace_prefix: "trace-object-conformance".to_string(),
            policy_id: "policy-object-conformance-v1".to_string(),
            component: "object_conformance_runner".to_string(),
        }
    }
}

impl ConformanceRunnerConfig {
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        serde_json::from_slice(&bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    pub fn validate(&self) -> Result<(), ConformanceRunError> {
        if self.trace_prefix.trim().is_empty() {
            return Err(ConformanceRunError::InvalidConfig(
                "trace_prefix is required".to_string(),
            ));
        }
        if self.policy_id.trim().is_empty() {
            return Err(ConformanceRunError::InvalidConfig(
                "policy_id is required".to_string(),
            ));
        }
        if self.component.trim().is_empty() {
            return Err(ConformanceRunError::InvalidConfig(
                "component is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceLogEvent {
    pub trace_id: String,
    pub decision_id: String,
    pub policy_id: String,
    pub component: String,
    pub event: String,
    pub outcome: String,
    pub error_code: Option<String>,
    pub case_id: String,
    pub suite: String,
    pub error_detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceRunSummary {
    pub run_id: String,
    pub suite_hash: String,
    pub total_cases: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errored: usize,
    pub env_fingerprint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceRunResult {
    pub run_id: String,
    pub suite_hash: String,
    pub logs: Vec<ConformanceLogEvent>,
    pub summary: ConformanceRunSummary,
}

impl ConformanceRunResult {
    pub fn enforce_ci_gate(&self) -> Result<(), ConformanceCiGateError> {
        if self.summary.failed > 0 || self.summary.errored > 0 {
            Err(ConformanceCiGateError {
                failed: self.summary.failed,
                errored: self.summary.errored,
            })
        } else {
            Ok(())
        }
    }

    /// Outcome recorded for `case_id`, if the case ran in this result.
    pub fn outcome_of(&self, case_id: &str) -> Option<CaseOutcome> {
        self.case_events()
            .find(|event| event.case_id == case_id)
            .and_then(|event| CaseOutcome::parse(&event.outcome))
    }

    /// Case ids with the given outcome, in run order.
    pub fn case_ids_with(&self, outcome: CaseOutcome) -> Vec<&str> {
        self.case_events()
            .filter(|event| event.outcome == outcome.as_str())
            .map(|event| event.case_id.as_str())
            .collect()
    }

    fn case_events(&self) -> impl Iterator<Item = &ConformanceLogEvent> {
        self.logs
            .iter()
            .filter(|event| event.event == CASE_EXECUTION_EVENT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceCiGateError {
    pub failed: usize,
    pub errored: usize,
}

impl fmt::Display for ConformanceCiGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conformance CI gate failed: failed={}, errored={}",
            self.failed, self.errored
        )
    }
}

impl Error for ConformanceCiGateError {}

#[derive(Debug, thiserror::Error)]
pub enum ConformanceRunError {
    #[error("invalid conformance config: {0}")]
    InvalidConfig(String),
    #[error("duplicate conformance case id `{0}`")]
    DuplicateCaseId(String),
    #[error("conformance suite `{0}` registers no cases")]
    EmptySuite(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

const CASE_EXECUTION_EVENT: &str = "case_execution";
const ERROR_ASSERTION: &str = "FE-OBJCONF-ASSERTION";
const ERROR_UNEXPECTED: &str = "FE-OBJCONF-UNEXPECTED";

#[derive(Debug, Clone, Default)]
pub struct ConformanceRunner {
    pub config: ConformanceRunnerConfig,
}

impl ConformanceRunner {
    pub fn new(config: ConformanceRunnerConfig) -> Self {
        Self { config }
    }

    /// Run every case of `suite`, building a fresh context for each one.
    pub fn run<C>(
        &self,
        suite: &Suite<C>,
        env_fingerprint: &str,
        mut fresh_context: impl FnMut() -> C,
    ) -> Result<ConformanceRunResult, ConformanceRunError> {
        self.config.validate()?;
        if suite.is_empty() {
            return Err(ConformanceRunError::EmptySuite(suite.name.clone()));
        }
        let suite_hash = suite.suite_hash();
        let run_id = run_id_for(&suite_hash, env_fingerprint);

        let mut logs = Vec::with_capacity(suite.len());
        let mut passed = 0usize;
        let mut failed = 0usize;
        let mut skipped = 0usize;
        let mut errored = 0usize;

        for (idx, case) in suite.cases.iter().enumerate() {
            let (outcome, error_code, error_detail) = match &case.action {
                CaseAction::Skip(reason) => (CaseOutcome::Skipped, None, Some(reason.clone())),
                CaseAction::Run(body) => {
                    let mut context = fresh_context();
                    match body(&mut context) {
                        Ok(()) => (CaseOutcome::Passed, None, None),
                        Err(failure) => {
                            let code = match failure.outcome() {
                                CaseOutcome::Errored => ERROR_UNEXPECTED,
                                _ => ERROR_ASSERTION,
                            };
                            (failure.outcome(), Some(code.to_string()), Some(failure.to_string()))
                        }
                    }
                }
            };
            match outcome {
                CaseOutcome::Passed => passed += 1,
                CaseOutcome::Failed => failed += 1,
                CaseOutcome::Errored => errored += 1,
                CaseOutcome::Skipped => skipped += 1,
            }

            let mut event = self.log_event(&run_id, idx, CASE_EXECUTION_EVENT, outcome.as_str());
            event.case_id = case.case_id.clone();
            event.suite = case.suite.clone();
            event.error_code = error_code;
            event.error_detail = error_detail;
            logs.push(event);
        }

        let summary = ConformanceRunSummary {
            run_id: run_id.clone(),
            suite_hash: suite_hash.clone(),
            total_cases: logs.len(),
            passed,
            failed,
            skipped,
            errored,
            env_fingerprint: env_fingerprint.to_string(),
        };

        Ok(ConformanceRunResult {
            run_id,
            suite_hash,
            logs,
            summary,
        })
    }

    /// Log event stamped with this runner's trace and policy ids; the case
    /// fields are left empty for run-level events.
    /// Log event for the case at position `seq` in the suite.
    pub fn log_event(
        &self,
        run_id: &str,
        seq: usize,
        event: &str,
        outcome: &str,
    ) -> ConformanceLogEvent {
        self.tagged_event(run_id, &format!("{seq:04}"), event, outcome)
    }

    /// Run-level event whose ids end in `tag` instead of a case sequence
    /// number, e.g. `probe`.
    pub fn tagged_event(
        &self,
        run_id: &str,
        tag: &str,
        event: &str,
        outcome: &str,
    ) -> ConformanceLogEvent {
        ConformanceLogEvent {
            trace_id: format!("{}-{}-{tag}", self.config.trace_prefix, run_id),
            decision_id: format!("decision-object-conformance-{tag}"),
            policy_id: self.config.policy_id.clone(),
            component: self.config.component.clone(),
            event: event.to_string(),
            outcome: outcome.to_string(),
            error_code: None,
            case_id: String::new(),
            suite: String::new(),
            error_detail: None,
        }
    }
}

fn run_id_for(suite_hash: &str, env_fingerprint: &str) -> String {
    let digest = sha256_hex(format!("{suite_hash}:{env_fingerprint}").as_bytes());
    format!("object-conformance-{}", &digest[..12])
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConformanceCollectedArtifacts {
    pub run_manifest_path: PathBuf,
    pub conformance_evidence_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ConformanceEvidenceCollector {
    root: PathBuf,
}

impl ConformanceEvidenceCollector {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn collect(&self, run: &ConformanceRunResult) -> io::Result<ConformanceCollectedArtifacts> {
        let run_root = self.root.join(&run.run_id);
        fs::create_dir_all(&run_root)?;

        let run_manifest_path = run_root.join("run_manifest.json");
        write_atomic(&run_manifest_path, &canonical_json_bytes(&run.summary)?)?;

        let mut evidence_lines = String::new();
        let summary_line = serde_json::to_string(&ConformanceEvidenceSummaryLine {
            run_manifest: "run_manifest.json".to_string(),
            run_id: run.run_id.clone(),
            suite_hash: run.suite_hash.clone(),
            generated_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            pass_count: run.summary.passed,
            fail_count: run.summary.failed,
            skip_count: run.summary.skipped,
            error_count: run.summary.errored,
            env_fingerprint: run.summary.env_fingerprint.clone(),
        })
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        evidence_lines.push_str(&summary_line);
        evidence_lines.push('\n');

        for event in &run.logs {
            let line = serde_json::to_string(event)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            evidence_lines.push_str(&line);
            evidence_lines.push('\n');
        }

        let conformance_evidence_path = run_root.join("conformance_evidence.jsonl");
        write_atomic(&conformance_evidence_path, evidence_lines.as_bytes())?;

        Ok(ConformanceCollectedArtifacts {
            run_manifest_path,
            conformance_evidence_path,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ConformanceEvidenceSummaryLine {
    run_manifest: String,
    run_id: String,
    suite_hash: String,
    generated_at_utc: String,
    pass_count: usize,
    fail_count: usize,
    skip_count: usize,
    error_count: usize,
    env_fingerprint: String,
}

fn canonical_json_bytes<T: Serialize>(value: &T) -> io::Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no parent"))?;
    fs::create_dir_all(parent)?;

    let tmp = path.with_extension(format!("{}.tmp", std::process::id()));
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        hits: u32,
    }

    fn sample_suite() -> Suite<Counter> {
        let mut builder = SuiteBuilder::new("Sample");
        builder.describe("math", |s| {
            s.it("adds", |ctx: &mut Counter| {
                ctx.hits += 1;
                ensure_eq(ctx.hits, 1, "fresh context per case")
            });
            s.it("fails", |_: &mut Counter| ensure(false, "always false"));
            s.it("errors", |_: &mut Counter| {
                Err(ObjectError::type_error("boom").into())
            });
            s.xit("pending", "not written yet");
        });
        builder.describe_if(false, "feature missing", "gated", |s| {
            s.it("never runs", |_: &mut Counter| ensure(false, "unreachable"));
            s.describe("nested", |s| {
                s.it("also skipped", |_: &mut Counter| Ok(()));
            });
        });
        builder.it_if(true, "unused", "top level", |ctx: &mut Counter| {
            ensure_eq(ctx.hits, 0, "starts at zero")
        });
        builder.build().expect("suite")
    }

    #[test]
    fn builder_assigns_hierarchical_ids() {
        let suite = sample_suite();
        let ids: Vec<&str> = suite.cases().iter().map(|c| c.case_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "Sample math adds",
                "Sample math fails",
                "Sample math errors",
                "Sample math pending",
                "Sample gated never runs",
                "Sample gated nested also skipped",
                "Sample top level",
            ]
        );
        assert_eq!(suite.cases()[4].skip_reason(), Some("feature missing"));
        assert_eq!(suite.cases()[5].skip_reason(), Some("feature missing"));
        assert_eq!(suite.cases()[3].skip_reason(), Some("not written yet"));
        assert_eq!(suite.cases()[6].skip_reason(), None);
    }

    #[test]
    fn duplicate_ids_and_empty_suites_are_rejected() {
        let mut builder: SuiteBuilder<Counter> = SuiteBuilder::new("Dup");
        builder.it("same", |_| Ok(())).it("same", |_| Ok(()));
        assert!(matches!(
            builder.build(),
            Err(ConformanceRunError::DuplicateCaseId(id)) if id == "Dup same"
        ));
        let empty: SuiteBuilder<Counter> = SuiteBuilder::new("Empty");
        assert!(matches!(empty.build(), Err(ConformanceRunError::EmptySuite(_))));
    }

    #[test]
    fn runner_classifies_outcomes() {
        let suite = sample_suite();
        let run = ConformanceRunner::default()
            .run(&suite, "env", Counter::default)
            .expect("run");
        assert_eq!(run.summary.total_cases, 7);
        assert_eq!(run.summary.passed, 2);
        assert_eq!(run.summary.failed, 1);
        assert_eq!(run.summary.errored, 1);
        assert_eq!(run.summary.skipped, 3);
        assert_eq!(run.outcome_of("Sample math errors"), Some(CaseOutcome::Errored));
        assert_eq!(run.case_ids_with(CaseOutcome::Failed), vec!["Sample math fails"]);

        let failed = &run.logs[1];
        assert_eq!(failed.error_code.as_deref(), Some("FE-OBJCONF-ASSERTION"));
        assert_eq!(
            failed.error_detail.as_deref(),
            Some("always false: expected true, got false")
        );
        assert_eq!(failed.suite, "Sample math");
        let errored = &run.logs[2];
        assert_eq!(errored.error_code.as_deref(), Some("FE-OBJCONF-UNEXPECTED"));
        assert_eq!(
            errored.error_detail.as_deref(),
            Some("unexpected error: TypeError: boom")
        );
        assert!(run.enforce_ci_gate().is_err());
    }

    #[test]
    fn run_ids_are_deterministic() {
        let suite = sample_suite();
        let runner = ConformanceRunner::default();
        let a = runner.run(&suite, "env", Counter::default).expect("run");
        let b = runner.run(&suite, "env", Counter::default).expect("run");
        let c = runner.run(&suite, "other", Counter::default).expect("run");
        assert_eq!(a.run_id, b.run_id);
        assert_ne!(a.run_id, c.run_id);
        assert!(a.run_id.starts_with("object-conformance-"));
        assert_eq!(a.logs[0].trace_id, format!("trace-object-conformance-{}-0000", a.run_id));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let runner = ConformanceRunner::new(ConformanceRunnerConfig {
            policy_id: " ".to_string(),
            ..ConformanceRunnerConfig::default()
        });
        let err = runner.run(&sample_suite(), "env", Counter::default).unwrap_err();
        assert_eq!(err.to_string(), "invalid conformance config: policy_id is required");
    }

    #[test]
    fn ci_gate_passes_clean_runs() {
        let mut builder = SuiteBuilder::new("Clean");
        builder.it("ok", |_: &mut Counter| Ok(()));
        builder.xit("later", "pending");
        let suite = builder.build().expect("suite");
        let run = ConformanceRunner::default()
            .run(&suite, "env", Counter::default)
            .expect("run");
        assert!(run.enforce_ci_gate().is_ok());
        let err = ConformanceCiGateError { failed: 2, errored: 1 };
        assert_eq!(err.to_string(), "conformance CI gate failed: failed=2, errored=1");
    }

    #[test]
    fn runner_config_json_fills_defaults() {
        let cfg: ConformanceRunnerConfig =
            serde_json::from_str(r#"{"policy_id":"custom"}"#).expect("parse");
        assert_eq!(cfg.policy_id, "custom");
        assert_eq!(cfg.trace_prefix, ConformanceRunnerConfig::default().trace_prefix);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn write_atomic_uses_a_per_process_temp_file() {
        let dir = std::env::temp_dir().join(format!(
            "franken_object_atomic_{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("run_manifest.json");
        let foreign_tmp = path.with_extension("tmp");
        fs::write(&foreign_tmp, b"other writer").expect("seed tmp");

        write_atomic(&path, b"{}").expect("write");

        assert_eq!(fs::read(&path).expect("read"), b"{}");
        assert_eq!(fs::read(&foreign_tmp).expect("read tmp"), b"other writer");
        let own_tmp = path.with_extension(format!("{}.tmp", std::process::id()));
        assert!(!own_tmp.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn tagged_events_use_the_tag_in_place_of_a_sequence() {
        let runner = ConformanceRunner::default();
        let case = runner.log_event("run-1", 7, "case_execution", "pass");
        assert_eq!(case.trace_id, "trace-object-conformance-run-1-0007");
        assert_eq!(case.decision_id, "decision-object-conformance-0007");
        let probe = runner.tagged_event("run-1", "probe", "capability_probe", "pass");
        assert_eq!(probe.trace_id, "trace-object-conformance-run-1-probe");
        assert_eq!(probe.decision_id, "decision-object-conformance-probe");
        assert_eq!(probe.event, "capability_probe");
    }
}
