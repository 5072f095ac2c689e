//! Test support utilities for lingo CLI behavioural coverage.
//!
//! Supplies the fake flow service, a scenario world that captures CLI output
//! and diagnostics, and fixture helpers so step definitions stay focused on
//! their assertions.

mod fake_service;

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use camino::Utf8PathBuf;
use lingo_config::{Config, ServiceEndpoint};
use rstest::fixture;
use tempfile::TempDir;

use crate::diagnostics::tests::RecordingDiagnostics;
use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

pub(super) use fake_service::{FakeService, Hangup};

/// Placeholder in scenario commands replaced by the scenario's temp dir.
const TEMP_DIR_TOKEN: &str = "<tmp>";

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Scenario state: configuration, fake service, captured output.
pub(super) struct TestWorld {
    pub config: Config,
    pub service: Option<FakeService>,
    pub diagnostics: RecordingDiagnostics,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<String>,
    pub temp_dir: TempDir,
}

impl Default for TestWorld {
    fn default() -> Self {
        let temp_dir = tempfile::tempdir().expect("create scenario temp dir");
        let config_home = Utf8PathBuf::from_path_buf(temp_dir.path().join("configs"))
            .expect("utf8 temp dir");
        Self {
            config: Config {
                config_home: Some(config_home),
                ..Config::default()
            },
            service: None,
            diagnostics: RecordingDiagnostics::default(),
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: None,
            requests: Vec::new(),
            temp_dir,
        }
    }
}

impl TestWorld {
    pub fn start_service(&mut self, lines: Vec<String>) -> Result<()> {
        self.attach_service(FakeService::spawn(lines)?);
        Ok(())
    }

    pub fn start_lingering_service(&mut self, lines: Vec<String>) -> Result<()> {
        self.attach_service(FakeService::spawn_with_hangup(lines, Hangup::WhenClientLeaves)?);
        Ok(())
    }

    fn attach_service(&mut self, service: FakeService) {
        self.config.service_endpoint = ServiceEndpoint::tcp("127.0.0.1", service.port());
        self.service = Some(service);
    }

    pub fn temp_path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn write_temp_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp_path(name);
        fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn run(&mut self, command: &str) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let args = Self::build_args(command, self.temp_dir.path());
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut io = IoStreams::new(&mut self.stdout, &mut self.stderr);
        let exit = run_with_loader(args, &mut io, &loader, &self.diagnostics);
        self.exit_code = Some(exit);
        if let Some(service) = self.service.as_mut() {
            self.requests = service.take_requests()?;
        }
        self.service = None;
        Ok(())
    }

    fn build_args(command: &str, temp_dir: &Path) -> Vec<OsString> {
        let temp_dir = temp_dir.to_string_lossy();
        let mut args = vec![OsString::from("lingo")];
        args.extend(command.split_whitespace().map(|token| {
            OsString::from(
                token
                    .trim_matches('"')
                    .replace(TEMP_DIR_TOKEN, temp_dir.as_ref()),
            )
        }));
        args
    }

    pub fn stdout_text(&self) -> Result<String> {
        decode_utf8(self.stdout.clone(), "stdout")
    }

    pub fn stderr_text(&self) -> Result<String> {
        decode_utf8(self.stderr.clone(), "stderr")
    }

    pub fn assert_success(&self) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::SUCCESS,
            "expected success, got {exit:?}; stderr: {}",
            self.stderr_text()?
        );
        Ok(())
    }

    pub fn assert_failure(&self) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == ExitCode::FAILURE,
            "expected failure exit code, got {exit:?}"
        );
        Ok(())
    }

    pub fn assert_golden_request(&self, fixture: &str) -> Result<()> {
        ensure!(
            self.requests.len() == 1,
            "expected single request but found {}",
            self.requests.len()
        );
        let expected = read_fixture(fixture)?;
        let actual = self.requests.first().context("request missing")?;
        ensure!(
            actual == &expected,
            "request mismatch: expected {expected:?}, got {actual:?}"
        );
        Ok(())
    }

    pub fn assert_no_service_requests(&self) -> Result<()> {
        ensure!(
            self.requests.is_empty(),
            "expected no service requests but found {:?}",
            self.requests
        );
        Ok(())
    }

    /// Expands the temp dir placeholder in text taken from a scenario.
    pub fn expand(&self, text: &str) -> String {
        text.trim_matches('"')
            .replace(TEMP_DIR_TOKEN, self.temp_dir.path().to_string_lossy().as_ref())
    }
}

// ── Helper functions ───────────────────────────────────────────────────────────

pub(super) fn read_fixture(name: &str) -> Result<String> {
    let normalized = name.trim().trim_matches('"');
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path.push(normalized);
    fs::read_to_string(&path).with_context(|| format!("read fixture at {}", path.display()))
}

pub(super) fn decode_utf8(buffer: Vec<u8>, label: &str) -> Result<String> {
    String::from_utf8(buffer).with_context(|| format!("{label} utf8"))
}

/// Event lines for a search yielding two results and one error.
pub(super) fn two_results_and_an_error() -> Vec<String> {
    vec![
        r#"{"kind":"result","result":{"id":1}}"#.to_owned(),
        r#"{"kind":"error","message":"lexicon unavailable"}"#.to_owned(),
        r#"{"kind":"result","result":{"id":2}}"#.to_owned(),
        r#"{"kind":"close","channel":"errors"}"#.to_owned(),
        r#"{"kind":"close","channel":"results"}"#.to_owned(),
    ]
}

pub(super) fn fact_description_lines() -> Vec<String> {
    vec![
        concat!(
            r#"{"kind":"fact_description","description":{"#,
            r#""description":"A function declaration.","#,
            r#""examples":"go.func_decl(depth = any)","#,
            r#""properties":[{"name":"name","description":"Identifier of the function."}]}}"#
        )
        .to_owned(),
    ]
}

// ── Fixtures ───────────────────────────────────────────────────────────────────

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}
