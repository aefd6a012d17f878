//! Optional external text generator.
//!
//! The chat engine asks a generator for richer text and falls back to canned
//! replies on any error. None of these errors reach the client.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::settings;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("text generator is disabled")]
    Disabled,
    #[error("failed to run text generator: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("text generator timed out after {0:?}")]
    Timeout(Duration),
    #[error("text generator produced no usable response")]
    NoResponse,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// Used when `generator.enabled` is off.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GeneratorError> {
        Err(GeneratorError::Disabled)
    }
}

/// Runs `<program> <script> <prompt>` and reads the first JSON line carrying a
/// `response` string from stdout.
pub struct ScriptGenerator {
    program: String,
    script: PathBuf,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ScriptReply {
    response: String,
}

impl ScriptGenerator {
    pub fn new(program: impl Into<String>, script: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        log::debug!("asking {} {:?} for a response", self.program, self.script);

        // The prompt travels as a single argv entry, no shell is involved.
        let child = Command::new(&self.program)
            .arg(&self.script)
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| GeneratorError::Timeout(self.timeout))??;

        parse_reply(&String::from_utf8_lossy(&output.stdout)).ok_or(GeneratorError::NoResponse)
    }
}

fn parse_reply(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<ScriptReply>(line.trim()).ok())
        .map(|reply| reply.response)
        .find(|text| !text.trim().is_empty())
}

pub fn from_settings(settings: &settings::Generator) -> Box<dyn TextGenerator> {
    if settings.enabled {
        log::info!(
            "external generator enabled: {} {:?} (timeout {}s)",
            settings.program,
            settings.script,
            settings.timeout_secs
        );
        Box::new(ScriptGenerator::new(
            settings.program.clone(),
            settings.script.clone(),
            settings.timeout(),
        ))
    } else {
        Box::new(DisabledGenerator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("gen.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn parse_reply_skips_noise_lines() {
        let out = "loading model...\n{\"response\": \"Try a guesthouse\"}\n";
        assert_eq!(parse_reply(out).as_deref(), Some("Try a guesthouse"));
        assert_eq!(parse_reply("not json\n"), None);
        assert_eq!(parse_reply("{\"response\": \"  \"}"), None);
    }

    #[tokio::test]
    async fn disabled_generator_always_errors() {
        let err = DisabledGenerator.generate("hello").await.unwrap_err();
        assert!(matches!(err, GeneratorError::Disabled));
    }

    #[tokio::test]
    async fn script_generator_passes_the_prompt_as_an_argument() {
        let dir = tempfile::tempdir().unwrap();
        let path = script(&dir, "printf '{\"response\": \"echo: %s\"}\\n' \"$1\"\n");
        let gen = ScriptGenerator::new("sh", path, Duration::from_secs(5));

        let text = gen.generate("coffee; rm -rf /").await.unwrap();
        assert_eq!(text, "echo: coffee; rm -rf /");
    }

    #[tokio::test]
    async fn slow_scripts_time_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = script(&dir, "sleep 5\n");
        let gen = ScriptGenerator::new("sh", path, Duration::from_millis(100));

        let err = gen.generate("hello").await.unwrap_err();
        assert!(matches!(err, GeneratorError::Timeout(_)));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let gen = ScriptGenerator::new("definitely-not-a-real-binary", "x.py", Duration::from_secs(1));
        let err = gen.generate("hello").await.unwrap_err();
        assert!(matches!(err, GeneratorError::Spawn(_)));
    }
}
