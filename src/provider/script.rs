//! External-script provider
//!
//! Runs `<runner...> <script> <location>` and reads the script's stdout as a
//! JSON tree document. The provider is read-only.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use super::{Provider, ProviderError};
use crate::codec::json;
use crate::tree::Node;

/// Provider whose children are produced by an external program
#[derive(Debug, Clone)]
pub struct ScriptProvider {
    name: String,
    script: PathBuf,
    runner: Vec<String>,
}

impl ScriptProvider {
    /// # Arguments
    /// * `name` - Provider name and root label
    /// * `script` - Script handed to the runner
    /// * `runner` - Program and leading arguments, e.g. `["bun", "run"]`
    #[must_use]
    pub fn new(name: impl Into<String>, script: impl Into<PathBuf>, runner: Vec<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            runner,
        }
    }

    fn command(&self, location: &str) -> Result<Command, ProviderError> {
        let (program, args) = self
            .runner
            .split_first()
            .ok_or_else(|| ProviderError::Invalid("Script runner is empty".to_string()))?;
        let mut command = Command::new(program);
        command.args(args).arg(&self.script).arg(location);
        Ok(command)
    }
}

impl Provider for ScriptProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self, location: &str) -> Result<Vec<Node>, ProviderError> {
        debug!("Running {} for {location}", self.script.display());
        let output = self.command(location)?.output()?;
        if !output.status.success() {
            return Err(ProviderError::Script {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(json::nodes_from_str(&String::from_utf8_lossy(&output.stdout))?)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    fn shell_script(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("provider.sh");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn test_fetch_parses_stdout() {
        let (_dir, script) = shell_script("echo '[\"at '\"$1\"'\", {\"group\": [1]}]'\n");
        let mut provider = ScriptProvider::new("tutorial", script, vec!["sh".to_string()]);

        let nodes = provider.fetch("/intro").unwrap();
        assert_eq!(
            nodes,
            vec![Node::leaf("at /intro"), Node::group("group", vec![Node::leaf("1")])]
        );
    }

    #[test]
    fn test_fetch_reports_failure() {
        let (_dir, script) = shell_script("echo broken >&2\nexit 3\n");
        let mut provider = ScriptProvider::new("bad", script, vec!["sh".to_string()]);

        match provider.fetch("/") {
            Err(ProviderError::Script { stderr, .. }) => assert_eq!(stderr, "broken"),
            other => panic!("Expected script error, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_rejects_non_array_output() {
        let (_dir, script) = shell_script("echo '{}'\n");
        let mut provider = ScriptProvider::new("bad", script, vec!["sh".to_string()]);
        assert!(matches!(provider.fetch("/"), Err(ProviderError::Codec(_))));
    }

    #[test]
    fn test_empty_runner() {
        let mut provider = ScriptProvider::new("x", "s.ts", Vec::new());
        assert!(matches!(provider.fetch("/"), Err(ProviderError::Invalid(_))));
        assert!(provider.commit("/", "a", "b").unwrap_err().is_unsupported());
    }
}
