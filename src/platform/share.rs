//! Share transport backed by a shell command.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use super::{FileRef, ShareError, ShareTransport};

/// Runs a configured opener such as `xdg-open {file}`.
///
/// `{file}` is passed to the shell as a positional argument, so paths with
/// spaces or quotes need no escaping. An empty command disables sharing.
/// The child never sees the terminal: its standard streams are null while
/// the TUI owns the screen.
pub struct CommandShare {
    command: String,
}

impl CommandShare {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn script(&self) -> String {
        self.command.replace("{file}", "\"$1\"")
    }
}

#[async_trait]
impl ShareTransport for CommandShare {
    async fn share(&self, file: &FileRef) -> Result<(), ShareError> {
        if self.command.trim().is_empty() {
            tracing::info!("Sharing disabled, report kept at {}", file.path().display());
            return Ok(());
        }

        tracing::debug!("Sharing {} via `{}`", file.path().display(), self.command);

        let status = Command::new("sh")
            .arg("-c")
            .arg(self.script())
            .arg("plester-share")
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| ShareError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ShareError::Exit(status.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_substitutes_placeholder() {
        let share = CommandShare::new("xdg-open {file}");
        assert_eq!(share.script(), "xdg-open \"$1\"");
    }

    #[tokio::test]
    async fn test_empty_command_is_noop() {
        let share = CommandShare::new("  ");
        assert!(share.share(&FileRef::new("/nonexistent.html")).await.is_ok());
    }

    #[tokio::test]
    async fn test_command_receives_path() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("with space.html");
        std::fs::write(&report, "").unwrap();
        let marker = dir.path().join("marker");

        let share = CommandShare::new(format!("cp {{file}} '{}'", marker.display()));
        share.share(&FileRef::new(&report)).await.unwrap();
        assert!(marker.exists());
    }

    #[tokio::test]
    async fn test_child_streams_are_detached() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("streams");

        // Each readlink runs in its own child, so the shell's fds stay as spawned
        let m = marker.display();
        let share = CommandShare::new(format!(
            "readlink /proc/$$/fd/0 >> '{m}'; readlink /proc/$$/fd/1 >> '{m}'; \
             readlink /proc/$$/fd/2 >> '{m}'; true {{file}}"
        ));
        share.share(&FileRef::new("/tmp/x.html")).await.unwrap();

        let streams = std::fs::read_to_string(&marker).unwrap();
        assert_eq!(streams.lines().collect::<Vec<_>>(), vec!["/dev/null"; 3]);
    }

    #[tokio::test]
    async fn test_failing_command_is_error() {
        let share = CommandShare::new("exit 3");
        let result = share.share(&FileRef::new("/tmp/x.html")).await;
        assert!(matches!(result, Err(ShareError::Exit(_))));
    }
}
