//! External transcoder execution.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::OnceCell;
use tokio::time::sleep;

use crate::error::{Error, Result};

/// Interval between liveness checks of a running process.
pub const PROCESS_LIVENESS_CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// Default timeout of a transcoding run.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Timeout of the `-version` check run at first use.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// Exit code reported when the process was terminated by a signal.
const SIGNALED_EXIT_CODE: i32 = -1;

/// Set once the startup check has run in this process.
static SELF_CHECK: OnceCell<()> = OnceCell::const_new();

/// Runs an external program with a fixed name and caller supplied arguments.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the program and return its exit code.
    ///
    /// Fails with [`Error::ProcessTimeout`] when the process is still alive
    /// after `timeout`. The process is killed in that case.
    async fn run(&self, args: &[String], timeout: Duration) -> Result<i32>;
}

/// [`ProcessRunner`] for the `ffmpeg` command line tool.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    program: PathBuf,
    poll_interval: Duration,
    check_timeout: Duration,
    self_check: &'static OnceCell<()>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegRunner {
    /// Create a runner invoking `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            poll_interval: PROCESS_LIVENESS_CHECK_INTERVAL,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            self_check: &SELF_CHECK,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_check_timeout(mut self, check_timeout: Duration) -> Self {
        self.check_timeout = check_timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check the program once per process and warn if it is unusable.
    async fn ensure_checked(&self) {
        self.self_check
            .get_or_init(|| async {
                let args = ["-version".to_string()];
                match self.spawn_and_wait(&args, self.check_timeout).await {
                    Ok(0) => {
                        tracing::debug!("`{}` is available", self.program.display());
                    }
                    Ok(code) => {
                        tracing::warn!(
                            "`{}` -version exited with {}, some functions may work unreliably",
                            self.program.display(),
                            code
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            "`{}` is not present in OS, some functions may work unreliably: {}",
                            self.program.display(),
                            e
                        );
                    }
                }
            })
            .await;
    }

    async fn spawn_and_wait(&self, args: &[String], timeout: Duration) -> Result<i32> {
        tracing::debug!("Running {} {}", self.program.display(), args.join(" "));

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::FFmpegNotFound
                } else {
                    Error::FFmpeg(format!("Failed to run {}: {}", self.program.display(), e))
                }
            })?;

        let waited =
            tokio::time::timeout(timeout, poll_until_exit(&mut child, self.poll_interval)).await;

        let status = match waited {
            Ok(status) => status?,
            Err(_) => {
                tracing::warn!(
                    "{} did not finish within {:?}, killing",
                    self.program.display(),
                    timeout
                );
                if let Err(e) = child.kill().await {
                    tracing::error!("Failed to kill {}: {}", self.program.display(), e);
                }
                return Err(Error::ProcessTimeout(timeout));
            }
        };

        Ok(status.code().unwrap_or(SIGNALED_EXIT_CODE))
    }
}

/// Check liveness at a fixed interval until the child exits.
async fn poll_until_exit(child: &mut Child, interval: Duration) -> std::io::Result<ExitStatus> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        sleep(interval).await;
    }
}

#[async_trait]
impl ProcessRunner for FfmpegRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> Result<i32> {
        self.ensure_checked().await;
        self.spawn_and_wait(args, timeout).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::time::Instant;
    use tempfile::TempDir;

    fn shell(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    fn is_alive(pid: &str) -> bool {
        std::process::Command::new("sh")
            .args(["-c", &format!("kill -0 {} 2>/dev/null", pid)])
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    async fn read_pid(pid_file: &Path) -> String {
        for _ in 0..100 {
            if let Ok(pid) = std::fs::read_to_string(pid_file) {
                if !pid.trim().is_empty() {
                    return pid.trim().to_string();
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("no pid written to {}", pid_file.display());
    }

    /// Killed children are reaped in the background, so allow some time.
    async fn exited(pid: &str) -> bool {
        for _ in 0..100 {
            if !is_alive(pid) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_returns_exit_code() {
        let runner = FfmpegRunner::new("sh").with_check_timeout(Duration::from_millis(200));

        let code = runner
            .run(&shell("exit 3"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(code, 3);

        let code = runner
            .run(&shell("true"), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_timeout_kills_process() {
        let dir = TempDir::new().unwrap();
        let pid_file = dir.path().join("pid");
        let runner = FfmpegRunner::new("sh").with_check_timeout(Duration::from_millis(200));

        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());
        let started = Instant::now();
        let result = runner.run(&shell(&script), Duration::from_millis(200)).await;

        assert!(matches!(result, Err(Error::ProcessTimeout(_))));
        assert!(started.elapsed() < Duration::from_secs(10));

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let pid = pid.trim();
        assert!(!pid.is_empty());
        assert!(!is_alive(pid), "process {} still running", pid);
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = FfmpegRunner::new("definitely-not-an-installed-transcoder")
            .with_check_timeout(Duration::from_millis(200));

        let result = runner.run(&[], Duration::from_secs(1)).await;
        assert!(matches!(result, Err(Error::FFmpegNotFound)));
    }

    #[tokio::test]
    async fn test_cancelled_run_kills_process() {
        let dir = TempDir::new().unwrap();
        let pid_file = dir.path().join("pid");
        let runner = FfmpegRunner::new("sh").with_check_timeout(Duration::from_millis(200));

        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());
        let task = tokio::spawn(async move {
            runner.run(&shell(&script), Duration::from_secs(60)).await
        });

        let pid = read_pid(&pid_file).await;
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert!(exited(&pid).await, "process {} still running", pid);
    }

    #[tokio::test]
    async fn test_self_check_runs_once_and_failure_does_not_block() {
        let dir = TempDir::new().unwrap();
        let calls = dir.path().join("calls");
        let program = dir.path().join("transcoder");
        std::fs::write(
            &program,
            format!(
                "#!/bin/sh\necho \"$@\" >> {}\n[ \"$1\" = \"-version\" ] && exit 1\nexit 0\n",
                calls.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        let check: &'static OnceCell<()> = Box::leak(Box::new(OnceCell::new()));
        let runner = FfmpegRunner {
            self_check: check,
            ..FfmpegRunner::new(&program)
        };

        for arg in ["first", "second"] {
            let code = runner
                .run(&[arg.to_string()], Duration::from_secs(5))
                .await
                .unwrap();
            assert_eq!(code, 0);
        }

        assert!(check.initialized());
        let calls = std::fs::read_to_string(&calls).unwrap();
        assert_eq!(calls.lines().collect::<Vec<_>>(), ["-version", "first", "second"]);
    }
}
