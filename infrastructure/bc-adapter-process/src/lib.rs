//! 外部プロセスアダプター
//!
//! - `SystemCommandRunner`: std::process で同期実行（コンソール窓なし）
//! - `ProcessControlAdapter`: taskkill による強制終了と、待たない起動

use bc_domain::model::TerminateOutcome;
use bc_domain::port::driven::{CommandOutput, CommandRequest, CommandRunner, ProcessControl};
use bc_domain::DomainError;
use log::{debug, info};
use std::path::Path;
use std::process::{Command, Stdio};

/// taskkill: 対象プロセスが見つからない
pub const TASKKILL_NOT_FOUND: i32 = 128;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, request: &CommandRequest) -> Result<CommandOutput, DomainError> {
        debug!("exec: {}", request);
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let output = cmd.output().map_err(|e| {
            DomainError::ProcessLaunchFailed(format!("{}: {}", request.program, e))
        })?;
        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("exit: {:?} ({})", result.exit_code, request.program);
        Ok(result)
    }
}

/// 終了はコマンド経由、起動は直接 spawn
pub struct ProcessControlAdapter<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> ProcessControlAdapter<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ProcessControl for ProcessControlAdapter<R> {
    fn terminate_by_image_name(&self, image_name: &str) -> Result<TerminateOutcome, DomainError> {
        let request = CommandRequest::new("taskkill").args(["/F", "/IM", image_name]);
        let output = self.runner.run(&request)?;
        match output.exit_code {
            Some(0) => {
                info!("Terminated {}", image_name);
                Ok(TerminateOutcome::Terminated)
            }
            Some(TASKKILL_NOT_FOUND) => Ok(TerminateOutcome::NotRunning),
            code => Err(DomainError::CommandFailed {
                command: request.to_string(),
                exit_code: code,
                detail: output.diagnostic(),
            }),
        }
    }

    fn launch(&self, exe: &Path, working_dir: &Path) -> Result<(), DomainError> {
        let child = Command::new(exe)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| DomainError::ProcessLaunchFailed(format!("{}: {}", exe.display(), e)))?;
        info!("Launched {} (pid {})", exe.display(), child.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedRunner {
        exit_code: Option<i32>,
        seen: Mutex<Vec<CommandRequest>>,
    }

    impl ScriptedRunner {
        fn exiting(exit_code: Option<i32>) -> Self {
            Self {
                exit_code,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, request: &CommandRequest) -> Result<CommandOutput, DomainError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(CommandOutput {
                exit_code: self.exit_code,
                stdout: String::new(),
                stderr: "ERROR: something".into(),
            })
        }
    }

    #[test]
    fn taskkill_arguments() {
        let adapter = ProcessControlAdapter::new(ScriptedRunner::exiting(Some(0)));
        assert_eq!(
            adapter.terminate_by_image_name("BongoCat.exe").unwrap(),
            TerminateOutcome::Terminated
        );
        let seen = adapter.runner.seen.lock().unwrap();
        assert_eq!(seen[0].program, "taskkill");
        assert_eq!(seen[0].args, vec!["/F", "/IM", "BongoCat.exe"]);
    }

    #[test]
    fn process_not_found_is_not_running() {
        let adapter = ProcessControlAdapter::new(ScriptedRunner::exiting(Some(128)));
        assert_eq!(
            adapter.terminate_by_image_name("BongoCat.exe").unwrap(),
            TerminateOutcome::NotRunning
        );
    }

    #[test]
    fn other_exit_codes_are_errors() {
        let adapter = ProcessControlAdapter::new(ScriptedRunner::exiting(Some(1)));
        let err = adapter.terminate_by_image_name("BongoCat.exe").unwrap_err();
        assert!(matches!(
            err,
            DomainError::CommandFailed { exit_code: Some(1), ref detail, .. } if detail == "ERROR: something"
        ));
    }

    #[test]
    fn launching_missing_binary_fails() {
        let adapter = ProcessControlAdapter::new(SystemCommandRunner::new());
        let dir = std::env::temp_dir();
        let err = adapter
            .launch(&dir.join("definitely-missing-bongo-cat.exe"), &dir)
            .unwrap_err();
        assert!(matches!(err, DomainError::ProcessLaunchFailed(_)));
    }

    #[test]
    fn runner_reports_spawn_failure() {
        let err = SystemCommandRunner::new()
            .run(&CommandRequest::new("definitely-missing-bongo-cat-tool"))
            .unwrap_err();
        assert!(matches!(err, DomainError::ProcessLaunchFailed(_)));
    }
}
