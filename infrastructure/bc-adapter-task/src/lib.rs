//! タスクスケジューラアダプター（schtasks.exe 経由）
//!
//! 登録はタスク定義XMLを一時ファイルへ書き出して `schtasks /Create /XML` に渡す。
//! 一時ファイルは成否に関わらず破棄する。

use bc_domain::model::{AutostartTaskDefinition, RemovalOutcome, TaskStatus};
use bc_domain::port::driven::{CommandOutput, CommandRequest, CommandRunner, TaskScheduler};
use bc_domain::service::task_document::{encode_utf16le_with_bom, render_task_xml};
use bc_domain::DomainError;
use log::{info, warn};
use std::io::Write;
use std::path::Path;
use tempfile::TempPath;

const SCHTASKS: &str = "schtasks";

pub struct SchtasksScheduler<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> SchtasksScheduler<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn run(&self, request: &CommandRequest) -> Result<CommandOutput, DomainError> {
        self.runner.run(request)
    }
}

/// タスク定義を UTF-16LE(BOM付き) で一時ファイルに書き出す。
/// 返した `TempPath` を落とすとファイルは削除される。
pub fn write_task_document(definition: &AutostartTaskDefinition) -> Result<TempPath, DomainError> {
    let xml = render_task_xml(definition);
    let mut file = tempfile::Builder::new()
        .prefix("bc-autostart-")
        .suffix(".xml")
        .tempfile()
        .map_err(|e| DomainError::Io(format!("Failed to create task document: {}", e)))?;
    file.write_all(&encode_utf16le_with_bom(&xml))
        .and_then(|_| file.flush())
        .map_err(|e| DomainError::Io(format!("Failed to write task document: {}", e)))?;
    // schtasks が読めるようにハンドルを閉じ、パスだけ保持する
    Ok(file.into_temp_path())
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

impl<R: CommandRunner> TaskScheduler for SchtasksScheduler<R> {
    fn register_task(
        &self,
        task_name: &str,
        definition: &AutostartTaskDefinition,
    ) -> Result<(), DomainError> {
        let document = write_task_document(definition)?;
        let request = CommandRequest::new(SCHTASKS)
            .args(["/Create", "/TN", task_name, "/XML"])
            .arg(path_arg(&document))
            .arg("/F");
        let result = self.run(&request);
        if let Err(e) = document.close() {
            warn!("Failed to remove task document: {}", e);
        }

        let output = result?;
        info!(
            "schtasks /Create {} exit status: {:?}",
            task_name, output.exit_code
        );
        if output.success() {
            Ok(())
        } else {
            Err(DomainError::TaskScheduler(format!(
                "schtasks /Create exited with {:?}: {}",
                output.exit_code,
                output.diagnostic()
            )))
        }
    }

    fn delete_task(&self, task_name: &str) -> Result<RemovalOutcome, DomainError> {
        if self.query_task(task_name)?.is_none() {
            return Ok(RemovalOutcome::Absent);
        }
        let request = CommandRequest::new(SCHTASKS).args(["/Delete", "/TN", task_name, "/F"]);
        let output = self.run(&request)?;
        if output.success() {
            Ok(RemovalOutcome::Removed)
        } else {
            Err(DomainError::CommandFailed {
                command: request.to_string(),
                exit_code: output.exit_code,
                detail: output.diagnostic(),
            })
        }
    }

    fn query_task(&self, task_name: &str) -> Result<Option<TaskStatus>, DomainError> {
        let request =
            CommandRequest::new(SCHTASKS).args(["/Query", "/TN", task_name, "/FO", "LIST", "/V"]);
        let output = self.run(&request)?;
        if !output.success() {
            // 未登録（アクセス不可も含む）
            return Ok(None);
        }
        Ok(Some(TaskInfo::parse(&output.stdout).into_status(task_name)))
    }

    fn set_task_enabled(&self, task_name: &str, enabled: bool) -> Result<(), DomainError> {
        let flag = if enabled { "/ENABLE" } else { "/DISABLE" };
        let request = CommandRequest::new(SCHTASKS).args(["/Change", "/TN", task_name, flag]);
        let output = self.run(&request)?;
        if output.success() {
            Ok(())
        } else {
            Err(DomainError::TaskScheduler(format!(
                "schtasks /Change {} exited with {:?}: {}",
                flag,
                output.exit_code,
                output.diagnostic()
            )))
        }
    }
}

/// `schtasks /Query /V /FO LIST` の1タスク分
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInfo {
    pub task_name: String,
    pub status: String,
    pub scheduled_state: String,
    pub last_run_time: String,
    pub last_result: String,
    pub next_run_time: String,
    pub task_to_run: String,
}

impl TaskInfo {
    /// schtasks /Query /V /FO LIST の出力をパース（英語/日本語表示）
    pub fn parse(output: &str) -> Self {
        let mut info = TaskInfo::default();

        for line in output.lines() {
            let line = line.trim();
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                let value = value.trim();

                match key {
                    "TaskName" | "タスク名" => info.task_name = value.to_string(),
                    "Status" | "状態" => info.status = value.to_string(),
                    "Scheduled Task State" | "スケジュールされたタスクの状態" => {
                        info.scheduled_state = value.to_string()
                    }
                    "Last Run Time" | "前回の実行時刻" => info.last_run_time = value.to_string(),
                    "Last Result" | "前回の結果" => info.last_result = value.to_string(),
                    "Next Run Time" | "次回の実行時刻" => info.next_run_time = value.to_string(),
                    "Task To Run" | "タスクの実行" => info.task_to_run = value.to_string(),
                    _ => {}
                }
            }
        }

        info
    }

    pub fn is_enabled(&self) -> bool {
        let disabled = |s: &str| s.eq_ignore_ascii_case("Disabled") || s == "無効";
        !disabled(&self.scheduled_state) && !disabled(&self.status)
    }

    pub fn into_status(self, task_name: &str) -> TaskStatus {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };
        TaskStatus {
            enabled: self.is_enabled(),
            name: if self.task_name.is_empty() {
                task_name.to_string()
            } else {
                self.task_name
            },
            state: self.status,
            task_to_run: non_empty(self.task_to_run),
            last_result: non_empty(self.last_result),
            next_run_time: non_empty(self.next_run_time),
        }
    }
}
