//! 自動起動タスク定義（ログオン時に昇格・対話セッションで起動）

use serde::Serialize;

/// 実行レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunLevel {
    HighestAvailable,
    LeastPrivilege,
}

impl RunLevel {
    pub fn as_schema_str(self) -> &'static str {
        match self {
            Self::HighestAvailable => "HighestAvailable",
            Self::LeastPrivilege => "LeastPrivilege",
        }
    }
}

/// ログオン種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogonType {
    InteractiveToken,
    Password,
    S4U,
}

impl LogonType {
    pub fn as_schema_str(self) -> &'static str {
        match self {
            Self::InteractiveToken => "InteractiveToken",
            Self::Password => "Password",
            Self::S4U => "S4U",
        }
    }
}

/// 多重起動ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstancesPolicy {
    IgnoreNew,
    Parallel,
    Queue,
    StopExisting,
}

impl InstancesPolicy {
    pub fn as_schema_str(self) -> &'static str {
        match self {
            Self::IgnoreNew => "IgnoreNew",
            Self::Parallel => "Parallel",
            Self::Queue => "Queue",
            Self::StopExisting => "StopExisting",
        }
    }
}

/// ログオントリガー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogonTrigger {
    pub enabled: bool,
    /// ログオン後の遅延（秒）
    pub delay_secs: u32,
}

/// 実行主体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPrincipal {
    pub logon_type: LogonType,
    pub run_level: RunLevel,
}

/// タスク設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSettings {
    pub instances: InstancesPolicy,
    pub disallow_start_if_on_batteries: bool,
    pub stop_if_going_on_batteries: bool,
    pub allow_hard_terminate: bool,
    pub start_when_available: bool,
    pub allow_start_on_demand: bool,
    pub enabled: bool,
    /// 0 は無制限
    pub execution_time_limit_secs: u32,
    pub priority: u8,
}

/// 実行アクション
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecAction {
    pub command: String,
    pub arguments: Option<String>,
    pub working_directory: String,
}

/// 自動起動タスク定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutostartTaskDefinition {
    pub description: String,
    pub author: String,
    pub trigger: LogonTrigger,
    pub principal: TaskPrincipal,
    pub settings: TaskSettings,
    pub action: ExecAction,
}

/// ログオン後の起動遅延（シェル初期化との競合回避）
pub const LOGON_DELAY_SECS: u32 = 10;
/// 優先度 7（通常未満）
pub const TASK_PRIORITY: u8 = 7;

impl AutostartTaskDefinition {
    /// インストール済みバイナリを起動する固定定義
    pub fn for_executable(
        description: &str,
        author: &str,
        exe_path: &str,
        working_directory: &str,
    ) -> Self {
        Self {
            description: description.to_string(),
            author: author.to_string(),
            trigger: LogonTrigger {
                enabled: true,
                delay_secs: LOGON_DELAY_SECS,
            },
            principal: TaskPrincipal {
                logon_type: LogonType::InteractiveToken,
                run_level: RunLevel::HighestAvailable,
            },
            settings: TaskSettings {
                instances: InstancesPolicy::IgnoreNew,
                disallow_start_if_on_batteries: false,
                stop_if_going_on_batteries: false,
                allow_hard_terminate: true,
                start_when_available: true,
                allow_start_on_demand: true,
                enabled: true,
                execution_time_limit_secs: 0,
                priority: TASK_PRIORITY,
            },
            action: ExecAction {
                command: exe_path.to_string(),
                arguments: None,
                working_directory: working_directory.to_string(),
            },
        }
    }
}

/// ISO 8601 の期間表記（PT10S 等）
pub fn iso8601_duration(secs: u32) -> String {
    if secs == 0 {
        return "PT0S".to_string();
    }
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let mut out = String::from("PT");
    if h > 0 {
        out.push_str(&format!("{}H", h));
    }
    if m > 0 {
        out.push_str(&format!("{}M", m));
    }
    if s > 0 {
        out.push_str(&format!("{}S", s));
    }
    out
}

/// 登録済みタスクの状態（OS側の状態を問い合わせた結果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStatus {
    pub name: String,
    pub enabled: bool,
    /// Ready / Running / Disabled など（OS表記のまま）
    pub state: String,
    pub task_to_run: Option<String>,
    pub last_result: Option<String>,
    pub next_run_time: Option<String>,
}
