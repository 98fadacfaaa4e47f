//! 実行結果レポート

use super::outcome::{RemovalOutcome, TerminateOutcome};
use super::record::InstallationRecord;
use super::step::{InstallStep, UninstallStep};
use super::task::TaskStatus;
use serde::Serialize;

/// 事前チェックの結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PreconditionOutcome {
    /// 既存インストールなし
    Fresh,
    /// 旧アンインストーラーを実行して置き換えた
    Replaced {
        previous_version: String,
        uninstaller_exit_code: Option<i32>,
    },
}

/// 致命的でない手順の失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepWarning {
    pub step: InstallStep,
    pub message: String,
}

/// インストール結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub install_dir: String,
    pub precondition: PreconditionOutcome,
    /// 成功した手順（実行順）
    pub completed: Vec<InstallStep>,
    pub warnings: Vec<StepWarning>,
}

impl InstallReport {
    pub fn new(install_dir: impl Into<String>, precondition: PreconditionOutcome) -> Self {
        Self {
            install_dir: install_dir.into(),
            precondition,
            completed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// アンインストール手順の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    /// 対象が元から無い（成功扱い）
    Skipped,
    Failed,
}

impl From<RemovalOutcome> for StepStatus {
    fn from(outcome: RemovalOutcome) -> Self {
        match outcome {
            RemovalOutcome::Removed | RemovalOutcome::ScheduledOnReboot => Self::Done,
            RemovalOutcome::Absent => Self::Skipped,
        }
    }
}

impl From<TerminateOutcome> for StepStatus {
    fn from(outcome: TerminateOutcome) -> Self {
        match outcome {
            TerminateOutcome::Terminated => Self::Done,
            TerminateOutcome::NotRunning => Self::Skipped,
        }
    }
}

/// アンインストール手順ごとの記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UninstallStepReport {
    pub step: UninstallStep,
    /// 対象（パス、キー、タスク名など）
    pub target: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// アンインストール結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UninstallReport {
    pub install_dir: String,
    pub steps: Vec<UninstallStepReport>,
}

impl UninstallReport {
    pub fn new(install_dir: impl Into<String>) -> Self {
        Self {
            install_dir: install_dir.into(),
            steps: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        step: UninstallStep,
        target: impl Into<String>,
        status: StepStatus,
        detail: Option<String>,
    ) {
        self.steps.push(UninstallStepReport {
            step,
            target: target.into(),
            status,
            detail,
        });
    }

    pub fn failures(&self) -> impl Iterator<Item = &UninstallStepReport> {
        self.steps.iter().filter(|s| s.status == StepStatus::Failed)
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    /// 再起動時削除を予約した手順があるか
    pub fn needs_reboot(&self) -> bool {
        self.steps.iter().any(|s| {
            s.detail
                .as_deref()
                .is_some_and(|d| d == REBOOT_PENDING_DETAIL)
        })
    }
}

/// 再起動時削除を予約したときの detail
pub const REBOOT_PENDING_DETAIL: &str = "scheduled for deletion on reboot";

/// 状態確認の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub record: Option<InstallationRecord>,
    pub autostart: Option<TaskStatus>,
}

impl StatusReport {
    pub fn is_installed(&self) -> bool {
        self.record.is_some()
    }
}
