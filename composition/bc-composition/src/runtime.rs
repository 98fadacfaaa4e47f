//! セットアップ/アンインストール用ランタイム配線。

use crate::error::{Context, Result};
use bc_adapter_fs::{schedule_tree_deletion_on_reboot, write_json_report, StdFileSystem};
use bc_adapter_paths as paths;
use bc_adapter_process::{ProcessControlAdapter, SystemCommandRunner};
use bc_adapter_registry::WindowsRegistry;
use bc_adapter_shortcut::ShellLinkWriter;
use bc_adapter_task::SchtasksScheduler;
use bc_app::{SetupDeps, SetupService};
use bc_domain::model::{
    InstallLayout, ProductIdentity, StepStatus, UninstallReport,
};
use bc_domain::port::driven::OperatorPrompt;
use bc_domain::port::driving::{InstallUseCase, UninstallRequest};
use bc_ui_common::MessageBoxPrompt;
use log::{info, warn};
use std::path::PathBuf;

/// レポートファイル名の接頭辞
pub const UNINSTALL_REPORT_PREFIX: &str = "uninstall-report";

/// 実行ファイル用の依存関係
pub struct SetupRuntime {
    identity: ProductIdentity,
    registry: WindowsRegistry,
    fs: StdFileSystem,
    commands: SystemCommandRunner,
    scheduler: SchtasksScheduler<SystemCommandRunner>,
    processes: ProcessControlAdapter<SystemCommandRunner>,
    shortcuts: ShellLinkWriter,
    prompt: MessageBoxPrompt,
}

impl SetupRuntime {
    /// `title` はダイアログのタイトル
    pub fn new(title: &str, quiet: bool) -> Self {
        Self {
            identity: ProductIdentity::bongo_cat(),
            registry: WindowsRegistry::new(),
            fs: StdFileSystem::new(),
            commands: SystemCommandRunner::new(),
            scheduler: SchtasksScheduler::new(SystemCommandRunner::new()),
            processes: ProcessControlAdapter::new(SystemCommandRunner::new()),
            shortcuts: ShellLinkWriter::new(),
            prompt: MessageBoxPrompt::new(title, quiet),
        }
    }

    pub fn identity(&self) -> &ProductIdentity {
        &self.identity
    }

    pub fn prompt(&self) -> &dyn OperatorPrompt {
        &self.prompt
    }

    /// アプリケーションサービス取得
    pub fn service(&self) -> SetupService<'_> {
        SetupService::new(SetupDeps {
            identity: self.identity,
            registry: &self.registry,
            fs: &self.fs,
            commands: &self.commands,
            scheduler: &self.scheduler,
            processes: &self.processes,
            shortcuts: &self.shortcuts,
            prompt: &self.prompt,
        })
    }

    /// 未指定部分を既定値で埋めたレイアウト
    pub fn layout(&self, install_dir: Option<PathBuf>, payload_dir: Option<PathBuf>) -> InstallLayout {
        InstallLayout::new(
            install_dir.unwrap_or_else(|| paths::default_install_dir(&self.identity)),
            payload_dir.unwrap_or_else(paths::default_payload_dir),
            paths::public_desktop_dir(),
        )
    }

    /// 撤去してレポートを書き出し、結果をオペレーターに伝える
    pub fn uninstall_and_report(
        &self,
        install_dir: Option<PathBuf>,
        confirm: bool,
        running_image: Option<PathBuf>,
    ) -> Result<UninstallReport> {
        let request = UninstallRequest {
            install_dir,
            desktop_dir: paths::public_desktop_dir(),
            confirm,
            running_image,
        };
        let report = self
            .service()
            .uninstall(&request)
            .context("uninstall failed")?;

        let report_path = self.write_uninstall_report(&report);
        for failure in report.failures() {
            warn!(
                "{} failed for {}: {}",
                failure.step,
                failure.target,
                failure.detail.as_deref().unwrap_or("unknown error")
            );
        }

        self.schedule_work_dir_cleanup();

        let summary = summarize_uninstall(&report, self.identity.display_name, report_path.as_ref());
        if report.is_clean() {
            if !self.prompt.is_quiet() {
                self.prompt.show_info(&summary);
            }
        } else {
            self.prompt.show_warn(&summary);
        }
        Ok(report)
    }

    /// `%TEMP%\BongoCat\uninstall-report-<UTC>.json`（書けなくても撤去結果は変えない）
    fn write_uninstall_report(&self, report: &UninstallReport) -> Option<PathBuf> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();
        match write_json_report(
            &paths::work_dir(&self.identity),
            UNINSTALL_REPORT_PREFIX,
            &stamp,
            report,
        ) {
            Ok(path) => {
                info!("Uninstall report written: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to write uninstall report: {}", e);
                None
            }
        }
    }
}

impl SetupRuntime {
    /// `%TEMP%\BongoCat`（ログ・レポート・退避したアンインストーラー）を再起動時削除に予約する
    fn schedule_work_dir_cleanup(&self) {
        let dir = paths::work_dir(&self.identity);
        match schedule_tree_deletion_on_reboot(&dir) {
            Ok(outcome) => info!("Work directory {}: {:?}", dir.display(), outcome),
            Err(e) => warn!("Could not schedule removal of {}: {}", dir.display(), e),
        }
    }
}

/// 撤去結果の要約文
pub fn summarize_uninstall(
    report: &UninstallReport,
    display_name: &str,
    report_path: Option<&PathBuf>,
) -> String {
    let mut text = if report.is_clean() {
        format!("{} was removed from your computer.", display_name)
    } else {
        let mut text = format!("{} was removed, but some items could not be:", display_name);
        for step in report.steps.iter().filter(|s| s.status == StepStatus::Failed) {
            text.push_str(&format!("\n- {}: {}", step.step, step.target));
            if let Some(detail) = &step.detail {
                text.push_str(&format!(" ({})", detail));
            }
        }
        text
    };
    if report.needs_reboot() {
        text.push_str("\n\nSome files will be removed when Windows restarts.");
    }
    if let Some(path) = report_path {
        text.push_str(&format!("\n\nReport: {}", path.display()));
    }
    text
}
