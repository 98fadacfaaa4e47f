//! アンインストール（ベストエフォートの撤去）

use crate::execute::path_text;
use bc_domain::model::{
    ProductIdentity, RemovalOutcome, StepStatus, UninstallReport, UninstallStep,
    REBOOT_PENDING_DETAIL,
};
use bc_domain::port::driven::{FileSystem, KeyValueStore, ProcessControl, TaskScheduler};
use bc_domain::DomainError;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// アンインストールに使うポート一式
pub struct UninstallPorts<'a> {
    pub registry: &'a dyn KeyValueStore,
    pub fs: &'a dyn FileSystem,
    pub scheduler: &'a dyn TaskScheduler,
    pub processes: &'a dyn ProcessControl,
}

/// 撤去対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallTarget {
    pub install_dir: PathBuf,
    pub desktop_dir: PathBuf,
    /// 実行中のアンインストーラー自身（置き換えインストールから連鎖実行された場合）。
    /// 同じパスは削除せずに残す。
    pub running_image: Option<PathBuf>,
}

const RUNNING_IMAGE_DETAIL: &str = "running uninstaller image; left in place";

/// 各手順を独立に実行し、失敗しても次へ進む。
/// 手順の結果はすべてレポートに残す。
pub fn uninstall(
    identity: &ProductIdentity,
    target: &UninstallTarget,
    ports: &UninstallPorts<'_>,
) -> UninstallReport {
    let mut run = Teardown {
        report: UninstallReport::new(path_text(&target.install_dir)),
        reboot_pending: false,
    };

    // 1. 実行中のアプリを終了
    let terminated = ports
        .processes
        .terminate_by_image_name(identity.app_exe)
        .map(StepStatus::from);
    run.record(UninstallStep::TerminateProcess, identity.app_exe, terminated);

    // 2. 自動起動タスク
    let deleted = ports.scheduler.delete_task(identity.task_name);
    run.record_removal(UninstallStep::DeleteTask, identity.task_name, deleted);

    // 3. 旧バージョンの Run エントリ
    for key in identity.legacy_run_keys() {
        let status = ports
            .registry
            .delete_value(&key, identity.legacy_run_value)
            .map(|deleted| if deleted { StepStatus::Done } else { StepStatus::Skipped });
        run.record(
            UninstallStep::DeleteLegacyRunEntry,
            format!("{}\\{}", key, identity.legacy_run_value),
            status,
        );
    }

    // 4. ショートカット・バイナリ・ディレクトリ
    let shortcut = target.desktop_dir.join(identity.shortcut_name);
    run.remove_file(ports.fs, UninstallStep::DeleteShortcut, &shortcut);

    let app = target.install_dir.join(identity.app_exe);
    run.remove_file(ports.fs, UninstallStep::DeleteApplication, &app);

    let uninstaller = target.install_dir.join(identity.uninstaller_exe);
    if target
        .running_image
        .as_deref()
        .is_some_and(|image| same_path(image, &uninstaller))
    {
        info!("Leaving running uninstaller in place: {}", uninstaller.display());
        run.report.record(
            UninstallStep::DeleteUninstaller,
            path_text(&uninstaller),
            StepStatus::Skipped,
            Some(RUNNING_IMAGE_DETAIL.to_string()),
        );
    } else {
        run.remove_file(ports.fs, UninstallStep::DeleteUninstaller, &uninstaller);
    }

    run.remove_install_dir(ports.fs, &target.install_dir);

    // 5. 登録レコード
    let key = identity.registration_key();
    let status = ports
        .registry
        .delete_key(&key)
        .map(|deleted| if deleted { StepStatus::Done } else { StepStatus::Skipped });
    run.record(UninstallStep::DeleteRegistration, key.to_string(), status);

    run.report
}

struct Teardown {
    report: UninstallReport,
    reboot_pending: bool,
}

impl Teardown {
    fn record(
        &mut self,
        step: UninstallStep,
        target: impl Into<String>,
        result: Result<StepStatus, DomainError>,
    ) {
        let target = target.into();
        match result {
            Ok(status) => {
                info!("{}: {:?} ({})", step, status, target);
                self.report.record(step, target, status, None);
            }
            Err(err) => {
                warn!("{} failed ({}): {}", step, target, err);
                self.report
                    .record(step, target, StepStatus::Failed, Some(err.to_string()));
            }
        }
    }

    fn record_removal(
        &mut self,
        step: UninstallStep,
        target: impl Into<String>,
        result: Result<RemovalOutcome, DomainError>,
    ) {
        match result {
            Ok(RemovalOutcome::ScheduledOnReboot) => {
                let target = target.into();
                info!("{}: scheduled on reboot ({})", step, target);
                self.reboot_pending = true;
                self.report.record(
                    step,
                    target,
                    StepStatus::Done,
                    Some(REBOOT_PENDING_DETAIL.to_string()),
                );
            }
            other => self.record(step, target, other.map(StepStatus::from)),
        }
    }

    fn remove_file(&mut self, fs: &dyn FileSystem, step: UninstallStep, path: &Path) {
        let result = fs.remove_file(path);
        self.record_removal(step, path_text(path), result);
    }

    /// 空なら削除。中身が再起動待ちなら、ディレクトリも再起動時削除に回す。
    fn remove_install_dir(&mut self, fs: &dyn FileSystem, dir: &Path) {
        let step = UninstallStep::DeleteInstallDir;
        match fs.remove_dir_if_empty(dir) {
            Err(err) if self.reboot_pending => {
                info!("Install directory not removable yet ({}); scheduling", err);
                let scheduled = fs
                    .schedule_delete_on_reboot(dir)
                    .map(|()| RemovalOutcome::ScheduledOnReboot);
                self.record_removal(step, path_text(dir), scheduled);
            }
            result => self.record_removal(step, path_text(dir), result),
        }
    }
}

/// Windows のパス比較（大文字小文字・区切り文字を無視）
fn same_path(a: &Path, b: &Path) -> bool {
    let norm = |p: &Path| p.display().to_string().replace('/', "\\");
    norm(a).eq_ignore_ascii_case(&norm(b))
}
