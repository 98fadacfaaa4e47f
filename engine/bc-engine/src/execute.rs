//! 計画の実行

use bc_domain::model::{
    AutostartTaskDefinition, InstallLayout, InstallReport, InstallStep, InstallationRecord,
    PreconditionOutcome, ProductIdentity, StepWarning,
};
use bc_domain::port::driven::{
    CommandRunner, FileSystem, KeyValueStore, OperatorPrompt, ProcessControl, ShortcutSpec,
    ShortcutWriter, TaskScheduler,
};
use bc_domain::DomainError;
use log::{error, info, warn};
use std::path::Path;

/// インストールに使うポート一式
pub struct InstallPorts<'a> {
    pub registry: &'a dyn KeyValueStore,
    pub fs: &'a dyn FileSystem,
    pub commands: &'a dyn CommandRunner,
    pub scheduler: &'a dyn TaskScheduler,
    pub processes: &'a dyn ProcessControl,
    pub shortcuts: &'a dyn ShortcutWriter,
    pub prompt: &'a dyn OperatorPrompt,
}

/// 手順を順に実行する。
/// 致命的な手順の失敗は即座に返す（ロールバックなし）。
/// それ以外の失敗は警告としてレポートに積んで続行する。
pub fn execute_install(
    identity: &ProductIdentity,
    steps: &[InstallStep],
    layout: &InstallLayout,
    ports: &InstallPorts<'_>,
    precondition: PreconditionOutcome,
) -> Result<InstallReport, DomainError> {
    let mut report = InstallReport::new(path_text(&layout.install_dir), precondition);

    for &step in steps {
        match run_step(step, identity, layout, ports) {
            Ok(()) => {
                info!("Step done: {}", step);
                report.completed.push(step);
            }
            Err(err) if step.is_fatal() => {
                error!("Step failed: {}: {}", step, err);
                return Err(err);
            }
            Err(err) => {
                warn!("Step failed (continuing): {}: {}", step, err);
                report.warnings.push(StepWarning {
                    step,
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(report)
}

fn run_step(
    step: InstallStep,
    identity: &ProductIdentity,
    layout: &InstallLayout,
    ports: &InstallPorts<'_>,
) -> Result<(), DomainError> {
    match step {
        InstallStep::CreateInstallDir => ports.fs.create_dir_all(&layout.install_dir),
        InstallStep::DeployApplication => deploy(
            ports.fs,
            &layout.app_source(identity),
            &layout.app_path(identity),
        ),
        InstallStep::DeployUninstaller => deploy(
            ports.fs,
            &layout.uninstaller_source(identity),
            &layout.uninstaller_path(identity),
        ),
        InstallStep::WriteRegistration => write_registration(identity, layout, ports.registry),
        InstallStep::RegisterAutostart => {
            let definition = AutostartTaskDefinition::for_executable(
                identity.description,
                identity.publisher,
                &path_text(&layout.app_path(identity)),
                &path_text(&layout.install_dir),
            );
            ports.scheduler.register_task(identity.task_name, &definition)
        }
        InstallStep::CreateDesktopShortcut => ports.shortcuts.create_shortcut(&ShortcutSpec {
            link_path: layout.shortcut_path(identity),
            target: layout.app_path(identity),
            working_dir: layout.install_dir.clone(),
            description: identity.description.to_string(),
        }),
        InstallStep::LaunchApplication => ports
            .processes
            .launch(&layout.app_path(identity), &layout.install_dir),
    }
}

fn deploy(fs: &dyn FileSystem, source: &Path, target: &Path) -> Result<(), DomainError> {
    if !fs.exists(source) {
        return Err(DomainError::SourceMissing(path_text(source)));
    }
    fs.copy_file(source, target)
}

/// 古い値を残さないようキーを作り直してから書く
fn write_registration(
    identity: &ProductIdentity,
    layout: &InstallLayout,
    registry: &dyn KeyValueStore,
) -> Result<(), DomainError> {
    let record = InstallationRecord::for_install(
        identity,
        &path_text(&layout.install_dir),
        &path_text(&layout.app_path(identity)),
        &path_text(&layout.uninstaller_path(identity)),
    );
    let key = identity.registration_key();
    registry.delete_key(&key)?;
    for (name, value) in record.to_values() {
        registry.set_value(&key, name, &value)?;
    }
    Ok(())
}

pub(crate) fn path_text(path: &Path) -> String {
    path.display().to_string()
}
