//! セットアップのユースケース

use bc_domain::model::{
    InstallLayout, InstallOptions, InstallReport, ProductIdentity, StatusReport, UninstallReport,
};
use bc_domain::port::driven::{
    CommandRunner, FileSystem, KeyValueStore, OperatorPrompt, ProcessControl, ShortcutWriter,
    TaskScheduler,
};
use bc_domain::port::driving::{InstallUseCase, UninstallRequest};
use bc_domain::DomainError;
use bc_engine::{
    check_preconditions, execute_install, plan_install, read_record, uninstall, InstallPorts,
    UninstallPorts, UninstallTarget,
};
use log::{info, warn};
use std::path::PathBuf;

pub struct SetupDeps<'a> {
    pub identity: ProductIdentity,
    pub registry: &'a dyn KeyValueStore,
    pub fs: &'a dyn FileSystem,
    pub commands: &'a dyn CommandRunner,
    pub scheduler: &'a dyn TaskScheduler,
    pub processes: &'a dyn ProcessControl,
    pub shortcuts: &'a dyn ShortcutWriter,
    pub prompt: &'a dyn OperatorPrompt,
}

pub struct SetupService<'a> {
    deps: SetupDeps<'a>,
}

impl<'a> SetupService<'a> {
    pub fn new(deps: SetupDeps<'a>) -> Self {
        Self { deps }
    }

    pub fn identity(&self) -> &ProductIdentity {
        &self.deps.identity
    }

    fn install_ports(&self) -> InstallPorts<'a> {
        InstallPorts {
            registry: self.deps.registry,
            fs: self.deps.fs,
            commands: self.deps.commands,
            scheduler: self.deps.scheduler,
            processes: self.deps.processes,
            shortcuts: self.deps.shortcuts,
            prompt: self.deps.prompt,
        }
    }

    fn uninstall_ports(&self) -> UninstallPorts<'a> {
        UninstallPorts {
            registry: self.deps.registry,
            fs: self.deps.fs,
            scheduler: self.deps.scheduler,
            processes: self.deps.processes,
        }
    }

    /// 明示指定 → 登録レコードの InstallLocation の順で決める
    fn resolve_install_dir(&self, request: &UninstallRequest) -> Result<PathBuf, DomainError> {
        if let Some(dir) = &request.install_dir {
            return Ok(dir.clone());
        }
        read_record(self.deps.registry, &self.deps.identity)?
            .and_then(|record| record.install_location().map(PathBuf::from))
            .ok_or_else(|| {
                DomainError::Validation(
                    "install directory is unknown: not given and not recorded in the registration"
                        .into(),
                )
            })
    }
}

impl InstallUseCase for SetupService<'_> {
    fn install(
        &self,
        options: &InstallOptions,
        layout: &InstallLayout,
    ) -> Result<InstallReport, DomainError> {
        info!(
            "Install started: dir={} payload={} options={:?}",
            layout.install_dir.display(),
            layout.payload_dir.display(),
            options
        );
        let ports = self.install_ports();
        let precondition = check_preconditions(&self.deps.identity, options, layout, &ports)?;
        let steps = plan_install(options);
        let report = execute_install(&self.deps.identity, &steps, layout, &ports, precondition)?;

        for warning in &report.warnings {
            self.deps
                .prompt
                .show_warn(&format!("Could not {}: {}", warning.step, warning.message));
        }
        info!(
            "Install finished: {} steps, {} warnings",
            report.completed.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn uninstall(&self, request: &UninstallRequest) -> Result<UninstallReport, DomainError> {
        if request.confirm && !self.deps.prompt.confirm_uninstall() {
            info!("Uninstall cancelled by operator");
            return Err(DomainError::Cancelled);
        }
        let install_dir = self.resolve_install_dir(request)?;
        info!("Uninstall started: dir={}", install_dir.display());

        let target = UninstallTarget {
            install_dir,
            desktop_dir: request.desktop_dir.clone(),
            running_image: request.running_image.clone(),
        };
        let report = uninstall(&self.deps.identity, &target, &self.uninstall_ports());

        let failures = report.failures().count();
        if failures > 0 {
            warn!("Uninstall finished with {} failed steps", failures);
        } else {
            info!("Uninstall finished");
        }
        Ok(report)
    }

    fn status(&self) -> Result<StatusReport, DomainError> {
        let record = read_record(self.deps.registry, &self.deps.identity)?;
        let autostart = self.deps.scheduler.query_task(self.deps.identity.task_name)?;
        Ok(StatusReport { record, autostart })
    }

    fn set_autostart_enabled(&self, enabled: bool) -> Result<(), DomainError> {
        let task_name = self.deps.identity.task_name;
        if self.deps.scheduler.query_task(task_name)?.is_none() {
            return Err(DomainError::Validation(format!(
                "autostart task '{}' is not registered",
                task_name
            )));
        }
        self.deps.scheduler.set_task_enabled(task_name, enabled)?;
        info!(
            "Autostart task {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }
}
