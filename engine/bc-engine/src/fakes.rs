//! テスト用のインメモリOS（全ポートを1つの状態で実装）

use crate::{execute_install, plan_install, uninstall, InstallPorts, UninstallPorts, UninstallTarget};
use bc_domain::model::{
    AutostartTaskDefinition, InstallLayout, InstallOptions, InstallationRecord,
    PreconditionOutcome, ProductIdentity, RegistryKey, RegistryValue, ReinstallChoice,
    RemovalOutcome, TaskStatus, TerminateOutcome,
};
use bc_domain::port::driven::{
    CommandOutput, CommandRequest, CommandRunner, FileSystem, KeyValueStore, OperatorPrompt,
    ProcessControl, ShortcutSpec, ShortcutWriter, TaskScheduler,
};
use bc_domain::DomainError;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// 比較用のOS状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub values: BTreeMap<(String, String), RegistryValue>,
    pub files: BTreeSet<PathBuf>,
    pub dirs: BTreeSet<PathBuf>,
    pub tasks: BTreeSet<String>,
}

pub struct FakeWorld {
    pub identity: ProductIdentity,
    pub layout: InstallLayout,
    pub values: RefCell<BTreeMap<(String, String), RegistryValue>>,
    pub files: RefCell<BTreeSet<PathBuf>>,
    pub dirs: RefCell<BTreeSet<PathBuf>>,
    pub locked: RefCell<BTreeSet<PathBuf>>,
    pub reboot_deletions: RefCell<Vec<PathBuf>>,
    pub tasks: RefCell<HashMap<String, (AutostartTaskDefinition, bool)>>,
    pub running: Cell<bool>,
    pub launched: RefCell<Vec<PathBuf>>,
    pub commands: RefCell<Vec<CommandRequest>>,
    pub uninstaller_exit_code: Cell<Option<i32>>,
    pub prompts: RefCell<Vec<String>>,
    pub reinstall_choice: Cell<ReinstallChoice>,
    pub fail_task_registration: Cell<bool>,
    pub fail_task_deletion: Cell<bool>,
    pub fail_shortcut: Cell<bool>,
    pub fail_launch: Cell<bool>,
    pub deny_registry_writes: Cell<bool>,
}

impl FakeWorld {
    pub fn new() -> Self {
        let identity = ProductIdentity::bongo_cat();
        let layout = InstallLayout::new("/program-files/Bongo Cat", "/payload", "/desktop");
        let dirs = ["/program-files", "/payload", "/desktop"]
            .into_iter()
            .map(PathBuf::from)
            .collect();
        let files = [layout.app_source(&identity), layout.uninstaller_source(&identity)]
            .into_iter()
            .collect();
        Self {
            identity,
            layout,
            values: RefCell::default(),
            files: RefCell::new(files),
            dirs: RefCell::new(dirs),
            locked: RefCell::default(),
            reboot_deletions: RefCell::default(),
            tasks: RefCell::default(),
            running: Cell::new(false),
            launched: RefCell::default(),
            commands: RefCell::default(),
            uninstaller_exit_code: Cell::new(Some(0)),
            prompts: RefCell::default(),
            reinstall_choice: Cell::new(ReinstallChoice::UninstallAndContinue),
            fail_task_registration: Cell::new(false),
            fail_task_deletion: Cell::new(false),
            fail_shortcut: Cell::new(false),
            fail_launch: Cell::new(false),
            deny_registry_writes: Cell::new(false),
        }
    }

    pub fn install_ports(&self) -> InstallPorts<'_> {
        InstallPorts {
            registry: self,
            fs: self,
            commands: self,
            scheduler: self,
            processes: self,
            shortcuts: self,
            prompt: self,
        }
    }

    pub fn uninstall_ports(&self) -> UninstallPorts<'_> {
        UninstallPorts {
            registry: self,
            fs: self,
            scheduler: self,
            processes: self,
        }
    }

    /// 既定オプションで新規インストール済みの状態にする
    pub fn install_default(&self) {
        let result = execute_install(
            &self.identity,
            &plan_install(&InstallOptions::default()),
            &self.layout,
            &self.install_ports(),
            PreconditionOutcome::Fresh,
        );
        assert!(result.is_ok(), "seed install failed: {result:?}");
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            values: self.values.borrow().clone(),
            files: self.files.borrow().clone(),
            dirs: self.dirs.borrow().clone(),
            tasks: self.tasks.borrow().keys().cloned().collect(),
        }
    }

    pub fn set_raw_value(&self, key: &RegistryKey, name: &str, value: RegistryValue) {
        self.values
            .borrow_mut()
            .insert((key.to_string(), name.to_string()), value);
    }

    pub fn raw_value(&self, key: &RegistryKey, name: &str) -> Option<RegistryValue> {
        self.values
            .borrow()
            .get(&(key.to_string(), name.to_string()))
            .cloned()
    }

    pub fn has_file(&self, path: &Path) -> bool {
        self.files.borrow().contains(path)
    }

    pub fn is_installed(&self) -> bool {
        let key = self.identity.registration_key();
        InstallationRecord::from_values(|name| self.raw_value(&key, name)).is_some()
    }

    fn run_uninstaller(&self, request: &CommandRequest) {
        let install_dir = request
            .args
            .iter()
            .position(|a| a == "--install-dir")
            .and_then(|i| request.args.get(i + 1))
            .map(PathBuf::from)
            .unwrap_or_else(|| self.layout.install_dir.clone());
        let target = UninstallTarget {
            install_dir,
            desktop_dir: self.layout.desktop_dir.clone(),
            running_image: Some(PathBuf::from(&request.program)),
        };
        uninstall(&self.identity, &target, &self.uninstall_ports());
    }
}

impl KeyValueStore for FakeWorld {
    fn get_value(
        &self,
        key: &RegistryKey,
        name: &str,
    ) -> Result<Option<RegistryValue>, DomainError> {
        Ok(self.raw_value(key, name))
    }

    fn set_value(
        &self,
        key: &RegistryKey,
        name: &str,
        value: &RegistryValue,
    ) -> Result<(), DomainError> {
        if self.deny_registry_writes.get() {
            return Err(DomainError::RegistryAccessDenied(key.to_string()));
        }
        self.set_raw_value(key, name, value.clone());
        Ok(())
    }

    fn delete_value(&self, key: &RegistryKey, name: &str) -> Result<bool, DomainError> {
        if self.deny_registry_writes.get() {
            return Err(DomainError::RegistryAccessDenied(key.to_string()));
        }
        Ok(self
            .values
            .borrow_mut()
            .remove(&(key.to_string(), name.to_string()))
            .is_some())
    }

    fn delete_key(&self, key: &RegistryKey) -> Result<bool, DomainError> {
        if self.deny_registry_writes.get() {
            return Err(DomainError::RegistryAccessDenied(key.to_string()));
        }
        let key = key.to_string();
        let mut values = self.values.borrow_mut();
        let before = values.len();
        values.retain(|(k, _), _| *k != key);
        Ok(values.len() != before)
    }
}

impl FileSystem for FakeWorld {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains(path) || self.dirs.borrow().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), DomainError> {
        let mut dirs = self.dirs.borrow_mut();
        for dir in path.ancestors() {
            if dir.as_os_str().is_empty() || dir.parent().is_none() {
                continue;
            }
            dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        if !self.files.borrow().contains(from) {
            return Err(DomainError::Io(format!("not found: {}", from.display())));
        }
        if self.locked.borrow().contains(to) {
            return Err(DomainError::Io(format!("in use: {}", to.display())));
        }
        let parent_exists = to
            .parent()
            .is_some_and(|p| self.dirs.borrow().contains(p));
        if !parent_exists {
            return Err(DomainError::Io(format!("no directory for {}", to.display())));
        }
        self.files.borrow_mut().insert(to.to_path_buf());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<RemovalOutcome, DomainError> {
        if !self.files.borrow().contains(path) {
            return Ok(RemovalOutcome::Absent);
        }
        if self.locked.borrow().contains(path) {
            self.reboot_deletions.borrow_mut().push(path.to_path_buf());
            return Ok(RemovalOutcome::ScheduledOnReboot);
        }
        self.files.borrow_mut().remove(path);
        Ok(RemovalOutcome::Removed)
    }

    fn remove_dir_if_empty(&self, path: &Path) -> Result<RemovalOutcome, DomainError> {
        if !self.dirs.borrow().contains(path) {
            return Ok(RemovalOutcome::Absent);
        }
        let occupied = self
            .files
            .borrow()
            .iter()
            .chain(self.dirs.borrow().iter())
            .any(|p| p.parent() == Some(path));
        if occupied {
            return Err(DomainError::Io(format!(
                "directory not empty: {}",
                path.display()
            )));
        }
        self.dirs.borrow_mut().remove(path);
        Ok(RemovalOutcome::Removed)
    }

    fn schedule_delete_on_reboot(&self, path: &Path) -> Result<(), DomainError> {
        self.reboot_deletions.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

impl CommandRunner for FakeWorld {
    fn run(&self, request: &CommandRequest) -> Result<CommandOutput, DomainError> {
        self.commands.borrow_mut().push(request.clone());
        let program = PathBuf::from(&request.program);
        if !self.has_file(&program) {
            return Err(DomainError::ProcessLaunchFailed(request.program.clone()));
        }
        if request.program.ends_with(self.identity.uninstaller_exe) {
            self.run_uninstaller(request);
        }
        Ok(CommandOutput {
            exit_code: self.uninstaller_exit_code.get(),
            ..CommandOutput::default()
        })
    }
}

impl TaskScheduler for FakeWorld {
    fn register_task(
        &self,
        task_name: &str,
        definition: &AutostartTaskDefinition,
    ) -> Result<(), DomainError> {
        if self.fail_task_registration.get() {
            return Err(DomainError::TaskScheduler("ERROR: Access is denied.".into()));
        }
        self.tasks
            .borrow_mut()
            .insert(task_name.to_string(), (definition.clone(), true));
        Ok(())
    }

    fn delete_task(&self, task_name: &str) -> Result<RemovalOutcome, DomainError> {
        if self.fail_task_deletion.get() {
            return Err(DomainError::TaskScheduler("ERROR: Access is denied.".into()));
        }
        Ok(match self.tasks.borrow_mut().remove(task_name) {
            Some(_) => RemovalOutcome::Removed,
            None => RemovalOutcome::Absent,
        })
    }

    fn query_task(&self, task_name: &str) -> Result<Option<TaskStatus>, DomainError> {
        Ok(self.tasks.borrow().get(task_name).map(|(def, enabled)| TaskStatus {
            name: format!("\\{}", task_name),
            enabled: *enabled,
            state: (if *enabled { "Ready" } else { "Disabled" }).to_string(),
            task_to_run: Some(def.action.command.clone()),
            last_result: None,
            next_run_time: None,
        }))
    }

    fn set_task_enabled(&self, task_name: &str, enabled: bool) -> Result<(), DomainError> {
        match self.tasks.borrow_mut().get_mut(task_name) {
            Some((_, state)) => {
                *state = enabled;
                Ok(())
            }
            None => Err(DomainError::TaskScheduler(format!(
                "task not found: {}",
                task_name
            ))),
        }
    }
}

impl ProcessControl for FakeWorld {
    fn terminate_by_image_name(&self, _image_name: &str) -> Result<TerminateOutcome, DomainError> {
        Ok(if self.running.replace(false) {
            TerminateOutcome::Terminated
        } else {
            TerminateOutcome::NotRunning
        })
    }

    fn launch(&self, exe: &Path, _working_dir: &Path) -> Result<(), DomainError> {
        if self.fail_launch.get() {
            return Err(DomainError::ProcessLaunchFailed(format!(
                "{}: The system cannot find the file specified. (os error 2)",
                exe.display()
            )));
        }
        self.launched.borrow_mut().push(exe.to_path_buf());
        self.running.set(true);
        Ok(())
    }
}

impl ShortcutWriter for FakeWorld {
    fn create_shortcut(&self, spec: &ShortcutSpec) -> Result<(), DomainError> {
        if self.fail_shortcut.get() {
            return Err(DomainError::Shortcut("IPersistFile::Save failed".into()));
        }
        self.files.borrow_mut().insert(spec.link_path.clone());
        Ok(())
    }
}

impl OperatorPrompt for FakeWorld {
    fn confirm_reinstall(&self, _existing: &InstallationRecord) -> ReinstallChoice {
        self.prompts.borrow_mut().push("confirm_reinstall".into());
        self.reinstall_choice.get()
    }

    fn confirm_uninstall(&self) -> bool {
        self.prompts.borrow_mut().push("confirm_uninstall".into());
        true
    }

    fn show_error(&self, message: &str) {
        self.prompts.borrow_mut().push(format!("error: {}", message));
    }

    fn show_warn(&self, message: &str) {
        self.prompts.borrow_mut().push(format!("warn: {}", message));
    }

    fn show_info(&self, message: &str) {
        self.prompts.borrow_mut().push(format!("info: {}", message));
    }
}
