//! インストール手順

use serde::Serialize;
use std::fmt;

/// インストール計画の1手順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStep {
    CreateInstallDir,
    DeployApplication,
    DeployUninstaller,
    WriteRegistration,
    RegisterAutostart,
    CreateDesktopShortcut,
    LaunchApplication,
}

impl InstallStep {
    /// 失敗時にインストール全体を中止する手順か
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::CreateInstallDir
                | Self::DeployApplication
                | Self::DeployUninstaller
                | Self::WriteRegistration
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CreateInstallDir => "create install directory",
            Self::DeployApplication => "deploy application",
            Self::DeployUninstaller => "deploy uninstaller",
            Self::WriteRegistration => "write uninstall registration",
            Self::RegisterAutostart => "register autostart task",
            Self::CreateDesktopShortcut => "create desktop shortcut",
            Self::LaunchApplication => "launch application",
        }
    }
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// アンインストールの1手順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UninstallStep {
    TerminateProcess,
    DeleteTask,
    DeleteLegacyRunEntry,
    DeleteShortcut,
    DeleteApplication,
    DeleteUninstaller,
    DeleteInstallDir,
    DeleteRegistration,
}

impl UninstallStep {
    pub fn label(self) -> &'static str {
        match self {
            Self::TerminateProcess => "terminate running application",
            Self::DeleteTask => "delete autostart task",
            Self::DeleteLegacyRunEntry => "delete legacy autostart entry",
            Self::DeleteShortcut => "delete desktop shortcut",
            Self::DeleteApplication => "delete application binary",
            Self::DeleteUninstaller => "delete uninstaller binary",
            Self::DeleteInstallDir => "delete install directory",
            Self::DeleteRegistration => "delete uninstall registration",
        }
    }
}

impl fmt::Display for UninstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
