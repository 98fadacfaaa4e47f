//! インストールオプションと配置レイアウト

use super::product::ProductIdentity;
use std::path::{Path, PathBuf};

/// オペレーターが選択できるインストール項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    /// ログオン時の自動起動タスクを登録する
    pub install_autostart: bool,
    /// デスクトップショートカットを作成する
    pub create_desktop_shortcut: bool,
    /// インストール後にアプリを起動する
    pub launch_after_install: bool,
    /// 対話なし（既存インストールは確認なしで置き換える）
    pub quiet: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            install_autostart: true,
            create_desktop_shortcut: true,
            launch_after_install: true,
            quiet: false,
        }
    }
}

/// インストール先・配布物・デスクトップの各ディレクトリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub install_dir: PathBuf,
    /// 配布物（BongoCat.exe / bc-uninstall.exe）を読むディレクトリ
    pub payload_dir: PathBuf,
    pub desktop_dir: PathBuf,
}

impl InstallLayout {
    pub fn new(
        install_dir: impl Into<PathBuf>,
        payload_dir: impl Into<PathBuf>,
        desktop_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            install_dir: install_dir.into(),
            payload_dir: payload_dir.into(),
            desktop_dir: desktop_dir.into(),
        }
    }

    pub fn app_source(&self, identity: &ProductIdentity) -> PathBuf {
        self.payload_dir.join(identity.app_exe)
    }

    pub fn uninstaller_source(&self, identity: &ProductIdentity) -> PathBuf {
        self.payload_dir.join(identity.uninstaller_exe)
    }

    pub fn app_path(&self, identity: &ProductIdentity) -> PathBuf {
        installed_app_path(&self.install_dir, identity)
    }

    pub fn uninstaller_path(&self, identity: &ProductIdentity) -> PathBuf {
        installed_uninstaller_path(&self.install_dir, identity)
    }

    pub fn shortcut_path(&self, identity: &ProductIdentity) -> PathBuf {
        self.desktop_dir.join(identity.shortcut_name)
    }
}

pub fn installed_app_path(install_dir: &Path, identity: &ProductIdentity) -> PathBuf {
    install_dir.join(identity.app_exe)
}

pub fn installed_uninstaller_path(install_dir: &Path, identity: &ProductIdentity) -> PathBuf {
    install_dir.join(identity.uninstaller_exe)
}
