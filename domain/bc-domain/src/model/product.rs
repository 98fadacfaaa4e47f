//! 製品識別子（固定定数）

use super::registry::RegistryKey;

/// アンインストール登録のルート
pub const UNINSTALL_ROOT: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall";
/// 旧バージョンが使っていた自動起動キー
pub const RUN_KEY: &str = r"SOFTWARE\Microsoft\Windows\CurrentVersion\Run";

/// 製品の固定パラメータ一式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductIdentity {
    /// 識別キー（アンインストール登録キー名）
    pub key: &'static str,
    pub display_name: &'static str,
    pub display_version: &'static str,
    pub publisher: &'static str,
    pub description: &'static str,
    /// アプリ本体のファイル名（イメージ名）
    pub app_exe: &'static str,
    /// アンインストーラーのファイル名
    pub uninstaller_exe: &'static str,
    /// Program Files 配下のディレクトリ名
    pub install_dir_name: &'static str,
    /// 自動起動タスク名（ルートフォルダ）
    pub task_name: &'static str,
    /// デスクトップショートカットのファイル名
    pub shortcut_name: &'static str,
    /// 旧自動起動エントリの値名
    pub legacy_run_value: &'static str,
}

impl ProductIdentity {
    pub const fn bongo_cat() -> Self {
        Self {
            key: "BongoCat",
            display_name: "Bongo Cat",
            display_version: "2.2",
            publisher: "Bongo Cat Project",
            description: "Monitors your typing and shows cute cat animations!",
            app_exe: "BongoCat.exe",
            uninstaller_exe: "bc-uninstall.exe",
            install_dir_name: "Bongo Cat",
            task_name: "BongoCat",
            shortcut_name: "Bongo Cat.lnk",
            legacy_run_value: "BongoCat",
        }
    }

    /// HKLM のアンインストール登録キー
    pub fn registration_key(&self) -> RegistryKey {
        RegistryKey::local_machine(format!("{}\\{}", UNINSTALL_ROOT, self.key))
    }

    /// 旧自動起動エントリを探すキー（HKCU, HKLM の順）
    pub fn legacy_run_keys(&self) -> [RegistryKey; 2] {
        [
            RegistryKey::current_user(RUN_KEY),
            RegistryKey::local_machine(RUN_KEY),
        ]
    }
}

impl Default for ProductIdentity {
    fn default() -> Self {
        Self::bongo_cat()
    }
}
