//! アンインストール登録レコード（インストール済みであることの唯一の根拠）

use super::product::ProductIdentity;
use super::registry::RegistryValue;
use crate::path;
use serde::Serialize;

pub const VALUE_DISPLAY_NAME: &str = "DisplayName";
pub const VALUE_DISPLAY_VERSION: &str = "DisplayVersion";
pub const VALUE_PUBLISHER: &str = "Publisher";
pub const VALUE_INSTALL_LOCATION: &str = "InstallLocation";
pub const VALUE_DISPLAY_ICON: &str = "DisplayIcon";
pub const VALUE_UNINSTALL_STRING: &str = "UninstallString";
pub const VALUE_QUIET_UNINSTALL_STRING: &str = "QuietUninstallString";
pub const VALUE_NO_MODIFY: &str = "NoModify";
pub const VALUE_NO_REPAIR: &str = "NoRepair";

/// 読み出し時に参照する値名
pub const RECORD_VALUE_NAMES: [&str; 9] = [
    VALUE_DISPLAY_NAME,
    VALUE_DISPLAY_VERSION,
    VALUE_PUBLISHER,
    VALUE_INSTALL_LOCATION,
    VALUE_DISPLAY_ICON,
    VALUE_UNINSTALL_STRING,
    VALUE_QUIET_UNINSTALL_STRING,
    VALUE_NO_MODIFY,
    VALUE_NO_REPAIR,
];

/// 「プログラムと機能」に表示されるインストール記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationRecord {
    pub display_name: String,
    pub display_version: String,
    pub publisher: String,
    /// 空文字は不明（旧バージョンは書いていない）
    pub install_location: String,
    pub display_icon: String,
    /// 引用符付きのアンインストーラーパス
    pub uninstall_string: String,
    pub quiet_uninstall_string: String,
    pub no_modify: bool,
    pub no_repair: bool,
}

impl InstallationRecord {
    /// 新規インストール用のレコードを作成
    pub fn for_install(
        identity: &ProductIdentity,
        install_dir: &str,
        app_path: &str,
        uninstaller_path: &str,
    ) -> Self {
        let uninstall_string = path::quote(uninstaller_path);
        Self {
            display_name: identity.display_name.to_string(),
            display_version: identity.display_version.to_string(),
            publisher: identity.publisher.to_string(),
            install_location: install_dir.to_string(),
            display_icon: app_path.to_string(),
            quiet_uninstall_string: format!("{} --quiet", uninstall_string),
            uninstall_string,
            no_modify: true,
            no_repair: true,
        }
    }

    /// UninstallString からアンインストーラーのパスを取り出す
    pub fn uninstaller_path(&self) -> Option<String> {
        path::command_executable(&self.uninstall_string)
    }

    /// InstallLocation（未記録なら None）
    pub fn install_location(&self) -> Option<&str> {
        let s = self.install_location.trim();
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    }

    /// レジストリへ書き込む値の一覧（書き込み順）。
    /// 存在判定に使う DisplayName は最後に書く。
    pub fn to_values(&self) -> Vec<(&'static str, RegistryValue)> {
        vec![
            (
                VALUE_DISPLAY_VERSION,
                RegistryValue::String(self.display_version.clone()),
            ),
            (VALUE_PUBLISHER, RegistryValue::String(self.publisher.clone())),
            (
                VALUE_INSTALL_LOCATION,
                RegistryValue::String(self.install_location.clone()),
            ),
            (VALUE_DISPLAY_ICON, RegistryValue::String(self.display_icon.clone())),
            (
                VALUE_UNINSTALL_STRING,
                RegistryValue::String(self.uninstall_string.clone()),
            ),
            (
                VALUE_QUIET_UNINSTALL_STRING,
                RegistryValue::String(self.quiet_uninstall_string.clone()),
            ),
            (VALUE_NO_MODIFY, RegistryValue::Dword(self.no_modify as u32)),
            (VALUE_NO_REPAIR, RegistryValue::Dword(self.no_repair as u32)),
            (VALUE_DISPLAY_NAME, RegistryValue::String(self.display_name.clone())),
        ]
    }

    /// 値の読み出し関数からレコードを復元する。
    /// DisplayName が無ければ未インストール扱い（None）。
    pub fn from_values<F>(mut lookup: F) -> Option<Self>
    where
        F: FnMut(&str) -> Option<RegistryValue>,
    {
        let display_name = lookup(VALUE_DISPLAY_NAME)?.as_str()?.to_string();
        let mut text = |name: &str| {
            lookup(name)
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default()
        };
        let display_version = text(VALUE_DISPLAY_VERSION);
        let publisher = text(VALUE_PUBLISHER);
        let install_location = text(VALUE_INSTALL_LOCATION);
        let display_icon = text(VALUE_DISPLAY_ICON);
        let uninstall_string = text(VALUE_UNINSTALL_STRING);
        let quiet_uninstall_string = text(VALUE_QUIET_UNINSTALL_STRING);
        let no_modify = lookup(VALUE_NO_MODIFY).and_then(|v| v.as_dword()) == Some(1);
        let no_repair = lookup(VALUE_NO_REPAIR).and_then(|v| v.as_dword()) == Some(1);

        Some(Self {
            display_name,
            display_version,
            publisher,
            install_location,
            display_icon,
            uninstall_string,
            quiet_uninstall_string,
            no_modify,
            no_repair,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample() -> InstallationRecord {
        InstallationRecord::for_install(
            &ProductIdentity::bongo_cat(),
            r"C:\Program Files\Bongo Cat",
            r"C:\Program Files\Bongo Cat\BongoCat.exe",
            r"C:\Program Files\Bongo Cat\bc-uninstall.exe",
        )
    }

    #[test]
    fn for_install_fills_fixed_fields() {
        let r = sample();
        assert_eq!(r.display_name, "Bongo Cat");
        assert_eq!(r.display_version, "2.2");
        assert_eq!(r.publisher, "Bongo Cat Project");
        assert!(r.no_modify);
        assert!(r.no_repair);
        assert_eq!(
            r.uninstall_string,
            r#""C:\Program Files\Bongo Cat\bc-uninstall.exe""#
        );
        assert_eq!(
            r.quiet_uninstall_string,
            r#""C:\Program Files\Bongo Cat\bc-uninstall.exe" --quiet"#
        );
    }

    #[test]
    fn uninstaller_path_strips_quotes() {
        assert_eq!(
            sample().uninstaller_path().as_deref(),
            Some(r"C:\Program Files\Bongo Cat\bc-uninstall.exe")
        );
    }

    #[test]
    fn flags_are_written_as_dword_one() {
        let values: HashMap<_, _> = sample().to_values().into_iter().collect();
        assert_eq!(values[VALUE_NO_MODIFY], RegistryValue::Dword(1));
        assert_eq!(values[VALUE_NO_REPAIR], RegistryValue::Dword(1));
        assert_eq!(values.len(), RECORD_VALUE_NAMES.len());
    }

    #[test]
    fn display_name_is_written_last() {
        let values = sample().to_values();
        assert_eq!(values.last().map(|(name, _)| *name), Some(VALUE_DISPLAY_NAME));
    }

    #[test]
    fn values_convert_back_to_record() {
        let original = sample();
        let values: HashMap<_, _> = original.to_values().into_iter().collect();
        let restored = InstallationRecord::from_values(|name| values.get(name).cloned());
        assert_eq!(restored, Some(original));
    }

    #[test]
    fn missing_display_name_means_not_installed() {
        let restored = InstallationRecord::from_values(|name| {
            (name == VALUE_UNINSTALL_STRING).then(|| RegistryValue::String("x.exe".into()))
        });
        assert_eq!(restored, None);
    }

    #[test]
    fn legacy_record_without_location() {
        let restored = InstallationRecord::from_values(|name| match name {
            VALUE_DISPLAY_NAME => Some(RegistryValue::String("Bongo Cat".into())),
            VALUE_UNINSTALL_STRING => {
                Some(RegistryValue::String(r"C:\Old\uninstall.exe".into()))
            }
            _ => None,
        })
        .unwrap();
        assert_eq!(restored.install_location(), None);
        assert!(!restored.no_modify);
        assert_eq!(restored.uninstaller_path().as_deref(), Some(r"C:\Old\uninstall.exe"));
    }
}
