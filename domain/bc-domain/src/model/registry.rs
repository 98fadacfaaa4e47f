//! レジストリキー/値の値オブジェクト

use serde::Serialize;
use std::fmt;

/// レジストリハイブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RegistryHive {
    LocalMachine,
    CurrentUser,
}

impl RegistryHive {
    pub fn short_name(self) -> &'static str {
        match self {
            Self::LocalMachine => "HKLM",
            Self::CurrentUser => "HKCU",
        }
    }
}

/// ハイブ + サブキーパス
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RegistryKey {
    pub hive: RegistryHive,
    pub path: String,
}

impl RegistryKey {
    pub fn new(hive: RegistryHive, path: impl Into<String>) -> Self {
        Self {
            hive,
            path: path.into(),
        }
    }

    pub fn local_machine(path: impl Into<String>) -> Self {
        Self::new(RegistryHive::LocalMachine, path)
    }

    pub fn current_user(path: impl Into<String>) -> Self {
        Self::new(RegistryHive::CurrentUser, path)
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}", self.hive.short_name(), self.path)
    }
}

/// 扱うレジストリ値（REG_SZ / REG_DWORD のみ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryValue {
    String(String),
    Dword(u32),
}

impl RegistryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Dword(_) => None,
        }
    }

    pub fn as_dword(&self) -> Option<u32> {
        match self {
            Self::Dword(v) => Some(*v),
            Self::String(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_uses_short_hive_name() {
        let key = RegistryKey::current_user(r"Software\Microsoft\Windows\CurrentVersion\Run");
        assert_eq!(
            key.to_string(),
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Run"
        );
    }

    #[test]
    fn value_accessors_are_type_specific() {
        assert_eq!(RegistryValue::String("x".into()).as_str(), Some("x"));
        assert_eq!(RegistryValue::String("x".into()).as_dword(), None);
        assert_eq!(RegistryValue::Dword(1).as_dword(), Some(1));
    }
}
