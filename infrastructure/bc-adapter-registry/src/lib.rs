//! レジストリアダプター
//!
//! アンインストール登録 (HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall\BongoCat)
//! と旧自動起動エントリ (Run) を読み書きする。
//! 64bit ビュー固定。REG_SZ / REG_DWORD のみ扱う。

use bc_domain::model::{RegistryKey, RegistryValue};
use bc_domain::port::driven::KeyValueStore;
use bc_domain::DomainError;

/// プラットフォーム中立のハンドル
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsRegistry;

impl WindowsRegistry {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(windows))]
impl KeyValueStore for WindowsRegistry {
    // 非Windowsでは常に「未インストール」で、書き込みは失敗する
    fn get_value(
        &self,
        _key: &RegistryKey,
        _name: &str,
    ) -> Result<Option<RegistryValue>, DomainError> {
        Ok(None)
    }

    fn set_value(
        &self,
        key: &RegistryKey,
        _name: &str,
        _value: &RegistryValue,
    ) -> Result<(), DomainError> {
        Err(unsupported(key))
    }

    fn delete_value(&self, _key: &RegistryKey, _name: &str) -> Result<bool, DomainError> {
        Ok(false)
    }

    fn delete_key(&self, _key: &RegistryKey) -> Result<bool, DomainError> {
        Ok(false)
    }
}

#[cfg(not(windows))]
fn unsupported(key: &RegistryKey) -> DomainError {
    DomainError::Registry(format!("registry is only available on Windows: {}", key))
}

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use windows::Win32::Foundation::{
        ERROR_ACCESS_DENIED, ERROR_FILE_NOT_FOUND, ERROR_PATH_NOT_FOUND, ERROR_SUCCESS,
        WIN32_ERROR,
    };
    use windows::Win32::System::Registry::{
        HKEY, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_ALL_ACCESS, KEY_QUERY_VALUE, KEY_SET_VALUE,
        KEY_WOW64_64KEY, REG_DWORD, REG_EXPAND_SZ, REG_OPTION_NON_VOLATILE, REG_SAM_FLAGS, REG_SZ,
        REG_VALUE_TYPE, RRF_RT_ANY, RegCloseKey, RegCreateKeyExW, RegDeleteTreeW,
        RegDeleteValueW, RegGetValueW, RegOpenKeyExW, RegSetValueExW,
    };
    use windows::core::PCWSTR;
    use bc_domain::model::RegistryHive;

    /// 開いたキーを Drop で閉じる
    struct OpenKey(HKEY);

    impl Drop for OpenKey {
        fn drop(&mut self) {
            let _ = unsafe { RegCloseKey(self.0) };
        }
    }

    impl KeyValueStore for WindowsRegistry {
        fn get_value(
            &self,
            key: &RegistryKey,
            name: &str,
        ) -> Result<Option<RegistryValue>, DomainError> {
            let Some(open) = open_existing(key, KEY_QUERY_VALUE)? else {
                return Ok(None);
            };
            let value_name = to_wide(name); // API呼び出し中にVecを生存させる
            let mut value_type = REG_VALUE_TYPE(0);
            let mut size_bytes: u32 = 0;
            let status = unsafe {
                RegGetValueW(
                    open.0,
                    PCWSTR::null(),
                    PCWSTR(value_name.as_ptr()),
                    RRF_RT_ANY,
                    Some(&mut value_type),
                    None,
                    Some(&mut size_bytes),
                )
            };
            if is_not_found(status) {
                return Ok(None);
            }
            if status != ERROR_SUCCESS {
                return Err(map_win32_error(status, key, name));
            }

            let mut data: Vec<u8> = vec![0u8; size_bytes as usize];
            if size_bytes > 0 {
                let status = unsafe {
                    RegGetValueW(
                        open.0,
                        PCWSTR::null(),
                        PCWSTR(value_name.as_ptr()),
                        RRF_RT_ANY,
                        Some(&mut value_type),
                        Some(data.as_mut_ptr() as *mut _),
                        Some(&mut size_bytes),
                    )
                };
                if status != ERROR_SUCCESS {
                    return Err(map_win32_error(status, key, name));
                }
                data.truncate(size_bytes as usize);
            }

            match value_type {
                REG_SZ | REG_EXPAND_SZ => Ok(Some(RegistryValue::String(decode_utf16(&data)))),
                REG_DWORD if data.len() >= 4 => Ok(Some(RegistryValue::Dword(u32::from_le_bytes(
                    [data[0], data[1], data[2], data[3]],
                )))),
                other => Err(DomainError::Registry(format!(
                    "Unsupported value type {} for {}\\{}",
                    other.0, key, name
                ))),
            }
        }

        fn set_value(
            &self,
            key: &RegistryKey,
            name: &str,
            value: &RegistryValue,
        ) -> Result<(), DomainError> {
            let open = open_or_create(key)?;
            let value_name = to_wide(name);
            let (value_type, data): (REG_VALUE_TYPE, Vec<u8>) = match value {
                RegistryValue::String(s) => (
                    REG_SZ,
                    to_wide(s).iter().flat_map(|u| u.to_le_bytes()).collect(),
                ),
                RegistryValue::Dword(v) => (REG_DWORD, v.to_le_bytes().to_vec()),
            };
            let status = unsafe {
                RegSetValueExW(
                    open.0,
                    PCWSTR(value_name.as_ptr()),
                    Some(0),
                    value_type,
                    Some(data.as_slice()),
                )
            };
            if status != ERROR_SUCCESS {
                return Err(map_win32_error(status, key, name));
            }
            Ok(())
        }

        fn delete_value(&self, key: &RegistryKey, name: &str) -> Result<bool, DomainError> {
            let Some(open) = open_existing(key, KEY_SET_VALUE | KEY_QUERY_VALUE)? else {
                return Ok(false);
            };
            let value_name = to_wide(name);
            let status = unsafe { RegDeleteValueW(open.0, PCWSTR(value_name.as_ptr())) };
            if is_not_found(status) {
                return Ok(false);
            }
            if status != ERROR_SUCCESS {
                return Err(map_win32_error(status, key, name));
            }
            Ok(true)
        }

        fn delete_key(&self, key: &RegistryKey) -> Result<bool, DomainError> {
            // 親キーを 64bit ビューで開き、サブツリーごと削除する
            let Some((parent, leaf)) = key.path.rsplit_once('\\') else {
                return Err(DomainError::Registry(format!(
                    "Refusing to delete top-level key {}",
                    key
                )));
            };
            let parent_key = RegistryKey::new(key.hive, parent);
            let Some(open) = open_existing(&parent_key, KEY_ALL_ACCESS)? else {
                return Ok(false);
            };
            let leaf = to_wide(leaf);
            let status = unsafe { RegDeleteTreeW(open.0, PCWSTR(leaf.as_ptr())) };
            if is_not_found(status) {
                return Ok(false);
            }
            if status != ERROR_SUCCESS {
                return Err(map_win32_error(status, key, "(delete)"));
            }
            Ok(true)
        }
    }

    fn root(hive: RegistryHive) -> HKEY {
        match hive {
            RegistryHive::LocalMachine => HKEY_LOCAL_MACHINE,
            RegistryHive::CurrentUser => HKEY_CURRENT_USER,
        }
    }

    fn open_existing(key: &RegistryKey, access: REG_SAM_FLAGS) -> Result<Option<OpenKey>, DomainError> {
        let path = to_wide(&key.path); // API呼び出し中にVecを生存させる
        let mut handle: HKEY = HKEY::default();
        let status = unsafe {
            RegOpenKeyExW(
                root(key.hive),
                PCWSTR(path.as_ptr()),
                Some(0),
                access | KEY_WOW64_64KEY,
                &mut handle,
            )
        };
        if is_not_found(status) {
            return Ok(None);
        }
        if status != ERROR_SUCCESS {
            return Err(map_win32_error(status, key, "(open)"));
        }
        Ok(Some(OpenKey(handle)))
    }

    fn open_or_create(key: &RegistryKey) -> Result<OpenKey, DomainError> {
        let path = to_wide(&key.path);
        let mut handle: HKEY = HKEY::default();
        let status = unsafe {
            RegCreateKeyExW(
                root(key.hive),
                PCWSTR(path.as_ptr()),
                Some(0),
                None,
                REG_OPTION_NON_VOLATILE,
                KEY_SET_VALUE | KEY_QUERY_VALUE | KEY_WOW64_64KEY,
                None,
                &mut handle,
                None,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(map_win32_error(status, key, "(create)"));
        }
        Ok(OpenKey(handle))
    }

    fn is_not_found(status: WIN32_ERROR) -> bool {
        status == ERROR_FILE_NOT_FOUND || status == ERROR_PATH_NOT_FOUND
    }

    fn to_wide(s: &str) -> Vec<u16> {
        let mut wide: Vec<u16> = s.encode_utf16().collect();
        wide.push(0);
        wide
    }

    fn decode_utf16(bytes: &[u8]) -> String {
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .take_while(|u| *u != 0)
            .collect();
        String::from_utf16_lossy(&units)
    }

    fn map_win32_error(status: WIN32_ERROR, key: &RegistryKey, name: &str) -> DomainError {
        if status == ERROR_ACCESS_DENIED {
            return DomainError::RegistryAccessDenied(format!("{}\\{}", key, name));
        }
        DomainError::Registry(format!("{}\\{}: status={}", key, name, status.0))
    }
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use bc_domain::model::ProductIdentity;

    #[test]
    fn non_windows_registry_reports_nothing_installed() {
        let key = ProductIdentity::bongo_cat().registration_key();
        let registry = WindowsRegistry::new();
        assert_eq!(registry.get_value(&key, "DisplayName").unwrap(), None);
        assert!(registry
            .set_value(&key, "DisplayName", &RegistryValue::String("x".into()))
            .is_err());
    }
}
