//! キー/値ストア（レジストリ）ポート

use crate::error::DomainError;
use crate::model::{RegistryKey, RegistryValue};

/// レジストリ相当の永続キー/値ストア。
/// 存在しない値/キーは `Ok(None)` または no-op として扱う。
pub trait KeyValueStore {
    fn get_value(&self, key: &RegistryKey, name: &str)
        -> Result<Option<RegistryValue>, DomainError>;

    /// キーが無ければ作成してから書き込む
    fn set_value(
        &self,
        key: &RegistryKey,
        name: &str,
        value: &RegistryValue,
    ) -> Result<(), DomainError>;

    /// 値を削除。削除した場合 true
    fn delete_value(&self, key: &RegistryKey, name: &str) -> Result<bool, DomainError>;

    /// キーをサブツリーごと削除。削除した場合 true
    fn delete_key(&self, key: &RegistryKey) -> Result<bool, DomainError>;
}
