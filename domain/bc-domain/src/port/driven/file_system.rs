//! ファイルシステムポート

use crate::error::DomainError;
use crate::model::RemovalOutcome;
use std::path::Path;

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> Result<(), DomainError>;

    /// 上書きコピー
    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError>;

    /// 使用中で削除できなければ再起動時の削除を予約してよい（ScheduledOnReboot）
    fn remove_file(&self, path: &Path) -> Result<RemovalOutcome, DomainError>;

    /// 空の場合のみディレクトリを削除。空でなければ Err
    fn remove_dir_if_empty(&self, path: &Path) -> Result<RemovalOutcome, DomainError>;

    /// 次回再起動時の削除を予約
    fn schedule_delete_on_reboot(&self, path: &Path) -> Result<(), DomainError>;
}
