//! ファイルシステムアダプター（配置/撤去とレポート永続化）
//!
//! 使用中で消せないファイルは MoveFileEx で再起動時の削除を予約する（Windowsのみ）。

use bc_domain::model::RemovalOutcome;
use bc_domain::port::driven::FileSystem;
use bc_domain::DomainError;
use log::warn;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl StdFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(op: &str, path: &Path, err: std::io::Error) -> DomainError {
    DomainError::Io(format!("{} {}: {}", op, path.display(), err))
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(path).map_err(|e| io_error("create_dir_all", path, e))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError> {
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| DomainError::Io(format!("copy {} -> {}: {}", from.display(), to.display(), e)))
    }

    fn remove_file(&self, path: &Path) -> Result<RemovalOutcome, DomainError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(RemovalOutcome::Removed),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RemovalOutcome::Absent),
            Err(e) if is_in_use(&e) => {
                warn!("{} is in use ({}); scheduling deletion on reboot", path.display(), e);
                schedule_deletion_on_reboot(path)?;
                Ok(RemovalOutcome::ScheduledOnReboot)
            }
            Err(e) => Err(io_error("remove_file", path, e)),
        }
    }

    fn remove_dir_if_empty(&self, path: &Path) -> Result<RemovalOutcome, DomainError> {
        let mut entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RemovalOutcome::Absent),
            Err(e) => return Err(io_error("read_dir", path, e)),
        };
        if entries.next().is_some() {
            return Err(DomainError::Io(format!(
                "directory not empty: {}",
                path.display()
            )));
        }
        fs::remove_dir(path).map_err(|e| io_error("remove_dir", path, e))?;
        Ok(RemovalOutcome::Removed)
    }

    fn schedule_delete_on_reboot(&self, path: &Path) -> Result<(), DomainError> {
        schedule_deletion_on_reboot(path)
    }
}

/// 共有違反/アクセス拒否（実行中イメージ）
fn is_in_use(err: &std::io::Error) -> bool {
    const ERROR_ACCESS_DENIED: i32 = 5;
    const ERROR_SHARING_VIOLATION: i32 = 32;
    cfg!(windows)
        && matches!(
            err.raw_os_error(),
            Some(ERROR_ACCESS_DENIED) | Some(ERROR_SHARING_VIOLATION)
        )
}

/// 次回再起動時の単一ファイル/ディレクトリ削除スケジュール
#[cfg(windows)]
pub fn schedule_deletion_on_reboot(path: &Path) -> Result<(), DomainError> {
    use std::os::windows::ffi::OsStrExt;
    use windows::Win32::Storage::FileSystem::{MoveFileExW, MOVEFILE_DELAY_UNTIL_REBOOT};
    use windows::core::PCWSTR;

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    // 移動先 NULL = 再起動時に削除
    unsafe { MoveFileExW(PCWSTR(wide.as_ptr()), PCWSTR::null(), MOVEFILE_DELAY_UNTIL_REBOOT) }
        .map_err(|e| {
            DomainError::Io(format!(
                "MoveFileEx failed for {}: {}",
                path.display(),
                e.message()
            ))
        })?;
    log::info!("Scheduled for reboot deletion: {}", path.display());
    Ok(())
}

#[cfg(not(windows))]
pub fn schedule_deletion_on_reboot(path: &Path) -> Result<(), DomainError> {
    Err(DomainError::Io(format!(
        "delete-on-reboot is only available on Windows: {}",
        path.display()
    )))
}

/// ディレクトリ配下をまとめて再起動時削除に予約する（中身が先、`dir` 自身が最後）
pub fn schedule_tree_deletion_on_reboot(dir: &Path) -> Result<RemovalOutcome, DomainError> {
    schedule_tree_with(dir, schedule_deletion_on_reboot)
}

fn schedule_tree_with(
    dir: &Path,
    mut schedule: impl FnMut(&Path) -> Result<(), DomainError>,
) -> Result<RemovalOutcome, DomainError> {
    if !dir.exists() {
        return Ok(RemovalOutcome::Absent);
    }
    for entry in walkdir::WalkDir::new(dir).contents_first(true) {
        let entry = entry.map_err(|e| DomainError::Io(format!("walk {}: {}", dir.display(), e)))?;
        schedule(entry.path())?;
    }
    Ok(RemovalOutcome::ScheduledOnReboot)
}

/// レポートを `<dir>/<prefix>-<stamp>.json` に書き出す（一時ファイル経由で置き換え）
pub fn write_json_report<T: Serialize>(
    dir: &Path,
    prefix: &str,
    stamp: &str,
    report: &T,
) -> Result<PathBuf, DomainError> {
    fs::create_dir_all(dir).map_err(|e| io_error("create_dir_all", dir, e))?;
    let path = dir.join(format!("{}-{}.json", prefix, stamp));
    let json = serde_json::to_vec_pretty(report)
        .map_err(|e| DomainError::Io(format!("serialize report: {}", e)))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| io_error("create temp file in", dir, e))?;
    tmp.write_all(&json)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| io_error("write", tmp.path(), e))?;
    tmp.persist(&path)
        .map_err(|e| io_error("persist", &path, e.error))?;
    Ok(path)
}
