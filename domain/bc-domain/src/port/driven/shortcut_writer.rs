//! ショートカット作成ポート

use crate::error::DomainError;
use std::path::PathBuf;

/// 作成するショートカット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutSpec {
    /// .lnk の保存先
    pub link_path: PathBuf,
    pub target: PathBuf,
    pub working_dir: PathBuf,
    pub description: String,
}

pub trait ShortcutWriter {
    /// 既存のリンクは上書きする
    fn create_shortcut(&self, spec: &ShortcutSpec) -> Result<(), DomainError>;
}
