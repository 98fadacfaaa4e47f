//! インストール用ユースケースポート

use crate::error::DomainError;
use crate::model::{InstallLayout, InstallOptions, InstallReport, StatusReport, UninstallReport};
use std::path::PathBuf;

/// アンインストール要求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallRequest {
    /// 明示指定のインストール先（None なら登録レコードの InstallLocation）
    pub install_dir: Option<PathBuf>,
    /// ショートカットを探すデスクトップ
    pub desktop_dir: PathBuf,
    /// 開始前に確認する
    pub confirm: bool,
    /// 実行中のアンインストーラー自身のパス（削除対象から外す）
    pub running_image: Option<PathBuf>,
}

/// インストール用ユースケース（インストール/アンインストール/状態/自動起動切替）
pub trait InstallUseCase {
    /// 事前チェック → 計画 → 実行
    fn install(
        &self,
        options: &InstallOptions,
        layout: &InstallLayout,
    ) -> Result<InstallReport, DomainError>;

    /// ベストエフォートで撤去（手順ごとの失敗はレポートに残す）
    fn uninstall(&self, request: &UninstallRequest) -> Result<UninstallReport, DomainError>;

    /// 現在の状態を取得
    fn status(&self) -> Result<StatusReport, DomainError>;

    /// 登録済み自動起動タスクの有効/無効を切り替え
    fn set_autostart_enabled(&self, enabled: bool) -> Result<(), DomainError>;
}
