//! オペレーターへの確認/通知ポート

use crate::model::{InstallationRecord, ReinstallChoice};

pub trait OperatorPrompt {
    /// 既存インストールを検出したときの選択
    fn confirm_reinstall(&self, existing: &InstallationRecord) -> ReinstallChoice;

    /// アンインストール開始の確認
    fn confirm_uninstall(&self) -> bool;

    fn show_error(&self, message: &str);

    fn show_warn(&self, message: &str);

    fn show_info(&self, message: &str);
}
