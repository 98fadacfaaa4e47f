//! ドメインエラー型

use thiserror::Error;

/// ドメイン層のエラー型
/// 各バリアントは特定の失敗シナリオを表現
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// オペレーターが再インストール確認で中止を選んだ
    #[error("Installation cancelled by operator")]
    Cancelled,

    /// 配置元のバイナリが存在しない
    #[error("Source binary not found: {0}")]
    SourceMissing(String),

    /// 既存インストールのアンインストーラーが見つからない／壊れている
    #[error("Previous uninstaller is missing: {0}")]
    PreviousUninstallerMissing(String),

    /// レジストリアクセス拒否（管理者権限不足）
    #[error("Registry access denied: {0}")]
    RegistryAccessDenied(String),

    /// その他のレジストリ操作失敗
    #[error("Registry error: {0}")]
    Registry(String),

    /// ファイルI/Oエラー
    #[error("IO error: {0}")]
    Io(String),

    /// 外部コマンドの起動失敗または異常終了
    #[error("Command `{command}` failed (exit code {}): {detail}", format_exit_code(.exit_code))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        detail: String,
    },

    /// タスクスケジューラ操作の失敗
    #[error("Task scheduler error: {0}")]
    TaskScheduler(String),

    /// プロセス起動/終了の失敗
    #[error("Process launch failed: {0}")]
    ProcessLaunchFailed(String),

    /// ショートカット作成の失敗
    #[error("Shortcut error: {0}")]
    Shortcut(String),

    /// バリデーションエラー
    #[error("Validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// 中止（オペレーター操作）かどうか
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

fn format_exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_message_includes_exit_code() {
        let err = DomainError::CommandFailed {
            command: "schtasks /Create".into(),
            exit_code: Some(1),
            detail: "ERROR: Access is denied.".into(),
        };
        assert_eq!(
            err.to_string(),
            "Command `schtasks /Create` failed (exit code 1): ERROR: Access is denied."
        );
    }

    #[test]
    fn command_failed_without_exit_code() {
        let err = DomainError::CommandFailed {
            command: "taskkill".into(),
            exit_code: None,
            detail: "terminated by signal".into(),
        };
        assert!(err.to_string().contains("exit code none"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DomainError = io.into();
        assert!(matches!(err, DomainError::Io(msg) if msg == "missing"));
    }
}
