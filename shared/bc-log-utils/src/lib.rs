//! ライフサイクルログユーティリティ
//!
//! `log` ファサードのバックエンドとして、セットアップ/アンインストールの各段階を
//! 1行ずつライフサイクルログへ追記する。

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// ログレベルを上書きする環境変数
pub const LOG_LEVEL_ENV: &str = "BC_LOG";

/// ライフサイクルログのファイル名
pub const LIFECYCLE_LOG_FILE: &str = "bc-lifecycle.log";

/// UTCのRFC3339（ミリ秒付き）。例: 2025-01-15T10:30:00.123Z
pub fn utc_rfc3339_millis() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// UTCタイムスタンプ付きのライフサイクル行を作成する。
pub fn lifecycle_line(component: &str, level: Level, message: &str) -> String {
    format!(
        "[{}] [{}] {} {}\n",
        utc_rfc3339_millis(),
        component,
        level,
        message.replace('\n', "\\n")
    )
}

/// セットアップ/アンインストーラーの作業ディレクトリ名（`%TEMP%` 直下）
pub const WORK_DIR_NAME: &str = "BongoCat";

/// ライフサイクルログの既定出力先 `%TEMP%\BongoCat\bc-lifecycle.log`
///
/// レポート・退避したアンインストーラーと同じ作業ディレクトリ。
/// アンインストールの最後にディレクトリごと再起動時削除が予約される。
pub fn default_lifecycle_log_paths() -> Vec<PathBuf> {
    vec![std::env::temp_dir()
        .join(WORK_DIR_NAME)
        .join(LIFECYCLE_LOG_FILE)]
}

/// 指定された出力先のうち、書き込み可能な最初の場所にログを書き込む。
/// 書き込めた場所を返す。
pub fn write_line_to_paths(line: &str, paths: &[PathBuf]) -> Option<PathBuf> {
    for path in paths {
        if append_line(path, line) {
            return Some(path.clone());
        }
    }
    None
}

fn append_line(path: &Path, line: &str) -> bool {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut file) => file.write_all(line.as_bytes()).and_then(|_| file.flush()).is_ok(),
        Err(_) => false,
    }
}

/// `BC_LOG` の値からレベルを決める（未設定/不正値は info）
pub fn level_from_env() -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

/// ライフサイクルログへ書き込む `log` バックエンド
pub struct LifecycleLogger {
    component: String,
    level: LevelFilter,
    paths: Vec<PathBuf>,
    echo_stderr: bool,
}

impl LifecycleLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            level: level_from_env(),
            paths: default_lifecycle_log_paths(),
            echo_stderr: false,
        }
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// warn 以上を標準エラーにも出す（CLIモード用）
    pub fn echo_to_stderr(mut self, echo: bool) -> Self {
        self.echo_stderr = echo;
        self
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// グローバルロガーとして登録する（プロセスで1回だけ）
    pub fn install(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_logger(Box::leak(Box::new(self)))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for LifecycleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        let line = lifecycle_line(&self.component, record.level(), &message);
        let _ = write_line_to_paths(&line, &self.paths);
        if self.echo_stderr && record.level() <= Level::Warn {
            eprintln!("{}: {}", record.level(), message);
        }
    }

    fn flush(&self) {}
}

/// 既定の出力先でロガーを初期化する
pub fn init(component: &str, echo_stderr: bool) -> Result<(), SetLoggerError> {
    LifecycleLogger::new(component)
        .echo_to_stderr(echo_stderr)
        .install()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_line_has_timestamp_component_and_level() {
        let line = lifecycle_line("SETUP", Level::Warn, "task registration failed");
        assert!(line.starts_with('['));
        assert!(line.contains("] [SETUP] WARN task registration failed"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn lifecycle_line_keeps_message_on_one_line() {
        let line = lifecycle_line("UI", Level::Info, "first\nsecond");
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.contains("first\\nsecond"));
    }

    #[test]
    fn timestamp_is_utc_with_millis() {
        let ts = utc_rfc3339_millis();
        assert_eq!(ts.len(), "2025-01-15T10:30:00.123Z".len());
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn write_falls_back_to_next_writable_path() {
        let dir = tempfile::tempdir().unwrap();
        // 親がファイルなので作成できない
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let unwritable = blocker.join("nested").join(LIFECYCLE_LOG_FILE);
        let writable = dir.path().join("logs").join(LIFECYCLE_LOG_FILE);

        let written = write_line_to_paths("hello\n", &[unwritable, writable.clone()]);

        assert_eq!(written.as_deref(), Some(writable.as_path()));
        assert_eq!(std::fs::read_to_string(&writable).unwrap(), "hello\n");
    }

    #[test]
    fn default_log_lives_in_temp_work_dir() {
        let work_dir = std::env::temp_dir().join(WORK_DIR_NAME);
        let paths = default_lifecycle_log_paths();
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.parent() == Some(work_dir.as_path())));
    }

    #[test]
    fn logger_filters_by_level() {
        let logger = LifecycleLogger::new("TEST").with_level(LevelFilter::Warn);
        let info = Metadata::builder().level(Level::Info).build();
        let error = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&info));
        assert!(logger.enabled(&error));
    }
}
