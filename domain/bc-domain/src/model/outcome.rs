//! 各操作の結果

use serde::Serialize;

/// 削除系操作の結果（いずれも成功扱い）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalOutcome {
    Removed,
    /// 元から存在しなかった
    Absent,
    /// 使用中のため再起動時の削除を予約した
    ScheduledOnReboot,
}

/// プロセス終了の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminateOutcome {
    Terminated,
    NotRunning,
}

/// 既存インストール検出時のオペレーターの選択
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReinstallChoice {
    /// 旧アンインストーラーを実行してから続行
    UninstallAndContinue,
    /// 何も変更せずに中止
    Abort,
}
