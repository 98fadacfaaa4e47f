//! セットアップ/アンインストーラーの終了コード定義

/// 正常終了（タスク登録失敗などの警告は含んでよい）
pub const SUCCESS: u8 = 0;
/// 致命的な配置失敗、または予期しないエラー
pub const FATAL: u8 = 1;
/// オペレーターが確認ダイアログで中止
pub const CANCELLED: u8 = 2;
/// 管理者権限が必要だが昇格できなかった
pub const ELEVATION_REQUIRED: u8 = 3;
