//! 駆動ポート（入力インターフェース）。
//!
//! アプリケーション層が実装し、apps から呼ばれる。

mod install_use_case;

pub use install_use_case::*;
