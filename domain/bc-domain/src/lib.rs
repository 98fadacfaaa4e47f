//! Bongo Cat インストーラーのドメイン層
//!
//! インストール記録・自動起動タスク定義・インストール計画の入力といった値と、
//! OSへ出ていくための駆動ポートを定義する。OS呼び出しはここには置かない。

pub mod error;   // ドメインエラー定義
pub mod model;   // ドメインモデル（値オブジェクト、レコード）
pub mod path;    // コマンドライン/パス文字列ユーティリティ
pub mod port;    // ポート（driving/driven）
pub mod service; // 純粋なドメインサービス

pub use error::DomainError; // エラー型を再エクスポート
