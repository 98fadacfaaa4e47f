//! ドメインモデル
//!
//! 値オブジェクトと製品定数を定義（OS依存なし）

pub mod exit_codes; // 終了コード
mod options;    // インストールオプションと配置レイアウト
mod outcome;    // 削除/終了/再インストール選択の結果
mod product;    // 製品識別子（固定定数）
mod record;     // アンインストール登録レコード
mod registry;   // レジストリキー/値
mod report;     // インストール/アンインストール/状態レポート
mod step;       // インストール手順
mod task;       // 自動起動タスク定義

pub use options::*;
pub use outcome::*;
pub use product::*;
pub use record::*;
pub use registry::*;
pub use report::*;
pub use step::*;
pub use task::*;
