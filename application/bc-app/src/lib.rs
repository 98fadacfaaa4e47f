//! bc-app: アプリケーション層のファサード。
//! Engine 層とドメインポートを組み合わせて、インストール／アンインストール／
//! 状態確認／自動起動の切り替えといったユースケースを実装する。

pub mod setup;
pub use setup::{SetupDeps, SetupService};
