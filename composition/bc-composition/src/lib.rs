//! bc-composition: セットアップ/アンインストーラー向けのランタイムを組み立てるコンポジションルート。
//! ドメイン／アプリケーション／各種アダプタをここで配線し、apps/* はこのクレートだけに依存する。

pub mod error;
pub mod runtime;
pub mod system;

// apps/* が内側レイヤーの型に触れる必要がある場合は、ここから辿れるようにする。
pub use bc_adapter_paths as paths;
pub use bc_app as app;
pub use bc_domain as domain;
pub use bc_log_utils as log_utils;
pub use bc_ui_common as ui_common;

pub use error::{exit_code_for, finish, ElevationRequired};
pub use runtime::SetupRuntime;
