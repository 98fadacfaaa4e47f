//! 駆動ポート（出力インターフェース）。
//!
//! ドメインが外部に求める機能を定義する。
//! インフラ層のアダプタが実装し、テストでは偽物に差し替える。

mod command_runner;
mod file_system;
mod operator_prompt;
mod process_control;
mod registry_port;
mod shortcut_writer;
mod task_scheduler;

pub use command_runner::*;
pub use file_system::*;
pub use operator_prompt::*;
pub use process_control::*;
pub use registry_port::*;
pub use shortcut_writer::*;
pub use task_scheduler::*;
