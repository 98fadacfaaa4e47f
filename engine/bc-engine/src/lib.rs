//! bc-engine: インストール計画／事前チェック／計画の実行／アンインストールの
//! ワークフローを実装する層。ドメイン（bc-domain）のポートにのみ依存する。

mod execute;
mod plan;
mod precondition;
mod uninstall;

#[cfg(test)]
mod fakes;

pub use execute::{execute_install, InstallPorts};
pub use plan::plan_install;
pub use precondition::{
    check_preconditions, previous_uninstall_request, read_record, verify_payload,
};
pub use uninstall::{uninstall, UninstallPorts, UninstallTarget};
