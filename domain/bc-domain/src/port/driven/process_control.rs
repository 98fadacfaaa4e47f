//! プロセス制御ポート（終了/起動）

use crate::error::DomainError;
use crate::model::TerminateOutcome;
use std::path::Path;

pub trait ProcessControl {
    /// イメージ名で強制終了（動いていなければ NotRunning）
    fn terminate_by_image_name(&self, image_name: &str) -> Result<TerminateOutcome, DomainError>;

    /// 起動して待たずに戻る
    fn launch(&self, exe: &Path, working_dir: &Path) -> Result<(), DomainError>;
}
