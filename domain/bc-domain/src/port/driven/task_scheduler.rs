//! タスクスケジューラ用アダプタポート

use crate::error::DomainError;
use crate::model::{AutostartTaskDefinition, RemovalOutcome, TaskStatus};

pub trait TaskScheduler {
    /// タスクを登録（同名があれば置き換え）
    fn register_task(
        &self,
        task_name: &str,
        definition: &AutostartTaskDefinition,
    ) -> Result<(), DomainError>;

    /// タスク削除（未登録なら Absent）
    fn delete_task(&self, task_name: &str) -> Result<RemovalOutcome, DomainError>;

    /// タスク状態を取得（未登録なら None）
    fn query_task(&self, task_name: &str) -> Result<Option<TaskStatus>, DomainError>;

    /// タスクの有効/無効を切り替え
    fn set_task_enabled(&self, task_name: &str, enabled: bool) -> Result<(), DomainError>;
}
