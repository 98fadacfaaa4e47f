//! 純粋なドメインサービス

pub mod task_document;
