//! ポート定義

pub mod driven;
pub mod driving;
