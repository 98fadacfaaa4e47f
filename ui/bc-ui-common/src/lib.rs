//! セットアップ/アンインストーラー共通のUI

pub mod message_box;

pub use message_box::MessageBoxPrompt;
