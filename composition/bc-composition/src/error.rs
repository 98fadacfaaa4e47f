use bc_domain::model::exit_codes;
use bc_domain::port::driven::OperatorPrompt;
use bc_domain::DomainError;
use log::{error, info};

pub use anyhow::{Context, Result};

/// 昇格に失敗した（UAC拒否など）
#[derive(Debug, thiserror::Error)]
#[error("Administrator privileges are required: {0}")]
pub struct ElevationRequired(pub String);

/// エラーチェーンから終了コードを決める
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ElevationRequired>().is_some() {
        return exit_codes::ELEVATION_REQUIRED;
    }
    match err.downcast_ref::<DomainError>() {
        Some(DomainError::Cancelled) => exit_codes::CANCELLED,
        _ => exit_codes::FATAL,
    }
}

/// 実行結果を終了コードにし、中止以外の失敗はオペレーターに伝える
pub fn finish(result: Result<()>, prompt: &dyn OperatorPrompt) -> u8 {
    let Err(err) = result else {
        return exit_codes::SUCCESS;
    };
    let code = exit_code_for(&err);
    if code == exit_codes::CANCELLED {
        info!("Cancelled: {:#}", err);
    } else {
        error!("{:#}", err);
        prompt.show_error(&format!("{:#}", err));
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_domain::model::{InstallationRecord, ReinstallChoice};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPrompt {
        errors: RefCell<Vec<String>>,
    }

    impl OperatorPrompt for RecordingPrompt {
        fn confirm_reinstall(&self, _existing: &InstallationRecord) -> ReinstallChoice {
            ReinstallChoice::Abort
        }
        fn confirm_uninstall(&self) -> bool {
            false
        }
        fn show_error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
        fn show_warn(&self, _message: &str) {}
        fn show_info(&self, _message: &str) {}
    }

    #[test]
    fn success_shows_nothing() {
        let prompt = RecordingPrompt::default();
        assert_eq!(finish(Ok(()), &prompt), exit_codes::SUCCESS);
        assert!(prompt.errors.borrow().is_empty());
    }

    #[test]
    fn fatal_error_is_shown_with_context() {
        let prompt = RecordingPrompt::default();
        let result: Result<()> = Err(anyhow::Error::new(DomainError::SourceMissing(
            "/payload/BongoCat.exe".into(),
        ))
        .context("installation failed"));

        assert_eq!(finish(result, &prompt), exit_codes::FATAL);
        assert_eq!(
            prompt.errors.borrow().as_slice(),
            ["installation failed: Source binary not found: /payload/BongoCat.exe"]
        );
    }

    #[test]
    fn cancel_is_not_shown_as_error() {
        let prompt = RecordingPrompt::default();
        let result: Result<()> = Err(anyhow::Error::new(DomainError::Cancelled));
        assert_eq!(finish(result, &prompt), exit_codes::CANCELLED);
        assert!(prompt.errors.borrow().is_empty());
    }

    #[test]
    fn cancelled_maps_to_cancel_code_through_context() {
        let err = anyhow::Error::new(DomainError::Cancelled).context("install");
        assert_eq!(exit_code_for(&err), exit_codes::CANCELLED);
    }

    #[test]
    fn deployment_failure_is_fatal() {
        let err = anyhow::Error::new(DomainError::SourceMissing("BongoCat.exe".into()));
        assert_eq!(exit_code_for(&err), exit_codes::FATAL);
        assert_eq!(exit_code_for(&anyhow::anyhow!("unexpected")), exit_codes::FATAL);
    }

    #[test]
    fn elevation_failure_has_own_code() {
        let err = anyhow::Error::new(ElevationRequired("UAC prompt was declined".into()));
        assert_eq!(exit_code_for(&err), exit_codes::ELEVATION_REQUIRED);
    }
}
