//! 事前チェック（既存インストールの検出と置き換え）

use crate::execute::InstallPorts;
use bc_domain::model::{
    InstallLayout, InstallOptions, InstallationRecord, PreconditionOutcome, ProductIdentity, ReinstallChoice,
    RECORD_VALUE_NAMES,
};
use bc_domain::port::driven::{CommandRequest, KeyValueStore};
use bc_domain::DomainError;
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

/// 登録レコードを読む（DisplayName が無ければ未インストール）
pub fn read_record(
    registry: &dyn KeyValueStore,
    identity: &ProductIdentity,
) -> Result<Option<InstallationRecord>, DomainError> {
    let key = identity.registration_key();
    let mut values = HashMap::new();
    for name in RECORD_VALUE_NAMES {
        if let Some(value) = registry.get_value(&key, name)? {
            values.insert(name, value);
        }
    }
    Ok(InstallationRecord::from_values(|name| values.get(name).cloned()))
}

/// 旧アンインストーラーを「その場で・対話なし」に実行する要求
pub fn previous_uninstall_request(
    uninstaller: &str,
    existing: &InstallationRecord,
) -> CommandRequest {
    let request = CommandRequest::new(uninstaller).args(["--in-place", "--quiet"]);
    match existing.install_location() {
        Some(dir) => request.arg("--install-dir").arg(dir),
        None => request,
    }
}

/// 配布物（アプリ本体とアンインストーラー）が揃っているか
pub fn verify_payload(
    identity: &ProductIdentity,
    layout: &InstallLayout,
    ports: &InstallPorts<'_>,
) -> Result<(), DomainError> {
    for source in [layout.app_source(identity), layout.uninstaller_source(identity)] {
        if !ports.fs.exists(&source) {
            return Err(DomainError::SourceMissing(source.display().to_string()));
        }
    }
    Ok(())
}

/// 既存インストールを確認し、必要なら旧アンインストーラーを同期実行する。
///
/// - 配布物が欠けている → `SourceMissing`（確認も撤去もしない）
/// - 未インストール → `Fresh`
/// - 中止を選択 → `DomainError::Cancelled`（副作用なし）
/// - アンインストーラーが無い/壊れている → `PreviousUninstallerMissing`（副作用なし）
/// - アンインストーラーの非0終了は警告のみで続行
pub fn check_preconditions(
    identity: &ProductIdentity,
    options: &InstallOptions,
    layout: &InstallLayout,
    ports: &InstallPorts<'_>,
) -> Result<PreconditionOutcome, DomainError> {
    verify_payload(identity, layout, ports)?;
    let Some(existing) = read_record(ports.registry, identity)? else {
        info!("No previous installation found");
        return Ok(PreconditionOutcome::Fresh);
    };
    info!(
        "Previous installation found: {} {} at {:?}",
        existing.display_name, existing.display_version, existing.install_location
    );

    let choice = if options.quiet {
        ReinstallChoice::UninstallAndContinue
    } else {
        ports.prompt.confirm_reinstall(&existing)
    };
    if choice == ReinstallChoice::Abort {
        info!("Operator aborted at the reinstall prompt");
        return Err(DomainError::Cancelled);
    }

    let uninstaller = existing.uninstaller_path().ok_or_else(|| {
        DomainError::PreviousUninstallerMissing(format!(
            "UninstallString is empty or malformed: {:?}",
            existing.uninstall_string
        ))
    })?;
    if !ports.fs.exists(Path::new(&uninstaller)) {
        return Err(DomainError::PreviousUninstallerMissing(uninstaller));
    }

    let request = previous_uninstall_request(&uninstaller, &existing);
    info!("Running previous uninstaller: {}", request);
    let output = ports.commands.run(&request)?;
    if output.success() {
        info!("Previous uninstaller finished");
    } else {
        warn!(
            "Previous uninstaller exited with {:?}; continuing: {}",
            output.exit_code,
            output.diagnostic()
        );
    }

    Ok(PreconditionOutcome::Replaced {
        previous_version: existing.display_version,
        uninstaller_exit_code: output.exit_code,
    })
}
