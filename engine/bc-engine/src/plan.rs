//! インストール計画（純粋関数）

use bc_domain::model::{InstallOptions, InstallStep};

/// オプションから実行順の手順リストを作る。
///
/// アンインストーラーの配置は登録レコードより必ず前に置く
/// （レコードが存在するならアンインストーラーも存在する）。
pub fn plan_install(options: &InstallOptions) -> Vec<InstallStep> {
    let mut steps = vec![
        InstallStep::CreateInstallDir,
        InstallStep::DeployApplication,
        InstallStep::DeployUninstaller,
        InstallStep::WriteRegistration,
    ];
    if options.install_autostart {
        steps.push(InstallStep::RegisterAutostart);
    }
    if options.create_desktop_shortcut {
        steps.push(InstallStep::CreateDesktopShortcut);
    }
    if options.launch_after_install {
        steps.push(InstallStep::LaunchApplication);
    }
    steps
}
