#![windows_subsystem = "windows"]
//! bc-uninstall: Bongo Cat 単体アンインストーラー。
//! インストール先に置かれ、「アプリと機能」やセットアップの置き換え処理から起動される。
//! `--in-place` なしで起動された場合は一時ディレクトリへ自分を複製し、その複製に撤去を任せる。

use bc_composition::error::Result;
use bc_composition::ui_common::MessageBoxPrompt;
use bc_composition::{finish, log_utils, system, SetupRuntime};
use clap::Parser;
use log::info;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

const UNINSTALL_TITLE: &str = "Bongo Cat Uninstall";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "bc-uninstall", version, about = "Remove Bongo Cat from this computer")]
struct Cli {
    /// Tear down from this process instead of a staged temporary copy
    #[arg(long)]
    in_place: bool,
    /// No confirmation and no dialogs (`/S` is accepted too)
    #[arg(long, short = 'q')]
    quiet: bool,
    /// Install directory (defaults to the recorded InstallLocation)
    #[arg(long, value_name = "DIR")]
    install_dir: Option<PathBuf>,
}

impl Cli {
    /// 昇格後/退避先のプロセスへ渡す引数
    fn forwarded_args(&self, in_place: bool, install_dir: Option<PathBuf>) -> Vec<OsString> {
        let mut args = Vec::new();
        if in_place {
            args.push(OsString::from("--in-place"));
        }
        if self.quiet {
            args.push(OsString::from("--quiet"));
        }
        if let Some(dir) = install_dir {
            args.push(OsString::from("--install-dir"));
            args.push(dir.into_os_string());
        }
        args
    }
}

/// OSのアンインストール操作で使われる `/S` 系を `--quiet` に読み替える
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut value_expected = false;
    for arg in args {
        let is_silent_switch = !value_expected
            && arg
                .to_str()
                .is_some_and(|s| matches!(s.to_ascii_lowercase().as_str(), "/s" | "/quiet" | "/silent"));
        value_expected = arg == "--install-dir";
        out.push(if is_silent_switch {
            OsString::from("--quiet")
        } else {
            arg
        });
    }
    out
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Err(e) = log_utils::init("UNINSTALL", false) {
        eprintln!("warning: logger unavailable: {}", e);
    }
    info!("========== Bongo Cat Uninstall Started: {:?} ==========", cli);

    let code = finish(run(&cli), &MessageBoxPrompt::new(UNINSTALL_TITLE, cli.quiet));
    info!("========== Bongo Cat Uninstall Finished (exit {}) ==========", code);
    ExitCode::from(code)
}

fn run(cli: &Cli) -> Result<()> {
    if !system::is_admin() {
        info!("Not running as admin, requesting UAC elevation...");
        let args: Vec<String> = cli
            .forwarded_args(cli.in_place, cli.install_dir.clone())
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        return system::relaunch_as_admin(&args);
    }

    let runtime = SetupRuntime::new(UNINSTALL_TITLE, cli.quiet);
    if !cli.in_place {
        // インストール先の自分自身を消せるよう、一時ディレクトリの複製に任せる
        let install_dir = cli.install_dir.clone().or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(PathBuf::from))
        });
        let staged = system::stage_self_to_temp(runtime.identity())?;
        system::spawn_detached(&staged, &cli.forwarded_args(true, install_dir))?;
        return Ok(());
    }

    let running_image = std::env::current_exe().ok();
    runtime
        .uninstall_and_report(cli.install_dir.clone(), !cli.quiet, running_image)
        .map(|_| ())
}
