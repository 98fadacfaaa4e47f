//! bc-setup: Bongo Cat のインストーラー。
//! 既存インストールの置き換え確認・ファイル配置・アンインストール登録・自動起動タスク登録・
//! デスクトップショートカット作成・起動をまとめて行う。状態確認と自動起動の切り替えもここから。

use bc_composition::domain::model::{InstallOptions, StatusReport};
use bc_composition::domain::port::driving::InstallUseCase;
use bc_composition::error::{Context, Result};
use bc_composition::ui_common::MessageBoxPrompt;
use bc_composition::{finish, log_utils, system, ElevationRequired, SetupRuntime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const SETUP_TITLE: &str = "Bongo Cat Setup";

#[derive(Parser, Debug)]
#[command(
    name = "bc-setup",
    version,
    about = "Install Bongo Cat for all users",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// サブコマンド省略時は install として扱う
    #[command(flatten)]
    install: InstallArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Install (or replace) Bongo Cat
    Install(InstallArgs),
    /// Remove Bongo Cat
    Uninstall {
        /// Do not ask for confirmation or show dialogs
        #[arg(long, short = 'q')]
        quiet: bool,
        /// Install directory (defaults to the recorded InstallLocation)
        #[arg(long, value_name = "DIR")]
        install_dir: Option<PathBuf>,
    },
    /// Show whether Bongo Cat is installed and the autostart task state
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Enable or disable the autostart task
    Autostart {
        #[arg(value_enum)]
        state: AutostartState,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct InstallArgs {
    /// Install directory
    #[arg(long, value_name = "DIR", env = "BC_INSTALL_DIR")]
    install_dir: Option<PathBuf>,
    /// Directory containing BongoCat.exe and bc-uninstall.exe (defaults to this program's directory)
    #[arg(long, value_name = "DIR", env = "BC_PAYLOAD_DIR")]
    payload_dir: Option<PathBuf>,
    /// Do not register the logon autostart task
    #[arg(long)]
    no_autostart: bool,
    /// Do not create the desktop shortcut
    #[arg(long)]
    no_desktop_shortcut: bool,
    /// Do not start Bongo Cat after installing
    #[arg(long)]
    no_launch: bool,
    /// No dialogs; an existing installation is replaced without asking
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl InstallArgs {
    fn options(&self) -> InstallOptions {
        InstallOptions {
            install_autostart: !self.no_autostart,
            create_desktop_shortcut: !self.no_desktop_shortcut,
            launch_after_install: !self.no_launch,
            quiet: self.quiet,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AutostartState {
    Enable,
    Disable,
}

impl Command {
    fn quiet(&self) -> bool {
        match self {
            Command::Install(args) => args.quiet,
            Command::Uninstall { quiet, .. } => *quiet,
            Command::Status { .. } | Command::Autostart { .. } => true,
        }
    }

    fn needs_admin(&self) -> bool {
        !matches!(self, Command::Status { .. })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Install(cli.install));

    if let Err(e) = log_utils::init("SETUP", false) {
        eprintln!("warning: logger unavailable: {}", e);
    }
    info!("========== Bongo Cat Setup Started: {:?} ==========", command);

    let quiet = command.quiet();
    let code = finish(run(command), &MessageBoxPrompt::new(SETUP_TITLE, quiet));
    info!("========== Bongo Cat Setup Finished (exit {}) ==========", code);
    ExitCode::from(code)
}

fn run(command: Command) -> Result<()> {
    if command.needs_admin() && !system::is_admin() {
        return Err(ElevationRequired("run bc-setup from an elevated prompt".into()).into());
    }

    let runtime = SetupRuntime::new(SETUP_TITLE, command.quiet());
    match command {
        Command::Install(args) => {
            let layout = runtime.layout(args.install_dir.clone(), args.payload_dir.clone());
            let report = runtime
                .service()
                .install(&args.options(), &layout)
                .context("installation failed")?;
            let identity = runtime.identity();
            let message = format!(
                "{} {} has been installed to {}.",
                identity.display_name, identity.display_version, report.install_dir
            );
            if args.quiet {
                info!("{}", message);
            } else {
                runtime.prompt().show_info(&message);
            }
        }
        Command::Uninstall { quiet, install_dir } => {
            runtime.uninstall_and_report(install_dir, !quiet, None)?;
        }
        Command::Status { json } => {
            let status = runtime.service().status().context("status query failed")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&status).context("failed to serialize status")?
                );
            } else {
                print!("{}", render_status(runtime.identity().display_name, &status));
            }
        }
        Command::Autostart { state } => {
            let enabled = state == AutostartState::Enable;
            runtime
                .service()
                .set_autostart_enabled(enabled)
                .context("failed to change the autostart task")?;
            println!(
                "Autostart {}",
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }
    Ok(())
}

fn render_status(display_name: &str, status: &StatusReport) -> String {
    let mut out = String::new();
    match &status.record {
        Some(record) => {
            out.push_str(&format!(
                "{}: installed (version {})\n",
                display_name, record.display_version
            ));
            out.push_str(&format!("  Publisher:        {}\n", record.publisher));
            if let Some(location) = record.install_location() {
                out.push_str(&format!("  Location:         {}\n", location));
            }
            out.push_str(&format!("  Uninstall string: {}\n", record.uninstall_string));
        }
        None => out.push_str(&format!("{}: not installed\n", display_name)),
    }
    match &status.autostart {
        Some(task) => out.push_str(&format!(
            "  Autostart task:   {} ({}, {})\n",
            task.name,
            task.state,
            if task.enabled { "enabled" } else { "disabled" }
        )),
        None => out.push_str("  Autostart task:   not registered\n"),
    }
    out
}
