//! 昇格とアンインストーラー自己退避のシステム操作ヘルパー。

use crate::error::{Context, ElevationRequired, Result};
use bc_adapter_paths as paths;
use bc_domain::model::ProductIdentity;
use log::info;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 管理者権限で実行中かチェック
#[cfg(windows)]
pub fn is_admin() -> bool {
    use windows::Win32::Foundation::{CloseHandle, HANDLE};
    use windows::Win32::Security::{GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY};
    use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

    unsafe {
        let mut token = HANDLE::default();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token).is_err() {
            return false;
        }

        let mut elevation = TOKEN_ELEVATION::default();
        let mut size = std::mem::size_of::<TOKEN_ELEVATION>() as u32;
        let result = GetTokenInformation(
            token,
            TokenElevation,
            Some(&mut elevation as *mut _ as *mut _),
            size,
            &mut size,
        );

        let _ = CloseHandle(token);

        result.is_ok() && elevation.TokenIsElevated != 0
    }
}

#[cfg(not(windows))]
pub fn is_admin() -> bool {
    false
}

/// 管理者権限で自分自身を起動し直す（UAC昇格）
#[cfg(windows)]
pub fn relaunch_as_admin(args: &[String]) -> Result<()> {
    use std::os::windows::ffi::OsStrExt;
    use windows::Win32::UI::Shell::ShellExecuteW;
    use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
    use windows::core::PCWSTR;

    let exe = std::env::current_exe().context("failed to resolve current executable")?;
    let wide = |s: &std::ffi::OsStr| -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    };
    let exe_w = wide(exe.as_os_str());
    let params = args
        .iter()
        .map(|arg| quote_windows_arg(arg))
        .collect::<Vec<_>>()
        .join(" ");
    let params_w = wide(std::ffi::OsStr::new(&params));
    let verb_w = wide(std::ffi::OsStr::new("runas"));

    let result = unsafe {
        ShellExecuteW(
            None,
            PCWSTR(verb_w.as_ptr()),
            PCWSTR(exe_w.as_ptr()),
            if params.is_empty() { PCWSTR::null() } else { PCWSTR(params_w.as_ptr()) },
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };
    // ShellExecuteWは成功時32より大きい値を返す
    if result.0 as usize > 32 {
        info!("Elevated instance requested: {} {}", exe.display(), params);
        Ok(())
    } else {
        Err(ElevationRequired(format!("ShellExecute(runas) returned {}", result.0 as usize)).into())
    }
}

#[cfg(not(windows))]
pub fn relaunch_as_admin(_args: &[String]) -> Result<()> {
    Err(ElevationRequired("elevation is only available on Windows".into()).into())
}

/// CommandLineToArgvW の規則でクォートする
pub fn quote_windows_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "\"\"".to_string();
    }
    let needs_quotes = arg.chars().any(|c| c.is_whitespace() || c == '"');
    if !needs_quotes {
        return arg.to_string();
    }
    let mut out = String::new();
    out.push('"');
    let mut backslashes = 0usize;
    for ch in arg.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                out.push_str(&"\\".repeat(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            _ => {
                out.push_str(&"\\".repeat(backslashes));
                backslashes = 0;
                out.push(ch);
            }
        }
    }
    // 閉じクォート直前のバックスラッシュは倍にする
    out.push_str(&"\\".repeat(backslashes * 2));
    out.push('"');
    out
}

/// 実行中のアンインストーラーを `%TEMP%\BongoCat` へ複製する
pub fn stage_self_to_temp(identity: &ProductIdentity) -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to resolve current executable")?;
    let staged = paths::staged_uninstaller_path(identity, std::process::id());
    stage_copy(&exe, &staged)?;
    Ok(staged)
}

fn stage_copy(exe: &Path, staged: &Path) -> Result<()> {
    if let Some(dir) = staged.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    std::fs::copy(exe, staged)
        .with_context(|| format!("failed to copy {} to {}", exe.display(), staged.display()))?;
    info!("Uninstaller staged: {} -> {}", exe.display(), staged.display());
    Ok(())
}

/// 待たずに起動する（退避先のアンインストーラー用）
pub fn spawn_detached(exe: &Path, args: &[OsString]) -> Result<()> {
    let child = Command::new(exe)
        .args(args)
        .spawn()
        .with_context(|| format!("failed to start {}", exe.display()))?;
    info!("Started {} (pid {})", exe.display(), child.id());
    Ok(())
}
