//! ネイティブMessageBoxによるオペレーター確認（quiet時は表示しない）

use bc_domain::model::{InstallationRecord, ReinstallChoice};
use bc_domain::port::driven::OperatorPrompt;
use log::{error, info, warn};

#[cfg(windows)]
mod win_flags {
    use windows::Win32::UI::WindowsAndMessaging::{
        MESSAGEBOX_STYLE, MB_ICONERROR, MB_ICONINFORMATION, MB_ICONQUESTION, MB_ICONWARNING,
        MB_OK, MB_OKCANCEL, MB_YESNO,
    };

    pub const ERROR: MESSAGEBOX_STYLE = MESSAGEBOX_STYLE(MB_OK.0 | MB_ICONERROR.0);
    pub const INFO: MESSAGEBOX_STYLE = MESSAGEBOX_STYLE(MB_OK.0 | MB_ICONINFORMATION.0);
    pub const WARN: MESSAGEBOX_STYLE = MESSAGEBOX_STYLE(MB_OK.0 | MB_ICONWARNING.0);
    pub const OK_CANCEL_WARN: MESSAGEBOX_STYLE = MESSAGEBOX_STYLE(MB_OKCANCEL.0 | MB_ICONWARNING.0);
    pub const YES_NO_QUESTION: MESSAGEBOX_STYLE = MESSAGEBOX_STYLE(MB_YESNO.0 | MB_ICONQUESTION.0);
}

#[cfg(windows)]
fn show_message_box(
    title: &str,
    msg: &str,
    flags: windows::Win32::UI::WindowsAndMessaging::MESSAGEBOX_STYLE,
) -> windows::Win32::UI::WindowsAndMessaging::MESSAGEBOX_RESULT {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows::Win32::UI::WindowsAndMessaging::MessageBoxW;
    use windows::core::PCWSTR;

    let title_w: Vec<u16> = OsStr::new(title)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();
    let text_w: Vec<u16> = OsStr::new(msg)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    unsafe { MessageBoxW(None, PCWSTR(text_w.as_ptr()), PCWSTR(title_w.as_ptr()), flags) }
}

/// 既存インストール検出時の確認文
pub fn reinstall_prompt_text(existing: &InstallationRecord) -> String {
    let mut text = format!(
        "{} {} is already installed.",
        existing.display_name, existing.display_version
    );
    if let Some(location) = existing.install_location() {
        text.push_str(&format!("\nLocation: {}", location));
    }
    text.push_str(
        "\n\nClick OK to remove the previous version and continue, or Cancel to abort.",
    );
    text
}

/// アンインストール開始時の確認文
pub fn uninstall_prompt_text(title: &str) -> String {
    format!(
        "Are you sure you want to completely remove {} and all of its components?",
        title
    )
}

/// MessageBox実装の `OperatorPrompt`
///
/// quiet の場合はダイアログを出さず、再インストール/アンインストールとも続行扱い。
/// 通知はログと標準エラー/標準出力のみ。
#[derive(Debug, Clone)]
pub struct MessageBoxPrompt {
    title: String,
    quiet: bool,
}

impl MessageBoxPrompt {
    pub fn new(title: impl Into<String>, quiet: bool) -> Self {
        Self {
            title: title.into(),
            quiet,
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn ask(&self, kind: &str, text: &str) -> bool {
        if self.quiet {
            info!("UI {}: {} - {} result=auto", kind, self.title, one_line(text));
            return true;
        }
        let accepted = ask_native(&self.title, text, kind);
        info!(
            "UI {}: {} - {} result={}",
            kind,
            self.title,
            one_line(text),
            if accepted { "yes" } else { "no" }
        );
        accepted
    }
}

fn one_line(text: &str) -> String {
    text.replace('\n', "\\n")
}

#[cfg(windows)]
fn ask_native(title: &str, text: &str, kind: &str) -> bool {
    use windows::Win32::UI::WindowsAndMessaging::{IDOK, IDYES};

    if kind == "reinstall" {
        show_message_box(title, text, win_flags::OK_CANCEL_WARN) == IDOK
    } else {
        show_message_box(title, text, win_flags::YES_NO_QUESTION) == IDYES
    }
}

// ダイアログを出せない環境では否定側に倒す
#[cfg(not(windows))]
fn ask_native(_title: &str, _text: &str, _kind: &str) -> bool {
    false
}

impl OperatorPrompt for MessageBoxPrompt {
    fn confirm_reinstall(&self, existing: &InstallationRecord) -> ReinstallChoice {
        if self.ask("reinstall", &reinstall_prompt_text(existing)) {
            ReinstallChoice::UninstallAndContinue
        } else {
            ReinstallChoice::Abort
        }
    }

    fn confirm_uninstall(&self) -> bool {
        self.ask("uninstall", &uninstall_prompt_text(&self.title))
    }

    fn show_error(&self, message: &str) {
        error!("UI error: {} - {}", self.title, one_line(message));
        eprintln!("error: {}", message);
        #[cfg(windows)]
        if !self.quiet {
            let _ = show_message_box(&self.title, message, win_flags::ERROR);
        }
    }

    fn show_warn(&self, message: &str) {
        warn!("UI warn: {} - {}", self.title, one_line(message));
        eprintln!("warning: {}", message);
        #[cfg(windows)]
        if !self.quiet {
            let _ = show_message_box(&self.title, message, win_flags::WARN);
        }
    }

    fn show_info(&self, message: &str) {
        info!("UI info: {} - {}", self.title, one_line(message));
        println!("{}", message);
        #[cfg(windows)]
        if !self.quiet {
            let _ = show_message_box(&self.title, message, win_flags::INFO);
        }
    }
}
