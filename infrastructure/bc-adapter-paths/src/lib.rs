//! Bongo Cat の既定パス解決

use bc_domain::model::ProductIdentity;
use std::path::PathBuf;

#[cfg(windows)]
fn known_folder_path(id: &windows::core::GUID) -> Option<PathBuf> {
    use windows::Win32::System::Com::CoTaskMemFree;
    use windows::Win32::UI::Shell::{KF_FLAG_DEFAULT, SHGetKnownFolderPath};
    use windows::core::PWSTR;

    unsafe {
        let raw: PWSTR = SHGetKnownFolderPath(id, KF_FLAG_DEFAULT, None).ok()?;
        let s = pwstr_to_string(raw);
        CoTaskMemFree(Some(raw.0 as _));
        if s.is_empty() {
            None
        } else {
            Some(PathBuf::from(s))
        }
    }
}

#[cfg(windows)]
fn pwstr_to_string(pwstr: windows::core::PWSTR) -> String {
    unsafe {
        if pwstr.is_null() {
            return String::new();
        }
        let mut len = 0usize;
        while *pwstr.0.add(len) != 0 {
            len += 1;
        }
        let slice = std::slice::from_raw_parts(pwstr.0, len);
        String::from_utf16_lossy(slice)
    }
}

/// Program Files（64bit）
///
/// - Windows: `C:\Program Files`（既知フォルダ）
/// - その他: `./program-files`（開発/テスト用）
pub fn program_files_dir() -> PathBuf {
    #[cfg(windows)]
    {
        use windows::Win32::UI::Shell::FOLDERID_ProgramFiles;

        known_folder_path(&FOLDERID_ProgramFiles)
            .or_else(|| std::env::var("ProgramFiles").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(r"C:\Program Files"))
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("./program-files")
    }
}

/// 既定のインストール先 `%ProgramFiles%\Bongo Cat`
pub fn default_install_dir(identity: &ProductIdentity) -> PathBuf {
    program_files_dir().join(identity.install_dir_name)
}

/// 全ユーザー共通のデスクトップ
///
/// - Windows: `C:\Users\Public\Desktop`
/// - その他: `./desktop`
pub fn public_desktop_dir() -> PathBuf {
    #[cfg(windows)]
    {
        use windows::Win32::UI::Shell::FOLDERID_PublicDesktop;

        known_folder_path(&FOLDERID_PublicDesktop)
            .or_else(|| {
                std::env::var("PUBLIC")
                    .ok()
                    .map(|p| PathBuf::from(p).join("Desktop"))
            })
            .unwrap_or_else(|| PathBuf::from(r"C:\Users\Public\Desktop"))
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("./desktop")
    }
}

/// セットアップ実行ファイルと同じ場所（パッケージ済みバイナリの既定の読み込み元）
pub fn default_payload_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 作業ディレクトリ `%TEMP%\BongoCat`（ライフサイクルログ・レポート・退避したアンインストーラー）
pub fn work_dir(identity: &ProductIdentity) -> PathBuf {
    std::env::temp_dir().join(identity.key)
}

/// 自己退避したアンインストーラーの置き場所 `%TEMP%\BongoCat\bc-uninstall-<pid>.exe`
pub fn staged_uninstaller_path(identity: &ProductIdentity, pid: u32) -> PathBuf {
    let stem = identity
        .uninstaller_exe
        .strip_suffix(".exe")
        .unwrap_or(identity.uninstaller_exe);
    work_dir(identity).join(format!("{}-{}.exe", stem, pid))
}
