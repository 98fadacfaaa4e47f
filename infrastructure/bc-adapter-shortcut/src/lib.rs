//! デスクトップショートカット（.lnk）作成アダプター
//!
//! IShellLinkW に対象/作業ディレクトリ/説明/アイコンを設定し、IPersistFile で保存する。

use bc_domain::port::driven::{ShortcutSpec, ShortcutWriter};
use bc_domain::DomainError;

#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLinkWriter;

impl ShellLinkWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ShortcutWriter for ShellLinkWriter {
    fn create_shortcut(&self, spec: &ShortcutSpec) -> Result<(), DomainError> {
        save_shell_link(spec)?;
        log::info!(
            "Shortcut created: {} -> {}",
            spec.link_path.display(),
            spec.target.display()
        );
        Ok(())
    }
}

#[cfg(windows)]
fn save_shell_link(spec: &ShortcutSpec) -> Result<(), DomainError> {
    use windows::core::{Interface, PCWSTR};
    use windows::Win32::Foundation::{RPC_E_CHANGED_MODE, S_FALSE, S_OK};
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED,
    };
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

    let target_w = to_wide(&spec.target.to_string_lossy());
    let work_w = to_wide(&spec.working_dir.to_string_lossy());
    let desc_w = to_wide(&spec.description);
    let link_w = to_wide(&spec.link_path.to_string_lossy());

    unsafe {
        let hr = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
        let did_init = if hr == S_OK || hr == S_FALSE {
            true
        } else if hr == RPC_E_CHANGED_MODE {
            false
        } else {
            return Err(DomainError::Shortcut(format!(
                "COM init failed: 0x{:08x}",
                hr.0 as u32
            )));
        };

        struct CoUninit(bool);
        impl Drop for CoUninit {
            fn drop(&mut self) {
                if self.0 {
                    unsafe { CoUninitialize() }
                }
            }
        }
        let _guard = CoUninit(did_init);

        let link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)
            .map_err(|e| DomainError::Shortcut(format!("CoCreateInstance(ShellLink) failed: {e}")))?;

        link.SetPath(PCWSTR(target_w.as_ptr()))
            .map_err(|e| DomainError::Shortcut(format!("SetPath failed: {e}")))?;
        link.SetWorkingDirectory(PCWSTR(work_w.as_ptr()))
            .map_err(|e| DomainError::Shortcut(format!("SetWorkingDirectory failed: {e}")))?;
        link.SetDescription(PCWSTR(desc_w.as_ptr()))
            .map_err(|e| DomainError::Shortcut(format!("SetDescription failed: {e}")))?;
        link.SetIconLocation(PCWSTR(target_w.as_ptr()), 0)
            .map_err(|e| DomainError::Shortcut(format!("SetIconLocation failed: {e}")))?;

        let persist: IPersistFile = link
            .cast()
            .map_err(|e| DomainError::Shortcut(format!("IPersistFile cast failed: {e}")))?;
        persist
            .Save(PCWSTR(link_w.as_ptr()), true)
            .map_err(|e| {
                DomainError::Shortcut(format!(
                    "Save {} failed: {e}",
                    spec.link_path.display()
                ))
            })?;
    }

    Ok(())
}

#[cfg(not(windows))]
fn save_shell_link(spec: &ShortcutSpec) -> Result<(), DomainError> {
    Err(DomainError::Shortcut(format!(
        "shell links are only supported on Windows: {}",
        spec.link_path.display()
    )))
}

#[cfg(windows)]
fn to_wide(s: &str) -> Vec<u16> {
    let mut wide: Vec<u16> = s.encode_utf16().collect();
    wide.push(0);
    wide
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unsupported_platform_reports_shortcut_error() {
        let spec = ShortcutSpec {
            link_path: PathBuf::from("/desktop/Bongo Cat.lnk"),
            target: PathBuf::from("/opt/Bongo Cat/BongoCat.exe"),
            working_dir: PathBuf::from("/opt/Bongo Cat"),
            description: "Bongo Cat".into(),
        };
        let err = ShellLinkWriter::new().create_shortcut(&spec).unwrap_err();
        assert!(matches!(err, DomainError::Shortcut(msg) if msg.contains("Bongo Cat.lnk")));
    }
}
