//! コマンドライン文字列のパス処理（stdのみ）

/// パスを二重引用符で囲む（既に囲まれていればそのまま）。
pub fn quote(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed.to_string()
    } else {
        format!("\"{}\"", trimmed)
    }
}

/// コマンドライン文字列から実行ファイルのパス部分を取り出す。
///
/// - `"C:\Program Files\x.exe" /S` → `C:\Program Files\x.exe`
/// - `C:\Program Files\x.exe /S` → `C:\Program Files\x.exe`（".exe" までを採用）
/// - 引用符が閉じていない・空の場合は None
pub fn command_executable(command: &str) -> Option<String> {
    let s = command.trim();
    if s.is_empty() || s.contains('\0') {
        return None;
    }

    if let Some(rest) = s.strip_prefix('"') {
        let end = rest.find('"')?;
        let path = rest[..end].trim();
        return if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        };
    }

    let lower = s.to_ascii_lowercase();
    if let Some(idx) = lower.find(".exe") {
        let end = idx + ".exe".len();
        let boundary = s[end..].chars().next().map_or(true, char::is_whitespace);
        if boundary {
            return Some(s[..end].to_string());
        }
    }

    s.split_whitespace().next().map(str::to_string)
}
