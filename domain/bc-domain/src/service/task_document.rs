//! タスク定義ドキュメント（Task Scheduler 1.2 スキーマ）の生成

use crate::model::{iso8601_duration, AutostartTaskDefinition};
use std::fmt::Write;

pub const TASK_SCHEMA_NAMESPACE: &str = "http://schemas.microsoft.com/windows/2004/02/mit/task";

/// XML のテキスト/属性値をエスケープ
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn bool_text(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

/// 定義を XML 文字列に変換する（宣言は UTF-16、書き出し側でエンコードする）
pub fn render_task_xml(def: &AutostartTaskDefinition) -> String {
    let mut x = String::new();
    // String への書き込みは失敗しない
    let _ = write_document(&mut x, def);
    x
}

fn write_document(x: &mut String, def: &AutostartTaskDefinition) -> std::fmt::Result {
    writeln!(x, r#"<?xml version="1.0" encoding="UTF-16"?>"#)?;
    writeln!(x, r#"<Task version="1.2" xmlns="{}">"#, TASK_SCHEMA_NAMESPACE)?;

    writeln!(x, "  <RegistrationInfo>")?;
    writeln!(x, "    <Author>{}</Author>", xml_escape(&def.author))?;
    writeln!(x, "    <Description>{}</Description>", xml_escape(&def.description))?;
    writeln!(x, "  </RegistrationInfo>")?;

    writeln!(x, "  <Triggers>")?;
    writeln!(x, "    <LogonTrigger>")?;
    writeln!(x, "      <Enabled>{}</Enabled>", bool_text(def.trigger.enabled))?;
    writeln!(x, "      <Delay>{}</Delay>", iso8601_duration(def.trigger.delay_secs))?;
    writeln!(x, "    </LogonTrigger>")?;
    writeln!(x, "  </Triggers>")?;

    writeln!(x, "  <Principals>")?;
    writeln!(x, r#"    <Principal id="Author">"#)?;
    writeln!(x, "      <LogonType>{}</LogonType>", def.principal.logon_type.as_schema_str())?;
    writeln!(x, "      <RunLevel>{}</RunLevel>", def.principal.run_level.as_schema_str())?;
    writeln!(x, "    </Principal>")?;
    writeln!(x, "  </Principals>")?;

    let s = &def.settings;
    writeln!(x, "  <Settings>")?;
    writeln!(
        x,
        "    <MultipleInstancesPolicy>{}</MultipleInstancesPolicy>",
        s.instances.as_schema_str()
    )?;
    writeln!(
        x,
        "    <DisallowStartIfOnBatteries>{}</DisallowStartIfOnBatteries>",
        bool_text(s.disallow_start_if_on_batteries)
    )?;
    writeln!(
        x,
        "    <StopIfGoingOnBatteries>{}</StopIfGoingOnBatteries>",
        bool_text(s.stop_if_going_on_batteries)
    )?;
    writeln!(
        x,
        "    <AllowHardTerminate>{}</AllowHardTerminate>",
        bool_text(s.allow_hard_terminate)
    )?;
    writeln!(
        x,
        "    <StartWhenAvailable>{}</StartWhenAvailable>",
        bool_text(s.start_when_available)
    )?;
    writeln!(
        x,
        "    <AllowStartOnDemand>{}</AllowStartOnDemand>",
        bool_text(s.allow_start_on_demand)
    )?;
    writeln!(x, "    <Enabled>{}</Enabled>", bool_text(s.enabled))?;
    writeln!(
        x,
        "    <ExecutionTimeLimit>{}</ExecutionTimeLimit>",
        iso8601_duration(s.execution_time_limit_secs)
    )?;
    writeln!(x, "    <Priority>{}</Priority>", s.priority)?;
    writeln!(x, "  </Settings>")?;

    writeln!(x, r#"  <Actions Context="Author">"#)?;
    writeln!(x, "    <Exec>")?;
    writeln!(x, "      <Command>{}</Command>", xml_escape(&def.action.command))?;
    if let Some(args) = def.action.arguments.as_deref().filter(|a| !a.is_empty()) {
        writeln!(x, "      <Arguments>{}</Arguments>", xml_escape(args))?;
    }
    writeln!(
        x,
        "      <WorkingDirectory>{}</WorkingDirectory>",
        xml_escape(&def.action.working_directory)
    )?;
    writeln!(x, "    </Exec>")?;
    writeln!(x, "  </Actions>")?;
    writeln!(x, "</Task>")?;
    Ok(())
}

/// schtasks /XML が読める UTF-16LE（BOM付き）へエンコード
pub fn encode_utf16le_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 + text.len() * 2);
    bytes.extend_from_slice(&[0xFF, 0xFE]);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(exe: &str, dir: &str) -> AutostartTaskDefinition {
        AutostartTaskDefinition::for_executable("Bongo Cat autostart", "Bongo Cat Project", exe, dir)
    }

    #[test]
    fn document_contains_logon_trigger_with_delay_and_run_level() {
        let xml = render_task_xml(&definition(
            r"C:\Program Files\Bongo Cat\BongoCat.exe",
            r"C:\Program Files\Bongo Cat",
        ));
        assert!(xml.contains("<LogonTrigger>"));
        assert!(xml.contains("<Delay>PT10S</Delay>"));
        assert!(xml.contains("<RunLevel>HighestAvailable</RunLevel>"));
        assert!(xml.contains("<LogonType>InteractiveToken</LogonType>"));
    }

    #[test]
    fn document_contains_fixed_policy() {
        let xml = render_task_xml(&definition(r"C:\a\BongoCat.exe", r"C:\a"));
        for expected in [
            "<MultipleInstancesPolicy>IgnoreNew</MultipleInstancesPolicy>",
            "<DisallowStartIfOnBatteries>false</DisallowStartIfOnBatteries>",
            "<StopIfGoingOnBatteries>false</StopIfGoingOnBatteries>",
            "<AllowHardTerminate>true</AllowHardTerminate>",
            "<StartWhenAvailable>true</StartWhenAvailable>",
            "<AllowStartOnDemand>true</AllowStartOnDemand>",
            "<ExecutionTimeLimit>PT0S</ExecutionTimeLimit>",
            "<Priority>7</Priority>",
        ] {
            assert!(xml.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn action_has_no_arguments_and_escaped_paths() {
        let xml = render_task_xml(&definition(r"C:\R&D <x>\BongoCat.exe", r"C:\R&D <x>"));
        assert!(xml.contains(r"<Command>C:\R&amp;D &lt;x&gt;\BongoCat.exe</Command>"));
        assert!(xml.contains(r"<WorkingDirectory>C:\R&amp;D &lt;x&gt;</WorkingDirectory>"));
        assert!(!xml.contains("<Arguments>"));
    }

    #[test]
    fn document_is_rooted_in_task_schema() {
        let xml = render_task_xml(&definition(r"C:\a\b.exe", r"C:\a"));
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-16"?>"#));
        assert!(xml.contains(r#"<Task version="1.2" xmlns="http://schemas.microsoft.com/windows/2004/02/mit/task">"#));
        assert!(xml.trim_end().ends_with("</Task>"));
    }

    #[test]
    fn utf16_encoding_has_bom() {
        let bytes = encode_utf16le_with_bom("<a/>");
        assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
        assert_eq!(&bytes[2..4], &[b'<', 0]);
        assert_eq!(bytes.len(), 2 + 4 * 2);
    }
}
