//! Device identity from the project's static settings file.

use std::fs;
use std::path::Path;

use crate::metric::SENTINEL;

/// Target family and part number, when the settings name them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub family: Option<String>,
    pub device: Option<String>,
}

impl DeviceIdentity {
    /// Read identity from a settings file; a missing file yields no identity.
    pub fn load(path: &Path) -> Self {
        fs::read(path)
            .map(|bytes| Self::parse(&String::from_utf8_lossy(&bytes)))
            .unwrap_or_default()
    }

    /// Parse `set_global_assignment -name FAMILY|DEVICE <value>` lines.
    pub fn parse(settings: &str) -> Self {
        let mut identity = DeviceIdentity::default();
        for line in settings.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((name, value)) = global_assignment(line) else {
                continue;
            };
            match name {
                "FAMILY" => identity.family = Some(value),
                "DEVICE" => identity.device = Some(value),
                _ => {}
            }
        }
        identity
    }

    /// First line of the result table.
    pub fn header_line(&self) -> String {
        format!(
            "Synthesis results for {} ({})",
            self.family.as_deref().unwrap_or(SENTINEL),
            self.device.as_deref().unwrap_or(SENTINEL)
        )
    }
}

fn global_assignment(line: &str) -> Option<(&str, String)> {
    let rest = line.strip_prefix("set_global_assignment")?;
    let rest = rest.trim_start().strip_prefix("-name")?.trim_start();
    let (name, value) = rest.split_once(char::is_whitespace)?;
    let value = value.trim().trim_matches('"').trim();
    (!value.is_empty()).then(|| (name, value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QSF: &str = r#"
# Project-Wide Assignments
set_global_assignment -name FAMILY "Stratix V"
set_global_assignment -name DEVICE 5SGXEA7N2F45C2
set_global_assignment -name TOP_LEVEL_ENTITY mpram_wrp
# set_global_assignment -name DEVICE commented_out
"#;

    #[test]
    fn parses_family_and_device() {
        let id = DeviceIdentity::parse(QSF);
        assert_eq!(id.family.as_deref(), Some("Stratix V"));
        assert_eq!(id.device.as_deref(), Some("5SGXEA7N2F45C2"));
        assert_eq!(
            id.header_line(),
            "Synthesis results for Stratix V (5SGXEA7N2F45C2)"
        );
    }

    #[test]
    fn missing_parts_use_sentinel() {
        let id = DeviceIdentity::parse("set_global_assignment -name FAMILY \"Arria 10\"\n");
        assert_eq!(id.header_line(), "Synthesis results for Arria 10 (N/A)");
    }

    #[test]
    fn missing_file_has_no_identity() {
        let dir = tempfile::tempdir().unwrap();
        let id = DeviceIdentity::load(&dir.path().join("absent.qsf"));
        assert_eq!(id, DeviceIdentity::default());
    }
}
