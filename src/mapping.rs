//! Device name mappings
//!
//! Lets the user replace raw PipeWire node names with friendlier labels in
//! the OSD. The mapping file holds one `pattern=Display Name` pair per line;
//! the first pattern found anywhere in the device name wins.
//!
//! ```text
//! # Headphones on the USB DAC
//! usb-Focusrite=Headphones
//! hdmi-stereo=TV
//! ```

use std::path::Path;

use crate::error::MonitorError;

/// A single pattern → label pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMapping {
    /// Case-sensitive substring of the raw device name
    pub pattern: String,
    pub display_name: String,
}

/// Ordered, read-only lookup table loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct DeviceMappingTable {
    entries: Vec<DeviceMapping>,
}

impl DeviceMappingTable {
    pub fn new(entries: Vec<DeviceMapping>) -> Self {
        Self { entries }
    }

    /// Read and parse a mapping file.
    pub fn load(path: &Path) -> Result<Self, MonitorError> {
        let text = std::fs::read_to_string(path).map_err(|source| MonitorError::MappingFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse mapping file contents. Blank lines, `#` comments and lines
    /// without `=` are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((pattern, display_name)) = line.split_once('=') else {
                log::debug!("Device map line {}: no '=', skipping", lineno + 1);
                continue;
            };

            if pattern.is_empty() {
                log::warn!("Device map line {}: empty pattern, skipping", lineno + 1);
                continue;
            }

            entries.push(DeviceMapping {
                pattern: pattern.to_string(),
                display_name: display_name.to_string(),
            });
        }

        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name for `raw_name`: the label of the first matching pattern,
    /// or `raw_name` itself when nothing matches.
    pub fn map<'a>(&'a self, raw_name: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|m| raw_name.contains(m.pattern.as_str()))
            .map(|m| m.display_name.as_str())
            .unwrap_or(raw_name)
    }
}
