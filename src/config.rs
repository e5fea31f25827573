use crate::data::{parse_hex, Color, Operation};
use crate::error::{Error, Result};
use crate::table::OpTable;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// VM Options /////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugMode {
    #[default]
    Off,
    // Report after every step
    Trace,
    // Report after every step and wait for a line on the input
    Step,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    pub max_stack: Option<usize>,
    pub instruction_size: usize,
    pub debug: DebugMode,
    pub seed: Option<u64>,
}

impl VmConfig {
    /// Converts the command line stack size, where -1 means no limit.
    pub fn max_stack_from_flag(flag: i64) -> Result<Option<usize>> {
        match flag {
            -1 => Ok(None),
            n if n >= 0 => usize::try_from(n)
                .map(Some)
                .map_err(|_| Error::InvalidMaxSize(n)),
            n => Err(Error::InvalidMaxSize(n)),
        }
    }
}

impl Default for VmConfig {
    fn default() -> VmConfig {
        VmConfig {
            max_stack: None,
            instruction_size: 1,
            debug: DebugMode::Off,
            seed: None,
        }
    }
}

// Color Overrides ////////////////////////////////////////////////////////////
//
// A toml file with a single table of operation names to hex colors:
//
//     [colors]
//     SUM = "00ced1"
//     WHILE = "#fff"

#[derive(Deserialize, Debug, Default)]
pub struct ColorConfig {
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl ColorConfig {
    pub fn load(path: &Path) -> Result<ColorConfig> {
        let content = fs::read_to_string(path).map_err(|source| Error::LoadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        ColorConfig::parse(&content)
    }

    pub fn parse(content: &str) -> Result<ColorConfig> {
        let config: ColorConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn overrides(&self) -> Result<Vec<(Operation, Color)>> {
        let mut overrides = Vec::with_capacity(self.colors.len());
        for (name, hex) in self.colors.iter() {
            let op = Operation::from_name(name)
                .ok_or_else(|| Error::UnknownOperation(name.clone()))?;
            let color = parse_hex(hex).ok_or_else(|| Error::InvalidHex(hex.clone()))?;
            overrides.push((op, color));
        }
        Ok(overrides)
    }

    /// The default table with every override applied.
    pub fn table(&self) -> Result<OpTable> {
        let mut table = OpTable::new();
        table.apply(&self.overrides()?)?;
        Ok(table)
    }
}

// Testing ////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod config_tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_max_stack_flag() {
        assert_eq!(VmConfig::max_stack_from_flag(-1).unwrap(), None);
        assert_eq!(VmConfig::max_stack_from_flag(0).unwrap(), Some(0));
        assert_eq!(VmConfig::max_stack_from_flag(20).unwrap(), Some(20));
        assert!(matches!(
            VmConfig::max_stack_from_flag(-2),
            Err(Error::InvalidMaxSize(-2))
        ));
    }

    #[test]
    fn test_defaults() {
        let c = VmConfig::default();
        assert_eq!(c.max_stack, None);
        assert_eq!(c.instruction_size, 1);
        assert_eq!(c.debug, DebugMode::Off);
    }

    #[test]
    fn test_parse_overrides() {
        let config = ColorConfig::parse("[colors]\nSUM = \"123456\"\nWHILE = \"#f0a\"\n").unwrap();
        let table = config.table().unwrap();
        assert_eq!(table.resolve(Color::new(0x12, 0x34, 0x56)), Operation::Sum);
        assert_eq!(table.resolve(Color::new(0xff, 0x00, 0xaa)), Operation::While);
        let old = Color::new(0, 206, 209);
        assert_eq!(table.resolve(old), Operation::Accumulate(old));
    }

    #[test]
    fn test_empty_config() {
        let config = ColorConfig::parse("").unwrap();
        let table = config.table().unwrap();
        assert_eq!(table.resolve(Color::new(0, 206, 209)), Operation::Sum);
    }

    #[test]
    fn test_invalid_hex() {
        let config = ColorConfig::parse("[colors]\nSUM = \"12345\"\n").unwrap();
        assert!(matches!(config.table(), Err(Error::InvalidHex(_))));
    }

    #[test]
    fn test_unknown_operation() {
        let config = ColorConfig::parse("[colors]\nJUMP = \"123456\"\n").unwrap();
        assert!(matches!(config.table(), Err(Error::UnknownOperation(_))));
    }

    #[test]
    fn test_duplicate_color() {
        let config = ColorConfig::parse("[colors]\nSUM = \"000001\"\n").unwrap();
        assert!(matches!(config.table(), Err(Error::DuplicateColor { .. })));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            ColorConfig::parse("[colors\n"),
            Err(Error::ParseConfig(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("colors.toml");
        fs::write(&path, "[colors]\nQUIT = \"abc\"\n").unwrap();
        let table = ColorConfig::load(&path).unwrap().table().unwrap();
        assert_eq!(table.resolve(Color::new(0xaa, 0xbb, 0xcc)), Operation::Quit);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let res = ColorConfig::load(&dir.path().join("none.toml"));
        assert!(matches!(res, Err(Error::LoadConfig { .. })));
    }
}
