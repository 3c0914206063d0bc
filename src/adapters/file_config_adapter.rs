//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[universe]
csv_path = data/EQUITY_L.csv
suffix = .NS

[data]
source = csv
lookback_bars = 260

[strategy]
volume_multiple = 2.5
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("universe", "csv_path"),
            Some("data/EQUITY_L.csv".to_string())
        );
        assert_eq!(adapter.get_string("universe", "suffix"), Some(".NS".to_string()));
        assert_eq!(adapter.get_int("data", "lookback_bars", 0), 260);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nsource = csv\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[data]\nattempts = abc\n").unwrap();
        assert_eq!(adapter.get_int("data", "attempts", 2), 2);
        assert_eq!(adapter.get_int("data", "delay_ms", 500), 500);
    }

    #[test]
    fn get_usize_clamps_negative_to_zero() {
        let adapter = FileConfigAdapter::from_string("[strategy]\nvolume_period = -5\n").unwrap();
        assert_eq!(adapter.get_usize("strategy", "volume_period", 20), 0);
        assert_eq!(adapter.get_usize("strategy", "swing_high_period", 30), 30);
    }

    #[test]
    fn get_double_returns_value() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nstop_loss_factor = 0.93\n").unwrap();
        assert_eq!(adapter.get_double("strategy", "stop_loss_factor", 0.0), 0.93);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\ntarget_factor = lots\n").unwrap();
        assert_eq!(adapter.get_double("strategy", "target_factor", 1.1), 1.1);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[flags]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("flags", "a", false));
        assert!(adapter.get_bool("flags", "b", false));
        assert!(adapter.get_bool("flags", "c", false));
        assert!(!adapter.get_bool("flags", "d", true));
        assert!(!adapter.get_bool("flags", "e", true));
        assert!(!adapter.get_bool("flags", "f", true));
        assert!(adapter.get_bool("flags", "g", true));
        assert!(!adapter.get_bool("flags", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[ledger]\npath = state/portfolio.json\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("ledger", "path"),
            Some("state/portfolio.json".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
