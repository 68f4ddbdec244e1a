//! INI file configuration adapter.
//!
//! Sections read by the analyzer: `[analysis]`, `[filter]` and `[report]`.
//! Keys are case-insensitive; values keep their case.

use crate::domain::error::FlowcrossError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FlowcrossError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| FlowcrossError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, FlowcrossError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| FlowcrossError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
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
[analysis]
data_dir = /data/krx
start_date = 2024-01-01
end_date = 2024-12-31
tickers = 005930,000660

[filter]
turnover_min = 10
turnover_max = 1000
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("analysis", "data_dir"),
            Some("/data/krx".to_string())
        );
        assert_eq!(
            adapter.get_string("analysis", "tickers"),
            Some("005930,000660".to_string())
        );
        assert_eq!(
            adapter.get_string("filter", "turnover_max"),
            Some("1000".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nverify_days = 3\n").unwrap();
        assert_eq!(adapter.get_string("analysis", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn blank_value_is_empty_string() {
        let adapter =
            FileConfigAdapter::from_string("[filter]\nmarket_cap_min =\nturnover_min = 10\n")
                .unwrap();
        assert!(
            adapter
                .get_string("filter", "market_cap_min")
                .is_none_or(|v| v.trim().is_empty())
        );
        assert_eq!(
            adapter.get_string("filter", "turnover_min"),
            Some("10".to_string())
        );
    }

    #[test]
    fn get_bool_values() {
        let adapter = FileConfigAdapter::from_string(
            "[filter]\na = true\nb = yes\nc = 1\nd = off\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("filter", "a", false));
        assert!(adapter.get_bool("filter", "b", false));
        assert!(adapter.get_bool("filter", "c", false));
        assert!(!adapter.get_bool("filter", "d", true));
        assert!(!adapter.get_bool("filter", "e", true));
        assert!(!adapter.get_bool("filter", "f", true));
        assert!(adapter.get_bool("filter", "g", true));
        assert!(!adapter.get_bool("filter", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[report]\noutput = /tmp/flowcross.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("report", "output"),
            Some("/tmp/flowcross.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(FlowcrossError::ConfigParse { .. })));
    }
}
