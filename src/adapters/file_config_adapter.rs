//! INI file configuration adapter.

use std::path::Path;

use configparser::ini::Ini;

use crate::ports::config_port::ConfigPort;

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
            .getboolcoerce(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[strategy]
symbol = SOL
currency = USD
target_value = 1000
total_buy_limit_perc = 200
single_buy_limit_perc = 0.10
min_transaction_span_hours = 96

[data]
source = binance
path = SOLUSDT.json
"#;

    #[test]
    fn from_string_reads_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("strategy", "symbol"),
            Some("SOL".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "source"),
            Some("binance".to_string())
        );
        assert_eq!(adapter.get_string("strategy", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "symbol"), None);
    }

    #[test]
    fn numeric_getters_parse_and_default() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("strategy", "min_transaction_span_hours", 0), 96);
        assert_eq!(adapter.get_int("strategy", "missing", 24), 24);
        assert_eq!(adapter.get_double("strategy", "target_value", 0.0), 1000.0);
        assert_eq!(
            adapter.get_double("strategy", "single_buy_limit_perc", 0.0),
            0.10
        );
        assert_eq!(adapter.get_double("strategy", "missing", 9.5), 9.5);
    }

    #[test]
    fn non_numeric_values_fall_back_to_default() {
        let adapter = FileConfigAdapter::from_string("[strategy]\ntarget_value = lots\n").unwrap();
        assert_eq!(adapter.get_double("strategy", "target_value", 7.0), 7.0);
        assert_eq!(adapter.get_int("strategy", "target_value", 7), 7);
    }

    #[test]
    fn bool_getter_coerces_common_forms() {
        let adapter =
            FileConfigAdapter::from_string("[data]\na = true\nb = no\nc = 1\n").unwrap();
        assert!(adapter.get_bool("data", "a", false));
        assert!(!adapter.get_bool("data", "b", true));
        assert!(adapter.get_bool("data", "c", false));
        assert!(adapter.get_bool("data", "missing", true));
    }

    #[test]
    fn from_file_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "path"),
            Some("SOLUSDT.json".to_string())
        );
    }

    #[test]
    fn from_file_missing_path_errors() {
        assert!(FileConfigAdapter::from_file("/nonexistent/dca.ini").is_err());
    }
}
