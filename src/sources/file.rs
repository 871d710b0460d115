//! [`MetricSource`] that reads a small text file, typically under `/sys`.

use super::extract::Parser;
use crate::metric::{MetricError, MetricValue};
use crate::traits::MetricSource;
use std::path::{Path, PathBuf};

/// Default battery capacity file.
pub const BATTERY_CAPACITY: &str = "/sys/class/power_supply/BAT0/capacity";

/// Reads `path` on every refresh and parses its contents.
#[derive(Debug, Clone)]
pub struct FileMetric {
    path: PathBuf,
    parser: Parser,
}

impl FileMetric {
    pub fn new(path: impl AsRef<Path>, parser: Parser) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            parser,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MetricSource for FileMetric {
    fn read(&mut self) -> Result<MetricValue, MetricError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| MetricError::Io {
            target: self.path.display().to_string(),
            source: e,
        })?;
        self.parser.parse(&contents)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::tmp_path;

    #[test]
    fn reads_capacity() {
        let path = tmp_path("capacity");
        std::fs::write(&path, "87\n").unwrap();
        let mut src = FileMetric::new(&path, Parser::default());
        assert_eq!(src.read().unwrap(), MetricValue::Number(87.0));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut src = FileMetric::new(tmp_path("absent"), Parser::default());
        assert!(matches!(src.read().unwrap_err(), MetricError::Io { .. }));
    }

    #[test]
    fn garbage_is_unexpected_shape() {
        let path = tmp_path("garbage");
        std::fs::write(&path, "Full\n").unwrap();
        let mut src = FileMetric::new(&path, Parser::default());
        assert!(matches!(
            src.read().unwrap_err(),
            MetricError::UnexpectedOutputShape(_)
        ));
        let _ = std::fs::remove_file(&path);
    }
}
