use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub site: Option<String>,
    pub event: String,
    pub details: Option<String>,
}

/// Append-only operation log under `~/.sitewatch/activity.log`.
pub struct ActivityLogger {
    log_path: PathBuf,
}

impl ActivityLogger {
    pub fn new() -> crate::Result<Self> {
        let user_dirs = directories::UserDirs::new().ok_or_else(|| {
            crate::error::MonitorError::Storage("could not determine home directory".into())
        })?;
        let home = user_dirs.home_dir();
        let dir = home.join(".sitewatch");
        fs::create_dir_all(&dir)?;

        Ok(Self {
            log_path: dir.join("activity.log"),
        })
    }

    #[cfg(test)]
    fn at(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn log(
        &self,
        level: LogLevel,
        site: Option<&str>,
        event: &str,
        details: Option<&str>,
    ) -> crate::Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            site: site.map(|s| s.to_string()),
            event: event.to_string(),
            details: details.map(|d| d.to_string()),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        let level_str = match entry.level {
            LogLevel::Info => "🟢",
            LogLevel::Error => "🔴",
        };

        let site_str = entry.site.as_deref().unwrap_or("*");
        let details_str = entry.details.as_deref().unwrap_or("");

        writeln!(
            file,
            "{} {} {} {} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            level_str,
            entry.event,
            site_str,
            details_str
        )?;

        Ok(())
    }

    pub fn read_logs(
        &self,
        site_filter: Option<&str>,
        errors_only: bool,
    ) -> crate::Result<Vec<String>> {
        if !self.log_path.exists() {
            return Ok(vec![]);
        }

        let file = std::fs::File::open(&self.log_path)?;
        let reader = BufReader::new(file);
        let mut matching_lines = Vec::new();

        for line in reader.lines() {
            let line = line?;

            if errors_only && !line.contains("🔴") {
                continue;
            }

            if let Some(site) = site_filter {
                if !line.contains(site) {
                    continue;
                }
            }

            matching_lines.push(line);
        }

        // Most recent entries first
        matching_lines.reverse();
        Ok(matching_lines)
    }

    pub fn info(&self, site: Option<&str>, event: &str, details: Option<&str>) -> crate::Result<()> {
        self.log(LogLevel::Info, site, event, details)
    }

    pub fn error(
        &self,
        site: Option<&str>,
        event: &str,
        details: Option<&str>,
    ) -> crate::Result<()> {
        self.log(LogLevel::Error, site, event, details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sitewatch-log-{tag}-{}-{}.log",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    #[test]
    fn entries_come_back_newest_first() {
        let path = temp_log("order");
        let logger = ActivityLogger::at(path.clone());
        logger.info(Some("a.example"), "check", None).unwrap();
        logger.info(Some("b.example"), "check", None).unwrap();

        let lines = logger.read_logs(None, false).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("b.example"));
        assert!(lines[1].contains("a.example"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn errors_only_filters_info_lines() {
        let path = temp_log("errors");
        let logger = ActivityLogger::at(path.clone());
        logger.info(Some("a.example"), "check", None).unwrap();
        logger
            .error(Some("a.example"), "check", Some("boom"))
            .unwrap();

        let lines = logger.read_logs(None, true).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("🔴"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn site_filter_matches_substring() {
        let path = temp_log("filter");
        let logger = ActivityLogger::at(path.clone());
        logger.info(Some("alpha.example"), "check", None).unwrap();
        logger.info(Some("beta.example"), "check", None).unwrap();

        let lines = logger.read_logs(Some("alpha"), false).unwrap();
        assert_eq!(lines.len(), 1);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_reads_empty() {
        let logger = ActivityLogger::at(temp_log("missing"));
        assert!(logger.read_logs(None, false).unwrap().is_empty());
    }
}
