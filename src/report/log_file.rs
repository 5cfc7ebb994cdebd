use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{Report, ResultGroup, SessionInfo};
use crate::error::SinkError;

const RULE: &str = "--------------------------------------------";
const COMPLETE: &str = "----------------- Test Complete -----------------";

/// The plain-text report file of one session.
///
/// Creating it truncates any report written earlier the same day and writes the header,
/// so an unwritable log directory is detected before probes run.
pub struct LogFile {
    path: PathBuf,
}

/// `<dir>/LogFile-<YYYY-MM-DD>.txt` for the day the session started.
pub fn log_file_path(dir: &Path, info: &SessionInfo) -> PathBuf {
    dir.join(format!(
        "LogFile-{}.txt",
        info.started_at.format("%Y-%m-%d")
    ))
}

fn write_header(out: &mut impl Write, info: &SessionInfo) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "-- Environment Testing Tool {}", info.version)?;
    writeln!(
        out,
        "-- Test Date: {}",
        info.started_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "{RULE}")?;
    writeln!(out)
}

fn write_group(out: &mut impl Write, group: &ResultGroup) -> io::Result<()> {
    writeln!(out, "---------------- {} ----------------", group.title)?;
    writeln!(out)?;
    for result in &group.results {
        writeln!(out, "{}, {}, {}", result.status, result.title, result.details)?;
    }
    writeln!(out)
}

impl LogFile {
    pub fn create(dir: &Path, info: &SessionInfo) -> Result<Self, SinkError> {
        fs::create_dir_all(dir).map_err(|source| SinkError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = log_file_path(dir, info);
        let log_file = LogFile { path };
        log_file.write_with(File::create(&log_file.path), |out| {
            write_header(out, info)
        })?;

        tracing::debug!("Report header written to {}", log_file.path.display());
        Ok(log_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append every group of the report followed by the closing line.
    pub fn write_report(&self, report: &Report) -> Result<(), SinkError> {
        let file = OpenOptions::new().append(true).open(&self.path);
        self.write_with(file, |out| {
            for group in &report.groups {
                write_group(out, group)?;
            }
            writeln!(out, "{COMPLETE}")
        })
    }

    fn write_with(
        &self,
        file: io::Result<File>,
        body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    ) -> Result<(), SinkError> {
        let to_sink_error = |source| SinkError::Write {
            path: self.path.clone(),
            source,
        };

        let mut out = BufWriter::new(file.map_err(to_sink_error)?);
        body(&mut out).map_err(to_sink_error)?;
        out.flush().map_err(to_sink_error)
    }
}
