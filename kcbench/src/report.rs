//! csv reports, one file per method, one record per instance.

use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use kcenter::prelude::*;

/// file name of exact method results
pub const EXACT_REPORT: &str = "results_method1.csv";
/// file name of approximate method results
pub const APPROX_REPORT: &str = "results_method2.csv";

#[derive(Debug, Serialize)]
struct ReportRecord<'a> {
    #[serde(rename = "Instance")]
    instance: &'a str,
    #[serde(rename = "Time(ms)")]
    time_ms: u64,
    #[serde(rename = "Comparisons")]
    comparisons: u64,
    #[serde(rename = "Radius")]
    radius: f64,
    #[serde(rename = "Kind")]
    kind: &'static str,
}

/// writes MethodResult as csv records
pub struct ReportWriter {
    path: PathBuf,
    writer: csv::Writer<File>,
    nb_record: usize,
}

impl ReportWriter {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let writer = csv::Writer::from_path(path)
            .with_context(|| format!("cannot create report {:?}", path))?;
        Ok(ReportWriter {
            path: path.to_path_buf(),
            writer,
            nb_record: 0,
        })
    }

    /// appends a record and flushes so that a report is usable even if the run is interrupted
    pub fn write(&mut self, instance: &str, result: &MethodResult) -> anyhow::Result<()> {
        let record = ReportRecord {
            instance,
            time_ms: result.get_elapsed().as_millis() as u64,
            comparisons: result.get_comparisons(),
            radius: result.get_radius(),
            kind: result.get_kind().as_str(),
        };
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.nb_record += 1;
        Ok(())
    }

    pub fn get_nb_record(&self) -> usize {
        self.nb_record
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }
} // end of impl ReportWriter

/// The two reports of a run, created in a directory
pub struct Reports {
    exact: ReportWriter,
    approx: ReportWriter,
}

impl Reports {
    pub fn new(dir: &Path) -> anyhow::Result<Self> {
        let exact = ReportWriter::new(&dir.join(EXACT_REPORT))?;
        let approx = ReportWriter::new(&dir.join(APPROX_REPORT))?;
        Ok(Reports { exact, approx })
    }

    pub fn write(
        &mut self,
        instance: &str,
        exact: &MethodResult,
        approx: &MethodResult,
    ) -> anyhow::Result<()> {
        self.exact.write(instance, exact)?;
        self.approx.write(instance, approx)?;
        Ok(())
    }

    pub fn log(&self) {
        log::info!(
            "reports {:?} ({} records) and {:?} ({} records)",
            self.exact.get_path(),
            self.exact.get_nb_record(),
            self.approx.get_path(),
            self.approx.get_nb_record()
        );
    }
} // end of impl Reports

//=====================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use std::time::Duration;

    #[test]
    fn header_and_records() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let mut report = ReportWriter::new(&path).unwrap();
        let result = MethodResult::new(
            Duration::from_millis(12),
            345,
            1.5,
            SolutionKind::Proven,
            true,
            Some(vec![0, 2]),
        );
        report.write("pmed1.txt", &result).unwrap();
        assert_eq!(report.get_nb_record(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Instance,Time(ms),Comparisons,Radius,Kind");
        assert_eq!(lines[1], "pmed1.txt,12,345,1.5,proven");
    }
} // end of mod tests
