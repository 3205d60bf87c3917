//! Condition-coverage extraction from the coverage tool's XML report.
//!
//! The report is a hierarchical document containing zero or more
//! `<condition>` elements, each with a `coverage` attribute formatted as a
//! percentage string with a trailing `%`. The aggregate metric is the
//! arithmetic mean of every per-condition percentage.

use std::path::Path;

use mutbench_error::{MutbenchError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

/// Mean condition coverage over the whole report, in `[0, 100]`.
///
/// Zero condition entries is an error (the mean of an empty set is
/// undefined), never a silent 0 or NaN. A missing or malformed report
/// fails the same way.
pub fn condition_coverage(report_path: &Path) -> Result<f64> {
    let mut reader = Reader::from_file(report_path).map_err(|err| {
        MutbenchError::CoverageExtraction(format!(
            "cannot open coverage report {}: {err}",
            report_path.display()
        ))
    })?;

    let mut buf = Vec::new();
    let mut values: Vec<f64> = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                if element.name().as_ref() == b"condition" {
                    if let Some(value) = condition_value(&element)? {
                        values.push(value);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(MutbenchError::CoverageExtraction(format!(
                    "malformed coverage report {}: {err}",
                    report_path.display()
                )));
            }
        }
        buf.clear();
    }

    if values.is_empty() {
        return Err(MutbenchError::CoverageExtraction(format!(
            "no condition entries in {}",
            report_path.display()
        )));
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    debug!(
        report = %report_path.display(),
        conditions = values.len(),
        mean,
        "extracted condition coverage"
    );
    Ok(mean)
}

fn condition_value(element: &BytesStart<'_>) -> Result<Option<f64>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|err| {
            MutbenchError::CoverageExtraction(format!("bad condition attribute: {err}"))
        })?;
        if attr.key.as_ref() == b"coverage" {
            let raw = attr.unescape_value().map_err(|err| {
                MutbenchError::CoverageExtraction(format!("bad coverage attribute value: {err}"))
            })?;
            return parse_percentage(&raw).map(Some);
        }
    }
    Ok(None)
}

/// Strip the trailing `%` and parse as a float.
fn parse_percentage(text: &str) -> Result<f64> {
    let stripped = text.trim().strip_suffix('%').ok_or_else(|| {
        MutbenchError::CoverageExtraction(format!("coverage value '{text}' lacks a '%' suffix"))
    })?;
    stripped.parse::<f64>().map_err(|_| {
        MutbenchError::CoverageExtraction(format!("coverage value '{text}' is not a percentage"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_report(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{body}").expect("write report");
        file
    }

    #[test]
    fn mean_over_all_conditions() {
        let report = write_report(
            r#"<?xml version="1.0"?>
<coverage>
  <packages>
    <line number="10" hits="1">
      <conditions>
        <condition number="0" type="jump" coverage="50%"/>
        <condition number="1" type="jump" coverage="100%"/>
      </conditions>
    </line>
    <line number="20" hits="0">
      <conditions>
        <condition number="0" type="jump" coverage="0%"/>
      </conditions>
    </line>
  </packages>
</coverage>"#,
        );
        let mean = condition_coverage(report.path()).expect("extract");
        assert_eq!(mean, 50.0);
    }

    #[test]
    fn zero_conditions_is_an_error() {
        let report = write_report(r#"<coverage><packages/></coverage>"#);
        let err = condition_coverage(report.path()).expect_err("empty mean undefined");
        assert!(matches!(err, MutbenchError::CoverageExtraction(_)));
    }

    #[test]
    fn missing_report_is_an_error() {
        let err = condition_coverage(Path::new("/nonexistent/coverage.xml"))
            .expect_err("missing report");
        assert!(matches!(err, MutbenchError::CoverageExtraction(_)));
    }

    #[test]
    fn non_percentage_value_is_an_error() {
        let report = write_report(r#"<coverage><condition coverage="fifty"/></coverage>"#);
        let err = condition_coverage(report.path()).expect_err("bad value");
        assert!(matches!(err, MutbenchError::CoverageExtraction(_)));
    }

    #[test]
    fn fractional_percentages_parse() {
        let report = write_report(
            r#"<coverage><condition coverage="33.5%"/><condition coverage="66.5%"/></coverage>"#,
        );
        let mean = condition_coverage(report.path()).expect("extract");
        assert_eq!(mean, 50.0);
    }
}
