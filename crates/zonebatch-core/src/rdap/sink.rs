use std::io::{self, Write};

use super::events::Interval;
use super::fqdn::Fqdn;

/// Source label for intervals learned from RDAP.
pub const RDAP_SOURCE: &str = "rdap";

/// Receiver of registration intervals, keyed by name and data source.
pub trait IntervalSink {
    fn update_fqdn(&mut self, source: &str, fqdn: &Fqdn, interval: &Interval) -> io::Result<()>;
}

impl<S: IntervalSink + ?Sized> IntervalSink for &mut S {
    fn update_fqdn(&mut self, source: &str, fqdn: &Fqdn, interval: &Interval) -> io::Result<()> {
        (**self).update_fqdn(source, fqdn, interval)
    }
}

/// Collects updates in memory.
impl IntervalSink for Vec<(String, Fqdn, Interval)> {
    fn update_fqdn(&mut self, source: &str, fqdn: &Fqdn, interval: &Interval) -> io::Result<()> {
        self.push((source.to_string(), fqdn.clone(), *interval));
        Ok(())
    }
}

/// Writes one `<fqdn>#<source>#<start|->#<until|->` line per update.
#[derive(Debug)]
pub struct ReportWriter<W> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> IntervalSink for ReportWriter<W> {
    fn update_fqdn(&mut self, source: &str, fqdn: &Fqdn, interval: &Interval) -> io::Result<()> {
        let date = |d: Option<chrono::NaiveDate>| {
            d.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
        };
        writeln!(
            self.out,
            "{}#{}#{}#{}",
            fqdn,
            source,
            date(interval.start),
            date(interval.until)
        )?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn report_line_layout() {
        let mut report = ReportWriter::new(Vec::new());
        let fqdn: Fqdn = "example.com".parse().unwrap();
        let bounded = Interval {
            start: NaiveDate::from_ymd_opt(1995, 8, 14),
            until: NaiveDate::from_ymd_opt(2026, 8, 13),
        };
        report.update_fqdn(RDAP_SOURCE, &fqdn, &bounded).unwrap();
        report
            .update_fqdn(RDAP_SOURCE, &fqdn, &Interval::unbounded())
            .unwrap();
        let text = String::from_utf8(report.into_inner()).unwrap();
        assert_eq!(
            text,
            "example.com#rdap#1995-08-14#2026-08-13\nexample.com#rdap#-#-\n"
        );
    }
}
