use crate::config::RdapConfig;
use crate::task::{Exit, OutcomeError, Task};

use super::events::{interval_from_json, Interval};
use super::fqdn::Fqdn;

/// One `rdap --raw --type domain <fqdn>` invocation.
///
/// Succeeds when the name exists (exit 0) or when the client confirms it does
/// not (the configured exit code with the exact "does not exist" stderr).
#[derive(Debug, Clone)]
pub struct RdapTask {
    fqdn: Fqdn,
    program: Vec<String>,
    not_found_code: i32,
    not_found_stderr: String,
    found: Option<bool>,
    interval: Option<Interval>,
}

impl RdapTask {
    pub fn new(fqdn: Fqdn, cfg: &RdapConfig) -> Self {
        Self {
            fqdn,
            program: cfg.command.clone(),
            not_found_code: cfg.not_found_code,
            not_found_stderr: cfg.not_found_stderr.clone(),
            found: None,
            interval: None,
        }
    }

    /// `None` until the lookup finished successfully.
    pub fn found(&self) -> Option<bool> {
        self.found
    }

    pub fn interval(&self) -> Option<&Interval> {
        self.interval.as_ref()
    }

    fn is_not_found(&self, exit: &Exit) -> bool {
        exit.code == Some(self.not_found_code) && exit.stderr == self.not_found_stderr.as_bytes()
    }
}

impl Task for RdapTask {
    fn command(&self) -> Vec<String> {
        let mut command = self.program.clone();
        command.extend(
            ["--raw", "--type", "domain"]
                .iter()
                .map(|s| s.to_string()),
        );
        command.push(self.fqdn.to_string());
        command
    }

    fn verdict(&self, exit: &Exit) -> bool {
        exit.success() || self.is_not_found(exit)
    }

    fn outcome(&mut self, exit: &Exit) -> Result<(), OutcomeError> {
        if exit.success() {
            self.interval = Some(interval_from_json(&exit.stdout)?);
            self.found = Some(true);
        } else {
            self.interval = Some(Interval::unbounded());
            self.found = Some(false);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> RdapTask {
        RdapTask::new("example.com".parse().unwrap(), &RdapConfig::default())
    }

    fn exit(code: i32, stdout: &str, stderr: &str) -> Exit {
        Exit {
            code: Some(code),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn command_appends_query_to_program() {
        assert_eq!(
            task().command(),
            ["rdap", "--raw", "--type", "domain", "example.com"]
        );
    }

    #[test]
    fn not_found_needs_exact_stderr() {
        let t = task();
        let stderr = RdapConfig::default().not_found_stderr;
        assert!(t.verdict(&exit(0, "{}", "")));
        assert!(t.verdict(&exit(1, "", &stderr)));
        assert!(!t.verdict(&exit(1, "", "# Error: timeout\n")));
        assert!(!t.verdict(&exit(1, "", stderr.trim_end())));
        assert!(!t.verdict(&exit(2, "", &stderr)));
        assert!(!t.verdict(&Exit {
            code: None,
            stdout: Vec::new(),
            stderr: stderr.into_bytes(),
        }));
    }

    #[test]
    fn outcome_records_found_and_interval() {
        let mut t = task();
        assert_eq!(t.found(), None);
        t.outcome(&exit(
            0,
            r#"{"events": [{"eventAction": "registration", "eventDate": "2001-05-02T00:00:00Z"}]}"#,
            "",
        ))
        .unwrap();
        assert_eq!(t.found(), Some(true));
        assert_eq!(
            t.interval().and_then(|i| i.start).map(|d| d.to_string()),
            Some("2001-05-02".to_string())
        );

        let mut t = task();
        t.outcome(&exit(1, "", &RdapConfig::default().not_found_stderr))
            .unwrap();
        assert_eq!(t.found(), Some(false));
        assert!(t.interval().unwrap().is_unbounded());
    }
}
