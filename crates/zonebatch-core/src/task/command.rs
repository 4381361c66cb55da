//! Plain command task: run an argument list, succeed on exit code 0.

use super::Task;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTask {
    argv: Vec<String>,
}

impl CommandTask {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a shell-style command line. `None` for unbalanced quotes or an
    /// empty line.
    pub fn parse(line: &str) -> Option<Self> {
        let argv = shlex::split(line)?;
        if argv.is_empty() {
            return None;
        }
        Some(Self { argv })
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl Task for CommandTask {
    fn command(&self) -> Vec<String> {
        self.argv.clone()
    }
}
