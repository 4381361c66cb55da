//! Launching external processes and observing their completion.
//!
//! Output is captured into anonymous temp files rather than pipes, so a child
//! writing more than a pipe buffer never stalls while the manager is busy
//! polling other tasks.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::process::{Child, Command, Stdio};

use super::Exit;

/// A launched process.
pub trait Running {
    /// Non-blocking check. Returns the captured exit once the process has ended.
    fn poll(&mut self) -> io::Result<Option<Exit>>;
}

/// Starts processes for the scheduler.
pub trait Launcher {
    /// Start `command` (program followed by arguments) without waiting for it.
    fn launch(&mut self, command: &[String]) -> io::Result<Box<dyn Running>>;
}

impl<L: Launcher + ?Sized> Launcher for &mut L {
    fn launch(&mut self, command: &[String]) -> io::Result<Box<dyn Running>> {
        (**self).launch(command)
    }
}

/// Launches real OS processes via `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, command: &[String]) -> io::Result<Box<dyn Running>> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty command"))?;
        let stdout = tempfile::tempfile()?;
        let stderr = tempfile::tempfile()?;
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout.try_clone()?))
            .stderr(Stdio::from(stderr.try_clone()?))
            .spawn()?;
        tracing::debug!(pid = child.id(), program = %program, "spawned");
        Ok(Box::new(ChildProcess {
            child,
            stdout,
            stderr,
        }))
    }
}

struct ChildProcess {
    child: Child,
    stdout: File,
    stderr: File,
}

impl Running for ChildProcess {
    fn poll(&mut self) -> io::Result<Option<Exit>> {
        let Some(status) = self.child.try_wait()? else {
            return Ok(None);
        };
        Ok(Some(Exit {
            code: status.code(),
            stdout: read_back(&mut self.stdout)?,
            stderr: read_back(&mut self.stderr)?,
        }))
    }
}

fn read_back(file: &mut File) -> io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait(mut running: Box<dyn Running>) -> Exit {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(exit) = running.poll().unwrap() {
                return exit;
            }
            assert!(Instant::now() < deadline, "process did not finish");
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn captures_code_and_both_streams() {
        let mut launcher = ProcessLauncher;
        let exit = wait(launcher.launch(&sh("printf out; printf err >&2; exit 3")).unwrap());
        assert_eq!(exit.code, Some(3));
        assert_eq!(exit.stdout, b"out");
        assert_eq!(exit.stderr, b"err");
    }

    #[test]
    fn output_larger_than_a_pipe_buffer_is_captured() {
        let mut launcher = ProcessLauncher;
        let exit = wait(
            launcher
                .launch(&sh("head -c 300000 /dev/zero"))
                .unwrap(),
        );
        assert!(exit.success());
        assert_eq!(exit.stdout.len(), 300_000);
    }

    #[test]
    fn non_utf8_output_is_kept_verbatim() {
        let mut launcher = ProcessLauncher;
        let exit = wait(launcher.launch(&sh("printf '\\377\\376'")).unwrap());
        assert_eq!(exit.stdout, vec![0xff, 0xfe]);
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut launcher = ProcessLauncher;
        let err = launcher.launch(&[]).err().expect("empty command must fail");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn missing_program_fails_to_launch() {
        let mut launcher = ProcessLauncher;
        assert!(launcher
            .launch(&["zonebatch-no-such-program-xyz".to_string()])
            .is_err());
    }
}
