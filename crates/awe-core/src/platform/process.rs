use crate::{Error, Result};
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Starting and signalling processes on behalf of the user.
pub trait ProcessControl: Send {
    /// Start `program` fully detached and return without waiting for it.
    fn start_detached(&self, program: &str, args: &[String]) -> Result<()>;

    /// Ask process `pid` to terminate.
    fn terminate(&self, pid: i32) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct SystemProcesses;

impl ProcessControl for SystemProcesses {
    fn start_detached(&self, program: &str, args: &[String]) -> Result<()> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // SAFETY: setsid is async-signal-safe and only detaches the child from
        // our session so it survives the launcher exiting.
        unsafe {
            command.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }

        let mut child = command.spawn().map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;
        debug!("Started {} (pid {})", program, child.id());

        // Reap in the background so a resident launcher leaves no zombies
        std::thread::spawn(move || {
            if let Err(e) = child.wait() {
                warn!("Failed to reap child process: {e}");
            }
        });

        Ok(())
    }

    fn terminate(&self, pid: i32) -> Result<()> {
        if pid <= 0 {
            return Err(Error::InvalidPid(pid.to_string()));
        }

        // SAFETY: kill has no memory-safety preconditions; pid is positive so
        // it never addresses a process group.
        let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
        if rc == -1 {
            return Err(std::io::Error::last_os_error().into());
        }
        debug!("Sent SIGTERM to {pid}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_missing_program_fails() {
        let result = SystemProcesses.start_detached("/nonexistent/awe-test-binary", &[]);
        assert!(matches!(result, Err(Error::Spawn { .. })));
    }

    #[test]
    fn test_start_and_terminate_child() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let pid = i32::try_from(child.id()).unwrap();

        SystemProcesses.terminate(pid).unwrap();
        let status = child.wait().unwrap();
        assert!(!status.success());
    }

    #[test]
    fn test_terminate_rejects_non_positive_pid() {
        assert!(matches!(
            SystemProcesses.terminate(0),
            Err(Error::InvalidPid(_))
        ));
        assert!(SystemProcesses.terminate(-1).is_err());
    }

    #[test]
    fn test_start_detached_true() {
        SystemProcesses.start_detached("true", &[]).unwrap();
    }
}
