use crate::lang::CmdLine;

use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::{self, Pid};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time;
use tracing::{debug, warn};

/// Result of racing one subprocess against the wall clock.
#[derive(Debug)]
pub enum RunOutcome {
    /// the process finished first
    Completed {
        success: bool,
        /// captured stdout followed by stderr
        output: String,
        time_ms: u64,
    },
    /// the clock won; the process group has been killed
    TimedOut,
}

/// Spawns `cmd`, feeds it `stdin`, and waits at most `limit` for it to
/// finish. A process that outlives the limit is killed together with its
/// process group, so nothing it spawned survives the invocation.
pub async fn run(cmd: &CmdLine, stdin: &str, limit: Duration) -> io::Result<RunOutcome> {
    debug!(bin = %cmd.bin.display(), "spawning");

    let mut command = Command::new(&cmd.bin);
    command
        .args(&cmd.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // each case runs in its own process group so a timeout can take down
    // whatever the submission forked
    unsafe {
        command.pre_exec(|| {
            unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err))
        });
    }

    let mut child = command.spawn()?;
    let pid = child.id();

    // fed from a task so a submission that never reads cannot stall the
    // race below; a broken pipe is the submission's own verdict, not ours
    if let Some(mut pipe) = child.stdin.take() {
        let input = stdin.to_owned();
        tokio::spawn(async move {
            let _ = pipe.write_all(input.as_bytes()).await;
            let _ = pipe.shutdown().await;
        });
    }

    let started = Instant::now();
    match time::timeout(limit, child.wait_with_output()).await {
        Ok(output) => {
            let output = output?;
            let time_ms = started.elapsed().as_millis() as u64;

            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            if !output.stderr.is_empty() {
                text.push_str(&String::from_utf8_lossy(&output.stderr));
            }

            Ok(RunOutcome::Completed {
                success: output.status.success(),
                output: text,
                time_ms,
            })
        }
        Err(_) => {
            kill_group(pid);
            Ok(RunOutcome::TimedOut)
        }
    }
}

fn kill_group(pid: Option<u32>) {
    let pid = match pid {
        Some(pid) => pid,
        None => return,
    };
    // negative pid addresses the whole process group
    match signal::kill(Pid::from_raw(-(pid as i32)), Signal::SIGKILL) {
        Ok(()) => debug!(pid, "killed timed out process group"),
        // the group died between the timeout and the signal
        Err(nix::Error::Sys(Errno::ESRCH)) => {}
        Err(err) => warn!(%err, pid, "failed to kill process group"),
    }
}
