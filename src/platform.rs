use anyhow::Result;
use crossbeam_channel::Sender;
use std::io::{self, Write};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

// Cross-platform signal handling
#[cfg(unix)]
use signal_hook::{consts::SIGINT, consts::SIGPIPE, consts::SIGTERM, iterator::Signals};

#[cfg(windows)]
use signal_hook::{consts::SIGINT, flag};

/// Standard Unix exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
    SignalInt = 130,  // 128 + SIGINT (2)
    SignalPipe = 141, // 128 + SIGPIPE (13)
    SignalTerm = 143, // 128 + SIGTERM (15)
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }

    /// Exit code for a run that a signal cut short
    pub fn for_interrupted_run() -> Self {
        if TERMINATED_BY_SIGTERM.load(Ordering::Relaxed) {
            ExitCode::SignalTerm
        } else {
            ExitCode::SignalInt
        }
    }
}

static TERMINATED_BY_SIGTERM: AtomicBool = AtomicBool::new(false);

/// Control messages broadcast by the signal handler to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ctrl {
    Shutdown,
}

/// Forward one SIGINT/SIGTERM to the pipeline. Returns true once the user has
/// asked twice, at which point the caller should exit without waiting.
fn request_shutdown(ctrl_sender: &Sender<Ctrl>, shutdown_count: &mut u32) -> bool {
    *shutdown_count += 1;
    let _ = ctrl_sender.send(Ctrl::Shutdown);
    *shutdown_count > 1
}

/// Signal handler for graceful shutdown
pub struct SignalHandler {
    _handle: thread::JoinHandle<()>,
}

impl SignalHandler {
    /// Initialize signal handling - cross-platform.
    ///
    /// The first SIGINT/SIGTERM asks the pipeline to stop reading; a second one
    /// exits the process immediately.
    pub fn new(ctrl_sender: Sender<Ctrl>) -> Result<Self> {
        #[cfg(unix)]
        {
            let mut signals = Signals::new([SIGINT, SIGPIPE, SIGTERM])?;

            let handle = thread::spawn(move || {
                let mut shutdown_count = 0;
                for sig in signals.forever() {
                    match sig {
                        SIGINT | SIGTERM => {
                            if sig == SIGTERM {
                                TERMINATED_BY_SIGTERM.store(true, Ordering::Relaxed);
                                tracing::warn!("received SIGTERM, shutting down gracefully");
                            }
                            if request_shutdown(&ctrl_sender, &mut shutdown_count) {
                                ExitCode::for_interrupted_run().exit();
                            }
                        }
                        SIGPIPE => {
                            // Broken pipe - exit quietly (normal for Unix pipes)
                            ExitCode::SignalPipe.exit();
                        }
                        _ => {
                            tracing::warn!(signal = sig, "received unexpected signal");
                        }
                    }
                }
            });

            Ok(SignalHandler { _handle: handle })
        }

        #[cfg(windows)]
        {
            // Windows signal handling using flag-based approach
            let term_flag = std::sync::Arc::new(AtomicBool::new(false));
            flag::register(SIGINT, std::sync::Arc::clone(&term_flag))?;

            let handle = thread::spawn(move || {
                let mut shutdown_count = 0;
                loop {
                    thread::sleep(std::time::Duration::from_millis(100));
                    if term_flag.swap(false, Ordering::Relaxed)
                        && request_shutdown(&ctrl_sender, &mut shutdown_count)
                    {
                        ExitCode::SignalInt.exit();
                    }
                }
            });

            Ok(SignalHandler { _handle: handle })
        }
    }
}

/// Safe wrapper for writing to stdout that handles broken pipes and other I/O errors
pub struct SafeStdout {
    stdout: io::Stdout,
}

impl Default for SafeStdout {
    fn default() -> Self {
        Self::new()
    }
}

impl SafeStdout {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
        }
    }

    /// Write text to stdout, handling broken pipes gracefully (cross-platform)
    pub fn write_all(&mut self, data: &str) -> Result<()> {
        match self
            .stdout
            .write_all(data.as_bytes())
            .and_then(|_| self.stdout.flush())
        {
            Ok(()) => Ok(()),
            Err(e) if is_broken_pipe(&e) => {
                // Broken pipe is normal in pipelines - exit quietly
                ExitCode::SignalPipe.exit();
            }
            Err(e) => Err(anyhow::anyhow!("Failed to write to stdout: {}", e)),
        }
    }
}

/// Cross-platform broken pipe detection
fn is_broken_pipe(e: &io::Error) -> bool {
    #[cfg(unix)]
    {
        e.kind() == io::ErrorKind::BrokenPipe
    }
    #[cfg(windows)]
    {
        // On Windows, broken pipe manifests as different error codes
        e.kind() == io::ErrorKind::BrokenPipe
            || e.raw_os_error() == Some(232) // ERROR_NO_DATA "The pipe is being closed"
            || e.raw_os_error() == Some(109) // ERROR_BROKEN_PIPE "The pipe has been ended"
    }
}
