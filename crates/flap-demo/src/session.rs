#![forbid(unsafe_code)]

//! Terminal session guard: raw mode plus alternate screen, restored on drop.
//!
//! On Unix, SIGINT and SIGTERM do not kill the process outright: they raise
//! a stop flag the main loop polls, so the guard still runs on the way out.
//!
//! # Failure Modes
//!
//! - A panic while the session is active still restores the terminal via a
//!   panic hook installed on first use.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// RAII guard for the demo's terminal state.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    stop: Arc<AtomicBool>,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode, switch to the alternate screen and hide the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses raw mode or the escape
    /// sequences cannot be written.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            alternate_screen_enabled: false,
            stop: Arc::new(AtomicBool::new(false)),
            #[cfg(unix)]
            signal_guard: None,
        };
        #[cfg(unix)]
        {
            session.signal_guard = Some(SignalGuard::new(Arc::clone(&session.stop))?);
        }
        crossterm::execute!(
            io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::cursor::Hide
        )?;
        session.alternate_screen_enabled = true;
        Ok(session)
    }

    /// Whether a termination signal asked the demo to stop.
    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();
        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(
                stdout,
                crossterm::cursor::Show,
                crossterm::terminal::LeaveAlternateScreen
            );
            self.alternate_screen_enabled = false;
        }
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
        tracing::info!("terminal restored");
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new(stop: Arc<AtomicBool>) -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                tracing::warn!(signal, "termination signal received");
                stop.store(true, Ordering::Relaxed);
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
