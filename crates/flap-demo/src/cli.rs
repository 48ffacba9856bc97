#![forbid(unsafe_code)]

//! Command-line argument parsing for the flap demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `FLAP_DEMO_*` prefix.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Flap Demo: a split-flap board in your terminal

USAGE:
    flap-demo [OPTIONS] [VALUES...]

Each value is shown in turn, cycling forever. Without values a departure
board style sequence is used.

OPTIONS:
    --words              Show each value as one word cell
    --cursor             Drive cells with the cursor animator
    --length=N           Cell count; values are padded or cut (default: 12)
    --timing=MS          Milliseconds per flip (default: 30)
    --hold-ms=N          Time each value stays up once settled (default: 2000)
    --exit-after-ms=N    Quit after N milliseconds (0 = never)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Space / n       Next value now
    q / Esc         Quit

ENVIRONMENT VARIABLES:
    FLAP_DEMO_LENGTH          Override --length
    FLAP_DEMO_TIMING          Override --timing
    FLAP_DEMO_HOLD_MS         Override --hold-ms
    FLAP_DEMO_EXIT_AFTER_MS   Override --exit-after-ms
    FLAP_DEMO_LOG             Write JSON logs to stderr when set (filter: RUST_LOG)";

const DEFAULT_VALUES: [&str; 4] = ["LONDON 0915", "PARIS 1040", "BERLIN 1125", "ROMA 1300"];

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Values to cycle through.
    pub values: Vec<String>,
    /// Word mode: one cell showing whole values.
    pub words: bool,
    /// Use the cursor animator instead of the plan animator.
    pub cursor: bool,
    /// Cell count in character mode.
    pub length: usize,
    /// Milliseconds per flip.
    pub timing_ms: u64,
    /// Milliseconds a settled value stays up.
    pub hold_ms: u64,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
    /// Emit JSON logs on stderr.
    pub log: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            values: DEFAULT_VALUES.iter().map(|v| (*v).to_string()).collect(),
            words: false,
            cursor: false,
            length: 12,
            timing_ms: 30,
            hold_ms: 2000,
            exit_after_ms: 0,
            log: false,
        }
    }
}

/// What the caller should do after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Run the demo.
    Run(Opts),
    /// Print help and exit.
    Help,
    /// Print the version and exit.
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags. Exits the process for `--help`,
    /// `--version` and invalid arguments.
    pub fn parse() -> Self {
        let mut opts = Self::default();
        opts.apply_env(|key| env::var(key).ok());

        let args: Vec<String> = env::args().skip(1).collect();
        match opts.apply_args(&args) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("flap-demo {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Apply `FLAP_DEMO_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("FLAP_DEMO_LENGTH")
            && let Ok(n) = val.parse()
        {
            self.length = n;
        }
        if let Some(val) = lookup("FLAP_DEMO_TIMING")
            && let Ok(n) = val.parse()
        {
            self.timing_ms = n;
        }
        if let Some(val) = lookup("FLAP_DEMO_HOLD_MS")
            && let Ok(n) = val.parse()
        {
            self.hold_ms = n;
        }
        if let Some(val) = lookup("FLAP_DEMO_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            self.exit_after_ms = n;
        }
        if lookup("FLAP_DEMO_LOG").is_some_and(|val| !val.is_empty() && val != "0") {
            self.log = true;
        }
    }

    /// Apply command-line flags on top of the current options.
    ///
    /// # Errors
    ///
    /// Returns a message for unknown flags and unparsable values.
    pub fn apply_args(mut self, args: &[String]) -> Result<Parsed, String> {
        let mut values = Vec::new();
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--words" => self.words = true,
                "--cursor" => self.cursor = true,
                other => {
                    if let Some(val) = other.strip_prefix("--length=") {
                        self.length = parse_number("--length", val)?;
                    } else if let Some(val) = other.strip_prefix("--timing=") {
                        self.timing_ms = parse_number("--timing", val)?;
                    } else if let Some(val) = other.strip_prefix("--hold-ms=") {
                        self.hold_ms = parse_number("--hold-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        self.exit_after_ms = parse_number("--exit-after-ms", val)?;
                    } else if other.starts_with("--") {
                        return Err(format!("Unknown argument: {other}"));
                    } else {
                        values.push(other.to_string());
                    }
                }
            }
        }

        if !values.is_empty() {
            self.values = values;
        }
        if self.timing_ms == 0 {
            return Err("--timing must be greater than zero".into());
        }
        Ok(Parsed::Run(self))
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid {flag} value: {val}"))
}
