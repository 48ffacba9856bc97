#![forbid(unsafe_code)]

//! Flap demo binary entry point.

mod cli;
mod render;
mod session;

use std::error::Error;
use std::io;
use std::process;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use flap_core::format::split_chars;
use flap_core::{
    ALPHANUM, Alphabet, BatchStagger, CellAnimator, CellConfig, CursorAnimator, FlapBoard,
    FormatOptions, Glyph, PlanAnimator,
};

use crate::cli::Opts;
use crate::render::CellFaces;
use crate::session::TerminalSession;

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    let opts = Opts::parse();

    if opts.log
        && let Err(e) = flap_core::logging::init_json_subscriber()
    {
        eprintln!("Failed to initialize logging: {e}");
    }

    let result = if opts.cursor {
        start::<CursorAnimator>(&opts)
    } else {
        start::<PlanAnimator>(&opts)
    };
    if let Err(e) = result {
        eprintln!("Runtime error: {e}");
        process::exit(1);
    }
}

/// Alphabet covering every value: the whole values in word mode, otherwise
/// the alphanumeric set extended with any other characters the values use.
fn board_alphabet(opts: &Opts) -> Result<Alphabet, flap_core::FlapError> {
    if opts.words {
        let mut words: Vec<&str> = Vec::new();
        for value in &opts.values {
            if !words.contains(&value.as_str()) {
                words.push(value);
            }
        }
        return Alphabet::from_words(words);
    }

    let mut glyphs: Vec<Glyph> = split_chars(ALPHANUM);
    for glyph in opts.values.iter().flat_map(|value| split_chars(value)) {
        if !glyphs.contains(&glyph) {
            glyphs.push(glyph);
        }
    }
    Alphabet::new(glyphs)
}

/// Value shown before the first one so that it flips in.
///
/// Character cells start blank. A word cell has no blank, so it starts on
/// the last word, one flip before the first value.
fn seed_value(opts: &Opts, alphabet: &Alphabet) -> String {
    if opts.words {
        alphabet
            .glyphs()
            .last()
            .map(ToString::to_string)
            .unwrap_or_default()
    } else {
        String::new()
    }
}

fn format_options(opts: &Opts) -> FormatOptions {
    FormatOptions::default().length(opts.length).words(opts.words)
}

fn start<A: CellAnimator + CellFaces>(opts: &Opts) -> Result<(), Box<dyn Error>> {
    let alphabet = board_alphabet(opts)?;
    tracing::info!(
        glyphs = alphabet.len(),
        values = opts.values.len(),
        cursor = opts.cursor,
        "starting flap demo"
    );
    let config = CellConfig::new(Duration::from_millis(opts.timing_ms));
    let board =
        FlapBoard::<A>::new(alphabet, config).with_policy(Box::new(BatchStagger::default()));
    run(opts, board)
}

fn run<A: CellAnimator + CellFaces>(
    opts: &Opts,
    mut board: FlapBoard<A>,
) -> Result<(), Box<dyn Error>> {
    let options = format_options(opts);
    let hold = Duration::from_millis(opts.hold_ms);
    let exit_after = (opts.exit_after_ms > 0).then(|| Duration::from_millis(opts.exit_after_ms));

    let seed = seed_value(opts, board.alphabet());
    board.set_value(&seed, &options)?;
    let mut index = 0;
    board.set_value(&opts.values[index], &options)?;

    let session = TerminalSession::enter()?;
    let mut stdout = io::stdout();
    let started = Instant::now();
    let mut last = started;
    let mut settled_at: Option<Instant> = None;

    loop {
        if session.stop_requested() || exit_after.is_some_and(|limit| started.elapsed() >= limit) {
            break;
        }

        let timeout = board.time_until_due().map_or(FRAME, |due| due.min(FRAME));
        let mut advance = false;
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char(' ') | KeyCode::Char('n') => advance = true,
                _ => {}
            }
        }

        let now = Instant::now();
        board.tick(now - last);
        last = now;

        for (cell, event) in board.drain_events() {
            tracing::debug!(cell, ?event, "cell event");
        }

        if board.is_resting() {
            let since = *settled_at.get_or_insert(now);
            advance |= now - since >= hold;
        } else {
            settled_at = None;
        }

        if advance && opts.values.len() > 1 {
            index = (index + 1) % opts.values.len();
            board.set_value(&opts.values[index], &options)?;
            settled_at = None;
        }

        let status = format!(
            "{}  [{}/{}]  space: next  q: quit",
            if board.is_resting() { "settled " } else { "flipping" },
            index + 1,
            opts.values.len()
        );
        render::draw(&mut stdout, &board, &status)?;
    }

    board.dispose();
    Ok(())
}
