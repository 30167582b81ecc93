//! Subcommand implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use show_bingo::board_renderer::render_board_to_png;
use show_bingo::card::GRID_SIZE;
use show_bingo::{
    BingoError, CELL_COUNT, JsonShowStore, PlaySession, RandomSource, RegenerateDecision, RenderModel,
    RngSource, ShowSource,
};
use tracing::{info, warn};

use crate::cli::{CardArgs, PlayArgs, StoreArgs};

const HELP: &str = "\
Commands:
  <n> | toggle <n>   mark or unmark cell n (1-25)
  new                deal a new card
  reset              clear marks, keep the card
  png <path>         save the current card as PNG
  help               show this help
  quit               leave the game";

/// Extra guidance printed after an error, if the player can fix it.
pub fn failure_hint(error: &anyhow::Error) -> Option<String> {
    let err = error
        .downcast_ref::<BingoError>()
        .and_then(BingoError::insufficient_phrases)?;
    Some(format!(
        "This show has {} usable phrases but a card needs {}. Add more phrases to the show and try again.",
        err.actual, err.required
    ))
}

fn load_store(path: &Path) -> Result<JsonShowStore> {
    JsonShowStore::from_path(path)
        .with_context(|| format!("failed to load show store {}", path.display()))
}

pub fn run_shows(args: &StoreArgs) -> Result<()> {
    let store = load_store(&args.store)?;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Phrases", "Center square"]);
    for show in store.list() {
        table.add_row(vec![
            show.id.clone(),
            show.display_title().to_string(),
            show.phrase_pool().len().to_string(),
            show.center_label().unwrap_or("-").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_card(args: &CardArgs) -> Result<()> {
    let store = load_store(&args.store.store)?;
    let show = store.show(&args.show_id)?;
    let mut session = PlaySession::for_show(&show, RngSource::from_optional_seed(args.seed));
    session.start()?;
    if let Some(model) = session.render() {
        render_board_to_png(&model, &args.output)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        println!("Bingo card written to {}", args.output.display());
    }
    Ok(())
}

pub fn run_play(args: &PlayArgs) -> Result<()> {
    let store = load_store(&args.store.store)?;
    let show = store.show(&args.show_id)?;
    info!(show = %show.id, "starting play session");
    let mut session = PlaySession::for_show(&show, RngSource::from_optional_seed(args.seed));
    session.start()?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    play_loop(&mut session, &mut input, &mut output)
}

/// Read commands until `quit` or end of input, printing the card after
/// every change.
pub fn play_loop<S: RandomSource>(
    session: &mut PlaySession<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    print_card(session, out)?;
    writeln!(out, "{HELP}")?;

    while let Some(line) = read_line(input)? {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else { continue };
        match command {
            "quit" | "exit" | "q" => break,
            "help" | "?" => writeln!(out, "{HELP}")?,
            "reset" => {
                session.reset_marks_only()?;
                print_card(session, out)?;
            }
            "new" => {
                if regenerate(session, input, out)? {
                    print_card(session, out)?;
                }
            }
            "png" => match words.next() {
                Some(path) => {
                    if let Some(model) = session.render() {
                        match render_board_to_png(&model, path) {
                            Ok(()) => writeln!(out, "Saved {path}")?,
                            Err(err) => {
                                warn!(%path, %err, "png save failed");
                                writeln!(out, "could not save {path}: {err}")?;
                            }
                        }
                    }
                }
                None => writeln!(out, "usage: png <path>")?,
            },
            "toggle" | "t" => toggle(session, words.next().unwrap_or(""), out)?,
            other => toggle(session, other, out)?,
        }
    }
    Ok(())
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    match input.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}

fn toggle<S: RandomSource>(
    session: &mut PlaySession<S>,
    arg: &str,
    out: &mut impl Write,
) -> Result<()> {
    let index = arg
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|&i| i < CELL_COUNT);
    let Some(index) = index else {
        writeln!(out, "unknown command or cell {arg:?}; type help")?;
        return Ok(());
    };
    let wins = session.toggle(index)?;
    print_card(session, out)?;
    if wins.has_won() {
        let lines: Vec<String> = wins.lines().map(|l| l.to_string()).collect();
        writeln!(out, "BINGO! {}", lines.join(", "))?;
    }
    Ok(())
}

/// Returns whether a new card was dealt.
fn regenerate<S: RandomSource>(
    session: &mut PlaySession<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<bool> {
    if session.request_regenerate() == RegenerateDecision::ConfirmationRequired {
        write!(out, "Discard your marks and deal a new card? [y/N] ")?;
        out.flush()?;
        let answer = read_line(input)?.unwrap_or_default();
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            session.cancel_regenerate();
            writeln!(out, "Keeping the current card.")?;
            return Ok(false);
        }
    }
    session.confirm_regenerate()?;
    Ok(true)
}

fn print_card<S: RandomSource>(session: &PlaySession<S>, out: &mut impl Write) -> Result<()> {
    if let Some(model) = session.render() {
        writeln!(out, "{}", model.title)?;
        writeln!(out, "{}", card_table(&model))?;
    }
    Ok(())
}

fn card_table(model: &RenderModel) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    for (row, cells) in model.cells.chunks(GRID_SIZE).enumerate() {
        let texts: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                let flag = if cell.is_winning {
                    "*"
                } else if cell.marked {
                    "x"
                } else {
                    " "
                };
                format!("{:>2} [{flag}] {}", row * GRID_SIZE + col + 1, cell.content)
            })
            .collect();
        table.add_row(texts);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use show_bingo::{CENTER_INDEX, PhrasePool, selection};
    use std::io::Cursor;

    fn session() -> PlaySession<RngSource<rand::rngs::StdRng>> {
        let pool: PhrasePool = (0..30).map(|i| format!("Phrase {i}")).collect();
        let mut session = PlaySession::new("Test Show", pool, Some("FREE".into()), RngSource::seeded(3));
        session.start().expect("start");
        session
    }

    fn run(session: &mut PlaySession<RngSource<rand::rngs::StdRng>>, script: &str) -> String {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        play_loop(session, &mut input, &mut out).expect("play");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn toggling_a_row_prints_bingo() {
        let mut session = session();
        let out = run(&mut session, "11\n12\ntoggle 14\nt 15\nquit\n");
        assert!(out.contains("BINGO! row 3"));
    }

    #[test]
    fn declined_regeneration_keeps_marks() {
        let mut session = session();
        let before = session.card().cloned();
        let out = run(&mut session, "1\nnew\nn\n");
        assert!(out.contains("Keeping the current card."));
        let card = session.card().expect("card");
        assert_eq!(card.contents(), before.expect("card").contents());
        assert_eq!(selection::marked_indices(card), vec![0, CENTER_INDEX]);
    }

    #[test]
    fn confirmed_regeneration_clears_marks() {
        let mut session = session();
        run(&mut session, "1\nnew\ny\n");
        let card = session.card().expect("card");
        assert_eq!(selection::marked_indices(card), vec![CENTER_INDEX]);
    }

    #[test]
    fn failed_png_save_keeps_playing() {
        let mut session = session();
        let out = run(&mut session, "1\npng /nonexistent_dir/x/card.png\n2\n3\nquit\n");
        assert!(out.contains("could not save /nonexistent_dir/x/card.png"));
        let card = session.card().expect("card");
        assert_eq!(selection::marked_indices(card), vec![0, 1, 2, CENTER_INDEX]);
    }

    #[test]
    fn small_show_error_carries_a_hint() {
        let pool: PhrasePool = (0..5).map(|i| format!("p{i}")).collect();
        let mut session = PlaySession::new("Tiny", pool, None, RngSource::seeded(1));
        let error = anyhow::Error::from(session.start().unwrap_err()).context("starting play");
        let hint = failure_hint(&error).expect("hint");
        assert!(hint.contains("5 usable phrases"));
        assert!(hint.contains("needs 24"));

        let other = anyhow::Error::from(BingoError::ShowNotFound("x".into()));
        assert!(failure_hint(&other).is_none());
    }

    #[test]
    fn reset_and_bad_input() {
        let mut session = session();
        let out = run(&mut session, "2\n3\nreset\n0\n26\nbogus\n");
        assert_eq!(out.matches("type help").count(), 3);
        let card = session.card().expect("card");
        assert_eq!(selection::marked_indices(card), vec![CENTER_INDEX]);
    }
}
