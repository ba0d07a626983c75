use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use chess_core::chess_errors::ChessResult;
use chess_core::game_state::chess_types::{Color, PieceKind, Square};
use chess_core::moves::move_descriptions::MoveRequest;
use chess_core::session::game_session::{GameMode, Phase, Session, SessionConfig, Submission};
use chess_core::utils::render_board::render_board;

const HELP: &str = "commands: <from><to>[q|r|b|n] (e.g. e2e4, e7e8q), moves <square>, \
undo, new, board, history, help, quit";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mode = if std::env::args().skip(1).any(|arg| arg == "--pvp") {
        GameMode::VsHuman
    } else {
        GameMode::VsComputer
    };
    let player = std::env::var("USER").unwrap_or_else(|_| "player".to_owned());
    let mut session = Session::new(player, mode, SessionConfig::from_env());

    println!("{} ({mode})", session.player_name());
    println!("{HELP}");
    print_position(&session);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if command == "quit" || command == "exit" {
            break;
        }

        if let Err(err) = run_command(&mut session, command) {
            println!("error: {err}");
        }
        io::stdout().flush().ok();
    }
}

fn run_command(session: &mut Session, command: &str) -> ChessResult<()> {
    let mut words = command.split_whitespace();
    match (words.next(), words.next()) {
        (Some("help"), _) => println!("{HELP}"),
        (Some("board"), _) => print_position(session),
        (Some("history"), _) => {
            for line in session.move_history().numbered_lines() {
                println!("{line}");
            }
        }
        (Some("moves"), Some(square)) => {
            let square: Square = square.parse()?;
            let targets = session.select(square)?;
            let names: Vec<String> = targets.iter().map(|target| target.to_algebraic()).collect();
            println!("{square}: {}", names.join(" "));
        }
        (Some("undo"), _) => {
            session.undo()?;
            finish_turn(session)?;
        }
        (Some("new"), _) => {
            session.new_game();
            finish_turn(session)?;
        }
        (Some(text), None) => play_human_move(session, text)?,
        _ => println!("{HELP}"),
    }
    Ok(())
}

fn play_human_move(session: &mut Session, text: &str) -> ChessResult<()> {
    // A bare piece letter answers an outstanding promotion prompt.
    if let Phase::AwaitingPromotionChoice { .. } = session.phase() {
        let mut letters = text.chars();
        if let (Some(kind), None) = (letters.next().and_then(PieceKind::from_letter), letters.next()) {
            let mv = session.choose_promotion(kind)?;
            println!("{mv}");
            return finish_turn(session);
        }
    }

    let request: MoveRequest = text.parse()?;
    match session.submit_move(request.from, request.to, request.promotion)? {
        Submission::Played(mv) => {
            println!("{mv}");
            finish_turn(session)
        }
        Submission::AwaitingPromotion => {
            println!("promote to? (q, r, b, n)");
            Ok(())
        }
    }
}

fn finish_turn(session: &mut Session) -> ChessResult<()> {
    if let Some(reply) = session.wait_for_computer_reply()? {
        println!("computer plays {reply}");
    }
    print_position(session);
    Ok(())
}

fn print_position(session: &Session) {
    println!("{}", render_board(session.board()));
    match session.phase() {
        Phase::GameOver(outcome) => println!("{outcome}. type 'new' for another game"),
        Phase::AwaitingPromotionChoice { .. } => println!("promote to? (q, r, b, n)"),
        Phase::AwaitingMove => println!("{:?}, {} to move", session.status(), session.side_to_move()),
    }
    let captured = |color| {
        session
            .captured_by(color)
            .iter()
            .map(|piece| piece.glyph())
            .collect::<String>()
    };
    println!("white took: {}  black took: {}", captured(Color::White), captured(Color::Black));
}
