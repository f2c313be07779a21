use console::Term;
use tris_link::{Cell, LinkStats, Outcome, ReplayState, SessionSnapshot};

/// Render one frame: board, status, scores, replay prompt, link stats
pub fn draw(term: &Term, snapshot: &SessionSnapshot, stats: &LinkStats) -> anyhow::Result<()> {
    term.clear_screen()?;
    term.move_cursor_to(0, 0)?;
    for line in frame_lines(snapshot, stats) {
        term.write_line(&line)?;
    }
    term.flush()?;
    Ok(())
}

fn frame_lines(snapshot: &SessionSnapshot, stats: &LinkStats) -> Vec<String> {
    let mut lines = vec!["TRIS".to_string(), String::new()];

    let Some(local) = snapshot.local_symbol else {
        lines.push(snapshot.phase.to_string());
        return lines;
    };
    let remote = local.other();

    lines.push(format!(
        "You: {} {}   Opponent: {} {}",
        local,
        snapshot.scores.wins(local),
        remote,
        snapshot.scores.wins(remote)
    ));
    lines.push(String::new());

    // Empty cells show the digit that selects them
    for row in 0..3 {
        let mut rendered = String::new();
        for col in 0..3 {
            let mark = match snapshot.board.get(row, col) {
                Cell::Occupied(symbol) => symbol.to_string(),
                Cell::Empty => (row * 3 + col + 1).to_string(),
            };
            rendered.push_str(&format!(" {mark} "));
            if col < 2 {
                rendered.push('|');
            }
        }
        lines.push(rendered);
        if row < 2 {
            lines.push("---+---+---".to_string());
        }
    }
    lines.push(String::new());

    let status = match snapshot.outcome {
        Outcome::Won(winner) if winner == local => "You win!".to_string(),
        Outcome::Won(winner) => format!("Opponent wins ({winner})"),
        Outcome::Drawn => "Draw!".to_string(),
        Outcome::Pending if snapshot.turn == local => format!("Your turn ({local})"),
        Outcome::Pending => format!("Opponent's turn ({remote})"),
    };
    lines.push(status);

    match snapshot.replay {
        ReplayState::LocalRequestSent => {
            lines.push("Rematch requested, waiting for the opponent...".to_string());
        }
        ReplayState::RemoteRequestReceived => {
            lines.push("Opponent wants a rematch. Accept? (y/n)".to_string());
        }
        ReplayState::NotRequested if snapshot.outcome != Outcome::Pending => {
            lines.push("Press r for a rematch.".to_string());
        }
        ReplayState::NotRequested => {}
    }

    lines.push(String::new());
    lines.push(format!("{stats}"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tris_link::{GameSession, Link};

    fn joined_snapshot() -> SessionSnapshot {
        let (a_end, b_end) = Link::pair();
        let mut a = GameSession::with_token(42, a_end.tx.clone());
        let mut b = GameSession::with_token(7, b_end.tx.clone());
        a.start().unwrap();
        b.start().unwrap();
        for raw in a_end.rx.drain() {
            a.ingest(&raw);
        }
        for raw in b_end.rx.drain() {
            b.ingest(&raw);
        }
        a.attempt_local_move(0, 0);
        a.snapshot()
    }

    #[test]
    fn test_waiting_frame_before_handshake() {
        let (a_end, _b_end) = Link::pair();
        let mut session = GameSession::with_token(3, a_end.tx.clone());
        session.start().unwrap();

        let lines = frame_lines(&session.snapshot(), &LinkStats::new());
        assert!(lines.iter().any(|line| line.contains("Waiting for peer")));
    }

    #[test]
    fn test_game_frame_shows_board_and_turn() {
        let snapshot = joined_snapshot();
        let lines = frame_lines(&snapshot, &LinkStats::new());

        // The placed X and the digit hints for free cells.
        assert!(lines.iter().any(|line| line.contains(" X ")));
        assert!(lines.iter().any(|line| line.contains(" 5 ")));
        // X just moved, so it is the opponent's turn from X's view.
        assert!(lines.iter().any(|line| line.contains("Opponent's turn (O)")));
        assert!(lines.iter().any(|line| line.contains("You: X 0")));
    }
}
