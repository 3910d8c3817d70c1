//! TUI (Terminal User Interface) front-end for Acronym Invaders
//!
//! Pure presentation: it draws whatever the `SessionController` holds and
//! translates crossterm key events into `KeyInput`s. All game rules live in
//! the session.
//!
//! # Frame Loop
//! draw → poll one key (bounded by the frame time) → `handle_key` → `tick`

use crate::error::Result;
use crate::round::{GameMode, RoundState};
use crate::session::{KeyInput, SessionController, SessionState, SessionStatus};
use crate::store::{HighScoreRecord, ScoreStore};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::Rng;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
};
use std::io;
use std::time::{Duration, Instant};

const FRAME_TIME_MS: u64 = 16;

const SPRITES: [&str; 4] = ["<=*=>", "/-o-\\", "{-#-}", "[=@=]"];

const HEADER_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::White);
const SPRITE_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Translates a crossterm key into a session key. Only presses count;
/// Esc and Ctrl-C close the game.
#[must_use]
pub fn translate_key(key: KeyEvent) -> Option<KeyInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let has_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let has_alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => Some(KeyInput::Close),
        KeyCode::Char('c') if has_ctrl => Some(KeyInput::Close),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Char(_) if has_ctrl || has_alt => None,
        KeyCode::Char(c) => KeyInput::from_code(c as u32),
        _ => None,
    }
}

/// Terminal cell for the top-left corner of the sprite inside `area`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sprite_cell(round: &RoundState, area: Rect) -> (u16, u16) {
    let playfield = round.config().playfield;
    let sprite_cols = SPRITES[0].len() as u16;
    let usable_cols = area.width.saturating_sub(sprite_cols);
    let usable_rows = area.height.saturating_sub(1);

    let x_ratio = if playfield.width > playfield.sprite_width {
        round.horizontal_position() / (playfield.width - playfield.sprite_width)
    } else {
        0.0
    };
    let y_ratio = round.fall_position() / playfield.bottom_boundary();

    let col = (x_ratio.clamp(0.0, 1.0) * f32::from(usable_cols)).round() as u16;
    let row = (y_ratio.clamp(0.0, 1.0) * f32::from(usable_rows)).round() as u16;
    (area.x + col, area.y + row)
}

pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TuiInterface {
    pub fn new() -> Result<Self> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");
        Ok(Self { terminal })
    }

    pub fn cleanup(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Runs the frame loop until the session exits.
    pub fn run<S: ScoreStore, R: Rng>(&mut self, session: &mut SessionController<S, R>) -> Result<()> {
        loop {
            self.terminal.draw(|f| render(f, &*session))?;

            if let Some(key) = Self::poll_key()?
                && session.handle_key(key) == SessionStatus::Exit
            {
                break;
            }
            if session.tick(Instant::now()) == SessionStatus::Exit {
                break;
            }
        }
        info_log!("Frame loop finished");
        Ok(())
    }

    fn poll_key() -> Result<Option<KeyInput>> {
        if !event::poll(Duration::from_millis(FRAME_TIME_MS))? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => {
                let input = translate_key(key);
                debug_log!("poll_key() - {:?} -> {:?}", key.code, input);
                Ok(input)
            }
            _ => Ok(None),
        }
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn render<S: ScoreStore, R: Rng>(f: &mut Frame, session: &SessionController<S, R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title / status
            Constraint::Min(10),   // Body
            Constraint::Length(3), // Instructions
        ])
        .split(f.area());

    render_header(f, chunks[0], session.round().filter(|_| {
        matches!(session.state(), SessionState::Playing)
    }));

    match session.state() {
        SessionState::TitleScreen | SessionState::Exited => {
            render_title(f, chunks[1], session.error_message());
        }
        SessionState::Playing => {
            if let Some(round) = session.round() {
                render_round(f, chunks[1], round, session.answer());
            }
        }
        SessionState::GameOver { final_score, .. } => {
            render_message(f, chunks[1], &format!("Game Over! Final Score: {final_score}"));
        }
        SessionState::NameEntry { final_score } => {
            render_name_entry(f, chunks[1], final_score, session.player_name());
        }
        SessionState::ReplayPrompt { final_score } => {
            render_high_scores(
                f,
                chunks[1],
                final_score,
                session.top_scores(),
                session.error_message(),
            );
        }
    }

    render_instructions(f, chunks[2], session.state());
}

fn render_header(f: &mut Frame, area: Rect, round: Option<&RoundState>) {
    let text = match round {
        Some(round) => format!(
            "ACRONYM INVADERS  |  {}  |  Time: {}  |  Score: {}",
            round.mode().label(),
            round.time_remaining(),
            round.score()
        ),
        None => "ACRONYM INVADERS".to_string(),
    };
    let header = Paragraph::new(text)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_title(f: &mut Frame, area: Rect, error: Option<&str>) {
    let mut lines = vec![
        Line::from(Span::styled("Acronym Invaders!", HEADER_STYLE)),
        Line::from(""),
    ];
    for mode in [GameMode::Acronym, GameMode::Term, GameMode::Challenge] {
        lines.push(Line::from(format!("  {}. {}", mode.key(), mode.label())));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Press 'Q' to Quit"));
    if let Some(error) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error, ERROR_STYLE)));
    }
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_round(f: &mut Frame, area: Rect, round: &RoundState, answer: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(area);

    let block = Block::default().borders(Borders::ALL);
    let field = block.inner(chunks[0]);
    f.render_widget(block, chunks[0]);

    let (x, y) = sprite_cell(round, field);
    let sprite = SPRITES[round.sprite_variant() % SPRITES.len()];
    let width = (sprite.len() as u16).min(field.width);
    f.render_widget(
        Paragraph::new(Span::styled(sprite, SPRITE_STYLE)),
        Rect {
            x,
            y,
            width,
            height: 1,
        },
    );

    let feedback_style = match round.feedback().as_deref() {
        Some("Hit!") => SUCCESS_STYLE,
        _ => ERROR_STYLE,
    };
    let lines = vec![
        Line::from(Span::styled(
            round.feedback().unwrap_or_default(),
            feedback_style,
        )),
        Line::from(Span::styled(round.challenge().prompt(), MESSAGE_STYLE)),
        Line::from(format!("Input: (Press 'q' to Quit) {answer}")),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[1]);
}

fn render_message(f: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(Span::styled(message, HEADER_STYLE))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_name_entry(f: &mut Frame, area: Rect, final_score: i64, name: &str) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Game Over! Final Score: {final_score}"),
            HEADER_STYLE,
        )),
        Line::from(""),
        Line::from("Enter your name: "),
        Line::from(Span::styled(name, MESSAGE_STYLE)),
    ];
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_high_scores(
    f: &mut Frame,
    area: Rect,
    final_score: i64,
    top_scores: &[HighScoreRecord],
    error: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(4)])
        .split(area);

    let rows = top_scores.iter().enumerate().map(|(i, record)| {
        Row::new(vec![
            format!("{}. {}", i + 1, record.player_name),
            record.score.to_string(),
        ])
    });
    let table = Table::new(rows, [Constraint::Min(20), Constraint::Length(10)])
        .header(Row::new(vec!["Name", "Score"]).style(HEADER_STYLE))
        .block(
            Block::default()
                .title("Top 10 High Scores")
                .borders(Borders::ALL),
        );
    f.render_widget(table, chunks[0]);

    let mut lines = vec![
        Line::from(format!("Final Score: {final_score}")),
        Line::from("Play again? (Y/N)"),
    ];
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(error, ERROR_STYLE)));
    }
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, chunks[1]);
}

fn render_instructions(f: &mut Frame, area: Rect, state: SessionState) {
    let text = match state {
        SessionState::TitleScreen | SessionState::Exited => "1/2/3: Select mode | Q: Quit | ESC: Quit",
        SessionState::Playing => "Type your answer | ENTER: Submit | BACKSPACE: Delete | ESC: Quit",
        SessionState::GameOver { .. } | SessionState::NameEntry { .. } => {
            "Type your name | ENTER: Save score | ESC: Quit"
        }
        SessionState::ReplayPrompt { .. } => "Y: Play again | N: Quit",
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::AcronymDictionary;
    use crate::round::RoundConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_translate_printable_and_controls() {
        assert_eq!(translate_key(press(KeyCode::Char('a'))), Some(KeyInput::Char('a')));
        assert_eq!(translate_key(press(KeyCode::Char(' '))), Some(KeyInput::Char(' ')));
        assert_eq!(translate_key(press(KeyCode::Enter)), Some(KeyInput::Enter));
        assert_eq!(translate_key(press(KeyCode::Backspace)), Some(KeyInput::Backspace));
        assert_eq!(translate_key(press(KeyCode::Esc)), Some(KeyInput::Close));
        assert_eq!(translate_key(press(KeyCode::Tab)), None);
    }

    #[test]
    fn test_translate_rejects_non_ascii_and_modifiers() {
        assert_eq!(translate_key(press(KeyCode::Char('é'))), None);
        let alt = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert_eq!(translate_key(alt), None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate_key(ctrl_c), Some(KeyInput::Close));
    }

    #[test]
    fn test_translate_ignores_release() {
        let mut key = press(KeyCode::Char('a'));
        key.kind = KeyEventKind::Release;
        assert_eq!(translate_key(key), None);
    }

    #[test]
    fn test_sprite_cell_tracks_fall() {
        let dictionary = AcronymDictionary::load_from_str("CPU,Central Processing Unit");
        let mut rng = StdRng::seed_from_u64(2);
        let mut round =
            RoundState::new(GameMode::Challenge, RoundConfig::default(), &dictionary, &mut rng)
                .unwrap();
        let area = Rect::new(1, 1, 80, 20);

        let (x, y) = sprite_cell(&round, area);
        assert_eq!(y, 1);
        assert!(x >= 1 && x <= 1 + 80 - 5);

        for _ in 0..100 {
            round.fall_tick();
        }
        let (_, lower) = sprite_cell(&round, area);
        assert!(lower > y);
        assert!(lower < area.y + area.height);
    }
}
