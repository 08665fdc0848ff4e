//! TUI (Terminal User Interface) module for Word Unscramble
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # State Machine
//! - `EnteringGuess`: letters are typed, ENTER submits, TAB skips the word
//! - `GameOver`: shown after the last word (or when the word bank runs dry),
//!   `N` starts a new game
//!
//! ESC quits from any state; CTRL-R restarts from any state.

use crate::game_state::{GameInterface, GameSummary, GuessResult, RoundInfo, UserAction};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const MAX_INPUT_LEN: usize = 32;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const TILE_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::White)
    .add_modifier(Modifier::BOLD);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    EnteringGuess,
    GameOver,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    round: Option<&'a RoundInfo>,
    current_input: &'a str,
    state: TuiState,
    message: &'a str,
    message_is_success: bool,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    round: Option<RoundInfo>,
    current_input: String,
    state: TuiState,
    message: String,
    message_is_success: bool,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete");

        Ok(Self {
            terminal,
            round: None,
            current_input: String::new(),
            state: TuiState::EnteringGuess,
            message: String::new(),
            message_is_success: false,
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            round: self.round.as_ref(),
            current_input: &self.current_input,
            state: self.state,
            message: &self.message,
            message_is_success: self.message_is_success,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(9), // Scramble and input
                Constraint::Min(6),    // Info panel
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx);
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("WORD UNSCRAMBLE")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let title = match ctx.round {
            Some(round) => format!("Word {}/{}", round.round, round.max_rounds),
            None => "Word".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);

        let scramble = ctx.round.map_or("", |round| round.scramble.as_str());
        let mut lines = vec![Line::from(""), Self::scramble_tiles(scramble), Line::from("")];

        match ctx.state {
            TuiState::EnteringGuess => {
                lines.push(Line::from(vec![
                    Span::raw("Your guess: "),
                    Span::styled(ctx.current_input.to_string(), INFO_STYLE),
                    Span::styled("_", Style::default().fg(Color::DarkGray)),
                ]));
            }
            TuiState::GameOver => {
                lines.push(Line::from(Span::styled("Game over", INFO_STYLE)));
            }
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn scramble_tiles(scramble: &str) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, ch) in scramble.chars().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!(" {} ", ch.to_ascii_uppercase()),
                TILE_STYLE,
            ));
        }
        Line::from(spans)
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();

        if let Some(round) = ctx.round {
            lines.push(Line::from(vec![
                Span::raw("Score: "),
                Span::styled(round.score.to_string(), SUCCESS_STYLE),
                Span::raw("    High score: "),
                Span::styled(round.high_score.to_string(), INFO_STYLE),
            ]));
            lines.push(Line::from(""));
        }

        if !ctx.message.is_empty() {
            let style = if ctx.message_is_success {
                SUCCESS_STYLE
            } else {
                MESSAGE_STYLE
            };
            lines.push(Line::from(vec![Span::styled(ctx.message, style)]));
        }

        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::EnteringGuess => {
                "ENTER: Submit | TAB: Skip word | CTRL-R: Restart | ESC: Quit"
            }
            TuiState::GameOver => "N: New Game | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process Press events, ignore Release and Repeat to avoid double input
                if key.kind != event::KeyEventKind::Press {
                    return Ok(None);
                }
                debug_log!(
                    "handle_input() - Key event: code={:?}, modifiers={:?}",
                    key.code,
                    key.modifiers
                );
                Ok(self.handle_key(key))
            }
            other => {
                debug_log!("handle_input() - Ignoring event {:?}", other);
                Ok(None)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        if key.code == KeyCode::Esc {
            info_log!("handle_key() - ESC pressed, returning Exit");
            return Some(UserAction::Exit);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('r' | 'R') => Some(UserAction::Restart),
                KeyCode::Char('c') => Some(UserAction::Exit),
                _ => None,
            };
        }

        match self.state {
            TuiState::EnteringGuess => self.handle_guess_input(key),
            TuiState::GameOver => Self::handle_game_over_input(key),
        }
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        match key.code {
            KeyCode::Char(c) if c.is_alphabetic() => {
                if key.modifiers.contains(KeyModifiers::ALT) {
                    return None;
                }
                if self.current_input.chars().count() < MAX_INPUT_LEN {
                    self.current_input.extend(c.to_lowercase());
                }
                None
            }
            KeyCode::Backspace => {
                self.current_input.pop();
                None
            }
            KeyCode::Tab => Some(UserAction::Skip),
            KeyCode::Enter => {
                if self.current_input.is_empty() {
                    self.error_message = "Type a word before pressing ENTER".to_string();
                    return None;
                }
                Some(UserAction::Guess(std::mem::take(&mut self.current_input)))
            }
            _ => None,
        }
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') => Some(UserAction::Restart),
            _ => None,
        }
    }

    fn set_message(&mut self, message: String, success: bool) {
        self.message = message;
        self.message_is_success = success;
    }
}

impl GameInterface for TuiInterface {
    fn display_round(&mut self, round: &RoundInfo) {
        self.current_input.clear();
        self.state = TuiState::EnteringGuess;
        self.round = Some(round.clone());
        self.status = format!("Unscramble the word - {} points so far", round.score);
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.handle_input() {
                Ok(Some(action)) => {
                    info_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Error handling input: {}", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_guess_result(&mut self, result: &GuessResult) {
        if result.correct {
            self.set_message(
                format!("Correct! \"{}\" brings you to {}", result.guess, result.score),
                true,
            );
        } else {
            self.set_message(format!("\"{}\" is not it, try again", result.guess), false);
        }
        self.draw_or_log();
    }

    fn display_skipped(&mut self, word: &str) {
        self.current_input.clear();
        self.set_message(format!("Skipped. The word was \"{word}\""), false);
        self.draw_or_log();
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        self.state = TuiState::GameOver;
        self.set_message(
            format!(
                "You scored {} in {} words. High score: {}",
                summary.score, summary.rounds_played, summary.high_score
            ),
            true,
        );
        self.status = format!("Game Over - Score: {}", summary.score);
        self.draw_or_log();
    }

    fn display_word_bank_exhausted(&mut self, summary: &GameSummary) {
        self.state = TuiState::GameOver;
        self.set_message(
            format!(
                "No more words left after {} words. You scored {}.",
                summary.rounds_played, summary.score
            ),
            false,
        );
        self.status = "Game Over - word bank exhausted".to_string();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.set_message("Exiting...".to_string(), false);
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
