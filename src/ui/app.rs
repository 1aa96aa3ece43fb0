use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::export::write_backup;
use crate::leaderboard::{rank, SortDirection};
use crate::models::{Participant, Theme};
use crate::partition::DistributionMode;
use crate::persist::save_theme;
use crate::roster::{Distribution, RosterStore};

use super::forms::{ConfirmRemove, DistributeField, DistributeForm, NameForm, Notice, ScoreForm};
use super::helpers::{centered_rect, score_row, surface_error};
use super::screens::{ListCursor, Pane, Scroll};
use super::theme::Palette;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered over the main screen. Anything other than
/// `Normal` owns the keyboard until it is closed.
enum Mode {
    Normal,
    AddingParticipant(NameForm),
    EditingScore(ScoreForm),
    ConfirmRemove(ConfirmRemove),
    Distributing(DistributeForm),
    Notice(Notice),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. The roster store is the
/// only owner of participant and team data; everything else here is view
/// state that is never persisted, apart from the theme.
pub struct App {
    store: RosterStore,
    rng: StdRng,
    export_dir: PathBuf,
    theme: Theme,
    sort: SortDirection,
    last_mode: DistributionMode,
    pane: Pane,
    roster_cursor: ListCursor,
    team_scroll: Scroll,
    board_scroll: Scroll,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: RosterStore, theme: Theme, export_dir: PathBuf, rng: StdRng) -> Self {
        Self {
            store,
            rng,
            export_dir,
            theme,
            sort: SortDirection::default(),
            last_mode: DistributionMode::default(),
            pane: Pane::default(),
            roster_cursor: ListCursor::default(),
            team_scroll: Scroll::default(),
            board_scroll: Scroll::default(),
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort
    }

    /// Feed one key press through the active mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingParticipant(form) => self.handle_add_participant(code, form),
            Mode::EditingScore(form) => self.handle_edit_score(code, form),
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm),
            Mode::Distributing(form) => self.handle_distribute(code, form),
            Mode::Notice(notice) => self.handle_notice(code, notice),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Tab => self.pane = self.pane.next(),
            KeyCode::BackTab => self.pane = self.pane.previous(),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.select_edge(true),
            KeyCode::End => self.select_edge(false),
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Mode::AddingParticipant(NameForm::default());
            }
            KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(participant) = self.current_participant().cloned() {
                    self.clear_status();
                    let on_teams = self
                        .store
                        .teams()
                        .iter()
                        .any(|team| team.members.iter().any(|m| m.name == participant.name));
                    return Mode::ConfirmRemove(ConfirmRemove {
                        name: participant.name,
                        on_teams,
                    });
                }
                self.set_status("No one selected to remove.", StatusKind::Error);
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(participant) = self.current_participant() {
                    let form = ScoreForm::from_participant(participant);
                    self.clear_status();
                    return Mode::EditingScore(form);
                }
                self.set_status("No one selected to score.", StatusKind::Error);
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.clear_status();
                return Mode::Distributing(DistributeForm::new(self.last_mode));
            }
            KeyCode::Char('s') | KeyCode::Char('S') => match self.store.save() {
                Ok(()) => return Mode::Notice(Notice::info("All data saved.")),
                Err(err) => self.set_status(
                    format!("Save failed: {}", surface_error(&err)),
                    StatusKind::Error,
                ),
            },
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_backup(),
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.sort = self.sort.toggle();
                self.board_scroll.reset();
                self.set_status(
                    format!("Leaderboard sorted {}.", self.sort.label().to_lowercase()),
                    StatusKind::Info,
                );
            }
            KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_theme(),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_participant(&mut self, code: KeyCode, mut form: NameForm) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let name = form.name.trim().to_string();
                match self.store.add_participant(&form.name) {
                    Ok(true) => {
                        self.roster_cursor.select_last(self.store.users().len());
                        self.set_status(format!("Added {name}."), StatusKind::Info);
                        form.reset();
                    }
                    Ok(false) if name.is_empty() => {
                        form.error = Some("Type a name first.".to_string());
                    }
                    Ok(false) => {
                        form.error = Some(format!("{name} is already on the roster."));
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::AddingParticipant(form)
    }

    fn handle_edit_score(&mut self, code: KeyCode, mut form: ScoreForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Score unchanged.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.store.update_score(&form.name, &form.value) {
                Ok(true) => {
                    let score = self
                        .store
                        .state()
                        .find_user(&form.name)
                        .map(|user| user.score)
                        .unwrap_or_default();
                    self.set_status(
                        format!("{} now has {score} points.", form.name),
                        StatusKind::Info,
                    );
                    return Mode::Normal;
                }
                Ok(false) => {
                    self.set_status(
                        format!("{} is no longer on the roster.", form.name),
                        StatusKind::Error,
                    );
                    return Mode::Normal;
                }
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Mode::EditingScore(form)
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemove) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.store.remove_participant(&confirm.name) {
                    Ok(removed) => {
                        self.roster_cursor.clamp(self.store.users().len());
                        if removed {
                            self.set_status(format!("Removed {}.", confirm.name), StatusKind::Info);
                        }
                        Mode::Normal
                    }
                    Err(err) => {
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Mode::ConfirmRemove(confirm)
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            _ => Mode::ConfirmRemove(confirm),
        }
    }

    fn handle_distribute(&mut self, code: KeyCode, mut form: DistributeForm) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_field(),
            KeyCode::Left | KeyCode::Right => form.toggle_mode(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let quantity = match form.parse_quantity() {
                    Ok(quantity) => quantity,
                    Err(err) => {
                        form.error = Some(surface_error(&err));
                        form.active = DistributeField::Quantity;
                        return Mode::Distributing(form);
                    }
                };
                self.last_mode = form.mode;

                match self.store.distribute(form.mode, quantity, &mut self.rng) {
                    Ok(Distribution::Created(count)) => {
                        self.pane = Pane::Teams;
                        self.team_scroll.reset();
                        self.set_status(format!("Created {count} teams."), StatusKind::Info);
                        return Mode::Normal;
                    }
                    Ok(Distribution::Rejected(reason)) => {
                        return Mode::Notice(Notice::warning(reason.to_string()));
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        form.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Distributing(form)
    }

    fn handle_notice(&mut self, code: KeyCode, notice: Notice) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Mode::Normal,
            _ => Mode::Notice(notice),
        }
    }

    fn export_backup(&mut self) {
        match write_backup(&self.export_dir, self.store.state(), Utc::now()) {
            Ok(path) => self.set_status(
                format!("Backup written to {}.", path.display()),
                StatusKind::Info,
            ),
            Err(err) => {
                warn!(error = %err, "export failed");
                self.set_status(
                    format!("Export failed: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        match save_theme(self.store.connection(), self.theme) {
            Ok(()) => self.set_status(
                format!("Switched to the {} theme.", self.theme.as_str()),
                StatusKind::Info,
            ),
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        match self.pane {
            Pane::Roster => self.roster_cursor.move_by(delta, self.store.users().len()),
            Pane::Teams => self.team_scroll.move_by(delta as i32, self.team_line_count()),
            Pane::Leaderboard => self
                .board_scroll
                .move_by(delta as i32, self.store.users().len()),
        }
    }

    fn select_edge(&mut self, first: bool) {
        match (self.pane, first) {
            (Pane::Roster, true) => self.roster_cursor.select_first(),
            (Pane::Roster, false) => self.roster_cursor.select_last(self.store.users().len()),
            (Pane::Teams, true) => self.team_scroll.reset(),
            (Pane::Teams, false) => self
                .team_scroll
                .move_by(i32::from(u16::MAX), self.team_line_count()),
            (Pane::Leaderboard, true) => self.board_scroll.reset(),
            (Pane::Leaderboard, false) => self
                .board_scroll
                .move_by(i32::from(u16::MAX), self.store.users().len()),
        }
    }

    fn current_participant(&self) -> Option<&Participant> {
        self.store.users().get(self.roster_cursor.selected)
    }

    /// Lines produced by `team_lines`: a header, the members (or an empty
    /// marker) and a spacer per team.
    fn team_line_count(&self) -> usize {
        self.store
            .teams()
            .iter()
            .map(|team| team.len().max(1) + 2)
            .sum()
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let palette = Palette::for_theme(self.theme);
        let area = frame.area();
        frame.render_widget(Block::default().style(palette.base()), area);

        let footer_height = FOOTER_HEIGHT.min(area.height);
        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(content_area);
        self.draw_roster(frame, columns[0], &palette);
        self.draw_teams(frame, columns[1], &palette);
        self.draw_leaderboard(frame, columns[2], &palette);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area, &palette);
        }

        match &self.mode {
            Mode::AddingParticipant(form) => self.draw_name_form(frame, area, form),
            Mode::EditingScore(form) => self.draw_score_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::Distributing(form) => self.draw_distribute_form(frame, area, form),
            Mode::Notice(notice) => self.draw_notice(frame, area, notice),
            Mode::Normal => {}
        }
    }

    fn pane_block(&self, pane: Pane, title: String, palette: &Palette) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(palette.border(self.pane == pane))
            .style(palette.base())
    }

    fn draw_roster(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let users = self.store.users();
        let block = self.pane_block(
            Pane::Roster,
            format!("{} ({})", Pane::Roster.title(), users.len()),
            palette,
        );

        if users.is_empty() {
            let message = Paragraph::new("No one here yet. Press '+' to add people.")
                .alignment(Alignment::Center)
                .style(palette.muted())
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let width = block.inner(area).width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = users
            .iter()
            .map(|user| ListItem::new(score_row(&user.name, &user.score.to_string(), width)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(palette.selection)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(self.roster_cursor.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn team_lines(&self, width: usize, palette: &Palette) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.team_line_count());
        for team in self.store.teams() {
            lines.push(Line::from(vec![
                Span::styled(team.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!(" ({} people)", team.len()), palette.muted()),
                Span::raw("  "),
                Span::styled(
                    format!("Strength: {}", team.total_score()),
                    Style::default()
                        .fg(palette.score)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            if team.is_empty() {
                lines.push(Line::from(Span::styled("  (empty)", palette.muted())));
            }
            for member in &team.members {
                lines.push(Line::from(score_row(
                    &format!("  {}", member.name),
                    &format!("{}p", member.score),
                    width,
                )));
            }
            lines.push(Line::from(""));
        }
        lines
    }

    fn draw_teams(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let teams = self.store.teams();
        let block = self.pane_block(
            Pane::Teams,
            format!("{} ({})", Pane::Teams.title(), teams.len()),
            palette,
        );

        if teams.is_empty() {
            let message = Paragraph::new("No teams yet. Press 'd' to distribute.")
                .alignment(Alignment::Center)
                .style(palette.muted())
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let width = block.inner(area).width as usize;
        let paragraph = Paragraph::new(self.team_lines(width, palette))
            .block(block)
            .scroll((self.team_scroll.offset, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_leaderboard(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = self.pane_block(
            Pane::Leaderboard,
            format!("{} - {}", Pane::Leaderboard.title(), self.sort.label()),
            palette,
        );

        let entries = rank(self.store.users(), self.sort);
        if entries.is_empty() {
            let message = Paragraph::new("Scores show up here.")
                .alignment(Alignment::Center)
                .style(palette.muted())
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let width = block.inner(area).width.saturating_sub(4) as usize;
        let lines: Vec<Line> = entries
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(format!("{:>3} ", entry.badge()), palette.key()),
                    Span::raw(score_row(
                        &entry.participant.name,
                        &entry.participant.score.to_string(),
                        width,
                    )),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((self.board_scroll.offset, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default().borders(Borders::TOP).style(palette.base());
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions(palette);

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self, palette: &Palette) -> Line<'static> {
        let key_style = palette.key();
        let bindings: &[(&str, &str)] = match &self.mode {
            Mode::AddingParticipant(_) => &[("[Enter]", " Add   "), ("[Esc]", " Done")],
            Mode::EditingScore(_) => &[("[Enter]", " Save   "), ("[Esc]", " Cancel")],
            Mode::ConfirmRemove(_) => &[("[y]", " Remove   "), ("[n]", " Keep")],
            Mode::Distributing(_) => &[
                ("[Tab]", " Switch Field   "),
                ("[←→]", " Mode   "),
                ("[Enter]", " Distribute   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::Notice(_) => &[("[Enter]", " Continue")],
            Mode::Normal => &[
                ("[↑↓]", " Select   "),
                ("[Tab]", " Pane   "),
                ("[+]", " Add   "),
                ("[-]", " Remove   "),
                ("[e]", " Score   "),
                ("[d]", " Distribute   "),
                ("[o]", " Sort   "),
                ("[s]", " Save   "),
                ("[x]", " Export   "),
                ("[t]", " Theme   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = bindings
            .iter()
            .flat_map(|(key, label)| [Span::styled(*key, key_style), Span::raw(*label)])
            .collect();
        Line::from(spans)
    }

    fn draw_name_form(&self, frame: &mut Frame, area: Rect, form: &NameForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Person").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Name: "),
                Span::styled(form.name.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to add - Esc when done",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Name: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_score_form(&self, frame: &mut Frame, area: Rect, form: &ScoreForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Score for {}", form.name))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(vec![
                Span::raw("Score: "),
                Span::styled(form.value.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Anything that is not a number counts as 0.",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "Enter to save - Esc to cancel",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = "Score: ".len() as u16;
        frame.set_cursor_position((inner.x + prefix + form.value_len() as u16, inner.y));
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRemove) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(format!("Remove {} from the roster?", confirm.name))];
        if confirm.on_teams {
            lines.push(Line::from("They will also be taken off their team."));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_distribute_form(&self, frame: &mut Frame, area: Rect, form: &DistributeForm) {
        let popup_area = centered_rect(60, 35, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Distribute {} people", self.store.users().len()))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line(DistributeField::Mode),
            form.build_line(DistributeField::Quantity),
            Line::from(""),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Left/Right change mode - Enter to distribute - Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if form.active == DistributeField::Quantity {
            let prefix = "Quantity: ".len() as u16;
            frame.set_cursor_position((
                inner.x + prefix + form.quantity.chars().count() as u16,
                inner.y + 1,
            ));
        }
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(notice.title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    use super::*;
    use crate::db::open_in_memory;
    use crate::error::DistributeError;
    use crate::export::Backup;
    use crate::persist::{load_state, load_theme};

    fn app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::load(open_in_memory().unwrap());
        let app = App::new(
            store,
            Theme::Dark,
            dir.path().to_path_buf(),
            StdRng::seed_from_u64(1),
        );
        (app, dir)
    }

    fn press(app: &mut App, code: KeyCode) {
        assert!(!app.handle_key(code).unwrap());
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn add_people(app: &mut App, names: &[&str]) {
        press(app, KeyCode::Char('+'));
        for name in names {
            type_text(app, name);
            press(app, KeyCode::Enter);
        }
        press(app, KeyCode::Esc);
    }

    fn distribute(app: &mut App, quantity: &str) {
        press(app, KeyCode::Char('d'));
        type_text(app, quantity);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn add_form_trims_and_rejects_duplicates() {
        let (mut app, _dir) = app();
        press(&mut app, KeyCode::Char('+'));
        type_text(&mut app, "  Alice  ");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "ALICE");
        press(&mut app, KeyCode::Enter);
        match &app.mode {
            Mode::AddingParticipant(form) => assert!(form.error.is_some()),
            _ => panic!("form should stay open"),
        }
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.store().users(), [Participant::new("Alice")]);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn too_many_teams_raises_notice_and_keeps_teams() {
        let (mut app, _dir) = app();
        add_people(&mut app, &["A", "B"]);
        distribute(&mut app, "3");

        match &app.mode {
            Mode::Notice(notice) => assert_eq!(
                notice.message,
                DistributeError::TooManyTeams {
                    requested: 3,
                    available: 2
                }
                .to_string()
            ),
            _ => panic!("expected a notice"),
        }
        assert!(app.store().teams().is_empty());

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn empty_roster_raises_notice() {
        let (mut app, _dir) = app();
        distribute(&mut app, "2");
        assert!(matches!(app.mode, Mode::Notice(_)));
    }

    #[test]
    fn distribute_by_count_switches_to_teams() {
        let (mut app, _dir) = app();
        add_people(&mut app, &["A", "B", "C", "D", "E"]);
        distribute(&mut app, "2");

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.pane, Pane::Teams);
        let sizes: Vec<_> = app.store().teams().iter().map(|t| t.len()).collect();
        assert_eq!(sizes, [3, 2]);
    }

    #[test]
    fn distribute_by_size_after_mode_toggle() {
        let (mut app, _dir) = app();
        add_people(&mut app, &["A", "B", "C", "D", "E"]);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Right);
        type_text(&mut app, "2");
        press(&mut app, KeyCode::Enter);

        let sizes: Vec<_> = app.store().teams().iter().map(|t| t.len()).collect();
        assert_eq!(sizes, [2, 2, 1]);
        assert_eq!(app.last_mode, DistributionMode::TeamSize);
    }

    #[test]
    fn blank_quantity_stays_in_form() {
        let (mut app, _dir) = app();
        add_people(&mut app, &["A"]);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        match &app.mode {
            Mode::Distributing(form) => assert!(form.error.is_some()),
            _ => panic!("form should stay open"),
        }
    }

    #[test]
    fn score_form_coerces_text_to_zero() {
        let (mut app, _dir) = app();
        add_people(&mut app, &["Bob"]);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "15");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store().users()[0].score, 15);

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "abc");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store().users()[0].score, 0);
    }

    #[test]
    fn removal_needs_confirmation() {
        let (mut app, _dir) = app();
        add_people(&mut app, &["A", "B"]);
        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store().users().len(), 2);

        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.store().users(), [Participant::new("A")]);
        assert_eq!(app.roster_cursor.selected, 0);
    }

    #[test]
    fn manual_save_confirms_with_notice() {
        let (mut app, _dir) = app();
        add_people(&mut app, &["A"]);
        press(&mut app, KeyCode::Char('s'));
        assert!(matches!(app.mode, Mode::Notice(_)));
        assert_eq!(load_state(app.store().connection()), *app.store().state());
    }

    #[test]
    fn export_writes_backup_into_export_dir() {
        let (mut app, dir) = app();
        add_people(&mut app, &["A", "B"]);
        distribute(&mut app, "1");
        press(&mut app, KeyCode::Char('x'));

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        let raw = std::fs::read_to_string(&files[0]).unwrap();
        let backup: Backup = serde_json::from_str(&raw).unwrap();
        assert_eq!(backup.users, app.store().users());
        assert_eq!(backup.teams, app.store().teams());
    }

    #[test]
    fn theme_and_sort_toggle() {
        let (mut app, _dir) = app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme(), Theme::Light);
        assert_eq!(load_theme(app.store().connection()), Theme::Light);

        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn quit_keys_exit() {
        let (mut app, _dir) = app();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn draw_shows_people_and_teams() {
        let (mut app, _dir) = app();
        add_people(&mut app, &["Ada", "Bo"]);
        distribute(&mut app, "1");

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Team 1"));
        assert!(screen.contains("Ada"));
        assert!(screen.contains("Strength: 0"));
    }
}
