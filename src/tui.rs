use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs,
        Wrap,
    },
};
use std::io::stdout;
use std::time::Duration;
use tracing::info;

use crate::filters::SearchFilters;
use crate::forms::{Editable, Form, FormSet};
use crate::models::{ApplicationStatus, Posting, Severity, Tab};
use crate::session::Session;
use crate::views::{self, ApplicationsView, SavedView};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveDialog {
    Application,
    Details,
    Profile,
    Company,
}

pub struct App {
    session: Session,
    forms: FormSet,
    filters: SearchFilters,
    editing_query: bool,
    selected: usize,
    scroll_offset: u16,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            forms: FormSet::default(),
            filters: SearchFilters::default(),
            editing_query: false,
            selected: 0,
            scroll_offset: 0,
        }
    }

    #[cfg(test)]
    fn session(&self) -> &Session {
        &self.session
    }

    fn current_len(&self) -> usize {
        match self.session.tab() {
            Tab::Browse => views::browse_view(&self.session, &self.filters).len(),
            Tab::Applications => self.session.applications().len(),
            Tab::Saved => match views::saved_view(&self.session) {
                SavedView::Empty(_) => 0,
                SavedView::Postings(p) => p.len(),
            },
        }
    }

    fn current_posting(&self) -> Option<&Posting> {
        match self.session.tab() {
            Tab::Browse => views::browse_view(&self.session, &self.filters)
                .get(self.selected)
                .map(|row| row.posting),
            Tab::Saved => match views::saved_view(&self.session) {
                SavedView::Empty(_) => None,
                SavedView::Postings(p) => p.get(self.selected).copied(),
            },
            Tab::Applications => None,
        }
    }

    fn active_dialog(&self) -> Option<ActiveDialog> {
        let dialogs = self.session.dialogs();
        if !dialogs.any_open() {
            return None;
        }
        if dialogs.application && self.forms.application().is_some() {
            Some(ActiveDialog::Application)
        } else if dialogs.details {
            Some(ActiveDialog::Details)
        } else if dialogs.profile && self.forms.profile().is_some() {
            Some(ActiveDialog::Profile)
        } else if dialogs.company && self.forms.company().is_some() {
            Some(ActiveDialog::Company)
        } else {
            None
        }
    }

    fn next(&mut self) {
        let len = self.current_len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.session.change_tab(tab);
        self.selected = 0;
        self.scroll_offset = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.current_len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Handles one key press. Returns true when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let quit = match self.active_dialog() {
            Some(ActiveDialog::Application) => {
                match form_key(key) {
                    FormKey::Cancel => self.forms.cancel_application(&mut self.session),
                    FormKey::Confirm => self.forms.confirm_application(&mut self.session),
                    edit => {
                        if let Some(form) = self.forms.application_mut() {
                            apply_edit(form, edit);
                        }
                    }
                }
                false
            }
            Some(ActiveDialog::Profile) => {
                match form_key(key) {
                    FormKey::Cancel => self.forms.cancel_profile(&mut self.session),
                    FormKey::Confirm => self.forms.confirm_profile(&mut self.session),
                    edit => {
                        if let Some(form) = self.forms.profile_mut() {
                            apply_edit(form, edit);
                        }
                    }
                }
                false
            }
            Some(ActiveDialog::Company) => {
                match form_key(key) {
                    FormKey::Cancel => self.forms.cancel_company(&mut self.session),
                    FormKey::Confirm => self.forms.confirm_company(&mut self.session),
                    edit => {
                        if let Some(form) = self.forms.company_mut() {
                            apply_edit(form, edit);
                        }
                    }
                }
                false
            }
            Some(ActiveDialog::Details) => {
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => self.session.close_details(),
                    KeyCode::Enter | KeyCode::Char('a') => {
                        self.forms.apply_from_details(&mut self.session)
                    }
                    KeyCode::Char('s') => {
                        if let Some(id) = self.session.selected_posting().map(|p| p.id) {
                            self.session.toggle_saved(id);
                        }
                    }
                    _ => {}
                }
                false
            }
            None if self.editing_query => {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => self.editing_query = false,
                    KeyCode::Backspace => {
                        self.filters.query.pop();
                    }
                    KeyCode::Char(c) => self.filters.query.push(c),
                    _ => {}
                }
                self.selected = 0;
                false
            }
            None => self.handle_main_key(key),
        };
        self.clamp_selection();
        quit
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> bool {
        let posting_id = self.current_posting().map(|p| p.id);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('1') => self.switch_tab(Tab::Browse),
            KeyCode::Char('2') => self.switch_tab(Tab::Applications),
            KeyCode::Char('3') => self.switch_tab(Tab::Saved),
            KeyCode::Tab => self.switch_tab(self.session.tab().next()),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => self.scroll_down(),
            KeyCode::Char('K') | KeyCode::PageUp => self.scroll_up(),
            KeyCode::Char('s') => {
                if let Some(id) = posting_id {
                    self.session.toggle_saved(id);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = posting_id {
                    self.session.open_details(id);
                }
            }
            KeyCode::Char('a') => {
                if let Some(id) = posting_id {
                    self.forms.open_apply(&mut self.session, id);
                }
            }
            KeyCode::Char('p') => self.forms.open_profile(&mut self.session),
            KeyCode::Char('c') => self.forms.open_company(&mut self.session),
            KeyCode::Char('x') => self.session.dismiss_notification(),
            KeyCode::Char('/') if self.session.tab() == Tab::Browse => self.editing_query = true,
            KeyCode::Char('l') if self.session.tab() == Tab::Browse => {
                self.filters.cycle_location();
                self.selected = 0;
            }
            KeyCode::Char('t') if self.session.tab() == Tab::Browse => {
                self.filters.cycle_kind();
                self.selected = 0;
            }
            _ => {}
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKey {
    Cancel,
    Confirm,
    Next,
    Prev,
    Cycle,
    Backspace,
    Input(char),
    Ignore,
}

fn form_key(key: KeyEvent) -> FormKey {
    match key.code {
        KeyCode::Esc => FormKey::Cancel,
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => FormKey::Confirm,
        KeyCode::Tab | KeyCode::Down | KeyCode::Enter => FormKey::Next,
        KeyCode::BackTab | KeyCode::Up => FormKey::Prev,
        KeyCode::Left | KeyCode::Right => FormKey::Cycle,
        KeyCode::Backspace => FormKey::Backspace,
        KeyCode::Char(c) => FormKey::Input(c),
        _ => FormKey::Ignore,
    }
}

fn apply_edit<T: Editable>(form: &mut Form<T>, edit: FormKey) {
    match edit {
        FormKey::Next => form.next_field(),
        FormKey::Prev => form.prev_field(),
        FormKey::Cycle => form.cycle_choice(),
        FormKey::Backspace => form.backspace(),
        FormKey::Input(c) => form.push_char(c),
        FormKey::Cancel | FormKey::Confirm | FormKey::Ignore => {}
    }
}

pub fn run(session: Session) -> Result<()> {
    let mut app = App::new(session);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    info!(
        applications = app.session.applications().len(),
        saved = app.session.saved_ids().len(),
        "session ended"
    );
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    break;
                }
            }
        }
        app.session.tick(Utc::now());
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let titles: Vec<String> = Tab::ALL
        .iter()
        .map(|tab| views::tab_label(*tab, &app.session))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" C.I.T "))
        .select(app.session.tab().index())
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, rows[0]);

    match app.session.tab() {
        Tab::Browse => draw_browse(frame, app, rows[1]),
        Tab::Applications => draw_applications(frame, app, rows[1]),
        Tab::Saved => draw_saved(frame, app, rows[1]),
    }

    if let Some(n) = app.session.notification() {
        let color = match n.severity {
            Severity::Success => Color::Green,
            Severity::Info => Color::Cyan,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        let line = Paragraph::new(format!(" {} (x to dismiss)", n.message))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        frame.render_widget(line, rows[2]);
    }

    let help = Paragraph::new(help_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[3]);

    match app.active_dialog() {
        Some(ActiveDialog::Details) => draw_details_dialog(frame, app),
        Some(ActiveDialog::Application) => {
            if let Some(form) = app.forms.application() {
                let mut header = Vec::new();
                if let Some(posting) = app.session.selected_posting() {
                    header.push(Line::from(format!("{} • {}", posting.company, posting.location)));
                }
                let profile = app.session.profile();
                header.push(Line::from(Span::styled(
                    format!(
                        "{} <{}> {}  (from your profile)",
                        profile.full_name, profile.email, profile.phone
                    ),
                    Style::default().fg(Color::DarkGray),
                )));
                let title = app
                    .session
                    .selected_posting()
                    .map(|p| format!(" Apply for {} ", p.title))
                    .unwrap_or_else(|| " Apply ".to_string());
                draw_form(frame, &title, header, form);
            }
        }
        Some(ActiveDialog::Profile) => {
            if let Some(form) = app.forms.profile() {
                draw_form(frame, " Edit Profile ", Vec::new(), form);
            }
        }
        Some(ActiveDialog::Company) => {
            if let Some(form) = app.forms.company() {
                draw_form(frame, " Company Profile ", Vec::new(), form);
            }
        }
        None => {}
    }
}

fn help_text(app: &App) -> &'static str {
    match app.active_dialog() {
        Some(ActiveDialog::Details) => " a:apply  s:save/unsave  esc:close",
        Some(_) => " tab/shift-tab:field  left/right:choose  ctrl-s:save  esc:cancel",
        None if app.editing_query => " type to search  enter/esc:done",
        None => {
            " 1/2/3:tabs  j/k:navigate  enter:details  a:apply  s:save  /:search  l:location  t:type  p:profile  c:company  q:quit"
        }
    }
}

fn posting_item(posting: &Posting, saved: bool) -> ListItem<'static> {
    let mark = if saved { "*" } else { " " };
    let title = if posting.title.chars().count() > 35 {
        format!("{}...", posting.title.chars().take(32).collect::<String>())
    } else {
        posting.title.clone()
    };
    ListItem::new(format!("{} #{:<3} {} | {}", mark, posting.id, title, posting.company))
}

fn split_list_detail(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area)
}

fn draw_browse(frame: &mut Frame, app: &App, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let query_style = if app.editing_query {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let filter_line = Line::from(vec![
        Span::raw(" Search: "),
        Span::styled(format!("[{}]", app.filters.query), query_style),
        Span::raw(format!(
            "  Location: {}  Type: {}",
            app.filters.location_label(),
            app.filters.kind_label()
        )),
    ]);
    frame.render_widget(Paragraph::new(filter_line), parts[0]);

    let chunks = split_list_detail(parts[1]);
    let rows = views::browse_view(&app.session, &app.filters);
    let items: Vec<ListItem> = rows.iter().map(|r| posting_item(r.posting, r.saved)).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(if app.filters.is_empty() {
                    format!(" Internships ({}) ", rows.len())
                } else {
                    format!(" Internships ({} matching) ", rows.len())
                }),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    let posting = rows.get(app.selected).map(|r| r.posting);
    draw_posting_detail(frame, app, posting, chunks[1]);
}

fn draw_saved(frame: &mut Frame, app: &App, area: Rect) {
    match views::saved_view(&app.session) {
        SavedView::Empty(message) => draw_placeholder(frame, " Saved Internships ", message, area),
        SavedView::Postings(postings) => {
            let chunks = split_list_detail(area);
            let items: Vec<ListItem> = postings.iter().map(|p| posting_item(p, true)).collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" Saved Internships ({}) ", postings.len())),
                )
                .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
                .highlight_symbol("> ");
            let mut list_state = ListState::default().with_selected(Some(app.selected));
            frame.render_stateful_widget(list, chunks[0], &mut list_state);
            draw_posting_detail(frame, app, postings.get(app.selected).copied(), chunks[1]);
        }
    }
}

fn draw_applications(frame: &mut Frame, app: &App, area: Rect) {
    let rows = match views::applications_view(&app.session) {
        ApplicationsView::Empty(message) => {
            draw_placeholder(frame, " My Applications ", message, area);
            return;
        }
        ApplicationsView::Rows(rows) => rows,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|r| {
            let status_style = match r.status {
                ApplicationStatus::Pending => Style::default().fg(Color::Yellow),
                _ => Style::default().fg(Color::Green),
            };
            Row::new(vec![
                Line::from(r.position.clone()),
                Line::from(r.company.clone()),
                Line::from(r.applied_date.clone()),
                Line::from(Span::styled(r.status.as_str(), status_style)),
            ])
        })
        .collect();
    let table = Table::new(
        table_rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(18),
            Constraint::Percentage(17),
        ],
    )
    .header(
        Row::new(vec!["Position", "Company", "Applied Date", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" My Applications ({}) ", rows.len())),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray));
    let mut table_state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, chunks[0], &mut table_state);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(application) = app.session.applications().get(app.selected) {
        lines.push(Line::from(Span::styled(
            application.internship.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("at {}", application.internship.company)));
        lines.push(Line::from(format!(
            "Submitted: {}",
            application.submitted_date.format("%Y-%m-%d %H:%M UTC")
        )));
        push_field(&mut lines, "Available Start Date", &application.available_start_date);
        push_field(&mut lines, "Expected Graduation", &application.expected_graduation);
        push_field(&mut lines, "Resume", &application.resume_file_name);
        lines.push(Line::from(""));
        push_block(&mut lines, "Cover Letter", &application.cover_letter);
        push_block(&mut lines, "Additional Information", &application.additional_info);
    }
    let detail = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Application "))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset, 0));
    frame.render_widget(detail, chunks[1]);
}

fn push_field(lines: &mut Vec<Line<'static>>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(Line::from(format!("{}: {}", label, value)));
    }
}

fn push_block(lines: &mut Vec<Line<'static>>, label: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    lines.push(Line::from(Span::styled(
        label.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for line in textwrap::fill(text, 70).lines() {
        lines.push(Line::from(format!("  {}", line)));
    }
    lines.push(Line::from(""));
}

fn draw_placeholder(frame: &mut Frame, title: &str, message: &str, area: Rect) {
    let placeholder = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(placeholder, area);
}

fn draw_posting_detail(frame: &mut Frame, app: &App, posting: Option<&Posting>, area: Rect) {
    let text = match posting {
        Some(posting) => Text::from(posting_lines(posting, app.session.is_saved(posting.id))),
        None => Text::raw("No internship selected"),
    };
    let detail = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset, 0));
    frame.render_widget(detail, area);
}

fn posting_lines(posting: &Posting, saved: bool) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        posting.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("{} • {}", posting.company, posting.location)));
    lines.push(Line::from(Span::styled(
        format!("{} | {} | {}", posting.kind, posting.duration, posting.stipend),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(format!("Posted: {}", posting.posted_date)));
    if saved {
        lines.push(Line::from(Span::styled("Saved", Style::default().fg(Color::Green))));
    }
    lines.push(Line::from(""));

    push_block(&mut lines, "Description", &posting.description);
    push_block(&mut lines, "Requirements", &posting.requirements);
    if !posting.skills.is_empty() {
        lines.push(Line::from(Span::styled(
            "Required Skills",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  {}", posting.skills.join(", "))));
    }

    lines
}

fn draw_details_dialog(frame: &mut Frame, app: &App) {
    let Some(posting) = app.session.selected_posting() else {
        return;
    };
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);
    let dialog = Paragraph::new(Text::from(posting_lines(
        posting,
        app.session.is_saved(posting.id),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", posting.title)),
    )
    .wrap(Wrap { trim: false });
    frame.render_widget(dialog, area);
}

fn draw_form<T: Editable>(frame: &mut Frame, title: &str, header: Vec<Line<'static>>, form: &Form<T>) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = header;
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    for field in T::FIELDS {
        let focused = *field == form.focused();
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let marker = if focused { "> " } else { "  " };
        let mut value = form.draft().value(*field).to_string();
        if focused && T::choices(*field).is_none() {
            value.push('_');
        }
        if let Some(choices) = T::choices(*field) {
            value = format!("< {} >  ({})", value, choices.join(" | "));
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{}{}: ", marker, T::label(*field)), label_style),
            Span::raw(value),
        ]));
    }

    let dialog = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(Wrap { trim: false });
    frame.render_widget(dialog, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        App::new(Session::new(Catalog::sample()))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_save_toggle_from_browse() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.session().saved_ids(), &[2u32]);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.session().saved_ids().is_empty());
    }

    #[test]
    fn test_apply_flow_through_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.active_dialog(), Some(ActiveDialog::Application));

        type_text(&mut app, "2024-06-01");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "cv.pdf");
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert_eq!(app.active_dialog(), None);
        let apps = app.session().applications();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].internship.id, 1);
        assert_eq!(apps[0].available_start_date, "2024-06-01");
        assert_eq!(apps[0].resume_file_name, "cv.pdf");
    }

    #[test]
    fn test_escape_cancels_form_without_quitting() {
        let mut app = app();
        press(&mut app, KeyCode::Char('p'));
        type_text(&mut app, "zzz");
        assert!(!press(&mut app, KeyCode::Esc));
        assert_eq!(app.session().profile().full_name, "John Doe");
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_details_then_apply() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.active_dialog(), Some(ActiveDialog::Details));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.active_dialog(), Some(ActiveDialog::Application));
        assert_eq!(app.session().selected_posting().map(|p| p.id), Some(3));
    }

    #[test]
    fn test_unsaving_last_saved_row_clamps_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected, 1);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.selected, 0);
        assert_eq!(app.session().saved_ids(), &[1u32]);
    }

    #[test]
    fn test_search_query_narrows_browse_list() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "figma");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.current_len(), 1);
        assert_eq!(app.current_posting().map(|p| p.id), Some(3));
        // 'q' typed while searching goes into the query, not quit
        press(&mut app, KeyCode::Char('/'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.filters.query, "figmaq");
    }

    #[test]
    fn test_render_browse_screen() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        let screen = render(&app);
        assert!(screen.contains("Browse Internships"));
        assert!(screen.contains("My Applications (0)"));
        assert!(screen.contains("Saved (1)"));
        assert!(screen.contains("Frontend Developer Intern"));
        assert!(screen.contains("Internship saved!"));
    }

    #[test]
    fn test_render_empty_states() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert!(render(&app).contains("No applications yet"));
        press(&mut app, KeyCode::Char('3'));
        assert!(render(&app).contains("No saved internships yet"));
    }

    #[test]
    fn test_render_applications_table() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        press(&mut app, KeyCode::Char('2'));
        let screen = render(&app);
        assert!(screen.contains("Applied Date"));
        assert!(screen.contains("Pending"));
        assert!(!screen.contains("No applications yet"));
    }
}
