use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use guest_lookup::{GuestRecord, Session};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_SIZE: usize = 20;

pub struct App {
    pub session: Session,
    pub query: String,
    pub filtered: Vec<GuestRecord>,
    pub state: TableState,
    pub show_detail: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        let mut app = Self {
            session,
            query: String::new(),
            filtered: Vec::new(),
            state: TableState::default(),
            show_detail: false,
        };
        app.apply_filter();
        app
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_guest(&self) -> Option<&GuestRecord> {
        self.state.selected().and_then(|i| self.filtered.get(i))
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.apply_filter();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.apply_filter();
    }

    pub fn apply_filter(&mut self) {
        self.filtered = self
            .session
            .directory()
            .search(&self.query)
            .into_iter()
            .cloned()
            .collect();

        // Reset selection to first item
        if self.filtered.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) => len - 1,
            Some(i) => i - 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE_SIZE).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_SIZE));
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Backspace => app.pop_char(),
                KeyCode::Char(c) => app.push_char(c),
                KeyCode::Down => app.next(),
                KeyCode::Up => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home if !app.filtered.is_empty() => app.state.select(Some(0)),
                KeyCode::End if !app.filtered.is_empty() => {
                    app.state.select(Some(app.filtered.len() - 1));
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(0),    // Roster
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_search(f, chunks[0], app);

    if app.show_detail {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_roster(f, content[0], app);
        render_detail_panel(f, content[1], app);
    } else {
        render_roster(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_search(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled("Find someone: ", Style::default().fg(Color::Cyan)),
        Span::styled(app.query.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("▏", Style::default().fg(Color::DarkGray)),
    ]);
    let search = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Guest Directory"));
    f.render_widget(search, area);
}

fn render_roster(f: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Table"),
        Cell::from("ID"),
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .filtered
        .iter()
        .map(|g| {
            Row::new(vec![
                Cell::from(g.name.clone()),
                Cell::from(g.table.clone()),
                Cell::from(g.identifier.clone()).style(Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let title = if app.filtered.is_empty() {
        "No guests found".to_string()
    } else {
        format!("{} guests", app.filtered.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Guest");

    let Some(guest) = app.selected_guest() else {
        f.render_widget(Paragraph::new("Nothing selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan);
    let mut lines = vec![
        Line::from(vec![Span::styled("Name:  ", label), Span::raw(guest.name.as_str())]),
        Line::from(vec![Span::styled("Table: ", label), Span::raw(guest.table.as_str())]),
        Line::from(vec![Span::styled("ID:    ", label), Span::raw(guest.identifier.as_str())]),
        Line::from(""),
    ];

    match app.session.partner(&guest.identifier) {
        Some(partner) => {
            lines.push(Line::from(Span::styled(
                "Someone to meet",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(format!("{} (table {})", partner.name, partner.table)));
        }
        None if app.session.meet_enabled() => {
            lines.push(Line::from(Span::styled(
                "No meet suggestion",
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => {}
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let directory = app.session.directory();
    let text = format!(
        "{} guests │ {} pairings │ type to filter · ↑↓ move · Enter details · Esc quit",
        directory.len(),
        app.session.relation().len(),
    );
    let status = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let text = "ID,Name,Table,Person to Meet\nA1,Jane Doe,5,B1\nB1,John Smith,5,\nC1,Ann Adams,2,\n";
        App::new(Session::from_text(text).unwrap())
    }

    #[test]
    fn test_new_selects_first_in_roster_order() {
        let app = app();
        assert_eq!(app.filtered.len(), 3);
        assert_eq!(app.selected_guest().unwrap().name, "Ann Adams");
    }

    #[test]
    fn test_typing_filters() {
        let mut app = app();
        app.push_char('j');
        app.push_char('o');
        let names: Vec<&str> = app.filtered.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["John Smith"]);

        app.push_char('z');
        assert!(app.filtered.is_empty());
        assert!(app.selected_guest().is_none());

        app.pop_char();
        assert_eq!(app.filtered.len(), 1);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
        app.page_down();
        assert_eq!(app.state.selected(), Some(2));
        app.page_up();
        assert_eq!(app.state.selected(), Some(0));
    }
}
