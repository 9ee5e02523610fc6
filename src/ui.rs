use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kfo_studio::{
    catalog, AccessSequencer, AppShell, BookingRecord, BookingStore, GateState, Page,
    TransitionPhase, SLOT_COUNT,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Redraw / clock resolution
const FRAME: Duration = Duration::from_millis(33);

pub struct App {
    pub shell: AppShell,
    pub store: Arc<dyn BookingStore>,
    pub bookings: Vec<BookingRecord>,
    pub bookings_error: Option<String>,
    pub state: TableState,
    pub show_detail: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(gate: AccessSequencer, store: Arc<dyn BookingStore>) -> Self {
        Self {
            shell: AppShell::new(gate),
            store,
            bookings: Vec::new(),
            bookings_error: None,
            state: TableState::default(),
            show_detail: false,
            should_quit: false,
        }
    }

    /// Reload bookings from the store; a failure renders as an empty list
    pub fn reload_bookings(&mut self) {
        match self.store.list_all() {
            Ok(bookings) => {
                self.bookings = bookings;
                self.bookings_error = None;
            }
            Err(e) => {
                self.bookings.clear();
                self.bookings_error = Some(e.to_string());
            }
        }

        if self.bookings.is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn selected_booking(&self) -> Option<&BookingRecord> {
        self.state.selected().and_then(|i| self.bookings.get(i))
    }

    pub fn tick(&mut self, dt: Duration) {
        let was_granted = self.shell.is_granted();
        self.shell.tick(dt);

        if !was_granted && self.shell.is_granted() {
            self.reload_bookings();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(gate) = self.shell.gate_mut() {
            let focus = gate.focus();
            match key.code {
                KeyCode::Esc => self.should_quit = true,
                KeyCode::Char(c) => {
                    gate.edit_slot(focus, &c.to_string());
                }
                KeyCode::Backspace => {
                    if gate.attempt().is_slot_empty(focus) {
                        gate.backspace(focus);
                    } else {
                        gate.edit_slot(focus, "");
                    }
                }
                KeyCode::Left => gate.focus_slot(focus.saturating_sub(1)),
                KeyCode::Right => gate.focus_slot((focus + 1).min(SLOT_COUNT - 1)),
                KeyCode::Enter => {
                    gate.submit();
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.shell.next_page(),
            KeyCode::BackTab => self.shell.previous_page(),
            KeyCode::Char('1') => self.shell.show(Page::Services),
            KeyCode::Char('2') => self.shell.show(Page::Pricing),
            KeyCode::Char('3') => self.shell.show(Page::Bookings),
            KeyCode::Char('r') => self.reload_bookings(),
            KeyCode::Enter if self.shell.page() == Page::Bookings => {
                self.show_detail = !self.show_detail;
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if let Some(gate) = self.shell.gate_mut() {
            gate.paste_sequence(text);
        }
    }

    pub fn next(&mut self) {
        let len = self.bookings.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.bookings.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut last = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }

        let now = Instant::now();
        app.tick(now - last);
        last = now;
    }

    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let area = f.size();
    if let Some(gate) = app.shell.gate() {
        render_gate(f, area, gate);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    render_header(f, chunks[0], app);

    match app.shell.page() {
        Page::Services => render_services(f, chunks[1]),
        Page::Pricing => render_pricing(f, chunks[1]),
        Page::Bookings if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            render_bookings(f, content_chunks[0], app);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::Bookings => render_bookings(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_gate(f: &mut Frame, area: Rect, gate: &AccessSequencer) {
    let accent = match (gate.state(), gate.phase()) {
        (GateState::Error, _) => Color::Red,
        (_, Some(TransitionPhase::Glow)) => Color::LightYellow,
        (_, Some(TransitionPhase::Ripple)) | (_, Some(TransitionPhase::Reveal)) => Color::LightGreen,
        (_, Some(TransitionPhase::Fade)) => Color::Gray,
        (GateState::Unlocking, _) | (GateState::Granted, _) => Color::Green,
        _ => Color::White,
    };

    let mut boxes = vec![];
    for (i, slot) in gate.attempt().digits().iter().enumerate() {
        if i > 0 {
            boxes.push(Span::raw("   "));
        }

        let letter = slot.map(|c| c.to_string()).unwrap_or_else(|| "_".to_string());
        let mut style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
        if i == gate.focus() && !gate.is_locked() {
            style = style.add_modifier(Modifier::UNDERLINED).fg(Color::Yellow);
        }
        boxes.push(Span::styled(format!("[ {} ]", letter), style));
    }

    let message = match (gate.state(), gate.phase()) {
        (GateState::Error, _) => Span::styled("Wrong code", Style::default().fg(Color::Red)),
        (_, Some(TransitionPhase::Reveal)) | (_, Some(TransitionPhase::Fade)) => {
            Span::styled("Welcome to KFO", Style::default().fg(Color::Green))
        }
        (GateState::Unlocking, _) => Span::styled("Unlocked", Style::default().fg(Color::Green)),
        _ => Span::styled("Enter access code", Style::default().fg(Color::DarkGray)),
    };

    let mut lines = vec![Line::from(""), Line::from(boxes), Line::from(""), Line::from(message)];

    // Ripple: rings spread with elapsed transition time
    if gate.phase() == Some(TransitionPhase::Ripple) {
        let rings = gate
            .transition_elapsed()
            .map(|t| ((t.as_millis() / 150) % 6) as usize + 1)
            .unwrap_or(1);
        lines.push(Line::from(Span::styled(
            "◯ ".repeat(rings),
            Style::default().fg(Color::LightGreen),
        )));
    }

    let border = if gate.phase() == Some(TransitionPhase::Glow) {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(accent)
    };

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" K F O "),
        );

    f.render_widget(panel, centered(area, 40, 9));
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Services, Page::Pricing, Page::Bookings];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.shell.page() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Bookings: {}", app.bookings.len()),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.store.backend_name(),
        Style::default().fg(Color::Cyan),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" KFO Studio "),
    );

    f.render_widget(header, area);
}

fn render_services(f: &mut Frame, area: Rect) {
    let mut lines = vec![];
    for service in catalog::services() {
        lines.push(Line::from(vec![
            Span::styled(
                service.name,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  from ${}", service.starting_price),
                Style::default().fg(Color::Green),
            ),
        ]));
        lines.push(Line::from(Span::raw(format!("  {}", service.summary))));
        lines.push(Line::from(""));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Services "));

    f.render_widget(panel, area);
}

fn render_pricing(f: &mut Frame, area: Rect) {
    let tiers = catalog::pricing();
    let constraints: Vec<Constraint> = tiers
        .iter()
        .map(|_| Constraint::Ratio(1, tiers.len() as u32))
        .collect();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (tier, column) in tiers.iter().zip(columns.iter()) {
        let mut lines = vec![
            Line::from(Span::styled(
                format!("${}", tier.price),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for item in &tier.includes {
            lines.push(Line::from(format!("• {}", item)));
        }

        let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} ", tier.name)),
        );

        f.render_widget(card, *column);
    }
}

fn render_bookings(f: &mut Frame, area: Rect, app: &mut App) {
    if let Some(err) = &app.bookings_error {
        let panel = Paragraph::new(format!("Could not load bookings: {}", err))
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title(" Bookings "));
        f.render_widget(panel, area);
        return;
    }

    let header_cells = ["#", "Received", "Name", "Phone", "Project"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.bookings.iter().map(|b| {
        Row::new(vec![
            Cell::from(b.id.to_string()),
            Cell::from(b.created_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::from(truncate(&b.name, 24)),
            Cell::from(b.phone.clone()),
            Cell::from(b.project_type.label()).style(Style::default().fg(Color::Cyan)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(18),
            Constraint::Length(26),
            Constraint::Length(18),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Bookings "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let Some(booking) = app.selected_booking() else {
        let empty = Paragraph::new("No booking selected")
            .block(Block::default().borders(Borders::ALL).title(" Detail "));
        f.render_widget(empty, area);
        return;
    };

    let label = Style::default().fg(Color::Yellow);
    let field = |name: &'static str, value: Option<&str>| {
        Line::from(vec![
            Span::styled(format!("{:<12}", name), label),
            Span::raw(value.unwrap_or("—").to_string()),
        ])
    };

    let lines = vec![
        field("Name", Some(booking.name.as_str())),
        field("Phone", Some(booking.phone.as_str())),
        field("Project", Some(booking.project_type.label())),
        field("Budget", booking.budget.as_deref()),
        field("Timeline", booking.timeline.as_deref()),
        field("Audience", booking.audience.as_deref()),
        field("Goal", booking.goal.as_deref()),
        field("Mood", booking.mood.as_deref()),
        Line::from(""),
        Line::from(Span::styled("Description", label)),
        Line::from(booking.description.clone().unwrap_or_default()),
    ];

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Booking #{} ", booking.id)),
    );

    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if app.shell.page() == Page::Bookings {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Row: {}/{} ", selected, app.bookings.len()),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Details | "));
        status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Reload | "));
    }

    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kfo_studio::{BookingInput, MemoryStore};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let store = Arc::new(MemoryStore::new());
        store
            .create(BookingInput {
                name: "Ana Reyes".to_string(),
                phone: "555".to_string(),
                project_type: "video".to_string(),
                ..Default::default()
            })
            .unwrap();
        App::new(AccessSequencer::new(true), store)
    }

    fn type_keys(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_code_unlocks_and_loads_bookings() {
        let mut app = app();
        type_keys(&mut app, "kfo");

        app.tick(Duration::from_millis(100));
        app.tick(Duration::from_millis(800));

        assert!(app.shell.is_granted());
        assert_eq!(app.bookings.len(), 1);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_q_is_a_letter_while_gated() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('q')));

        assert!(!app.should_quit);
        assert_eq!(app.shell.gate().and_then(|g| g.attempt().get(0)), Some('Q'));
    }

    #[test]
    fn test_backspace_clears_then_steps_back() {
        let mut app = app();
        type_keys(&mut app, "k");
        app.handle_key(press(KeyCode::Left));
        assert_eq!(app.shell.gate().map(|g| g.focus()), Some(0));

        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.shell.gate().and_then(|g| g.attempt().get(0)), None);

        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.shell.gate().map(|g| g.focus()), Some(0));
    }

    #[test]
    fn test_paste_unlocks() {
        let mut app = app();
        app.handle_paste("KFO");
        app.tick(Duration::from_secs(2));

        assert!(app.shell.is_granted());
    }

    #[test]
    fn test_page_keys_after_grant() {
        let mut app = app();
        app.handle_paste("kfo");
        app.tick(Duration::from_secs(2));

        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.shell.page(), Page::Pricing);
        app.handle_key(press(KeyCode::Char('3')));
        assert_eq!(app.shell.page(), Page::Bookings);

        app.handle_key(press(KeyCode::Enter));
        assert!(app.show_detail);

        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("José Ñúñez Martínez", 8), "José ...");
        assert_eq!(truncate("short", 8), "short");
    }
}
