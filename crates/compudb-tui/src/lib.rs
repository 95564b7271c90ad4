// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use compudb_app::{
    AppCommand, AppState, Company, Computer, ComputerFormInput, ComputerId, EntityState, FormField,
    Location, Route, SortDirection, SortField, SortSpec,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;

const SORT_MARK_ASC: &str = "▲";
const SORT_MARK_DESC: &str = "▼";

/// List columns in render order. The company column has no sort key; the
/// server cannot order by a joined name.
const LIST_COLUMNS: [(&str, Option<SortField>); 7] = [
    ("id", Some(SortField::Id)),
    ("name", Some(SortField::Name)),
    ("introduced", Some(SortField::Introduced)),
    ("removed", Some(SortField::Removed)),
    ("hardware", Some(SortField::Hardware)),
    ("software", Some(SortField::Software)),
    ("company", None),
];

/// Everything the views need that the runtime can answer. The real
/// implementation goes over HTTP; tests substitute a recording fake.
pub trait AppRuntime {
    fn list_computers(&mut self, sort: &SortSpec) -> Result<Vec<Computer>>;
    fn fetch_computer(&mut self, id: ComputerId) -> Result<Computer>;
    fn create_computer(&mut self, record: &Computer) -> Result<Computer>;
    fn update_computer(&mut self, record: &Computer) -> Result<Computer>;
    fn delete_computer(&mut self, id: ComputerId) -> Result<()>;
    fn list_companies(&mut self) -> Result<Vec<Company>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormUiState {
    input: ComputerFormInput,
    field_index: usize,
    error: Option<String>,
}

impl FormUiState {
    fn new(input: ComputerFormInput) -> Self {
        Self {
            input,
            field_index: 0,
            error: None,
        }
    }

    fn active_field(&self) -> FormField {
        FormField::ALL[self.field_index % FormField::ALL.len()]
    }
}

#[derive(Debug, Default)]
struct ViewData {
    computers: EntityState<Computer>,
    companies: EntityState<Company>,
    selected_row: usize,
    selected_col: usize,
    form: Option<FormUiState>,
    status_token: u64,
    help_visible: bool,
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let initial = state.location;
    open_location(state, runtime, &mut view_data, &internal_tx, initial);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &mut ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Navigates and runs the fetches the target view depends on. A failed
/// fetch lands in the status line; the view still opens.
fn open_location<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    location: Location,
) {
    state.dispatch(AppCommand::Navigate(location));
    view_data.form = None;
    view_data.help_visible = false;

    match location.route {
        Route::ComputerList => {
            let sort = location.sort;
            if let Err(error) = view_data.computers.load_list(|| runtime.list_computers(&sort)) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error:#}"));
            }
            clamp_selection(view_data);
        }
        Route::ComputerDetail(id) | Route::ComputerDelete(id) => {
            view_data.computers.reset();
            if let Err(error) = view_data.computers.load_one(|| runtime.fetch_computer(id)) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error:#}"));
            }
        }
        Route::ComputerNew => {
            view_data.computers.reset();
            load_companies(state, runtime, view_data, internal_tx);
            view_data.form = Some(FormUiState::new(ComputerFormInput::blank()));
        }
        Route::ComputerEdit(id) => {
            view_data.computers.reset();
            load_companies(state, runtime, view_data, internal_tx);
            match view_data.computers.load_one(|| runtime.fetch_computer(id)) {
                Ok(()) => {
                    let input = view_data
                        .computers
                        .entity
                        .as_ref()
                        .map(ComputerFormInput::from_record)
                        .unwrap_or_default();
                    view_data.form = Some(FormUiState::new(input));
                }
                Err(error) => {
                    emit_status(state, view_data, internal_tx, format!("load failed: {error:#}"));
                }
            }
        }
    }
}

fn load_companies<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if let Err(error) = view_data.companies.load_list(|| runtime.list_companies()) {
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("company list failed: {error:#}"),
        );
    }
}

fn clamp_selection(view_data: &mut ViewData) {
    let rows = view_data.computers.entities.len();
    if rows == 0 {
        view_data.selected_row = 0;
    } else if view_data.selected_row >= rows {
        view_data.selected_row = rows - 1;
    }
    view_data.selected_col = view_data.selected_col.min(LIST_COLUMNS.len() - 1);
}

fn selected_computer_id(view_data: &ViewData) -> Option<ComputerId> {
    view_data
        .computers
        .entities
        .get(view_data.selected_row)
        .and_then(|computer| computer.id)
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            view_data.help_visible = false;
        }
        return false;
    }

    if view_data.form.is_some() {
        handle_form_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match state.location.route {
        Route::ComputerList => handle_list_key(state, runtime, view_data, internal_tx, key),
        Route::ComputerDetail(id) => {
            handle_detail_key(state, runtime, view_data, internal_tx, key, id)
        }
        Route::ComputerDelete(id) => {
            handle_delete_key(state, runtime, view_data, internal_tx, key, id);
            false
        }
        // Form routes without a form means the record failed to load.
        Route::ComputerNew | Route::ComputerEdit(_) => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                let location = Location::list(state.location.sort);
                open_location(state, runtime, view_data, internal_tx, location);
            }
            false
        }
    }
}

fn handle_list_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Down | KeyCode::Char('j') => {
            let rows = view_data.computers.entities.len();
            if rows > 0 && view_data.selected_row + 1 < rows {
                view_data.selected_row += 1;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_data.selected_row = view_data.selected_row.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if view_data.selected_col + 1 < LIST_COLUMNS.len() {
                view_data.selected_col += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            view_data.selected_col = view_data.selected_col.saturating_sub(1);
        }
        KeyCode::Char('s') => toggle_sort(state, runtime, view_data, internal_tx),
        KeyCode::Char('r') => {
            let location = state.location;
            open_location(state, runtime, view_data, internal_tx, location);
            emit_status(state, view_data, internal_tx, "list refreshed");
        }
        KeyCode::Enter => {
            if let Some(id) = selected_computer_id(view_data) {
                let location = Location {
                    route: Route::ComputerDetail(id),
                    sort: state.location.sort,
                };
                open_location(state, runtime, view_data, internal_tx, location);
            }
        }
        KeyCode::Char('n') => {
            let location = Location {
                route: Route::ComputerNew,
                sort: state.location.sort,
            };
            open_location(state, runtime, view_data, internal_tx, location);
        }
        KeyCode::Char('e') => {
            if let Some(id) = selected_computer_id(view_data) {
                let location = Location {
                    route: Route::ComputerEdit(id),
                    sort: state.location.sort,
                };
                open_location(state, runtime, view_data, internal_tx, location);
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = selected_computer_id(view_data) {
                let location = Location {
                    route: Route::ComputerDelete(id),
                    sort: state.location.sort,
                };
                open_location(state, runtime, view_data, internal_tx, location);
            }
        }
        _ => {}
    }
    false
}

fn toggle_sort<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some((label, field)) = LIST_COLUMNS.get(view_data.selected_col).copied() else {
        return;
    };
    let Some(field) = field else {
        emit_status(state, view_data, internal_tx, format!("{label} is not sortable"));
        return;
    };

    state.dispatch(AppCommand::ToggleSort(field));
    let sort = state.location.sort;
    if let Err(error) = view_data.computers.load_list(|| runtime.list_computers(&sort)) {
        emit_status(state, view_data, internal_tx, format!("load failed: {error:#}"));
        return;
    }
    clamp_selection(view_data);
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("sort {} {}", sort.field.as_str(), sort.direction.as_str()),
    );
}

fn handle_detail_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    id: ComputerId,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Esc | KeyCode::Char('b') => {
            let location = Location::list(state.location.sort);
            open_location(state, runtime, view_data, internal_tx, location);
        }
        KeyCode::Char('e') => {
            let location = Location {
                route: Route::ComputerEdit(id),
                sort: state.location.sort,
            };
            open_location(state, runtime, view_data, internal_tx, location);
        }
        KeyCode::Char('d') => {
            let location = Location {
                route: Route::ComputerDelete(id),
                sort: state.location.sort,
            };
            open_location(state, runtime, view_data, internal_tx, location);
        }
        _ => {}
    }
    false
}

fn handle_delete_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    id: ComputerId,
) {
    match key.code {
        KeyCode::Char('y') => {
            let outcome = view_data.computers.remove(|| runtime.delete_computer(id));
            match outcome {
                Ok(()) => {
                    let location = Location::list(state.location.sort);
                    open_location(state, runtime, view_data, internal_tx, location);
                    emit_status(state, view_data, internal_tx, "computer deleted");
                }
                Err(error) => {
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("delete failed: {error:#}"),
                    );
                }
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            let location = Location {
                route: Route::ComputerDetail(id),
                sort: state.location.sort,
            };
            open_location(state, runtime, view_data, internal_tx, location);
        }
        _ => {}
    }
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            let target = match state.location.route {
                Route::ComputerEdit(id) => Location {
                    route: Route::ComputerDetail(id),
                    sort: state.location.sort,
                },
                _ => Location::list(state.location.sort),
            };
            open_location(state, runtime, view_data, internal_tx, target);
        }
        KeyCode::Enter => submit_form(state, runtime, view_data, internal_tx),
        KeyCode::Down => {
            if let Some(form) = view_data.form.as_mut() {
                form.field_index = (form.field_index + 1) % FormField::ALL.len();
            }
        }
        KeyCode::Up => {
            if let Some(form) = view_data.form.as_mut() {
                form.field_index =
                    (form.field_index + FormField::ALL.len() - 1) % FormField::ALL.len();
            }
        }
        KeyCode::Tab => {
            let choices: Vec<_> = view_data
                .companies
                .entities
                .iter()
                .map(|company| company.id)
                .collect();
            if let Some(form) = view_data.form.as_mut()
                && form.active_field() == FormField::Company
            {
                form.input.company = next_company_choice(form.input.company, &choices);
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = view_data.form.as_mut() {
                let field = form.active_field();
                if let Some(text) = field_text_mut(&mut form.input, field) {
                    text.pop();
                }
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = view_data.form.as_mut() {
                let field = form.active_field();
                if let Some(text) = field_text_mut(&mut form.input, field) {
                    text.push(c);
                }
            }
        }
        _ => {}
    }
}

/// Cycles none -> first -> ... -> last -> none.
fn next_company_choice(current: Option<compudb_app::CompanyId>, choices: &[compudb_app::CompanyId]) -> Option<compudb_app::CompanyId> {
    match current {
        None => choices.first().copied(),
        Some(id) => {
            let position = choices.iter().position(|choice| *choice == id);
            match position {
                Some(index) if index + 1 < choices.len() => Some(choices[index + 1]),
                _ => None,
            }
        }
    }
}

fn field_text_mut(input: &mut ComputerFormInput, field: FormField) -> Option<&mut String> {
    match field {
        FormField::Name => Some(&mut input.name),
        FormField::Introduced => Some(&mut input.introduced),
        FormField::Removed => Some(&mut input.removed),
        FormField::Hardware => Some(&mut input.hardware),
        FormField::Software => Some(&mut input.software),
        FormField::Company => None,
    }
}

/// Validates locally first; a form that fails validation never touches
/// the runtime.
fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = view_data.form.clone() else {
        return;
    };

    let record = match form
        .input
        .into_record(view_data.computers.entity.as_ref(), &view_data.companies.entities)
    {
        Ok(record) => record,
        Err(error) => {
            let message = format!("{error:#}");
            if let Some(active) = view_data.form.as_mut() {
                active.error = Some(message.clone());
            }
            emit_status(state, view_data, internal_tx, message);
            return;
        }
    };

    let outcome = if form.input.is_new() {
        view_data.computers.persist(|| runtime.create_computer(&record))
    } else {
        view_data.computers.persist(|| runtime.update_computer(&record))
    };

    match outcome {
        Ok(()) => {
            let location = Location::list(state.location.sort);
            open_location(state, runtime, view_data, internal_tx, location);
            emit_status(state, view_data, internal_tx, "computer saved");
        }
        Err(error) => {
            let message = format!("save failed: {error:#}");
            if let Some(active) = view_data.form.as_mut() {
                active.error = Some(message.clone());
            }
            emit_status(state, view_data, internal_tx, message);
        }
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let header = Paragraph::new(state.location.to_string())
        .style(Style::default().fg(Color::White))
        .block(Block::default().title("compudb").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    match state.location.route {
        Route::ComputerList => render_list(frame, layout[1], state, view_data),
        Route::ComputerDetail(_) => render_detail(frame, layout[1], view_data),
        Route::ComputerNew | Route::ComputerEdit(_) => render_form(frame, layout[1], view_data),
        Route::ComputerDelete(_) => {
            render_detail(frame, layout[1], view_data);
        }
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Route::ComputerDelete(_) = state.location.route {
        let area = centered_rect(50, 28, frame.area());
        frame.render_widget(Clear, area);
        let confirm = Paragraph::new(delete_overlay_text(view_data)).block(
            Block::default()
                .title("delete computer")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(confirm, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 62, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_list(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    if view_data.computers.entities.is_empty() && !view_data.computers.loading {
        let notice = Paragraph::new("no computers found")
            .block(Block::default().borders(Borders::ALL).title("computers"));
        frame.render_widget(notice, area);
        return;
    }

    let header_cells: Vec<Cell> = LIST_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, (label, field))| {
            let text = header_label(*label, *field, state.location.sort);
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if index == view_data.selected_col {
                style = style.fg(Color::Cyan);
            }
            Cell::from(text).style(style)
        })
        .collect();

    let rows: Vec<Row> = view_data
        .computers
        .entities
        .iter()
        .enumerate()
        .map(|(index, computer)| {
            let cells = vec![
                Cell::from(computer.id.map(|id| id.get().to_string()).unwrap_or_default()),
                Cell::from(computer.name.clone()),
                Cell::from(display_date(computer.introduced)),
                Cell::from(display_date(computer.removed)),
                Cell::from(display_count(computer.hardware)),
                Cell::from(display_count(computer.software)),
                Cell::from(
                    computer
                        .company
                        .as_ref()
                        .map(|company| company.name.clone())
                        .unwrap_or_default(),
                ),
            ];
            let mut row = Row::new(cells);
            if index == view_data.selected_row {
                row = row.style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );
            }
            row
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Min(16),
    ];
    let table = Table::new(rows, widths)
        .header(Row::new(header_cells))
        .block(Block::default().borders(Borders::ALL).title("computers"));
    frame.render_widget(table, area);
}

fn header_label(label: &str, field: Option<SortField>, sort: SortSpec) -> String {
    match field {
        Some(field) if field == sort.field => {
            let mark = match sort.direction {
                SortDirection::Asc => SORT_MARK_ASC,
                SortDirection::Desc => SORT_MARK_DESC,
            };
            format!("{label} {mark}")
        }
        _ => label.to_owned(),
    }
}

fn render_detail(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let body = Paragraph::new(detail_text(view_data))
        .block(Block::default().borders(Borders::ALL).title("computer"));
    frame.render_widget(body, area);
}

fn detail_text(view_data: &ViewData) -> String {
    let Some(computer) = view_data.computers.entity.as_ref() else {
        return "computer not loaded".to_owned();
    };

    [
        format!(
            "id: {}",
            computer.id.map(|id| id.get().to_string()).unwrap_or_default()
        ),
        format!("name: {}", computer.name),
        format!("introduced: {}", display_date(computer.introduced)),
        format!("removed: {}", display_date(computer.removed)),
        format!("hardware: {}", display_count(computer.hardware)),
        format!("software: {}", display_count(computer.software)),
        format!(
            "company: {}",
            computer
                .company
                .as_ref()
                .map(|company| company.name.as_str())
                .unwrap_or("")
        ),
    ]
    .join("\n")
}

fn render_form(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let title = match view_data.form.as_ref().map(|form| form.input.is_new()) {
        Some(true) => "new computer",
        _ => "edit computer",
    };
    let body = Paragraph::new(form_text(view_data))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(body, area);
}

fn form_text(view_data: &ViewData) -> String {
    let Some(form) = view_data.form.as_ref() else {
        return "record not loaded; press esc to go back".to_owned();
    };

    let mut lines = Vec::with_capacity(FormField::ALL.len() + 2);
    for field in FormField::ALL {
        let marker = if field == form.active_field() { ">" } else { " " };
        let value = match field {
            FormField::Name => form.input.name.clone(),
            FormField::Introduced => form.input.introduced.clone(),
            FormField::Removed => form.input.removed.clone(),
            FormField::Hardware => form.input.hardware.clone(),
            FormField::Software => form.input.software.clone(),
            FormField::Company => company_choice_label(&form.input, &view_data.companies.entities),
        };
        let mut line = format!("{marker} {}: {value}", field.label());
        if let Some(error) = form.input.field_error(field) {
            line.push_str(&format!("  ({error})"));
        }
        lines.push(line);
    }

    lines.push(String::new());
    match form.error.as_deref() {
        Some(error) => lines.push(format!("error: {error}")),
        None => lines.push("enter: save  esc: cancel  tab: cycle company".to_owned()),
    }
    lines.join("\n")
}

fn company_choice_label(input: &ComputerFormInput, companies: &[Company]) -> String {
    match input.company {
        None => "(none)".to_owned(),
        Some(id) => companies
            .iter()
            .find(|company| company.id == id)
            .map(|company| company.name.clone())
            .unwrap_or_else(|| format!("company {}", id.get())),
    }
}

fn delete_overlay_text(view_data: &ViewData) -> String {
    let name = view_data
        .computers
        .entity
        .as_ref()
        .map(|computer| computer.name.as_str())
        .unwrap_or("this computer");
    format!("delete {name}?\n\ny: confirm  n/esc: cancel")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(message) = state.status_line.as_deref() {
        return message.to_owned();
    }
    if view_data.computers.loading || view_data.companies.loading {
        return "loading...".to_owned();
    }
    if view_data.computers.updating {
        return "saving...".to_owned();
    }
    if let Some(error) = view_data.computers.last_error.as_deref() {
        return format!("error: {error}");
    }
    match state.location.route {
        Route::ComputerList => {
            format!(
                "{} computers  |  s: sort  enter: view  n: new  e: edit  d: delete  ?: help",
                view_data.computers.entities.len()
            )
        }
        Route::ComputerDetail(_) => "e: edit  d: delete  esc: back".to_owned(),
        Route::ComputerNew | Route::ComputerEdit(_) => "enter: save  esc: cancel".to_owned(),
        Route::ComputerDelete(_) => "y: confirm  n: cancel".to_owned(),
    }
}

fn help_overlay_text() -> String {
    [
        "list",
        "  j/k, arrows   move selection",
        "  h/l           move column",
        "  s             sort by selected column",
        "  r             refresh",
        "  enter         view computer",
        "  n             new computer",
        "  e             edit computer",
        "  d             delete computer",
        "",
        "form",
        "  up/down       move between fields",
        "  tab           cycle company",
        "  enter         save",
        "  esc           cancel",
        "",
        "  q / ctrl-q    quit",
        "  ?             toggle this help",
    ]
    .join("\n")
}

fn display_date(date: Option<Date>) -> String {
    date.map(|date| date.to_string()).unwrap_or_default()
}

fn display_count(value: Option<i64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
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
