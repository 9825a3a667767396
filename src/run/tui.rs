use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::LocalSet;

use crate::api::{self, ExpenseStore, Outcome, Request, RestClient};
use crate::config::Config;
use crate::db::Database;
use crate::session::{category_totals, CategoryFilter, Notice, Notify, Session};
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

const TICK: Duration = Duration::from_millis(50);

/// Runs each request as its own local task. Requests may overlap; outcomes
/// are applied in arrival order, so the last `List` to land wins.
struct Dispatcher {
    store: Rc<dyn ExpenseStore>,
    tx: mpsc::UnboundedSender<Outcome>,
}

impl Dispatcher {
    fn send(&self, request: Request) {
        if request.is_mutation() {
            tracing::debug!(?request, "dispatching mutation");
        }
        let store = Rc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::task::spawn_local(async move {
            let outcome = api::execute(store.as_ref(), request).await;
            // Receiver only goes away on shutdown.
            let _ = tx.send(outcome);
        });
    }
}

pub(crate) fn as_tui(config: &Config, db: &mut Database) -> Result<()> {
    let store: Rc<dyn ExpenseStore> =
        Rc::new(RestClient::new(config).context("Failed to build HTTP client")?);
    let mut app = App::new(Session::new(db.monthly_limit()?));
    app.refresh();

    let runtime = super::runtime()?;
    tracing::info!(api_url = %config.api_url, "starting TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let local = LocalSet::new();
    let result = local.block_on(&runtime, run_app(&mut terminal, &mut app, db, store));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "TUI exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
    store: Rc<dyn ExpenseStore>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher { store, tx };
    let mut ticker = tokio::time::interval(TICK);

    while app.running {
        for request in app.take_requests() {
            app.in_flight += 1;
            dispatcher.send(request);
        }

        terminal.draw(|f| {
            // tab, status, command, banner, totals bars + 2 borders + header
            let content_height = f.area().height.saturating_sub(8) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        tokio::select! {
            Some(outcome) = rx.recv() => app.apply(outcome),
            _ = ticker.tick() => {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        handle_key(key, app, db)?;
                    }
                }
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app),
        InputMode::Command => handle_command_input(key, app, db),
        InputMode::Form => handle_form_input(key, app),
        InputMode::Confirm => handle_confirm_input(key, app),
    }
    Ok(())
}

fn handle_normal_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('1') => app.screen = Screen::Expenses,
        KeyCode::Char('2') => app.screen = Screen::Categories,
        KeyCode::Tab | KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            app.screen = screens[(idx + 1) % screens.len()];
        }
        KeyCode::Char('a') => {
            app.screen = Screen::Expenses;
            app.open_entry_form();
        }
        KeyCode::Enter if app.screen == Screen::Categories => filter_to_selected_category(app),
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = app.selected_id() {
                app.open_edit_form(id);
            }
        }
        KeyCode::Char('D') if app.screen == Screen::Expenses => {
            if let Some(id) = app.selected_id() {
                app.begin_delete(id);
            }
        }
        KeyCode::Char('f') => {
            let categories = app.session.cache().categories();
            app.session.filter = app.session.filter.cycle(&categories);
            app.rebuild_table();
            app.set_status(format!("Filter: {}", app.session.filter));
        }
        KeyCode::Char('s') => {
            app.session.sort = app.session.sort.next();
            app.rebuild_table();
            app.set_status(format!("Sort: {}", app.session.sort));
        }
        KeyCode::Char('r') => {
            app.refresh();
            app.set_status("Refreshing…");
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.set_status(""),
        _ => {}
    }
}

fn filter_to_selected_category(app: &mut App) {
    let totals = category_totals(app.session.cache().records());
    if let Some((name, _)) = totals.get(app.category_index) {
        app.session.filter = CategoryFilter::Only(name.clone());
        app.screen = Screen::Expenses;
        app.expense_index = 0;
        app.expense_scroll = 0;
        app.rebuild_table();
        app.set_status(format!("Filter: {name}"));
    }
}

fn handle_command_input(key: KeyEvent, app: &mut App, db: &mut Database) {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            if let Err(e) = commands::handle_command(&input, app, db) {
                tracing::warn!(error = %e, command = %input, "command failed");
                app.status.notify(Notice::error(format!("{e:#}")));
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

fn handle_form_input(key: KeyEvent, app: &mut App) {
    let focus = app.form_focus;
    match key.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => app.form_focus = focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.form_focus = focus.prev(),
        KeyCode::Backspace => {
            if let Some(form) = app.active_form_mut() {
                form.field_mut(focus).pop();
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = app.active_form_mut() {
                form.field_mut(focus).clear();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.active_form_mut() {
                form.field_mut(focus).push(c);
            }
        }
        _ => {}
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_confirm(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Enter => {
            app.answer_confirm(false)
        }
        _ => {}
    }
}

fn category_count(app: &App) -> usize {
    app.session.cache().categories().len()
}

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Expenses => {
            let len = app.table.len();
            scroll_down(&mut app.expense_index, &mut app.expense_scroll, len, app.visible_rows);
        }
        Screen::Categories => {
            if app.category_index + 1 < category_count(app) {
                app.category_index += 1;
            }
        }
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Expenses => scroll_up(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Categories => app.category_index = app.category_index.saturating_sub(1),
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Expenses => scroll_to_top(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Categories => app.category_index = 0,
    }
}

fn handle_goto_bottom(app: &mut App) {
    match app.screen {
        Screen::Expenses => {
            let len = app.table.len();
            scroll_to_bottom(&mut app.expense_index, &mut app.expense_scroll, len, app.visible_rows);
        }
        Screen::Categories => app.category_index = category_count(app).saturating_sub(1),
    }
}
