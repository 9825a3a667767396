use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, Screen};
use super::table::{ExpenseTable, RowAction};
use crate::db::Database;
use crate::export;
use crate::models::{ExpenseId, ExpenseForm};
use crate::session::{CategoryFilter, Notice, NoticeLevel, Notify, SortOrder};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("quit", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("categories", "Go to Categories", cmd_categories, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 2024-05-01 250 Food Weekly groceries)",
        cmd_add,
        r
    );
    register_command!("edit", "Edit selected expense (or :edit <id>)", cmd_edit, r);
    register_command!(
        "delete",
        "Delete selected expense (or :delete <id>)",
        cmd_delete,
        r
    );
    register_command!(
        "filter",
        "Filter by category (e.g. :filter Food, :filter all)",
        cmd_filter,
        r
    );
    register_command!(
        "sort",
        "Sort by date-desc, date-asc, amount-desc, amount-asc or none",
        cmd_sort,
        r
    );
    register_command!("limit", "Set monthly limit (e.g. :limit 25000)", cmd_limit, r);
    register_command!("refresh", "Re-fetch expenses from the server", cmd_refresh, r);
    register_command!("r", "Re-fetch expenses from the server", cmd_refresh, r);
    register_command!(
        "export",
        "Export the current view to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );
    register_command!(
        "html",
        "Export the current view as an HTML table",
        cmd_html,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.status.notify(Notice::new(
            NoticeLevel::Warning,
            format!("Unknown command: :{cmd_name}. Did you mean :{suggestion}?"),
        ));
    }

    Ok(())
}

pub(crate) fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Explicit id argument, or the row under the cursor. Explicit ids go through
/// the same decoder as the `data-action`/`data-id` pair on exported rows.
fn target_id(action: RowAction, args: &str, app: &mut App) -> Option<ExpenseId> {
    if args.is_empty() {
        let id = app.selected_id();
        if id.is_none() {
            app.set_status("No expense selected");
        }
        return id;
    }
    match ExpenseTable::resolve_markup(action.as_str(), args) {
        Some((_, id)) => Some(id),
        None => {
            app.status
                .notify(Notice::new(NoticeLevel::Warning, format!("Invalid id: {args}")));
            None
        }
    }
}

fn export_path(args: &str, default_name: &str) -> PathBuf {
    if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(default_name)
    } else {
        PathBuf::from(crate::run::shellexpand(args))
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    Ok(())
}

fn cmd_categories(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Categories;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.open_entry_form();
        return Ok(());
    }

    // date amount category title…
    let parts: Vec<&str> = args.splitn(4, ' ').collect();
    if parts.len() < 4 {
        app.set_status("Usage: :add <YYYY-MM-DD> <amount> <category> <title>");
        return Ok(());
    }

    app.session.entry = ExpenseForm {
        title: parts[3].to_string(),
        amount: parts[1].to_string(),
        category: parts[2].to_string(),
        date: parts[0].to_string(),
    };
    if let Some(request) = app.session.submit_entry(&mut app.status) {
        app.queue(request);
        app.set_status("Adding expense…");
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if let Some(id) = target_id(RowAction::Edit, args, app) {
        app.open_edit_form(id);
    }
    Ok(())
}

fn cmd_delete(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if let Some(id) = target_id(RowAction::Delete, args, app) {
        app.begin_delete(id);
    }
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.session.filter = CategoryFilter::parse(args);
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.screen = Screen::Expenses;
    app.rebuild_table();
    app.set_status(format!(
        "Filter: {} ({} shown)",
        app.session.filter,
        app.table.len()
    ));
    Ok(())
}

fn cmd_sort(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let sort = if args.is_empty() {
        Some(app.session.sort.next())
    } else {
        SortOrder::parse(args)
    };
    match sort {
        Some(sort) => {
            app.session.sort = sort;
            app.rebuild_table();
            app.set_status(format!("Sort: {sort}"));
        }
        None => {
            let keys: Vec<&str> = SortOrder::all().iter().map(|s| s.as_str()).collect();
            app.set_status(format!("Unknown sort '{args}'. Use one of: {}", keys.join(", ")));
        }
    }
    Ok(())
}

fn cmd_limit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let label = app.session.limit().label();
        app.set_status(label);
        return Ok(());
    }
    app.session.set_limit(args, db, &mut app.status)?;
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.refresh();
    app.set_status("Refreshing…");
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let path = export_path(args, "expensetui-export.csv");
    let count = export::write_csv(&path, &app.session.projection())?;
    if count == 0 {
        app.set_status("No expenses to export");
    } else {
        app.set_status(format!("Exported {count} expenses to {}", path.display()));
    }
    Ok(())
}

fn cmd_html(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let path = export_path(args, "expensetui-export.html");
    let count = export::write_html(&path, &app.table)?;
    app.set_status(format!("Wrote {count} rows to {}", path.display()));
    Ok(())
}
