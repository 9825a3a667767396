use anyhow::{Context, Result};
use dialoguer::Confirm;
use std::path::PathBuf;

use crate::api::{ExpenseStore, RestClient};
use crate::config::Config;
use crate::db::Database;
use crate::export;
use crate::models::{Expense, ExpenseId, FormField};
use crate::session::{drive, CategoryFilter, Notice, NoticeLevel, Notify, Session, SortOrder, UserPrompt};
use crate::ui::table::ExpenseTable;
use crate::ui::util::format_money;

pub(crate) fn as_cli(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(&args[2..], config, db),
        "show" => cli_show(&args[2..], config),
        "add" => cli_add(&args[2..], config, db),
        "update" => cli_update(&args[2..], config, db),
        "delete" | "rm" => cli_delete(&args[2..], config, db),
        "limit" => cli_limit(&args[2..], config, db),
        "export" => cli_export(&args[2..], config, db),
        "html" => cli_html(&args[2..], config, db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expensetui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ExpenseTUI - terminal client for a remote expense-tracking API");
    println!();
    println!("Usage: expensetui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  list                          List expenses with totals and limit status");
    println!("    --category <name>           Only this category ('all' for every one)");
    println!("    --sort <key>                none, date-desc, date-asc, amount-desc, amount-asc");
    println!("  show <id>                     Show a single expense");
    println!("  add <title> <amount> <category> <YYYY-MM-DD>");
    println!("                                Create an expense");
    println!("  update <id>                   Update an expense; unspecified fields are kept");
    println!("    --title, --amount, --category, --date <value>");
    println!("  delete <id> [--yes]           Delete an expense after confirmation");
    println!("  limit [value]                 Show or set the monthly spending limit");
    println!("  export [path] [--category C] [--sort KEY]");
    println!("                                Export expenses to CSV");
    println!("  html [path] [--category C] [--sort KEY]");
    println!("                                Export expenses as an HTML table");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

/// Prints notices as they arrive and remembers whether any was an error,
/// so the command can exit non-zero.
struct CliPrompt {
    assume_yes: bool,
    failed: bool,
}

impl CliPrompt {
    fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            failed: false,
        }
    }

    fn finish(self) -> Result<()> {
        if self.failed {
            anyhow::bail!("Operation failed");
        }
        Ok(())
    }
}

impl Notify for CliPrompt {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                self.failed = true;
                eprintln!("Error: {}", notice.message);
            }
            NoticeLevel::Warning => eprintln!("Warning: {}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => println!("{}", notice.message),
        }
    }
}

impl UserPrompt for CliPrompt {
    fn confirm(&mut self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "confirmation prompt failed; treating as no");
                false
            })
    }
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

/// First argument that is neither a `--flag` nor a flag's value.
fn positional(args: &[String]) -> Option<&str> {
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if arg == "--yes" || arg == "-y" {
            continue;
        }
        if arg.starts_with("--") {
            skip = true;
            continue;
        }
        return Some(arg.as_str());
    }
    None
}

fn parse_id(raw: Option<&str>, usage: &str) -> Result<ExpenseId> {
    let raw = raw.ok_or_else(|| anyhow::anyhow!("{usage}"))?;
    raw.parse::<ExpenseId>()
        .with_context(|| format!("Invalid expense id: {raw}"))
}

fn apply_view_flags(session: &mut Session, args: &[String]) -> Result<()> {
    if let Some(category) = flag(args, "--category") {
        session.filter = CategoryFilter::parse(category);
    }
    if let Some(raw) = flag(args, "--sort") {
        session.sort = SortOrder::parse(raw).ok_or_else(|| {
            let keys: Vec<&str> = SortOrder::all().iter().map(|s| s.as_str()).collect();
            anyhow::anyhow!("Unknown sort '{raw}'. Use one of: {}", keys.join(", "))
        })?;
    }
    Ok(())
}

/// Loads the cache once. A failed fetch is already reported through `prompt`.
fn loaded_session(
    runtime: &tokio::runtime::Runtime,
    store: &RestClient,
    db: &Database,
    prompt: &mut CliPrompt,
) -> Result<Session> {
    let mut session = Session::new(db.monthly_limit()?);
    let request = session.refresh();
    runtime.block_on(drive(store, &mut session, prompt, request));
    Ok(session)
}

fn connect(config: &Config) -> Result<(tokio::runtime::Runtime, RestClient)> {
    let store = RestClient::new(config).context("Failed to build HTTP client")?;
    Ok((super::runtime()?, store))
}

fn print_table(records: &[Expense]) {
    let table = ExpenseTable::build(records);
    if table.is_empty() {
        println!("No expenses");
        return;
    }

    println!(
        "{:<4} {:<6} {:<28} {:>12}  {:<16} Date",
        "#", "ID", "Title", "Amount", "Category"
    );
    println!("{}", "─".repeat(82));
    for row in table.rows() {
        println!(
            "{:<4} {:<6} {:<28} {:>12}  {:<16} {}",
            row.index,
            row.id.to_string(),
            crate::ui::util::truncate(&row.title, 28),
            row.amount,
            crate::ui::util::truncate(&row.category, 16),
            row.date,
        );
    }
    println!("{}", "─".repeat(82));
    println!("{}", table.total_line());
}

fn cli_list(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let (runtime, store) = connect(config)?;
    let mut prompt = CliPrompt::new(false);
    let mut session = loaded_session(&runtime, &store, db, &mut prompt)?;
    apply_view_flags(&mut session, args)?;

    if session.cache().fetch_error().is_none() {
        print_table(&session.projection());
        println!();
        let status = session.limit_status();
        println!("{}", status.message());
    }
    prompt.finish()
}

fn cli_show(args: &[String], config: &Config) -> Result<()> {
    let id = parse_id(args.first().map(String::as_str), "Usage: expensetui show <id>")?;
    let (runtime, store) = connect(config)?;

    let expense = runtime
        .block_on(store.get(id))
        .with_context(|| format!("Failed to fetch expense {id}"))?
        .ok_or_else(|| anyhow::anyhow!("Expense {id} not found"))?;

    println!("ID:       {}", expense.id);
    println!("Title:    {}", expense.title);
    println!("Amount:   {}", format_money(expense.amount, 2));
    println!("Category: {}", expense.category);
    println!("Date:     {}", expense.date_str());
    Ok(())
}

fn cli_add(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    if args.len() < 4 {
        anyhow::bail!("Usage: expensetui add <title> <amount> <category> <YYYY-MM-DD>");
    }

    let (runtime, store) = connect(config)?;
    let mut prompt = CliPrompt::new(false);
    let mut session = Session::new(db.monthly_limit()?);
    session.entry.title = args[0].clone();
    session.entry.amount = args[1].clone();
    session.entry.category = args[2].clone();
    session.entry.date = args[3].clone();

    if let Some(request) = session.submit_entry(&mut prompt) {
        runtime.block_on(drive(&store, &mut session, &mut prompt, request));
        if session.cache().fetch_error().is_none() {
            println!("{}", session.limit_status().message());
        }
    }
    prompt.finish()
}

fn cli_update(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let id = parse_id(
        positional(args),
        "Usage: expensetui update <id> [--title T] [--amount A] [--category C] [--date D]",
    )?;

    let (runtime, store) = connect(config)?;
    let mut prompt = CliPrompt::new(false);
    let mut session = loaded_session(&runtime, &store, db, &mut prompt)?;
    if session.cache().fetch_error().is_some() {
        return prompt.finish();
    }

    if !session.open_edit(id) {
        anyhow::bail!("Expense {id} not found");
    }

    let overrides = [
        (FormField::Title, "--title"),
        (FormField::Amount, "--amount"),
        (FormField::Category, "--category"),
        (FormField::Date, "--date"),
    ];
    if let Some(form) = session.edit_form_mut() {
        for (field, name) in overrides {
            if let Some(value) = flag(args, name) {
                *form.field_mut(field) = value.to_string();
            }
        }
    }

    if let Some(request) = session.submit_edit(&mut prompt) {
        runtime.block_on(drive(&store, &mut session, &mut prompt, request));
    }
    prompt.finish()
}

fn cli_delete(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let id = parse_id(positional(args), "Usage: expensetui delete <id> [--yes]")?;
    let assume_yes = args.iter().any(|a| a == "--yes" || a == "-y");

    let (runtime, store) = connect(config)?;
    let mut prompt = CliPrompt::new(assume_yes);
    let mut session = loaded_session(&runtime, &store, db, &mut prompt)?;
    if session.cache().fetch_error().is_some() {
        return prompt.finish();
    }

    match session.delete_with(id, &mut prompt) {
        Some(request) => runtime.block_on(drive(&store, &mut session, &mut prompt, request)),
        None if !prompt.failed => println!("Cancelled"),
        None => {}
    }
    prompt.finish()
}

fn cli_limit(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let Some(raw) = args.first() else {
        println!("{}", db.monthly_limit()?.label());
        return Ok(());
    };

    let mut prompt = CliPrompt::new(false);
    let mut session = Session::new(db.monthly_limit()?);
    if session.set_limit(raw, db, &mut prompt)?.is_none() {
        return prompt.finish();
    }

    // The limit is saved either way; an unreachable server only skips the
    // re-evaluation.
    let (runtime, store) = connect(config)?;
    let request = session.refresh();
    runtime.block_on(drive(&store, &mut session, &mut prompt, request));
    if session.cache().fetch_error().is_none() {
        println!("{}", session.limit_status().message());
    }
    Ok(())
}

fn export_target(args: &[String], default_name: &str) -> PathBuf {
    match positional(args) {
        Some(path) => PathBuf::from(shellexpand(path)),
        None => PathBuf::from(default_name),
    }
}

fn cli_export(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let path = export_target(args, "expenses.csv");
    let (runtime, store) = connect(config)?;
    let mut prompt = CliPrompt::new(false);
    let mut session = loaded_session(&runtime, &store, db, &mut prompt)?;
    apply_view_flags(&mut session, args)?;
    if session.cache().fetch_error().is_some() {
        return prompt.finish();
    }

    let count = export::write_csv(&path, &session.projection())?;
    println!("Exported {count} expenses to {}", path.display());
    Ok(())
}

fn cli_html(args: &[String], config: &Config, db: &mut Database) -> Result<()> {
    let path = export_target(args, "expenses.html");
    let (runtime, store) = connect(config)?;
    let mut prompt = CliPrompt::new(false);
    let mut session = loaded_session(&runtime, &store, db, &mut prompt)?;
    apply_view_flags(&mut session, args)?;
    if session.cache().fetch_error().is_some() {
        return prompt.finish();
    }

    let table = ExpenseTable::build(&session.projection());
    let count = export::write_html(&path, &table)?;
    println!("Wrote {count} rows to {}", path.display());
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flag_reads_following_value() {
        let args = strings(&["12", "--title", "Rent", "--amount", "100"]);
        assert_eq!(flag(&args, "--title"), Some("Rent"));
        assert_eq!(flag(&args, "--amount"), Some("100"));
        assert_eq!(flag(&args, "--date"), None);
    }

    #[test]
    fn test_positional_skips_flags_and_values() {
        let args = strings(&["--category", "Food", "out.csv", "--sort", "date-asc"]);
        assert_eq!(positional(&args), Some("out.csv"));
        let args = strings(&["--yes", "7"]);
        assert_eq!(positional(&args), Some("7"));
        assert_eq!(positional(&strings(&["--sort", "none"])), None);
    }

    #[test]
    fn test_view_flags_reject_unknown_sort() {
        let mut session = Session::default();
        let args = strings(&["--category", "Food", "--sort", "amount-desc"]);
        apply_view_flags(&mut session, &args).unwrap();
        assert_eq!(session.filter, CategoryFilter::Only("Food".into()));
        assert_eq!(session.sort, SortOrder::AmountDesc);

        assert!(apply_view_flags(&mut session, &strings(&["--sort", "random"])).is_err());
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let mut prompt = CliPrompt::new(true);
        assert!(prompt.confirm("Delete?"));
    }

    #[test]
    fn test_shellexpand_home() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        assert_eq!(shellexpand("~/x.csv"), format!("{home}/x.csv"));
        assert_eq!(shellexpand("/tmp/x.csv"), "/tmp/x.csv");
    }
}
