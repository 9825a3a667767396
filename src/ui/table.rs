//! The expense table as plain data: one row per record plus the total, and
//! the id-keyed dispatch that row actions go through.

use rust_decimal::Decimal;
use std::fmt::Write as _;

use crate::models::{total_amount, Expense, ExpenseId};
use crate::session::{Notify, Session};
use crate::ui::util::{escape_markup, format_money};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableRow {
    /// 1-based position in the rendered table. Not the record id.
    pub(crate) index: usize,
    pub(crate) id: ExpenseId,
    pub(crate) title: String,
    pub(crate) amount: String,
    pub(crate) category: String,
    pub(crate) date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw {
            "edit" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// What a dispatched row action left for the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Dispatched {
    EditOpened,
    ConfirmDelete(String),
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ExpenseTable {
    rows: Vec<TableRow>,
    total: Decimal,
}

impl ExpenseTable {
    /// Rebuilds from scratch. The total covers exactly `records`, so a
    /// filtered projection gets a filtered total.
    pub(crate) fn build(records: &[Expense]) -> Self {
        let rows = records
            .iter()
            .enumerate()
            .map(|(i, e)| TableRow {
                index: i + 1,
                id: e.id,
                title: e.title.clone(),
                amount: format_money(e.amount, 2),
                category: e.category.clone(),
                date: e.date_str(),
            })
            .collect();
        Self {
            rows,
            total: total_amount(records),
        }
    }

    pub(crate) fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn total(&self) -> Decimal {
        self.total
    }

    pub(crate) fn total_line(&self) -> String {
        format!("Total: {}", format_money(self.total(), 2))
    }

    /// Row position (0-based, as the cursor holds it) to record id.
    pub(crate) fn resolve(&self, row: usize) -> Option<ExpenseId> {
        self.rows.get(row).map(|r| r.id)
    }

    /// Reads a delegated event off the markup: the button's `data-action`
    /// and `data-id` attribute values.
    pub(crate) fn resolve_markup(action: &str, id: &str) -> Option<(RowAction, ExpenseId)> {
        Some((RowAction::parse(action)?, id.parse().ok()?))
    }

    pub(crate) fn to_html(&self) -> String {
        let mut out = String::from(
            "<table class=\"expenses\">\n  <thead>\n    <tr><th>#</th><th>Title</th><th>Amount</th><th>Category</th><th>Date</th><th>Actions</th></tr>\n  </thead>\n  <tbody>\n",
        );
        for row in &self.rows {
            // Infallible: writing into a String.
            let _ = writeln!(
                out,
                "    <tr data-id=\"{id}\"><td>{index}</td><td>{title}</td><td>{amount}</td><td>{category}</td><td>{date}</td><td>{edit}{delete}</td></tr>",
                id = row.id,
                index = row.index,
                title = escape_markup(&row.title),
                amount = row.amount,
                category = escape_markup(&row.category),
                date = escape_markup(&row.date),
                edit = button(RowAction::Edit, row.id),
                delete = button(RowAction::Delete, row.id),
            );
        }
        let _ = write!(
            out,
            "  </tbody>\n</table>\n<p class=\"total\">{}</p>\n",
            escape_markup(&self.total_line())
        );
        out
    }
}

fn button(action: RowAction, id: ExpenseId) -> String {
    let label = match action {
        RowAction::Edit => "Edit",
        RowAction::Delete => "Delete",
    };
    format!(
        "<button data-action=\"{}\" data-id=\"{id}\">{label}</button>",
        action.as_str()
    )
}

/// Routes a row action to the session by record id. Edit of a vanished id
/// is ignored quietly; delete of one is reported through `notify`.
pub(crate) fn dispatch(
    session: &mut Session,
    action: RowAction,
    id: ExpenseId,
    notify: &mut impl Notify,
) -> Dispatched {
    match action {
        RowAction::Edit if session.open_edit(id) => Dispatched::EditOpened,
        RowAction::Edit => Dispatched::Ignored,
        RowAction::Delete => match session.request_delete(id, notify) {
            Some(question) => Dispatched::ConfirmDelete(question),
            None => Dispatched::Ignored,
        },
    }
}
