use crate::api::{Outcome, Request};
use crate::models::{ExpenseForm, ExpenseId, FormField};
use crate::session::{Notice, NoticeLevel, Notify, Session};
use crate::ui::table::{dispatch, Dispatched, ExpenseTable, RowAction};
use crate::ui::util::clamp_cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Expenses,
    Categories,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Expenses, Self::Categories]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Expenses"),
            Self::Categories => write!(f, "Categories"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Form,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Form => write!(f, "FORM"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Which modal the form keys are typing into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormKind {
    Entry,
    Edit,
}

/// Last notice shown in the command bar.
#[derive(Debug, Clone)]
pub(crate) struct StatusLine {
    pub(crate) message: String,
    pub(crate) level: NoticeLevel,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: String::new(),
            level: NoticeLevel::Info,
        }
    }
}

impl Notify for StatusLine {
    fn notify(&mut self, notice: Notice) {
        self.message = notice.message;
        self.level = notice.level;
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status: StatusLine,
    pub(crate) show_help: bool,

    pub(crate) session: Session,
    /// Rendered projection; rebuilt whenever the cache, filter or sort changes.
    pub(crate) table: ExpenseTable,

    // Expenses
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Categories
    pub(crate) category_index: usize,

    // Forms
    pub(crate) form_kind: Option<FormKind>,
    pub(crate) form_focus: FormField,

    // Confirmation
    pub(crate) confirm_message: String,

    // Network
    outbox: Vec<Request>,
    pub(crate) in_flight: usize,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            running: true,
            screen: Screen::Expenses,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status: StatusLine::default(),
            show_help: false,

            session,
            table: ExpenseTable::default(),

            expense_index: 0,
            expense_scroll: 0,

            category_index: 0,

            form_kind: None,
            form_focus: FormField::Title,

            confirm_message: String::new(),

            outbox: Vec::new(),
            in_flight: 0,

            visible_rows: 20,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status.notify(Notice::new(NoticeLevel::Info, msg));
    }

    pub(crate) fn queue(&mut self, request: Request) {
        self.outbox.push(request);
    }

    pub(crate) fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn refresh(&mut self) {
        let request = self.session.refresh();
        self.queue(request);
    }

    pub(crate) fn rebuild_table(&mut self) {
        self.table = ExpenseTable::build(&self.session.projection());
        clamp_cursor(&mut self.expense_index, &mut self.expense_scroll, self.table.len());
        let categories = self.session.cache().categories().len();
        if self.category_index >= categories {
            self.category_index = categories.saturating_sub(1);
        }
    }

    /// Feeds a finished network call into the session and queues whatever
    /// it asks for next.
    pub(crate) fn apply(&mut self, outcome: Outcome) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Some(next) = self.session.apply(outcome, &mut self.status) {
            self.queue(next);
        }
        if self.form_kind == Some(FormKind::Edit) && !self.session.edit().is_open() {
            self.leave_form();
        }
        self.rebuild_table();
    }

    pub(crate) fn selected_id(&self) -> Option<ExpenseId> {
        self.table.resolve(self.expense_index)
    }

    // ── Forms ─────────────────────────────────────────────────

    pub(crate) fn open_entry_form(&mut self) {
        if self.session.entry.date.is_empty() {
            self.session.entry.date = chrono::Local::now().format("%Y-%m-%d").to_string();
        }
        self.form_kind = Some(FormKind::Entry);
        self.form_focus = FormField::Title;
        self.input_mode = InputMode::Form;
    }

    pub(crate) fn open_edit_form(&mut self, id: ExpenseId) {
        if dispatch(&mut self.session, RowAction::Edit, id, &mut self.status)
            == Dispatched::EditOpened
        {
            self.form_kind = Some(FormKind::Edit);
            self.form_focus = FormField::Title;
            self.input_mode = InputMode::Form;
        }
    }

    pub(crate) fn active_form(&self) -> Option<&ExpenseForm> {
        match self.form_kind? {
            FormKind::Entry => Some(&self.session.entry),
            FormKind::Edit => self.session.edit().form(),
        }
    }

    pub(crate) fn active_form_mut(&mut self) -> Option<&mut ExpenseForm> {
        match self.form_kind? {
            FormKind::Entry => Some(&mut self.session.entry),
            FormKind::Edit => self.session.edit_form_mut(),
        }
    }

    /// Entry forms close on submit and keep their text if the create fails.
    /// Edit forms stay open until the update lands.
    pub(crate) fn submit_form(&mut self) {
        match self.form_kind {
            Some(FormKind::Entry) => {
                if let Some(request) = self.session.submit_entry(&mut self.status) {
                    self.queue(request);
                    self.leave_form();
                    self.set_status("Adding expense…");
                }
            }
            Some(FormKind::Edit) => {
                if let Some(request) = self.session.submit_edit(&mut self.status) {
                    self.queue(request);
                    self.set_status("Saving…");
                }
            }
            None => {}
        }
    }

    pub(crate) fn cancel_form(&mut self) {
        if self.form_kind == Some(FormKind::Edit) {
            self.session.close_edit();
        }
        self.leave_form();
    }

    fn leave_form(&mut self) {
        self.form_kind = None;
        if self.input_mode == InputMode::Form {
            self.input_mode = InputMode::Normal;
        }
    }

    // ── Delete ────────────────────────────────────────────────

    pub(crate) fn begin_delete(&mut self, id: ExpenseId) {
        if let Dispatched::ConfirmDelete(question) =
            dispatch(&mut self.session, RowAction::Delete, id, &mut self.status)
        {
            self.confirm_message = question;
            self.input_mode = InputMode::Confirm;
        }
    }

    pub(crate) fn answer_confirm(&mut self, confirmed: bool) {
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        let target = self.session.pending_delete();
        match (self.session.confirm_delete(confirmed), target) {
            (Some(request), _) => {
                self.queue(request);
                self.set_status("Deleting…");
            }
            (None, Some(id)) => self.set_status(format!("Delete of expense {id} cancelled")),
            (None, None) => self.set_status("Delete cancelled"),
        }
    }
}
