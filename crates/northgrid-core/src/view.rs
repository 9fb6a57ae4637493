// ── Customer grid state machine ──
//
// One `ViewMode` replaces independent dialog flags: at most one dialog is
// open, and while a request is in flight the form and the grid selection
// are locked. The controller never does I/O itself. `begin_*` hands out a
// `Mutation`, the caller runs it against a `CustomerApi`, and
// `finish_mutation` folds the result back in. The async `submit_*` and
// `refresh` drivers chain those steps for headless use.

use northgrid_api::CustomerRecord;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ListFailurePolicy;
use crate::error::CoreError;
use crate::form::validation::{RuleSet, ValidationReport};
use crate::form::{CustomerForm, FormField};
use crate::service::CustomerApi;

/// Shown when local validation blocks a submit.
pub const INVALID_FORM_MESSAGE: &str = "Please provide valid data for all fields.";

// ── Modes ────────────────────────────────────────────────────────────

/// Which dialog a submit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Edit,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Grid only.
    #[default]
    List,
    /// Edit dialog open on the selected record.
    Editing,
    /// Create dialog open on an empty form.
    Creating,
    /// Request in flight; the dialog stays visible but input is locked.
    Submitting { dialog: DialogKind, kind: MutationKind },
}

impl ViewMode {
    /// The dialog visible in this mode, if any.
    pub fn dialog(self) -> Option<DialogKind> {
        match self {
            Self::List => None,
            Self::Editing => Some(DialogKind::Edit),
            Self::Creating => Some(DialogKind::Create),
            Self::Submitting { dialog, .. } => Some(dialog),
        }
    }

    pub fn is_busy(self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::List => "LIST",
            Self::Editing => "EDIT",
            Self::Creating => "CREATE",
            Self::Submitting { .. } => "SAVING",
        }
    }

    fn open(dialog: DialogKind) -> Self {
        match dialog {
            DialogKind::Edit => Self::Editing,
            DialogKind::Create => Self::Creating,
        }
    }
}

// ── Mutations ────────────────────────────────────────────────────────

/// A request the controller has committed to, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create(CustomerRecord),
    Update(CustomerRecord),
    Delete { customer_id: String },
}

/// Successful result of a [`Mutation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Saved(CustomerRecord),
    Deleted,
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Create(_) => MutationKind::Create,
            Self::Update(_) => MutationKind::Update,
            Self::Delete { .. } => MutationKind::Delete,
        }
    }

    /// The record identifier this mutation concerns.
    pub fn customer_id(&self) -> &str {
        match self {
            Self::Create(r) | Self::Update(r) => &r.customer_id,
            Self::Delete { customer_id } => customer_id,
        }
    }

    pub async fn execute(&self, api: &dyn CustomerApi) -> Result<MutationOutcome, CoreError> {
        match self {
            Self::Create(record) => api.create(record).await.map(MutationOutcome::Saved),
            Self::Update(record) => api.update(record).await.map(MutationOutcome::Saved),
            Self::Delete { customer_id } => {
                api.delete(customer_id).await.map(|()| MutationOutcome::Deleted)
            }
        }
    }
}

// ── Errors ───────────────────────────────────────────────────────────

/// A transition the current mode doesn't allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("a dialog is open or a request is in flight")]
    Busy,

    #[error("no row at index {0}")]
    NoSuchRow(usize),

    #[error("cannot {action} from the {mode} view")]
    WrongDialog {
        action: &'static str,
        mode: &'static str,
    },

    #[error("no request in flight")]
    NotSubmitting,

    #[error("form is invalid: {0}")]
    Invalid(ValidationReport),
}

/// Identifies one list fetch. Results for an older ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListTicket(u64);

// ── Controller ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ViewController {
    records: Vec<CustomerRecord>,
    form: CustomerForm,
    rules: RuleSet,
    mode: ViewMode,
    error_message: Option<String>,
    cursor: usize,
    list_generation: u64,
    list_failure: ListFailurePolicy,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(ListFailurePolicy::default())
    }
}

impl ViewController {
    pub fn new(list_failure: ListFailurePolicy) -> Self {
        Self {
            records: Vec::new(),
            form: CustomerForm::new(),
            rules: RuleSet::customer(),
            mode: ViewMode::List,
            error_message: None,
            cursor: 0,
            list_generation: 0,
            list_failure,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn records(&self) -> &[CustomerRecord] {
        &self.records
    }

    pub fn form(&self) -> &CustomerForm {
        &self.form
    }

    /// Mutable form access, only while a dialog accepts input.
    pub fn form_mut(&mut self) -> Option<&mut CustomerForm> {
        match self.mode {
            ViewMode::Editing | ViewMode::Creating => Some(&mut self.form),
            ViewMode::List | ViewMode::Submitting { .. } => None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn list_failure(&self) -> ListFailurePolicy {
        self.list_failure
    }

    // ── Cursor ───────────────────────────────────────────────────────

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&CustomerRecord> {
        self.records.get(self.cursor)
    }

    /// Move the grid cursor by `delta` rows, clamped to the list.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.records.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.records.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn cursor_to_first(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_last(&mut self) {
        self.cursor = self.records.len().saturating_sub(1);
    }

    // ── Dialog transitions ───────────────────────────────────────────

    /// Open the edit dialog on row `index`.
    pub fn select_row(&mut self, index: usize) -> Result<(), ViewError> {
        if self.mode != ViewMode::List {
            return Err(ViewError::Busy);
        }
        let record = self.records.get(index).ok_or(ViewError::NoSuchRow(index))?;
        self.form.patch(record);
        self.cursor = index;
        self.error_message = None;
        self.mode = ViewMode::Editing;
        debug!(customer_id = %record.customer_id, "edit dialog opened");
        Ok(())
    }

    /// Open the create dialog on an empty form.
    pub fn open_create_form(&mut self) -> Result<(), ViewError> {
        if self.mode != ViewMode::List {
            return Err(ViewError::Busy);
        }
        self.form.reset();
        self.error_message = None;
        self.mode = ViewMode::Creating;
        debug!("create dialog opened");
        Ok(())
    }

    /// Cancel the open dialog. Returns `false` if nothing was closed.
    pub fn close_dialog(&mut self) -> bool {
        match self.mode {
            ViewMode::Editing | ViewMode::Creating => {
                self.mode = ViewMode::List;
                self.error_message = None;
                true
            }
            ViewMode::List | ViewMode::Submitting { .. } => false,
        }
    }

    // ── Submissions ──────────────────────────────────────────────────

    pub fn begin_update(&mut self) -> Result<Mutation, ViewError> {
        self.require_dialog(DialogKind::Edit, "update")?;
        let record = self.validated_record()?;
        Ok(self.start(DialogKind::Edit, Mutation::Update(record)))
    }

    pub fn begin_create(&mut self) -> Result<Mutation, ViewError> {
        self.require_dialog(DialogKind::Create, "create")?;
        let record = self.validated_record()?;
        Ok(self.start(DialogKind::Create, Mutation::Create(record)))
    }

    pub fn begin_delete(&mut self) -> Result<Mutation, ViewError> {
        self.require_dialog(DialogKind::Edit, "delete")?;
        if let Err(report) = self.form.validate(&RuleSet::delete()) {
            self.error_message = Some(INVALID_FORM_MESSAGE.to_owned());
            return Err(ViewError::Invalid(report));
        }
        let customer_id = self.form.value(FormField::CustomerId).trim().to_owned();
        Ok(self.start(DialogKind::Edit, Mutation::Delete { customer_id }))
    }

    /// Fold a mutation result back in.
    ///
    /// `Ok(true)` means the mutation succeeded and the list must be re-fetched.
    pub fn finish_mutation(
        &mut self,
        result: Result<MutationOutcome, CoreError>,
    ) -> Result<bool, ViewError> {
        let ViewMode::Submitting { dialog, kind } = self.mode else {
            return Err(ViewError::NotSubmitting);
        };
        match result {
            Ok(_) => {
                info!(action = kind.verb(), "customer {} succeeded", kind.verb());
                self.form.reset();
                self.error_message = None;
                self.mode = ViewMode::List;
                Ok(true)
            }
            Err(err) => {
                warn!(action = kind.verb(), error = %err, "customer {} failed", kind.verb());
                self.error_message = Some(err.display_message());
                self.mode = ViewMode::open(dialog);
                Ok(false)
            }
        }
    }

    fn require_dialog(&self, dialog: DialogKind, action: &'static str) -> Result<(), ViewError> {
        match self.mode {
            ViewMode::Submitting { .. } => Err(ViewError::Busy),
            mode if mode == ViewMode::open(dialog) => Ok(()),
            mode => Err(ViewError::WrongDialog {
                action,
                mode: mode.label(),
            }),
        }
    }

    fn validated_record(&mut self) -> Result<CustomerRecord, ViewError> {
        match self.form.validate(&self.rules) {
            Ok(()) => Ok(self.form.to_record()),
            Err(report) => {
                debug!(errors = %report, "form rejected");
                self.error_message = Some(INVALID_FORM_MESSAGE.to_owned());
                Err(ViewError::Invalid(report))
            }
        }
    }

    fn start(&mut self, dialog: DialogKind, mutation: Mutation) -> Mutation {
        self.error_message = None;
        self.mode = ViewMode::Submitting {
            dialog,
            kind: mutation.kind(),
        };
        mutation
    }

    // ── List fetches ─────────────────────────────────────────────────

    pub fn begin_refresh(&mut self) -> ListTicket {
        self.list_generation += 1;
        ListTicket(self.list_generation)
    }

    /// Apply a list result. Returns `false` if the ticket was stale.
    pub fn apply_list(
        &mut self,
        ticket: ListTicket,
        result: Result<Vec<CustomerRecord>, CoreError>,
    ) -> bool {
        if ticket.0 != self.list_generation {
            debug!(
                ticket = ticket.0,
                current = self.list_generation,
                "dropping stale list result"
            );
            return false;
        }
        match result {
            Ok(records) => {
                debug!(count = records.len(), "customer list loaded");
                self.records = records;
            }
            Err(err) => {
                warn!(error = %err, "customer list fetch failed");
                self.records.clear();
                if self.list_failure == ListFailurePolicy::Strict {
                    self.error_message = Some(err.display_message());
                }
            }
        }
        self.cursor = self.cursor.min(self.records.len().saturating_sub(1));
        true
    }

    // ── Async drivers ────────────────────────────────────────────────

    pub async fn refresh(&mut self, api: &dyn CustomerApi) -> bool {
        let ticket = self.begin_refresh();
        let result = api.list().await;
        self.apply_list(ticket, result)
    }

    pub async fn submit_update(&mut self, api: &dyn CustomerApi) -> Result<bool, ViewError> {
        let mutation = self.begin_update()?;
        self.run(mutation, api).await
    }

    pub async fn submit_create(&mut self, api: &dyn CustomerApi) -> Result<bool, ViewError> {
        let mutation = self.begin_create()?;
        self.run(mutation, api).await
    }

    pub async fn submit_delete(&mut self, api: &dyn CustomerApi) -> Result<bool, ViewError> {
        let mutation = self.begin_delete()?;
        self.run(mutation, api).await
    }

    async fn run(&mut self, mutation: Mutation, api: &dyn CustomerApi) -> Result<bool, ViewError> {
        let result = mutation.execute(api).await;
        let succeeded = self.finish_mutation(result)?;
        if succeeded {
            self.refresh(api).await;
        }
        Ok(succeeded)
    }
}
