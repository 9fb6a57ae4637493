//! Domain layer between `northgrid-api` and the terminal view.
//!
//! - **[`ViewController`]**: explicit state machine for the customer grid.
//!   It moves between the list, the edit and create dialogs, and an
//!   in-flight submit state that locks out overlapping requests. Submissions
//!   produce a [`Mutation`] the caller executes against any [`CustomerApi`],
//!   then feed the result back with [`ViewController::finish_mutation`].
//!
//! - **[`CustomerForm`]** + **[`RuleSet`]**: the editable copy of a record
//!   and the `field → rules` mapping evaluated on submit.
//!
//! - **[`CustomerApi`]**: async seam over the HTTP client, so the controller
//!   can be driven headless and tested with a mock.
//!
//! - **[`CoreError`]**: user-facing errors, with
//!   [`display_message`](CoreError::display_message) producing the single
//!   string shown in a dialog.

pub mod config;
pub mod error;
pub mod form;
pub mod service;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_ENDPOINT, ListFailurePolicy, TlsVerification};
pub use error::{CoreError, GENERIC_ERROR};
pub use form::validation::{Rule, RuleSet, ValidationReport};
pub use form::{CustomerForm, FormField};
pub use service::{CustomerApi, connect};
pub use view::{
    DialogKind, INVALID_FORM_MESSAGE, ListTicket, Mutation, MutationKind, MutationOutcome,
    ViewController, ViewError, ViewMode,
};

pub use northgrid_api::{Address, CustomerRecord};
