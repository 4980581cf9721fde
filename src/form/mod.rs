//! The scouting form: document model, counter widgets and submission.

pub mod counter;
pub mod document;
pub mod submit;

pub use counter::{CounterBindings, CounterId};
pub use document::{ElementKind, FormDocument, FormPayload};
pub use submit::{FormClient, SubmissionId, SubmitControl, SubmitError};
