use crate::app::event::Timer;
use crate::form::{FormPayload, SubmissionId};

#[derive(Debug)]
pub enum Action {
    SubmitForm {
        id: SubmissionId,
        action_url: String,
        payload: FormPayload,
    },
    StartTimer(Timer),
    Quit,
}
