//! Grievance lifecycle - validation, transition rules, and history replay

mod policy;
mod replay;
mod transition;
mod validation;

pub use policy::{LifecyclePolicy, SameStatusPolicy, TransitionListError, TransitionPolicy};
pub use replay::{replay, ReplayError, ReplayedState};
pub use transition::{open_grievance, EntryStamp, Transition, NO_CHANGE_REQUESTED, REMARKS_REQUIRED};
pub use validation::{
    normalize_remarks, validate_draft, GrievanceDraft, ValidDraft, DESCRIPTION_MAX_CHARS,
    DESCRIPTION_MIN_CHARS, PHOTO_URL_MAX_CHARS, REMARKS_MAX_CHARS, TITLE_MAX_CHARS,
    TITLE_MIN_CHARS,
};
