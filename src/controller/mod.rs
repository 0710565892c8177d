//! State machine behind the delete-and-annotate modal.
//!
//! `Unresolved -> Resolving -> Resolved -> Submitting -> Reloading`, with
//! `Resolving` falling back to `Unresolved` and `Submitting` falling back to
//! `Resolved` whenever something goes wrong.

mod lookup;
mod submit;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use thiserror::Error;

use crate::{
    client::{ClientError, DeleteReason, ModActions},
    form::SHOULD_MESSAGE_AFTER_DEFAULT,
    host::{Host, Toast},
    pii::UserPii,
    user_info::{UserId, user_id_from_href},
    utils::SHORT_TOAST_TIMEOUT,
    validators::{
        ValidationError, assert_valid_annotation_text_length,
        assert_valid_delete_user_reason_detail_text_length, text_length,
    },
};

pub use submit::SubmitOutcome;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Could not get Sock Id from URL")]
    SockIdNotFound,
    #[error("Main account ID must be a positive number.")]
    InvalidMainAccountId,
    #[error("Cannot enter current account ID in parent field.")]
    SameAccount,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("Deletion of {0} unsuccessful.")]
    DeletionUnsuccessful(UserId),
    #[error("Annotation on {0} unsuccessful.")]
    AnnotationUnsuccessful(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Waiting for the moderator to enter the main account id.
    Unresolved,
    /// Both profile URLs and the sock's PII are being fetched.
    Resolving,
    /// The full form is shown and can be submitted.
    Resolved,
    Submitting,
    /// Delete and annotate went through; the page is reloading.
    Reloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub enabled: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub main_account_id_input: bool,
    pub lookup_button: bool,
    pub submit_button: ButtonState,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            main_account_id_input: true,
            lookup_button: true,
            submit_button: ButtonState {
                enabled: false,
                loading: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    DeletionDetails,
    AnnotationDetails,
}

/// Which field has focus and where the caret sits, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub field: FormField,
    pub caret: usize,
}

/// Ground-truth values of the form inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub main_account_id_input: String,
    pub deletion_reason: DeleteReason,
    pub deletion_details: String,
    pub annotation_details: String,
    pub should_message_after: bool,
    pub focus: Option<Focus>,
}

impl Default for FormState {
    fn default() -> Self {
        FormState {
            main_account_id_input: String::new(),
            deletion_reason: DeleteReason::default(),
            deletion_details: String::new(),
            annotation_details: String::new(),
            should_message_after: SHOULD_MESSAGE_AFTER_DEFAULT,
            focus: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRef {
    pub id: UserId,
    pub profile_url: String,
}

/// Everything the lookup produced. Immutable once set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccounts {
    pub main: AccountRef,
    pub sock: AccountRef,
    pub sock_pii: UserPii,
}

pub struct BanEvasionController {
    sock_account_id: UserId,
    state: WorkflowState,
    controls: Controls,
    form: FormState,
    resolved: Option<ResolvedAccounts>,
    actions: Arc<dyn ModActions>,
    host: Arc<dyn Host>,
}

impl BanEvasionController {
    /// Binds a controller to the page at `page_path`, which must identify the sock account.
    pub fn initialize(
        page_path: &str,
        actions: Arc<dyn ModActions>,
        host: Arc<dyn Host>,
    ) -> Result<Self, WorkflowError> {
        let Some(sock_account_id) = user_id_from_href(page_path) else {
            let e = WorkflowError::SockIdNotFound;
            host.show_toast(Toast::danger(e.to_string()).transient(SHORT_TOAST_TIMEOUT));
            return Err(e);
        };
        log::info!("Opened ban evasion workflow for sock {}", sock_account_id);

        Ok(Self {
            sock_account_id,
            state: WorkflowState::Unresolved,
            controls: Controls::default(),
            form: FormState::default(),
            resolved: None,
            actions,
            host,
        })
    }

    pub fn sock_account_id(&self) -> UserId {
        self.sock_account_id
    }

    /// The id currently typed into the main account input, if it is a positive number.
    pub fn main_account_id(&self) -> Option<UserId> {
        self.form
            .main_account_id_input
            .parse::<UserId>()
            .ok()
            .filter(|id| id.0 > 0)
    }

    pub fn deletion_reason(&self) -> DeleteReason {
        self.form.deletion_reason
    }

    pub fn deletion_details(&self) -> &str {
        &self.form.deletion_details
    }

    pub fn annotation_details(&self) -> &str {
        &self.form.annotation_details
    }

    pub fn should_message_after(&self) -> bool {
        self.form.should_message_after
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn focus(&self) -> Option<Focus> {
        self.form.focus
    }

    pub fn resolved(&self) -> Option<&ResolvedAccounts> {
        self.resolved.as_ref()
    }

    /// Has no effect once the input is disabled.
    pub fn set_main_account_id_input(&mut self, value: impl Into<String>) -> bool {
        if !self.controls.main_account_id_input {
            log::debug!("Ignoring main account id edit while the input is disabled");
            return false;
        }
        self.form.main_account_id_input = value.into();
        true
    }

    pub fn select_deletion_reason(&mut self, reason: DeleteReason) {
        self.form.deletion_reason = reason;
    }

    pub fn set_deletion_details(&mut self, value: impl Into<String>) {
        self.form.deletion_details = value.into();
        self.form.focus = Some(Focus {
            field: FormField::DeletionDetails,
            caret: text_length(&self.form.deletion_details),
        });
    }

    pub fn set_annotation_details(&mut self, value: impl Into<String>) {
        self.form.annotation_details = value.into();
        self.form.focus = Some(Focus {
            field: FormField::AnnotationDetails,
            caret: text_length(&self.form.annotation_details),
        });
    }

    pub fn set_should_message_after(&mut self, checked: bool) {
        self.form.should_message_after = checked;
    }

    /// Runs before confirming, so the moderator fixes fields before being asked.
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        assert_valid_delete_user_reason_detail_text_length(text_length(self.deletion_details()))?;
        assert_valid_annotation_text_length(text_length(self.annotation_details()))?;
        Ok(())
    }

    fn set_submit_busy(&mut self, busy: bool) {
        self.controls.submit_button = ButtonState {
            enabled: !busy,
            loading: busy,
        };
    }
}
