use crate::{
    client::DeleteReason,
    host::Toast,
    logging::{log_annotation, log_deletion},
    user_info::{UserId, message_compose_path},
    utils::CONFIRM_DELETE,
};

use super::{BanEvasionController, WorkflowError, WorkflowState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Not in a submittable state, or the submit button was disabled.
    Ignored,
    /// The moderator backed out of the confirmation dialog.
    Declined,
    /// Delete and annotate both succeeded and the page is reloading.
    Completed { messaged: bool },
}

impl BanEvasionController {
    /// Validates, confirms, then deletes the sock and annotates the main account.
    ///
    /// The submit button stays disabled for as long as this runs. Every error
    /// returned here has already been shown to the moderator.
    pub async fn handle_submit_actions(&mut self) -> Result<SubmitOutcome, WorkflowError> {
        if self.state != WorkflowState::Resolved || !self.controls.submit_button.enabled {
            log::debug!("Ignoring submit in state {:?}", self.state);
            return Ok(SubmitOutcome::Ignored);
        }

        self.set_submit_busy(true);
        self.state = WorkflowState::Submitting;

        match self.submit_actions().await {
            Ok(SubmitOutcome::Completed { messaged }) => {
                self.state = WorkflowState::Reloading;
                Ok(SubmitOutcome::Completed { messaged })
            }
            Ok(outcome) => {
                self.set_submit_busy(false);
                self.state = WorkflowState::Resolved;
                Ok(outcome)
            }
            Err(e) => {
                let toast = match &e {
                    // Something may already have been applied, so keep it on screen
                    WorkflowError::DeletionUnsuccessful(_)
                    | WorkflowError::AnnotationUnsuccessful(_) => {
                        Toast::danger(e.to_string()).persistent()
                    }
                    _ => Toast::danger(e.to_string()),
                };
                self.host.show_toast(toast);
                self.set_submit_busy(false);
                self.state = WorkflowState::Resolved;
                Err(e)
            }
        }
    }

    async fn submit_actions(&self) -> Result<SubmitOutcome, WorkflowError> {
        self.validate_fields()?;

        if !self.host.show_confirm_modal(&CONFIRM_DELETE).await {
            log::info!("Deletion of {} declined at confirmation", self.sock_account_id);
            return Ok(SubmitOutcome::Declined);
        }

        let main_account_id = match self.resolved.as_ref() {
            Some(resolved) => resolved.main.id,
            None => return Err(WorkflowError::InvalidMainAccountId),
        };

        self.handle_delete_and_annotate_users(main_account_id).await?;

        let messaged = self.should_message_after();
        if messaged {
            self.host.open_new_tab(&message_compose_path(main_account_id));
        }
        self.host.reload();
        Ok(SubmitOutcome::Completed { messaged })
    }

    async fn handle_delete_and_annotate_users(
        &self,
        main_account_id: UserId,
    ) -> Result<(), WorkflowError> {
        self.handle_delete_user(
            self.sock_account_id,
            self.deletion_reason(),
            self.deletion_details(),
        )
        .await?;
        self.handle_annotate_user(main_account_id, self.annotation_details())
            .await
    }

    async fn handle_delete_user(
        &self,
        user_id: UserId,
        reason: DeleteReason,
        details: &str,
    ) -> Result<(), WorkflowError> {
        let response = self.actions.delete_user(user_id, reason, details).await?;
        log_deletion(user_id, reason.label(), details, &response);
        if !response.is_ok() {
            log::error!("Deletion of {} returned {:?}", user_id, response);
            return Err(WorkflowError::DeletionUnsuccessful(user_id));
        }
        Ok(())
    }

    async fn handle_annotate_user(
        &self,
        user_id: UserId,
        annotation: &str,
    ) -> Result<(), WorkflowError> {
        let response = self.actions.annotate_user(user_id, annotation).await?;
        log_annotation(user_id, annotation, &response);
        if !response.is_ok() {
            log::error!("Annotation on {} returned {:?}", user_id, response);
            return Err(WorkflowError::AnnotationUnsuccessful(user_id));
        }
        Ok(())
    }
}
