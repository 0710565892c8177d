use std::sync::Arc;

use crate::{
    formatting::format_labeled_block,
    host::Toast,
    user_info::UserId,
    utils::SHORT_TOAST_TIMEOUT,
    validators::text_length,
};

use super::{
    AccountRef, BanEvasionController, Focus, FormField, ResolvedAccounts, WorkflowError,
    WorkflowState,
};

impl BanEvasionController {
    /// Resolves the main account entered by the moderator and fills in the rest of the form.
    ///
    /// The id input and the lookup button are disabled for good once a lookup
    /// succeeds. If any of the three fetches fails, both are handed back.
    pub async fn handle_lookup_main_account(&mut self) -> Result<(), WorkflowError> {
        if self.state != WorkflowState::Unresolved || !self.controls.lookup_button {
            log::debug!("Ignoring lookup in state {:?}", self.state);
            return Ok(());
        }

        let main_account_id = match self.main_account_id() {
            Some(id) if id == self.sock_account_id => Err(WorkflowError::SameAccount),
            Some(id) => Ok(id),
            None => Err(WorkflowError::InvalidMainAccountId),
        };
        let main_account_id = match main_account_id {
            Ok(id) => id,
            Err(e) => {
                self.host
                    .show_toast(Toast::danger(e.to_string()).transient(SHORT_TOAST_TIMEOUT));
                return Err(e);
            }
        };

        self.controls.main_account_id_input = false;
        self.controls.lookup_button = false;
        self.state = WorkflowState::Resolving;

        match self.build_remaining_form_elements(main_account_id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                log::error!("Lookup of main account {} failed: {}", main_account_id, e);
                self.host.show_toast(Toast::danger(e.to_string()));
                self.controls.main_account_id_input = true;
                self.controls.lookup_button = true;
                self.state = WorkflowState::Unresolved;
                Err(e)
            }
        }
    }

    async fn build_remaining_form_elements(
        &mut self,
        main_account_id: UserId,
    ) -> Result<(), WorkflowError> {
        let actions = Arc::clone(&self.actions);
        let sock_account_id = self.sock_account_id;

        let (main_url, sock_url, sock_pii) = tokio::try_join!(
            actions.fetch_user_profile_url(main_account_id),
            actions.fetch_user_profile_url(sock_account_id),
            actions.fetch_user_pii(sock_account_id)
        )?;

        let main_line = format!("{}\n", main_url);
        let deletion_details = format_labeled_block(
            &[
                ("Main Account", main_line.as_str()),
                ("Email", sock_pii.email.as_str()),
                ("Real name", sock_pii.name.as_str()),
            ],
            ":  ",
            "\n",
            true,
        ) + "\n\n";

        let annotation_details = format_labeled_block(
            &[
                ("Deleted evasion account", sock_url.as_str()),
                ("Email", sock_pii.email.as_str()),
                ("Real name", sock_pii.name.as_str()),
            ],
            ": ",
            " | ",
            false,
        );

        self.form.annotation_details = annotation_details;
        self.form.focus = Some(Focus {
            field: FormField::DeletionDetails,
            caret: text_length(&deletion_details),
        });
        self.form.deletion_details = deletion_details;

        log::info!("Resolved main account {} at {}", main_account_id, main_url);
        self.resolved = Some(ResolvedAccounts {
            main: AccountRef {
                id: main_account_id,
                profile_url: main_url,
            },
            sock: AccountRef {
                id: sock_account_id,
                profile_url: sock_url,
            },
            sock_pii,
        });

        // Submitting only makes sense now that the fields are filled in
        self.controls.submit_button.enabled = true;
        self.state = WorkflowState::Resolved;
        Ok(())
    }
}
