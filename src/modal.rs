use std::sync::Arc;

use crate::{
    client::ModActions,
    controller::{BanEvasionController, WorkflowError},
    host::Host,
};

/// Owns at most one controller per page. Hiding keeps it, cancelling drops it.
#[derive(Default)]
pub struct Modal {
    controller: Option<BanEvasionController>,
    visible: bool,
}

impl Modal {
    /// The moderator clicked the entry point in the action list.
    ///
    /// Builds the controller on first use and re-shows the existing one afterwards.
    pub fn handle_ban_evasion_button_click(
        &mut self,
        page_path: &str,
        actions: Arc<dyn ModActions>,
        host: Arc<dyn Host>,
    ) -> Result<&mut BanEvasionController, WorkflowError> {
        let controller = match self.controller.take() {
            Some(controller) => controller,
            None => BanEvasionController::initialize(page_path, actions, host)?,
        };
        self.visible = true;
        Ok(self.controller.insert(controller))
    }

    /// Close button: the modal goes away but keeps everything entered so far.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Tears the modal down so the next click starts over.
    pub fn handle_cancel_actions(&mut self) {
        if let Some(controller) = self.controller.take() {
            log::info!(
                "Cancelled ban evasion workflow for sock {}",
                controller.sock_account_id()
            );
        }
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_built(&self) -> bool {
        self.controller.is_some()
    }

    pub fn controller_mut(&mut self) -> Option<&mut BanEvasionController> {
        self.controller.as_mut()
    }
}
