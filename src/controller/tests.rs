use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Barrier;

use super::*;
use crate::{
    client::{ActionResponse, ClientError, DeleteReason, ModActions},
    host::{ConfirmModal, Host, Toast, ToastLifetime},
    modal::Modal,
    pii::UserPii,
    utils::SHORT_TOAST_TIMEOUT,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    ProfileUrl(UserId),
    Pii(UserId),
    Delete {
        user_id: UserId,
        reason: DeleteReason,
        details: String,
    },
    Annotate {
        user_id: UserId,
        annotation: String,
    },
}

struct FakeActions {
    calls: Mutex<Vec<Call>>,
    delete_status: StatusCode,
    annotate_status: StatusCode,
    pii_fails: bool,
    // Every lookup waits here, so a lookup that awaits one fetch before starting the next never finishes
    lookup_barrier: Option<Barrier>,
}

impl FakeActions {
    fn new() -> Self {
        FakeActions {
            calls: Mutex::new(Vec::new()),
            delete_status: StatusCode::OK,
            annotate_status: StatusCode::OK,
            pii_fails: false,
            lookup_barrier: None,
        }
    }

    fn with_lookup_barrier(mut self, parties: usize) -> Self {
        self.lookup_barrier = Some(Barrier::new(parties));
        self
    }

    async fn wait_for_other_lookups(&self) {
        if let Some(barrier) = &self.lookup_barrier {
            barrier.wait().await;
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Delete { .. } | Call::Annotate { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ModActions for FakeActions {
    async fn delete_user(
        &self,
        user_id: UserId,
        reason: DeleteReason,
        reason_details: &str,
    ) -> Result<ActionResponse, ClientError> {
        self.record(Call::Delete {
            user_id,
            reason,
            details: reason_details.to_string(),
        });
        Ok(ActionResponse::from(self.delete_status))
    }

    async fn annotate_user(
        &self,
        user_id: UserId,
        annotation: &str,
    ) -> Result<ActionResponse, ClientError> {
        self.record(Call::Annotate {
            user_id,
            annotation: annotation.to_string(),
        });
        Ok(ActionResponse::from(self.annotate_status))
    }

    async fn fetch_user_profile_url(&self, user_id: UserId) -> Result<String, ClientError> {
        self.record(Call::ProfileUrl(user_id));
        self.wait_for_other_lookups().await;
        Ok(format!("https://stackoverflow.com/users/{}/user{}", user_id, user_id))
    }

    async fn fetch_user_pii(&self, user_id: UserId) -> Result<UserPii, ClientError> {
        self.record(Call::Pii(user_id));
        self.wait_for_other_lookups().await;
        if self.pii_fails {
            return Err(ClientError::UnexpectedShape { field: "email" });
        }
        Ok(UserPii {
            email: "sock@example.com".to_string(),
            name: "Sock Puppet".to_string(),
            ip: "203.0.113.7".to_string(),
        })
    }
}

struct FakeHost {
    confirm: bool,
    toasts: Mutex<Vec<Toast>>,
    confirms: Mutex<Vec<ConfirmModal>>,
    opened: Mutex<Vec<String>>,
    reloads: Mutex<usize>,
}

impl FakeHost {
    fn confirming(confirm: bool) -> Self {
        FakeHost {
            confirm,
            toasts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
            reloads: Mutex::new(0),
        }
    }

    fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    fn reloads(&self) -> usize {
        *self.reloads.lock().unwrap()
    }
}

#[async_trait]
impl Host for FakeHost {
    fn show_toast(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }

    async fn show_confirm_modal(&self, modal: &ConfirmModal) -> bool {
        self.confirms.lock().unwrap().push(*modal);
        self.confirm
    }

    fn open_new_tab(&self, path: &str) {
        self.opened.lock().unwrap().push(path.to_string());
    }

    fn reload(&self) {
        *self.reloads.lock().unwrap() += 1;
    }
}

const SOCK_PAGE: &str = "/users/account-info/111";

fn controller(actions: &Arc<FakeActions>, host: &Arc<FakeHost>) -> BanEvasionController {
    BanEvasionController::initialize(SOCK_PAGE, actions.clone(), host.clone()).unwrap()
}

async fn resolved_controller(
    actions: &Arc<FakeActions>,
    host: &Arc<FakeHost>,
) -> BanEvasionController {
    let mut controller = controller(actions, host);
    assert!(controller.set_main_account_id_input("222"));
    controller.handle_lookup_main_account().await.unwrap();
    controller
}

#[test]
fn test_sock_id_from_profile_path() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));

    let c = BanEvasionController::initialize("/users/111/sock", actions.clone(), host.clone())
        .unwrap();
    assert_eq!(c.sock_account_id(), UserId(111));
    assert_eq!(c.state(), WorkflowState::Unresolved);
    assert!(!c.controls().submit_button.enabled);
}

#[test]
fn test_open_without_sock_id_toasts_and_fails() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));

    let result = BanEvasionController::initialize("/questions/1", actions.clone(), host.clone());
    assert!(matches!(result, Err(WorkflowError::SockIdNotFound)));
    assert_eq!(
        host.toasts(),
        vec![Toast {
            message: "Could not get Sock Id from URL".to_string(),
            lifetime: ToastLifetime::Transient(SHORT_TOAST_TIMEOUT),
        }]
    );
}

#[tokio::test]
async fn test_lookup_rejects_sock_id_without_requests() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = controller(&actions, &host);

    c.set_main_account_id_input("111");
    let result = c.handle_lookup_main_account().await;

    assert!(matches!(result, Err(WorkflowError::SameAccount)));
    assert!(actions.calls().is_empty());
    assert_eq!(c.state(), WorkflowState::Unresolved);
    assert!(c.controls().main_account_id_input);
    assert_eq!(
        host.toasts()[0].message,
        "Cannot enter current account ID in parent field."
    );
    assert_eq!(
        host.toasts()[0].lifetime,
        ToastLifetime::Transient(SHORT_TOAST_TIMEOUT)
    );
}

#[tokio::test]
async fn test_lookup_rejects_non_numeric_id() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = controller(&actions, &host);

    for input in ["", "abc", "0"] {
        c.set_main_account_id_input(input);
        let result = c.handle_lookup_main_account().await;
        assert!(matches!(result, Err(WorkflowError::InvalidMainAccountId)));
    }
    assert!(actions.calls().is_empty());
}

#[tokio::test]
async fn test_lookup_prefills_form_and_locks_input() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = resolved_controller(&actions, &host).await;

    assert_eq!(c.state(), WorkflowState::Resolved);
    let controls = c.controls();
    assert!(!controls.main_account_id_input);
    assert!(!controls.lookup_button);
    assert!(controls.submit_button.enabled);

    let mut calls = actions.calls();
    calls.sort_by_key(|c| format!("{:?}", c));
    assert_eq!(
        calls,
        vec![
            Call::Pii(UserId(111)),
            Call::ProfileUrl(UserId(111)),
            Call::ProfileUrl(UserId(222)),
        ]
    );

    assert_eq!(
        c.deletion_details(),
        "Main Account:  https://stackoverflow.com/users/222/user222\n\n\
         Email:         sock@example.com\n\
         Real name:     Sock Puppet\n\n"
    );
    assert_eq!(
        c.annotation_details(),
        "Deleted evasion account: https://stackoverflow.com/users/111/user111 | Email: sock@example.com | Real name: Sock Puppet"
    );
    assert_eq!(
        c.focus(),
        Some(Focus {
            field: FormField::DeletionDetails,
            caret: c.deletion_details().chars().count(),
        })
    );
    assert!(c.should_message_after());

    let resolved = c.resolved().unwrap();
    assert_eq!(resolved.main.id, UserId(222));
    assert_eq!(resolved.sock.id, UserId(111));
    assert_eq!(resolved.sock_pii.ip, "203.0.113.7");

    // The main id can no longer change
    assert!(!c.set_main_account_id_input("333"));
    c.handle_lookup_main_account().await.unwrap();
    assert_eq!(actions.calls().len(), 3);
}

#[tokio::test]
async fn test_failed_lookup_hands_controls_back() {
    let mut fake = FakeActions::new();
    fake.pii_fails = true;
    let actions = Arc::new(fake);
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = controller(&actions, &host);

    c.set_main_account_id_input("222");
    let result = c.handle_lookup_main_account().await;

    assert!(matches!(
        result,
        Err(WorkflowError::Client(ClientError::UnexpectedShape { .. }))
    ));
    assert_eq!(c.state(), WorkflowState::Unresolved);
    assert!(c.controls().main_account_id_input);
    assert!(c.controls().lookup_button);
    assert!(!c.controls().submit_button.enabled);
    assert!(c.resolved().is_none());
    assert_eq!(
        host.toasts()[0],
        Toast::danger(
            "Unexpected response shape: could not locate email in the admin PII response"
        )
    );
}

#[tokio::test]
async fn test_submit_before_lookup_is_ignored() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = controller(&actions, &host);

    assert_eq!(c.handle_submit_actions().await.unwrap(), SubmitOutcome::Ignored);
    assert!(actions.calls().is_empty());
}

#[tokio::test]
async fn test_delete_then_annotate_end_to_end() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = resolved_controller(&actions, &host).await;

    c.select_deletion_reason(DeleteReason::NoLongerWelcome);
    let details = format!("{}Created right after the suspension.", c.deletion_details());
    c.set_deletion_details(details.clone());
    c.set_annotation_details("Deleted sock /users/111, same email");

    let outcome = c.handle_submit_actions().await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Completed { messaged: true });

    assert_eq!(
        actions.mutating_calls(),
        vec![
            Call::Delete {
                user_id: UserId(111),
                reason: DeleteReason::NoLongerWelcome,
                details,
            },
            Call::Annotate {
                user_id: UserId(222),
                annotation: "Deleted sock /users/111, same email".to_string(),
            },
        ]
    );
    assert_eq!(host.opened(), vec!["/users/message/create/222".to_string()]);
    assert_eq!(host.reloads(), 1);
    assert_eq!(c.state(), WorkflowState::Reloading);
    assert!(!c.controls().submit_button.enabled);
    assert!(host.toasts().is_empty());
}

#[tokio::test]
async fn test_unchecked_message_box_skips_new_tab() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = resolved_controller(&actions, &host).await;

    c.set_should_message_after(false);
    let outcome = c.handle_submit_actions().await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Completed { messaged: false });
    assert!(host.opened().is_empty());
    assert_eq!(host.reloads(), 1);
}

#[tokio::test]
async fn test_validation_failure_makes_no_requests() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = resolved_controller(&actions, &host).await;

    c.set_annotation_details("too short");
    let result = c.handle_submit_actions().await;

    assert!(matches!(
        result,
        Err(WorkflowError::Validation(ValidationError::AnnotationLength { .. }))
    ));
    assert!(actions.mutating_calls().is_empty());
    assert!(host.confirms.lock().unwrap().is_empty());
    assert_eq!(
        host.toasts(),
        vec![Toast::danger("Annotation text must be between 10 and 300 characters.")]
    );
    assert_eq!(c.state(), WorkflowState::Resolved);
    assert_eq!(
        c.controls().submit_button,
        ButtonState {
            enabled: true,
            loading: false
        }
    );
}

#[tokio::test]
async fn test_deletion_details_are_checked_first() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = resolved_controller(&actions, &host).await;

    c.set_deletion_details("x".repeat(601));
    c.set_annotation_details("");
    let result = c.handle_submit_actions().await;

    assert!(matches!(
        result,
        Err(WorkflowError::Validation(
            ValidationError::DeleteReasonDetailLength { min: 15, max: 600 }
        ))
    ));
}

#[tokio::test]
async fn test_declined_confirmation_returns_to_form() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(false));
    let mut c = resolved_controller(&actions, &host).await;

    assert_eq!(c.handle_submit_actions().await.unwrap(), SubmitOutcome::Declined);

    let confirms = host.confirms.lock().unwrap().clone();
    assert_eq!(confirms, vec![crate::utils::CONFIRM_DELETE]);
    assert!(actions.mutating_calls().is_empty());
    assert_eq!(host.reloads(), 0);
    assert_eq!(c.state(), WorkflowState::Resolved);
    assert!(c.controls().submit_button.enabled);
}

#[tokio::test]
async fn test_failed_delete_never_annotates() {
    let mut fake = FakeActions::new();
    fake.delete_status = StatusCode::FORBIDDEN;
    let actions = Arc::new(fake);
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = resolved_controller(&actions, &host).await;

    let result = c.handle_submit_actions().await;

    assert!(matches!(
        result,
        Err(WorkflowError::DeletionUnsuccessful(UserId(111)))
    ));
    let mutating = actions.mutating_calls();
    assert_eq!(mutating.len(), 1);
    assert!(matches!(mutating[0], Call::Delete { .. }));
    assert_eq!(
        host.toasts(),
        vec![Toast::danger("Deletion of 111 unsuccessful.").persistent()]
    );
    assert!(host.opened().is_empty());
    assert_eq!(host.reloads(), 0);
    assert_eq!(c.state(), WorkflowState::Resolved);
    assert!(c.controls().submit_button.enabled);
}

#[tokio::test]
async fn test_failed_annotation_is_persistent() {
    let mut fake = FakeActions::new();
    fake.annotate_status = StatusCode::INTERNAL_SERVER_ERROR;
    let actions = Arc::new(fake);
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = resolved_controller(&actions, &host).await;

    let result = c.handle_submit_actions().await;

    assert!(matches!(
        result,
        Err(WorkflowError::AnnotationUnsuccessful(UserId(222)))
    ));
    assert_eq!(actions.mutating_calls().len(), 2);
    assert_eq!(
        host.toasts(),
        vec![Toast::danger("Annotation on 222 unsuccessful.").persistent()]
    );
    assert_eq!(host.reloads(), 0);
}

#[tokio::test]
async fn test_modal_is_built_once_and_rebuilt_after_cancel() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut modal = Modal::default();

    let c = modal
        .handle_ban_evasion_button_click(SOCK_PAGE, actions.clone(), host.clone())
        .unwrap();
    c.set_main_account_id_input("222");
    c.handle_lookup_main_account().await.unwrap();
    assert!(modal.is_visible());

    // Hiding keeps the resolved form around
    modal.hide();
    assert!(!modal.is_visible());
    let c = modal
        .handle_ban_evasion_button_click(SOCK_PAGE, actions.clone(), host.clone())
        .unwrap();
    assert_eq!(c.state(), WorkflowState::Resolved);
    assert_eq!(actions.calls().len(), 3);

    modal.handle_cancel_actions();
    assert!(!modal.is_built());
    let c = modal
        .handle_ban_evasion_button_click(SOCK_PAGE, actions.clone(), host.clone())
        .unwrap();
    assert_eq!(c.state(), WorkflowState::Unresolved);
    assert!(c.controls().main_account_id_input);
}

#[test]
fn test_modal_open_fails_off_a_user_page() {
    let actions = Arc::new(FakeActions::new());
    let host = Arc::new(FakeHost::confirming(true));
    let mut modal = Modal::default();

    assert!(modal
        .handle_ban_evasion_button_click("/review", actions, host.clone())
        .is_err());
    assert!(!modal.is_built());
    assert!(!modal.is_visible());
    assert_eq!(host.toasts().len(), 1);
}

#[tokio::test]
async fn test_lookup_fetches_run_concurrently() {
    let actions = Arc::new(FakeActions::new().with_lookup_barrier(3));
    let host = Arc::new(FakeHost::confirming(true));
    let mut c = controller(&actions, &host);

    assert!(c.set_main_account_id_input("222"));
    tokio::time::timeout(Duration::from_secs(5), c.handle_lookup_main_account())
        .await
        .expect("the three lookups should be in flight together")
        .unwrap();

    assert_eq!(c.state(), WorkflowState::Resolved);
    assert_eq!(actions.calls().len(), 3);
}
