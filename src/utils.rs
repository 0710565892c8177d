use std::time::Duration;

use crate::host::ConfirmModal;

/// Sites whose account-info pages carry the moderator action list.
pub const SUPPORTED_SITES: &[&str] = &[
    "askubuntu.com",
    "mathoverflow.net",
    "serverfault.com",
    "stackapps.com",
    "stackexchange.com",
    "stackoverflow.com",
    "superuser.com",
];

// Entry point label in the moderator action list
pub const BAN_EVASION_BUTTON_LABEL: &str = "delete ban evasion account";

pub const SHORT_TOAST_TIMEOUT: Duration = Duration::from_millis(3000);

pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

pub const CONFIRM_DELETE: ConfirmModal = ConfirmModal {
    title: "Are you sure you want to delete this account?",
    body: "You will be deleting this account and placing an annotation on the main. This operation cannot be undone.",
    button_label: "I'm sure",
};
