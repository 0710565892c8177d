//! Static layout of the delete-and-annotate modal.

use crate::validators::{
    ANNOTATION_TEXT_LENGTH_BOUNDS, DELETE_USER_REASON_DETAIL_BOUNDS, LengthBounds,
};

pub const MODAL_TITLE: &str = "Delete Ban Evasion Account";
pub const MAIN_ACCOUNT_ID_LABEL: &str = "Enter ID For Main Account: ";
pub const LOOKUP_BUTTON_LABEL: &str = "Resolve User URL";
pub const MAIN_ACCOUNT_LOCATED_LABEL: &str = "Main account located here:";
pub const SUBMIT_BUTTON_LABEL: &str = "Delete and Annotate";
pub const CANCEL_BUTTON_LABEL: &str = "Cancel";

const MARKDOWN_NOT_SUPPORTED: &str = "Reminder: Markdown is not supported!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStatus {
    Optional,
    Required,
}

impl LabelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelStatus::Optional => "Optional",
            LabelStatus::Required => "Required",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Label {
    pub text: &'static str,
    pub status: Option<LabelStatus>,
    pub description: Option<&'static str>,
}

impl Label {
    pub fn render(&self) -> String {
        let mut out = self.text.to_string();
        if let Some(status) = self.status {
            out.push_str(&format!(" [{}]", status.as_str()));
        }
        if let Some(description) = self.description {
            out.push_str(&format!("\n  {}", description));
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TextareaField {
    pub label: Label,
    pub placeholder: &'static str,
    pub bounds: LengthBounds,
}

pub const DELETE_REASON_LABEL: Label = Label {
    text: "Reason for deleting this user",
    status: None,
    description: None,
};

pub const DELETE_REASON_DETAILS: TextareaField = TextareaField {
    label: Label {
        text: "Please provide details leading to the deletion of this account",
        status: Some(LabelStatus::Required),
        description: Some(MARKDOWN_NOT_SUPPORTED),
    },
    placeholder: "Please provide at least a brief explanation of what this user has done; this will be logged with the action and may need to be referenced later.",
    bounds: DELETE_USER_REASON_DETAIL_BOUNDS,
};

pub const ANNOTATION_DETAILS: TextareaField = TextareaField {
    label: Label {
        text: "Annotate the main account",
        status: Some(LabelStatus::Required),
        description: Some(MARKDOWN_NOT_SUPPORTED),
    },
    placeholder: "Examples: \"possible sock of /users/XXXX, see mod room [link] for discussion\" or \"left a series of abusive comments, suspend on next occurrence\"",
    bounds: ANNOTATION_TEXT_LENGTH_BOUNDS,
};

pub const SHOULD_MESSAGE_AFTER_LABEL: Label = Label {
    text: "Open message user in new tab",
    status: Some(LabelStatus::Optional),
    description: None,
};

// The message checkbox starts checked
pub const SHOULD_MESSAGE_AFTER_DEFAULT: bool = true;
