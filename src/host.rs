use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLifetime {
    /// Whatever the host uses when nothing is specified.
    Default,
    Transient(Duration),
    /// Stays until the moderator dismisses it.
    Persistent,
}

/// A danger-styled notification; every toast this workflow raises reports a problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub lifetime: ToastLifetime,
}

impl Toast {
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            lifetime: ToastLifetime::Default,
        }
    }

    pub fn transient(mut self, timeout: Duration) -> Self {
        self.lifetime = ToastLifetime::Transient(timeout);
        self
    }

    pub fn persistent(mut self) -> Self {
        self.lifetime = ToastLifetime::Persistent;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmModal {
    pub title: &'static str,
    pub body: &'static str,
    pub button_label: &'static str,
}

/// UI primitives the surrounding page provides.
#[async_trait]
pub trait Host: Send + Sync {
    fn show_toast(&self, toast: Toast);

    /// Resolves to `true` only if the moderator confirmed.
    async fn show_confirm_modal(&self, modal: &ConfirmModal) -> bool;

    /// `path` is relative to the site origin.
    fn open_new_tab(&self, path: &str);

    fn reload(&self);
}
