use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::Mutex,
};
use url::Url;

use crate::host::{ConfirmModal, Host, Toast, ToastLifetime};

/// Shared line reader over stdin; the session and the confirm dialog both read from it.
pub type Input = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn stdin_lines() -> Input {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

/// Writes a prompt without a trailing newline. Returns `false` if it may not have been shown.
fn write_prompt(out: &mut impl Write, message: &str) -> bool {
    if let Err(e) = out.write_all(message.as_bytes()).and_then(|()| out.flush()) {
        log::debug!("Failed to write prompt: {:?}", e);
        return false;
    }
    true
}

/// Prints `message` and waits for a line. `None` once stdin is closed.
pub async fn prompt(input: &Input, message: &str) -> Option<String> {
    write_prompt(&mut std::io::stdout(), message);
    match input.lock().await.next_line().await {
        Ok(line) => line.map(|l| l.trim_end_matches('\r').to_string()),
        Err(e) => {
            log::error!("Failed to read from stdin: {:?}", e);
            None
        }
    }
}

/// Plays the hosting page for a terminal session.
pub struct TerminalHost {
    input: Input,
    page_url: Url,
}

impl TerminalHost {
    pub fn new(input: Input, page_url: Url) -> Self {
        Self { input, page_url }
    }
}

#[async_trait]
impl Host for TerminalHost {
    fn show_toast(&self, toast: Toast) {
        match toast.lifetime {
            ToastLifetime::Persistent => {
                log::error!("{}", toast.message);
                eprintln!("\n!! {} !!\n", toast.message);
            }
            ToastLifetime::Transient(timeout) => {
                log::info!("Toast ({}ms): {}", timeout.as_millis(), toast.message);
                eprintln!("[danger] {}", toast.message);
            }
            ToastLifetime::Default => {
                log::info!("Toast: {}", toast.message);
                eprintln!("[danger] {}", toast.message);
            }
        }
    }

    async fn show_confirm_modal(&self, modal: &ConfirmModal) -> bool {
        println!("\n{}\n{}", modal.title, modal.body);
        let question = format!(
            "Type 'y' for \"{}\", anything else to go back: ",
            modal.button_label
        );
        let answer = prompt(&self.input, &question).await;
        matches!(answer.as_deref().map(str::trim), Some("y" | "Y" | "yes"))
    }

    fn open_new_tab(&self, path: &str) {
        match self.page_url.join(path) {
            Ok(url) => println!("Open in a new tab: {}", url),
            Err(e) => log::error!("Could not build URL for {}: {}", path, e),
        }
    }

    fn reload(&self) {
        log::info!("Reloading {}", self.page_url);
        println!("Done. Reload {} to see the result.", self.page_url);
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_write_prompt() {
        let mut out = Vec::new();
        assert!(write_prompt(&mut out, "> "));
        assert_eq!(out, b"> ");
    }

    #[test]
    fn test_write_prompt_reports_flush_failure() {
        assert!(!write_prompt(&mut BrokenPipe, "> "));
    }
}
