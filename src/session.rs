use std::sync::Arc;

use url::Url;

use crate::{
    client::{DeleteReason, ModActions},
    controller::{BanEvasionController, FormField, SubmitOutcome, WorkflowState},
    form::{
        ANNOTATION_DETAILS, CANCEL_BUTTON_LABEL, DELETE_REASON_DETAILS, DELETE_REASON_LABEL,
        LOOKUP_BUTTON_LABEL, MAIN_ACCOUNT_ID_LABEL, MAIN_ACCOUNT_LOCATED_LABEL, MODAL_TITLE,
        SHOULD_MESSAGE_AFTER_LABEL, SUBMIT_BUTTON_LABEL, TextareaField,
    },
    modal::Modal,
    terminal::{Input, TerminalHost, prompt},
    utils::BAN_EVASION_BUTTON_LABEL,
    validators::{char_counter_hint, text_length},
};

enum Step {
    Continue,
    Hide,
    Cancel,
    Quit,
}

/// Drives the modal from stdin until the page reloads or the moderator quits.
pub async fn run(
    page_url: &Url,
    modal: &mut Modal,
    actions: Arc<dyn ModActions>,
    host: Arc<TerminalHost>,
    input: &Input,
) {
    loop {
        if !modal.is_visible() {
            let action = if modal.is_built() { "reopen" } else { "open" };
            let line = prompt(
                input,
                &format!(
                    "\n[{}] press Enter to {}, 'q' to quit: ",
                    BAN_EVASION_BUTTON_LABEL, action
                ),
            )
            .await;
            if matches!(line.as_deref().map(str::trim), None | Some("q")) {
                return;
            }
            if modal
                .handle_ban_evasion_button_click(page_url.path(), actions.clone(), host.clone())
                .is_err()
            {
                return;
            }
            println!("\n== {} ==", MODAL_TITLE);
        }

        let Some(controller) = modal.controller_mut() else {
            continue;
        };

        let step = match controller.state() {
            WorkflowState::Unresolved => unresolved_step(controller, input).await,
            WorkflowState::Resolved => resolved_step(controller, input).await,
            WorkflowState::Reloading => return,
            // Handlers run to completion before the session reads again
            WorkflowState::Resolving | WorkflowState::Submitting => Step::Continue,
        };

        match step {
            Step::Continue => {}
            Step::Hide => modal.hide(),
            Step::Cancel => modal.handle_cancel_actions(),
            Step::Quit => return,
        }
    }
}

fn parse_modal_command(line: &str) -> Option<Step> {
    match line.trim().to_ascii_lowercase().as_str() {
        "close" => Some(Step::Hide),
        "cancel" => Some(Step::Cancel),
        "quit" => Some(Step::Quit),
        _ => None,
    }
}

async fn unresolved_step(controller: &mut BanEvasionController, input: &Input) -> Step {
    let Some(line) = prompt(
        input,
        &format!("{}(Enter to [{}], or close/cancel) ", MAIN_ACCOUNT_ID_LABEL, LOOKUP_BUTTON_LABEL),
    )
    .await
    else {
        return Step::Quit;
    };
    if let Some(step) = parse_modal_command(&line) {
        return step;
    }

    controller.set_main_account_id_input(line.trim());
    if controller.handle_lookup_main_account().await.is_ok() {
        if let Some(resolved) = controller.resolved() {
            println!("{} {}", MAIN_ACCOUNT_LOCATED_LABEL, resolved.main.profile_url);
            println!(
                "Sock account: {} (IP {})",
                resolved.sock.profile_url, resolved.sock_pii.ip
            );
        }
    }
    Step::Continue
}

fn render_textarea(field: &TextareaField, value: &str, caret: Option<usize>) {
    println!("\n{}", field.label.render());
    if let Some(caret) = caret {
        println!("(editing, caret at character {})", caret);
    }
    println!("{}", "-".repeat(40));
    if value.is_empty() {
        println!("({})", field.placeholder);
    } else {
        println!("{}", value);
    }
    println!("{}", "-".repeat(40));
    println!("{}", char_counter_hint(text_length(value), field.bounds));
}

fn render_form(controller: &BanEvasionController) {
    println!(
        "\n{}: {}",
        DELETE_REASON_LABEL.render(),
        controller.deletion_reason().label()
    );
    let caret_in = |field: FormField| {
        controller
            .focus()
            .filter(|focus| focus.field == field)
            .map(|focus| focus.caret)
    };
    render_textarea(
        &DELETE_REASON_DETAILS,
        controller.deletion_details(),
        caret_in(FormField::DeletionDetails),
    );
    render_textarea(
        &ANNOTATION_DETAILS,
        controller.annotation_details(),
        caret_in(FormField::AnnotationDetails),
    );
    println!(
        "\n[{}] {}",
        if controller.should_message_after() { "x" } else { " " },
        SHOULD_MESSAGE_AFTER_LABEL.render()
    );
    let submit = controller.controls().submit_button;
    let submit_note = if submit.loading {
        " - working"
    } else if !submit.enabled {
        " - disabled"
    } else {
        ""
    };
    println!(
        "\nreason | details | annotation | message | submit ({}{}) | close | cancel ({})",
        SUBMIT_BUTTON_LABEL, submit_note, CANCEL_BUTTON_LABEL
    );
}

async fn resolved_step(controller: &mut BanEvasionController, input: &Input) -> Step {
    render_form(controller);
    let Some(line) = prompt(input, "> ").await else {
        return Step::Quit;
    };
    if let Some(step) = parse_modal_command(&line) {
        return step;
    }

    match line.trim().to_ascii_lowercase().as_str() {
        "reason" => {
            for (i, reason) in DeleteReason::ALL.iter().enumerate() {
                println!("  {}) {}", i + 1, reason.label());
            }
            let choice = prompt(input, "Choose a reason: ").await;
            match choice
                .and_then(|c| c.trim().parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| DeleteReason::ALL.get(i))
            {
                Some(reason) => controller.select_deletion_reason(*reason),
                None => println!("Unknown reason, keeping {}", controller.deletion_reason().label()),
            }
        }
        "details" => {
            println!("Type text to add at the caret; finish with a line containing only '.'");
            let mut added = Vec::new();
            loop {
                let Some(line) = prompt(input, "").await else {
                    return Step::Quit;
                };
                if line == "." {
                    break;
                }
                added.push(line);
            }
            let details = format!("{}{}", controller.deletion_details(), added.join("\n"));
            controller.set_deletion_details(details);
        }
        "annotation" => {
            let replacement = prompt(input, "New annotation (Enter keeps the current one): ").await;
            match replacement {
                Some(text) if !text.trim().is_empty() => {
                    controller.set_annotation_details(text.trim())
                }
                Some(_) => {}
                None => return Step::Quit,
            }
        }
        "message" => {
            let checked = !controller.should_message_after();
            controller.set_should_message_after(checked);
        }
        "submit" => {
            // Errors have already been shown as toasts
            if let Ok(SubmitOutcome::Declined) = controller.handle_submit_actions().await {
                println!("Nothing was changed.");
            }
        }
        other => println!("Unknown command: {}", other),
    }
    Step::Continue
}
