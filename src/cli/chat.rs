// cli/chat.rs — `atlasd chat` terminal REPL.
//
// Talks to a running atlasd server through the same controller the browser
// widget uses, so the terminal sees identical transcript semantics.
//
// Usage:
//   atlasd chat                          # interactive session
//   atlasd chat --non-interactive "..."  # single question, print reply, exit

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write as IoWrite};

use crate::chat::Role;
use crate::client::ChatController;

/// Options for the `atlasd chat` command.
#[derive(Debug, Default)]
pub struct ChatOpts {
    /// Relay endpoint URL, e.g. "http://127.0.0.1:4310/api/stream".
    pub endpoint: String,
    /// Single-shot non-interactive query — print response and exit.
    pub non_interactive: Option<String>,
}

/// Entry point for `atlasd chat`.
pub async fn run_chat(opts: ChatOpts) -> Result<()> {
    let mut controller = ChatController::new(&opts.endpoint)
        // The assistant restarts onboarding itself; the hook just tells the
        // terminal user what is happening.
        .on_trigger("change preferences", |_| {
            println!("(restarting preference onboarding)");
        });

    if let Some(prompt) = opts.non_interactive {
        return run_non_interactive(&mut controller, &prompt).await;
    }

    // The seeded greeting is the first onboarding question.
    println!("assistant: {}", controller.messages()[0].content);

    loop {
        print!("you: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(()); // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            return Ok(());
        }

        let spinner = spinner();
        controller.send_message(line).await;
        spinner.finish_and_clear();

        if let Some(err) = controller.error() {
            eprintln!("error: {err}");
            continue;
        }
        if let Some(reply) = controller
            .messages()
            .last()
            .filter(|m| m.role == Role::Assistant)
        {
            println!("assistant: {}", reply.content);
        }
    }
}

async fn run_non_interactive(controller: &mut ChatController, prompt: &str) -> Result<()> {
    let spinner = spinner();
    controller.send_message(prompt).await;
    spinner.finish_and_clear();

    if let Some(err) = controller.error() {
        anyhow::bail!("{err}");
    }
    match controller.messages().last() {
        Some(m) if m.role == Role::Assistant => {
            println!("{}", m.content);
            Ok(())
        }
        _ => anyhow::bail!("no response received"),
    }
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("Thinking…");
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}
