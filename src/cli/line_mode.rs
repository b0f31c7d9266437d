use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::application::Conversation;
use crate::domain::DomainError;

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

fn ensure_available(conversation: &Conversation) -> Result<(), DomainError> {
    if conversation.is_available() {
        return Ok(());
    }
    let reason = conversation.banner().unwrap_or("chat client unavailable");
    Err(DomainError::configuration(reason))
}

/// Submit one prompt. The reply goes to `out`; on failure the apology goes to
/// `err` and the failure description is returned as the error.
pub async fn run_ask<W: Write, E: Write>(
    conversation: &mut Conversation,
    prompt: &str,
    out: &mut W,
    err: &mut E,
) -> Result<(), DomainError> {
    ensure_available(conversation)?;

    if !conversation.submit(prompt).await {
        return Err(DomainError::invalid_input("prompt is empty"));
    }

    let Some(entry) = conversation.transcript().last() else {
        return Err(DomainError::internal("no response recorded"));
    };

    if entry.is_error() {
        writeln!(err, "{}", entry.content())?;
        let reason = conversation.last_error().unwrap_or(entry.content());
        return Err(DomainError::adapter(reason));
    }

    writeln!(out, "{}", entry.content())?;
    Ok(())
}

/// Read prompts line by line until EOF or `/quit`, printing each reply.
/// Failures are reported inline and the loop carries on.
pub async fn run_repl<R, W>(
    conversation: &mut Conversation,
    input: R,
    out: &mut W,
) -> Result<(), DomainError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    ensure_available(conversation)?;

    let model = conversation.model_name().unwrap_or("unknown model");
    writeln!(out, "Chatting with {model}. Type /quit to exit.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let line = line.trim_end();

        if QUIT_COMMANDS.contains(&line) {
            break;
        }

        if !conversation.submit(line).await {
            continue;
        }

        if let Some(entry) = conversation.transcript().last() {
            writeln!(out, "{} {}", entry.role().label(), entry.content())?;
            if entry.is_error() {
                if let Some(reason) = conversation.last_error() {
                    writeln!(out, "error: {reason}")?;
                }
            }
        }
    }

    Ok(())
}
