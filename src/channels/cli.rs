//! CLI channel: stdin/stdout REPL for a single local session.

use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::assistant::Assistant;
use crate::error::SessionError;
use crate::llm::ImageAttachment;
use crate::session::Session;

/// A line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Attach the image at this path to the next question.
    Image(String),
    Status,
    Quit,
    /// Anything else is passed to the assistant.
    Message(String),
}

impl CliCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.split_once(char::is_whitespace) {
            Some(("/image", path)) => Self::Image(path.trim().to_string()),
            _ => match trimmed {
                "/quit" | "/exit" => Self::Quit,
                "/status" => Self::Status,
                _ => Self::Message(line.to_string()),
            },
        }
    }
}

/// Read an image from disk, inferring the media type from its extension.
pub async fn load_image(path: &Path) -> Result<ImageAttachment, SessionError> {
    let media_type = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageAttachment::media_type_for_extension)
        .ok_or_else(|| SessionError::InvalidImage {
            reason: format!("unsupported image file {}", path.display()),
        })?;
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| SessionError::InvalidImage {
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
    ImageAttachment::new(data, media_type)
}

/// Interactive REPL over stdin/stdout.
pub struct CliChannel;

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl CliChannel {
    pub fn new() -> Self {
        Self
    }

    /// Run one session until EOF or `/quit`.
    pub async fn run(&self, assistant: &Assistant) -> std::io::Result<()> {
        let mut session = Session::new();
        if let Some(question) = assistant.current_question(&session) {
            println!("\n{question}\n");
        }
        eprint!("> ");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                eprint!("> ");
                continue;
            }

            match CliCommand::parse(&line) {
                CliCommand::Quit => break,
                CliCommand::Status => {
                    let status = session.status();
                    eprintln!(
                        "ℹ️  Step: {} ({}% of onboarding), chat turns: {}, image attached: {}",
                        status.step,
                        status.progress_percent,
                        status.chat_turns,
                        status.pending_image
                    );
                }
                CliCommand::Image(path) => match load_image(Path::new(&path)).await {
                    Ok(image) => {
                        eprintln!("📎 Attached {} ({} bytes)", image.media_type(), image.bytes().len());
                        session.attach_image(image);
                    }
                    Err(e) => eprintln!("❌ {e}"),
                },
                CliCommand::Message(text) => {
                    if session.is_chatting() {
                        eprintln!("⏳ Thinking...");
                    }
                    let reply = assistant.handle_turn(&mut session, &text).await;
                    println!("\n{reply}\n");
                }
            }
            eprint!("> ");
        }

        tracing::info!(session_id = %session.id, turns = session.chat_log.len(), "CLI session ended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_commands() {
        assert_eq!(CliCommand::parse("/quit"), CliCommand::Quit);
        assert_eq!(CliCommand::parse("  /status "), CliCommand::Status);
        assert_eq!(
            CliCommand::parse("/image  photos/rash.jpg "),
            CliCommand::Image("photos/rash.jpg".to_string())
        );
        assert_eq!(
            CliCommand::parse("is /image a word?"),
            CliCommand::Message("is /image a word?".to_string())
        );
    }

    #[tokio::test]
    async fn load_image_infers_media_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rash.JPG");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();
        let image = load_image(&path).await.unwrap();
        assert_eq!(image.media_type(), "image/jpeg");
        assert_eq!(image.bytes().len(), 3);
    }

    #[tokio::test]
    async fn load_image_rejects_unknown_and_missing_files() {
        let dir = TempDir::new().unwrap();
        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "hi").unwrap();
        assert!(load_image(&text).await.is_err());
        assert!(load_image(&dir.path().join("missing.png")).await.is_err());
    }
}
