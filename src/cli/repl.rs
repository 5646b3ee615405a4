// Interactive terminal chat
//
// Drives the same conversation state machine the embedded widgets use:
// optimistic question append, one outstanding request, one answer bubble per
// resolution.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::client::ApiClient;
use crate::conversation::Conversation;

pub struct ChatRepl {
    client: ApiClient,
    conversation: Conversation,
}

impl ChatRepl {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            conversation: Conversation::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;

        println!("Canopy Assist chat. Type /quit to exit.");

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let input = line.trim();
                    if input == "/quit" || input == "/exit" {
                        println!("Goodbye!");
                        break;
                    }

                    // Rejects blank input; the in-flight guard cannot trip
                    // here because we await the resolution below
                    if self.conversation.submit(&line).is_none() {
                        continue;
                    }
                    let _ = editor.add_history_entry(input);

                    let outcome = self.client.chat(&self.conversation.transcript()).await;
                    self.conversation.resolve(outcome);

                    if let Some(message) = self.conversation.latest() {
                        println!("{}", message.content);
                        println!();
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}
