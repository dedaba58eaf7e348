//! Chat command handler: an interactive loop over one session.

use clap::Args;
use paperbrain_core::{config::AppConfig, AppResult};
use std::io::{BufRead, Write};

/// Interactive question-answering session
#[derive(Args, Debug)]
pub struct ChatCommand {}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let mut session = super::open_session(config).await?;

        println!(
            "PaperBrain chat ({} chunks from {} documents indexed)",
            session.index().len(),
            session.index().document_count()
        );
        println!("Type a question, /clear to reset the conversation, an empty line to exit.\n");

        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();

        loop {
            print!("> ");
            stdout.flush()?;

            let mut line = String::new();
            // EOF ends the session, same as /quit
            if stdin.lock().read_line(&mut line)? == 0 {
                println!();
                break;
            }

            let input = line.trim();
            // Empty line ends the session, same as EOF
            if input.is_empty() {
                break;
            }

            match input {
                "/quit" | "/exit" => break,
                "/clear" => {
                    session.clear();
                    println!("Conversation and index cleared.\n");

                    if config.index_path.exists() {
                        std::fs::remove_file(&config.index_path)?;
                    }
                    continue;
                }
                _ => {}
            }

            let outcome = session.ask(input).await?;
            super::ask::print_outcome(&outcome, false)?;
            println!();
        }

        Ok(())
    }
}
