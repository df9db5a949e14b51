//! Minimal terminal chat client against a running FloatChat server.
//!
//! Conversation history persists to a local JSON file, restored on the next
//! run. Commands: `/new` starts a conversation, `/delete` removes the
//! current one, `/quit` exits.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use floatchat::conversations::{ChatSession, ConversationFile, HttpChatTransport};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let base_url =
        std::env::var("FLOATCHAT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned());
    let history = std::env::var("FLOATCHAT_HISTORY")
        .unwrap_or_else(|_| "floatchat_history.json".to_owned());

    let transport = HttpChatTransport::new(&base_url);
    let mut session = ChatSession::open(ConversationFile::new(history), transport).await;

    println!("FloatChat — {}", base_url);
    println!("conversation: {}", session.store().active().title);
    for message in &session.store().active().messages {
        println!("  {:?}: {}", message.role, message.text);
    }

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" => break,
            "/new" => {
                session.new_conversation().await;
                println!("started: {}", session.store().active().title);
            }
            "/delete" => {
                let id = session.store().active_id().to_owned();
                session.delete_conversation(&id).await;
                println!("now in: {}", session.store().active().title);
            }
            text => {
                let reply = session.send(text).await?;
                println!("bot> {reply}");
            }
        }
    }

    Ok(())
}
