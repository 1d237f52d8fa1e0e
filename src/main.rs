use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use inbox_tasks::config::InboxConfig;
use inbox_tasks::console::{self, Command};
use inbox_tasks::error::Result;
use inbox_tasks::mail::{DemoMailSource, Ingestor, MailSource};
use inbox_tasks::state::InboxStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = InboxConfig::from_env()?;

    let source: Arc<dyn MailSource> = Arc::new(DemoMailSource::with_demo_inbox());

    eprintln!("📬 Inbox Tasks v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Source: {}", source.name());
    eprintln!("   Query: {} (max {})", config.mailbox_query, config.max_results);
    eprintln!("   Display offset: {}", config.display_offset);
    eprintln!("   Type 'help' for commands, 'quit' to exit.\n");

    let ingestor = Ingestor::new(source, &config);
    let mut store = InboxStore::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprint!("> ");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            eprint!("> ");
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                eprint!("> ");
                continue;
            }
        };

        match command {
            Command::Fetch => {
                let view = store.refresh(&ingestor).await;
                println!("{}", console::render_status(&view));
                println!("{}", console::render_tasks(&view));
            }
            Command::Emails => println!("{}", console::render_emails(&store.view())),
            Command::Tasks => println!("{}", console::render_tasks(&store.view())),
            Command::Search(query) => {
                let view = store.set_query(query);
                println!("{}", console::render_emails(&view));
                println!("{}", console::render_tasks(&view));
            }
            Command::Priority(priority_filter) => {
                let view = store.set_priority_filter(priority_filter);
                println!("{}", console::render_tasks(&view));
            }
            Command::ShowCompleted(show) => {
                let view = store.set_show_completed(show);
                println!("{}", console::render_tasks(&view));
            }
            Command::Toggle(id) => {
                let view = store.toggle_completion(id);
                println!("{}", console::render_tasks(&view));
            }
            Command::Reset => {
                let view = store.reset_completion();
                println!("{}", console::render_status(&view));
            }
            Command::SignOut => {
                let view = store.sign_out();
                println!("{}", console::render_status(&view));
            }
            Command::Json => println!("{}", serde_json::to_string_pretty(&*store.view())?),
            Command::Help => println!("{}", console::HELP),
            Command::Quit => break,
        }

        eprint!("> ");
    }

    Ok(())
}
