// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal demo client for the desklive messaging core.

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

use desklive::chat::{ChatEvent, ChatFrame, ChatMode, ChatSession, ContactInfo, Role};
use desklive::config::LiveConfig;
use desklive::notify::{NotificationCenter, NotifyEvent};

#[derive(Parser)]
#[command(name = "desklive", about = "Support-desk real-time messaging client")]
struct Cli {
    #[command(flatten)]
    config: LiveConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat session. Type messages; `/contact name=.. email=..`
    /// answers a contact request.
    Chat {
        /// Connect in staff mode (uses the configured token).
        #[arg(long)]
        staff: bool,
    },
    /// Tail live notifications and the unread counter.
    Inbox,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let result = match cli.command {
        Command::Chat { staff } => run_chat(cli.config, staff).await,
        Command::Inbox => run_inbox(cli.config).await,
    };

    if let Err(e) = result {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run_chat(config: LiveConfig, staff: bool) -> anyhow::Result<()> {
    let mode = if staff { ChatMode::Staff } else { ChatMode::Customer };

    // Widget settings gate the greeting shown before the session starts.
    if !staff {
        match desklive::chat::widget::fetch_widget_settings(&config.api_base).await {
            Ok(settings) if !settings.is_enabled => {
                println!("* chat is currently disabled");
                return Ok(());
            }
            Ok(settings) if !settings.greeting_message.is_empty() => {
                println!("assistant: {}", settings.greeting_message);
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(err = %e, "widget config unavailable"),
        }
    }

    let mut session = ChatSession::new(&config.chat_ws_base);
    session.connect(mode, config.token.as_deref());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = session.recv() => {
                match event {
                    Some(ChatEvent::Open) => println!("* connected ({mode})"),
                    Some(ChatEvent::Frame(ChatFrame::Message { role, content })) => {
                        let who = match role {
                            Role::User => "you",
                            Role::Assistant => "assistant",
                            Role::System => "system",
                        };
                        println!("{who}: {content}");
                    }
                    Some(ChatEvent::Frame(ChatFrame::Typing { status })) => {
                        if status {
                            println!("* assistant is typing...");
                        }
                    }
                    Some(ChatEvent::Frame(ChatFrame::ContactRequest(ref request))) => {
                        println!("* contact info requested: {}", request.fields.join(", "));
                        for (field, problem) in &request.invalid {
                            println!("*   {field}: {problem}");
                        }
                    }
                    Some(ChatEvent::Errored) => println!("* connection error"),
                    Some(ChatEvent::Closed) | None => {
                        println!("* disconnected");
                        return Ok(());
                    }
                }
            }

            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(()) };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Some(args) = line.strip_prefix("/contact ") {
                    session.send_contact_info(&parse_contact(args));
                } else {
                    session.send_message(line);
                }
            }
        }
    }
}

/// Parse `name=Ada email=ada@x.com phone=555` into contact info.
fn parse_contact(args: &str) -> ContactInfo {
    let mut info = ContactInfo::default();
    for pair in args.split_whitespace() {
        match pair.split_once('=') {
            Some(("name", v)) => info.name = Some(v.to_owned()),
            Some(("email", v)) => info.email = Some(v.to_owned()),
            Some(("phone", v)) => info.phone = Some(v.to_owned()),
            _ => {}
        }
    }
    info
}

async fn run_inbox(config: LiveConfig) -> anyhow::Result<()> {
    anyhow::ensure!(config.token.is_some(), "--token is required for the inbox");

    let mut center = NotificationCenter::new(&config);
    center.connect();

    while let Some(event) = center.recv().await {
        match event {
            NotifyEvent::Open => println!("* connected"),
            NotifyEvent::Closed => println!("* disconnected, retrying"),
            NotifyEvent::Push(n) => {
                println!(
                    "[{}] #{} {} (unread: {})",
                    n.created_at,
                    n.id,
                    n.notification_type,
                    center.feed.unread_count(),
                );
            }
            NotifyEvent::UnreadCount(_) => {
                println!("* {} unread of {}", center.feed.unread_count(), center.feed.len());
            }
            NotifyEvent::Snapshot(_) | NotifyEvent::UnreadSnapshot(_) => {
                println!("* {} unread of {}", center.feed.unread_count(), center.feed.len());
                for n in center.feed.display(5) {
                    let marker = if n.is_read { " " } else { "*" };
                    println!("{marker} #{} {} ({})", n.id, n.notification_type, n.created_at);
                }
            }
        }
    }

    Ok(())
}
