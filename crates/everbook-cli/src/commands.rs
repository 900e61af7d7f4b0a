use std::time::Duration;

use colored::Colorize;

use everbook_client::SyncConfig;
use everbook_sdk::Everbook;
use everbook_server::{EverbookServer, ServerConfig};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Demo(args) => cmd_demo(args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = ServerConfig {
        bind_addr: args.bind,
        max_payload_bytes: args.max_payload_bytes,
        allow_anonymous_read: !args.require_auth_for_reads,
        ..ServerConfig::default()
    };
    println!(
        "{} Everbook server on {}",
        "✓".green().bold(),
        config.bind_addr.to_string().bold()
    );
    let server = EverbookServer::new(config);
    server.serve().await?;
    Ok(())
}

async fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let book = Everbook::open();
    let mut view = book.spawn_sync_with(SyncConfig {
        poll_interval: Duration::from_millis(200),
        ..SyncConfig::default()
    });

    println!(
        "Opened a demonstration book as {}",
        book.caller().short_id().cyan()
    );

    for i in 0..args.signatures {
        let receipt = book
            .sign(&format!("Guest {}", i + 1), "Hello from Everbook!")
            .await?;
        println!(
            "  {} signature {} committed at t={}",
            "✓".green(),
            receipt.seq.to_string().yellow(),
            receipt.timestamp
        );
    }

    // Wait for the live view to catch up with the last signature.
    let target = args.signatures;
    tokio::time::timeout(Duration::from_secs(5), view.wait_for(|v| v.len() >= target))
        .await
        .map_err(|_| anyhow::anyhow!("view did not converge"))??;

    println!("\nSynchronized view ({} entries):", target.to_string().bold());
    for entry in &view.borrow().entries {
        println!(
            "  {}  {}: {}",
            entry.sender.short_id().cyan(),
            entry.name.yellow(),
            entry.message
        );
    }
    Ok(())
}
