use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "everbook",
    about = "Everbook — a permanent, publicly readable guestbook ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the Everbook server
    Serve(ServeArgs),
    /// Run an in-process demonstration book
    Demo(DemoArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:9590")]
    pub bind: SocketAddr,

    /// Host ceiling on name + message bytes per entry
    #[arg(long, default_value_t = 128 * 1024)]
    pub max_payload_bytes: usize,

    /// Require bearer credentials for reads too
    #[arg(long)]
    pub require_auth_for_reads: bool,
}

#[derive(Args)]
pub struct DemoArgs {
    /// Number of demonstration signatures
    #[arg(short = 'n', long, default_value_t = 3)]
    pub signatures: usize,
}
