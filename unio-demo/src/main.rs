//! End-to-end walkthrough of the unified handle runtime.
//!
//! Writes and reads back a file, removes it, then serves one plain-text HTTP
//! exchange over a listener that closes itself after a deadline.

mod scenario;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use unio::io::config::load_config;
use unio::{CallMode, Runtime};

#[derive(Parser)]
#[command(name = "unio-demo")]
#[command(about = "Exercise every unified I/O operation end to end")]
struct Args {
    /// Runtime config file (TOML). Missing file means defaults.
    #[arg(long, default_value = "unio.toml")]
    config: PathBuf,

    /// Override the call mode from the config file.
    #[arg(long)]
    mode: Option<CallMode>,

    /// Directory for the scratch file.
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Address the server listens on.
    #[arg(long, default_value = ":8090")]
    listen: String,

    /// Address the client connects to.
    #[arg(long, default_value = "127.0.0.1:8090")]
    connect: String,

    /// Close the listener after this many milliseconds.
    #[arg(long, default_value = "3000")]
    deadline_ms: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    unio::logging::init();
    if let Err(err) = run(Args::parse()).await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    info!(mode = %config.mode, buffer_size = config.buffer_size, "starting unio-demo");
    let rt = Arc::new(Runtime::new(config));

    let contents = scenario::file_round_trip(&rt, &args.workdir.join("file.txt"), b"hello").await?;
    println!("{}", String::from_utf8_lossy(&contents));

    let server = scenario::start_server(&rt, &args.listen, Duration::from_millis(args.deadline_ms))
        .await?;

    let response = scenario::request(
        &rt,
        &args.connect,
        b"POST / HTTP/1.1\r\nHost:127.0.0.1:8090\r\n\r\nHELLO WORLD\r\n",
    )
    .await?;
    println!("{}", String::from_utf8_lossy(&response));

    let served = server.await??;
    for request in &served {
        println!("{}", String::from_utf8_lossy(request));
    }
    info!(served = served.len(), "listener closed");
    Ok(())
}
