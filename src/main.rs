use std::env;
use std::sync::Arc;

use rapid7_logs_mcp::config::Config;
use rapid7_logs_mcp::http::serve_http;
use rapid7_logs_mcp::mcp::run_stdio;
use rapid7_logs_mcp::tools::LogTools;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the stdio transport; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    // Missing RAPID7_API_KEY aborts here, before any transport starts.
    let config = Config::from_env()?;
    tracing::info!(base_url = %config.base_url, "configuration loaded");

    let tools = Arc::new(LogTools::new(&config));

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        None => run_stdio(tools).await?,
        Some("--http") => {
            let addr = args
                .get(2)
                .cloned()
                .unwrap_or_else(|| "0.0.0.0:3000".to_string());
            serve_http(tools, &addr).await?;
        }
        Some(other) => {
            eprintln!("unknown argument: {other}");
            eprintln!("Usage: {} [--http [addr:port]]", args[0]);
            std::process::exit(1);
        }
    }

    Ok(())
}
