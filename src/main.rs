use anyhow::Context;
use rootview::{config::Config, guard::PathGuard, logging, server};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if i >= args.len() { eprintln!("--config requires a path"); std::process::exit(2); }
                config_path = Some(PathBuf::from(&args[i]));
            }
            other => {
                eprintln!("unknown argument: {other}");
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let cfg = match &config_path {
        Some(p) => Config::load(p).with_context(|| format!("loading config {}", p.display()))?,
        None => Config::default(),
    };
    cfg.validate().context("validating config")?;

    logging::init(cfg.log.format);

    let guard = PathGuard::new(&cfg.roots.allowed).context("building path guard")?;
    let addr = format!("{}:{}", cfg.server.bind_addr, cfg.server.port);
    let roots: Vec<String> = guard.roots().iter().map(|r| r.display().to_string()).collect();

    info!(addr = %addr, roots = ?roots, "rootview ready");

    server::serve(server::AppState::new(cfg, guard)).await
}
