//! `contrib-relief` binary.
//!
//! ```bash
//! contrib-relief --dataset nat-2020.json --user nat --year 2020 --font Inter.ttf
//! RUST_LOG=debug contrib-relief --dataset d.json -u nat -y 2020 --format binary
//! ```

use clap::Parser;
use relief_cli::Args;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    for path in relief_cli::run(args).await? {
        println!("{}", path.display());
    }
    Ok(())
}
