use anyhow::Context;
use clap::Parser;
use pingora_core::server::configuration::Opt;
use pingora_core::server::Server;
use std::path::PathBuf;
use std::sync::Arc;

use imgshift::config::Config;
use imgshift::proxy::ImgshiftProxy;
use imgshift::service::TransformService;

/// imgshift - on-the-fly image resize and WebP conversion over HTTP
#[derive(Parser, Debug)]
#[command(name = "imgshift")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used when it does not exist)
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Upgrade workers gracefully
    #[arg(long)]
    upgrade: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    imgshift::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging subsystem: {e}"))?;

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        scratch_dir = %config.scratch.directory.display(),
        "Configuration loaded successfully"
    );

    let service = TransformService::new(&config).context("Failed to initialize transform service")?;

    let opt = Opt {
        daemon: args.daemon,
        test: args.test,
        upgrade: args.upgrade,
        ..Default::default()
    };

    let mut server = Server::new(Some(opt))
        .map_err(|e| anyhow::anyhow!("Failed to create Pingora server: {e}"))?;
    server.bootstrap();

    let proxy = ImgshiftProxy::new(Arc::new(service));
    let mut proxy_service = pingora_proxy::http_proxy_service(&server.configuration, proxy);

    let listen_addr = config.server.listen_addr();
    proxy_service.add_tcp(&listen_addr);
    proxy_service.threads = Some(config.server.threads);

    tracing::info!(
        address = %listen_addr,
        threads = config.server.threads,
        "Starting imgshift"
    );

    server.add_service(proxy_service);

    // Blocks until shutdown
    server.run_forever();
}
