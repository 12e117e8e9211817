use drape::{Config, Server, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let log_dir = format!("{}/logs", config.work_dir);
    drape::init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        Some(&log_dir),
    );

    print_banner();
    tracing::info!("Drape server starting...");

    let server = Server::new(config);
    server.run().await?;

    Ok(())
}
