use navette::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting navette");

    // Load configuration
    let config = startup::load_config()?;

    #[cfg(feature = "web-interface")]
    {
        startup::start_server(config).await
    }

    #[cfg(not(feature = "web-interface"))]
    {
        let _ = config;
        tracing::warn!("Web interface feature not enabled. Please compile with --features web-interface");
        Ok(())
    }
}
