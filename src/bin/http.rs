#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use study_planner::{Planner, http_api, load_snapshot_from_json};
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("study_planner=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("STUDY_PLANNER_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let mut planner = match std::env::var("STUDY_PLANNER_SNAPSHOT") {
        Ok(path) => {
            tracing::info!(%path, "loading snapshot");
            load_snapshot_from_json(path)?
        }
        Err(_) => Planner::default(),
    };
    let config = planner.config().clone().with_env_overrides();
    config.validate()?;
    planner.set_config(config);

    tracing::info!(%addr, "study-planner HTTP API listening");
    http_api::serve(addr, planner).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
