use tokio::net::TcpListener;
use todo_server::{logging, store, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    logging::init()?;

    let config = Config::from_env()?;
    let store = store::from_backend(&config.backend);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, backend = config.backend.name(), "server listening");
    todo_server::run(listener, store).await?;
    Ok(())
}
