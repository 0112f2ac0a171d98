use galerie_api::setup;
use galerie_core::Config;

// Use mimalloc as the global allocator for better performance and lower fragmentation,
// especially when running on musl-based systems inside containers.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Document store, artifact store, services and routes
    let (state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, state, router).await?;

    Ok(())
}
