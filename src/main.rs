use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_client::{
    config::Config,
    controllers::CatalogPage,
    notifications::NoticeEvent,
    routes::nav_links,
    ClientContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::load().context("Failed to load configuration")?;

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    if config.app.environment == "production" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting cinema client ({})", config.app.environment);

    // Shared context: session restored from disk, notifier, API client
    let ctx = ClientContext::new(config).context("Failed to initialize client")?;
    match ctx.session.user() {
        Some(user) => info!("Signed in as {} (admin: {})", user.email, user.is_admin),
        None => info!("No saved session"),
    }
    info!("Navigation: {:?}", nav_links(&ctx.session));

    // Notices are rendered as log lines in the headless client
    let listener = ctx.notifier.listen(|event| match event {
        NoticeEvent::Published(notice) => match notice.title {
            Some(title) => warn!("[notice] {}: {}", title, notice.message),
            None => warn!("[notice] {}", notice.message),
        },
        NoticeEvent::Dismissed(id) => info!("[notice] {} dismissed", id),
    });

    let mut catalog = CatalogPage::new(ctx.clone());
    if catalog.load().await.is_ok() {
        info!(
            "Catalog loaded: {} movies in {} categories",
            catalog.movies().len(),
            catalog.categories().len()
        );
        for movie in catalog.movies() {
            info!("  #{} {} ({} min)", movie.id, movie.title, movie.duration);
        }
    }

    // Give the listener a chance to log what the catalog load published
    tokio::task::yield_now().await;
    listener.unsubscribe().await;
    info!("Shutting down");
    Ok(())
}
