//! Storefront engine runner
//!
//! Boots a session against the configured backend (or the bundled demo
//! catalogue), optionally subscribes an email to the newsletter, and lets the
//! hero carousel rotate for a while.
//!
//! # Usage
//!
//! ```sh
//! # Demo catalogue, rotate the carousel for 12 seconds
//! cargo run -p storefront -- --rotate-for 12
//!
//! # Real backend, key taken from STOREFRONT_API_KEY
//! STOREFRONT_LOG=debug cargo run -p storefront -- --backend-url https://shop.example.com
//! ```

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use storefront::{
    fixtures, ConfigError, DataSource, RestDataSource, Session, StorefrontConfig, TracingHead,
};
use storefront_dispatch::OperationStatus;
use tracing_subscriber::EnvFilter;

/// Storefront state engine
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Boot the storefront state engine and report what it loaded")]
struct Args {
    /// Path to storefront.toml
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Initial product category
    #[arg(long)]
    category: Option<String>,

    /// Subscribe this email to the newsletter after boot
    #[arg(long, value_name = "EMAIL")]
    subscribe: Option<String>,

    /// Keep the carousel rotating for this many seconds
    #[arg(long, value_name = "SECS", default_value = "0")]
    rotate_for: u64,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .with_env_var("STOREFRONT_LOG")
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ConfigError> {
    let mut config = StorefrontConfig::load_or_default(args.config.as_deref())?;
    if let Some(url) = args.backend_url {
        config.backend.url = Some(url);
        config.validate()?;
    }

    let data: Arc<dyn DataSource> = match &config.backend.url {
        Some(url) => {
            tracing::info!(url = %url, "using REST backend");
            Arc::new(RestDataSource::new(url.clone(), config.backend.api_key()))
        }
        None => {
            tracing::info!("no backend configured, using the demo catalogue");
            Arc::new(fixtures::demo_catalogue())
        }
    };

    let mut session = Session::new(&config, data, Rc::new(TracingHead));
    if let Some(category) = args.category {
        session.dispatch(storefront::slices::filters::FilterAction::SetCategory(Some(category)));
    }
    session.boot();
    session.settle().await;
    report(&session);

    if let Some(email) = args.subscribe {
        session.subscribe_newsletter(email);
        session.settle().await;
        let view = session.newsletter();
        match view.status {
            OperationStatus::Success => tracing::info!(notice = ?view.notice, "newsletter subscription"),
            _ => tracing::warn!(notice = ?view.notice, "newsletter subscription failed"),
        }
    }

    if args.rotate_for > 0 {
        rotate(&session, Duration::from_secs(args.rotate_for)).await;
    }

    session.shutdown();
    Ok(())
}

fn report(session: &Session) {
    let state = session.state();
    for (section, error) in [
        ("hero", &state.hero.get().error),
        ("footer", &state.footer.get().error),
        ("offers", &state.offers.get().error),
        ("products", &state.products.get().error),
        ("sustainability", &state.sustainability.get().error),
    ] {
        if let Some(error) = error {
            tracing::warn!(section, error = %error, "section failed to load");
        }
    }

    for card in session.offer_cards().iter() {
        tracing::info!(
            offer = %card.offer.title,
            original = card.price.original,
            discounted = card.price.discounted,
            percentage = card.price.percentage,
            "offer"
        );
    }
    if let Some(featured) = session.featured_offer() {
        tracing::info!(offer = %featured.offer.title, "featured offer");
    }
    tracing::info!(
        products = session.visible_products().len(),
        slides = session.carousel().items().len(),
        "storefront ready"
    );
}

async fn rotate(session: &Session, duration: Duration) {
    let mut index = session.carousel().subscribe();
    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    if let Some(slide) = session.current_slide() {
        tracing::info!(index = 0, title = %slide.title, "slide");
    }
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = index.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *index.borrow_and_update();
                if let Some(slide) = session.current_slide() {
                    tracing::info!(index = current, title = %slide.title, "slide");
                }
            }
        }
    }
}
