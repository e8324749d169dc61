//! `stockroom`: warm the caches against a backend and print a stock summary.
//!
//! `stockroom export <path>` writes the product CSV export to `path`.

use stockroom_app::config::AppConfig;
use stockroom_app::context::AppContext;
use stockroom_app::telemetry::init_tracing;
use stockroom_app::workflows::product::export_csv;
use stockroom_core::profile::UserProfile;
use stockroom_core::status::ProductStatus;

#[tokio::main]
async fn main() {
    // --- Configuration ---
    let config = AppConfig::from_env().expect("Invalid configuration");

    // --- Tracing ---
    init_tracing(config.log_format).expect("Failed to install tracing subscriber");
    tracing::info!(api_url = %config.api_url, "Loaded configuration");

    let profile = UserProfile {
        email: std::env::var("STOCKROOM_USER_EMAIL").unwrap_or_default(),
        tenant_name: std::env::var("STOCKROOM_TENANT").unwrap_or_default(),
        ..UserProfile::default()
    };
    let ctx = AppContext::from_config(&config, profile).expect("Failed to build client");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [command, path] = args.as_slice() {
        if command == "export" {
            let bytes = export_csv(&ctx).await.expect("Export failed");
            std::fs::write(path, &bytes).expect("Failed to write export");
            tracing::info!(path = %path, bytes = bytes.len(), "Wrote product export");
            return;
        }
    }

    // --- Summary ---
    let (products, members, shipments) = tokio::join!(ctx.products(), ctx.members(), ctx.shipments());
    let products = products.expect("Failed to load products");
    let members = members.expect("Failed to load members");
    let shipments = shipments.expect("Failed to load shipments");

    let available = products
        .iter()
        .filter(|p| p.status == ProductStatus::Available)
        .count();
    tracing::info!(
        products = products.len(),
        available,
        members = members.len(),
        shipments = shipments.len(),
        "Inventory loaded",
    );
}
