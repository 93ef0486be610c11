use clap::Parser;
use hotel_dashboard::core::report::{render_json, render_text};
use hotel_dashboard::domain::ports::{ConfigProvider, DataSource, Storage};
use hotel_dashboard::utils::error::ErrorSeverity;
use hotel_dashboard::utils::{logger, validation::Validate};
use hotel_dashboard::{
    CliArgs, DashboardAction, DashboardActions, DashboardError, DashboardSummary, HotelDashboard,
    LocalStorage, NamedTimeZone, OdooClient, SnapshotSource, SummaryStore, SystemClock,
    TomlConfig, WebActionService,
};
use std::time::Duration;

fn render(summary: &DashboardSummary, format: &str) -> hotel_dashboard::Result<String> {
    match format {
        "text" => Ok(render_text(summary)),
        _ => render_json(summary),
    }
}

fn fail(e: &DashboardError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    args.apply(&mut config);

    if config.json_logs() {
        logger::init_json_logger(args.verbose(&config));
    } else {
        logger::init_cli_logger(args.verbose(&config));
    }
    tracing::info!("🚀 Starting hotel dashboard");
    tracing::debug!("Loaded configuration from {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    if let Some(name) = &args.action {
        let action: DashboardAction = name.parse().unwrap_or_else(|e: DashboardError| fail(&e));
        let service = WebActionService::new(config.server_url(), |link: &str| println!("{}", link));
        if let Err(e) = DashboardActions::new(service).trigger(action).await {
            fail(&e);
        }
        return Ok(());
    }

    let exit_code = match &args.snapshot {
        Some(path) => {
            tracing::info!("📁 Reading records from snapshot {}", path);
            let source = SnapshotSource::from_file(path).unwrap_or_else(|e| fail(&e));
            run(source, &config).await
        }
        None => {
            tracing::info!("📡 Reading records from {}", config.server_url());
            let source = OdooClient::from_config(&config).unwrap_or_else(|e| fail(&e));
            run(source, &config).await
        }
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

async fn run<D: DataSource>(source: D, config: &TomlConfig) -> i32 {
    let zone = NamedTimeZone::parse(config.timezone()).unwrap_or_else(|e| fail(&e));
    let store = SummaryStore::new();
    let dashboard =
        HotelDashboard::with_store(source, SystemClock, zone, config.company_id(), store.clone());
    let storage = LocalStorage::new(config.output.path.clone());

    let Some(interval) = config.refresh_interval_seconds() else {
        let report = dashboard.refresh().await;
        let rendered = render(&report.summary, &config.output.format).unwrap_or_else(|e| fail(&e));
        match storage
            .write_file(&config.output.filename, rendered.as_bytes())
            .await
        {
            Ok(path) => {
                tracing::info!("📁 Dashboard saved to: {}", path);
                println!("{}", rendered);
            }
            Err(e) => fail(&e),
        }

        for failure in &report.failures {
            eprintln!("⚠️  {} data is stale: {}", failure.slice, failure.message);
        }
        return if report.is_complete() { 0 } else { 2 };
    };

    // Each published snapshot is rendered by a subscriber, independently of refreshes.
    let mut updates = store.subscribe();
    let format = config.output.format.clone();
    let filename = config.output.filename.clone();
    let writer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let summary = updates.borrow_and_update().clone();
            match render(&summary, &format) {
                Ok(rendered) => {
                    if let Err(e) = storage.write_file(&filename, rendered.as_bytes()).await {
                        tracing::error!("Error writing dashboard: {}", e);
                    }
                }
                Err(e) => tracing::error!("Error rendering dashboard: {}", e),
            }
        }
    });

    tracing::info!("🔁 Refreshing every {}s, press Ctrl+C to stop", interval);
    dashboard
        .run_until(Duration::from_secs(interval), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Cannot listen for Ctrl+C: {}", e);
            }
        })
        .await;

    drop(dashboard);
    drop(store);
    let _ = writer.await;
    0
}
