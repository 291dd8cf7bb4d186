use anyhow::Result;
use route_finder::{
    config::{AppConfig, OutputFormat},
    market, report, utils,
};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    tracing::info!(
        market_file = %config.market_file.display(),
        buy_strategy = ?config.buy_strategy,
        "[INIT] route-finder starting"
    );

    let mut snapshot = market::load_market(&config.market_file)?;
    if let Some(amount) = config.trade_amount {
        snapshot.amount = amount;
    }

    let reports = report::evaluate(&snapshot, config.buy_strategy);
    let rendered = match config.output_format {
        OutputFormat::Text => report::render_text(&reports),
        OutputFormat::Json => report::render_json(&reports)?,
    };
    println!("{rendered}");
    Ok(())
}
