use std::sync::Arc;
use std::time::Duration;
use yfinance_data::{ProxySpec, TickerData, YfClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing-subscriber")]
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = YfClient::builder()
        .cache_ttl(Duration::from_secs(300))
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    let data = TickerData::with_transport("AAPL", Arc::new(client));

    let stores = match data.get_data_stores(None, ProxySpec::None).await {
        Ok(s) => s,
        Err(e) if e.is_unparsable() => {
            eprintln!("quote page layout not recognised: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("--- Stores for {} ---", data.ticker());
    for name in stores.keys() {
        println!("  {name}");
    }

    if let Some(summary) = stores.get("QuoteSummaryStore") {
        println!(
            "regularMarketPrice: {}",
            summary["price"]["regularMarketPrice"]
        );
    }

    // Second call is served from the memo table.
    let _ = data.get_data_stores(None, ProxySpec::None).await?;
    println!("memo: {:?}", data.data_stores_cache_info());

    Ok(())
}
