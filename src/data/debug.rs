//! Debug dump helpers for development / troubleshooting.

use super::extract::{DataStores, extract_json_str};
use serde_json::Value;
use std::io::Write;

fn dump_path(ticker: &str, sub_page: Option<&str>, suffix: &str) -> std::path::PathBuf {
    let page = sub_page.map_or_else(String::new, |p| format!("-{}", p.replace('/', "_")));
    std::env::temp_dir().join(format!("yfinance_data-{ticker}{page}-{suffix}"))
}

/// Write the raw page plus the bare `root.App.main` payload, pretty-printed when it parses.
pub fn debug_dump_html(ticker: &str, sub_page: Option<&str>, html: &str) -> std::io::Result<()> {
    let html_path = dump_path(ticker, sub_page, "page.html");
    std::fs::File::create(&html_path)?.write_all(html.as_bytes())?;
    eprintln!("YF_DEBUG: wrote {}", html_path.display());

    let Some(payload) = extract_json_str(html) else {
        eprintln!("YF_DEBUG: no root.App.main assignment in page");
        return Ok(());
    };
    let root_path = dump_path(ticker, sub_page, "rootapp.json");
    let mut f = std::fs::File::create(&root_path)?;
    if let Ok(v) = serde_json::from_str::<Value>(payload)
        && let Ok(pretty) = serde_json::to_string_pretty(&v)
    {
        f.write_all(pretty.as_bytes())?;
    } else {
        f.write_all(payload.as_bytes())?;
    }
    eprintln!("YF_DEBUG: wrote {}", root_path.display());
    Ok(())
}

/// Write the final, rewritten data stores.
pub fn debug_dump_stores(
    ticker: &str,
    sub_page: Option<&str>,
    stores: &DataStores,
) -> std::io::Result<()> {
    let path = dump_path(ticker, sub_page, "stores.json");
    let pretty = serde_json::to_string_pretty(stores).map_err(std::io::Error::other)?;
    std::fs::File::create(&path)?.write_all(pretty.as_bytes())?;
    eprintln!("YF_DEBUG: wrote {}", path.display());
    Ok(())
}
