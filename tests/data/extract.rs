use crate::common::{fixture, page_with_stores, quote_page};
use serde_json::json;
use yfinance_data::YfError;
use yfinance_data::data::extract::{extract_data_stores, extract_json_str, unwrap_raw_values};

const URL: &str = "https://finance.yahoo.com/quote/TEST";

#[test]
fn collapses_raw_fmt_wrapper() {
    let html = r#"root.App.main = {"context":{"dispatcher":{"stores":{"QuoteSummaryStore":{"a":{"raw":5,"fmt":"5.00"}}}}}};
}(this)"#;

    let stores = extract_data_stores(html, URL).unwrap();
    assert_eq!(
        serde_json::Value::Object(stores),
        json!({"QuoteSummaryStore": {"a": 5}})
    );
}

#[test]
fn missing_assignment_is_unparsable() {
    let html = "<html><body><h1>Will be right back...</h1></body></html>";
    let err = extract_data_stores(html, URL).unwrap_err();
    assert!(err.is_unparsable(), "got {err:?}");
    match err {
        YfError::Unparsable { url, reason } => {
            assert_eq!(url, URL);
            assert!(reason.contains("root.App.main"), "reason: {reason}");
        }
        other => panic!("expected Unparsable, got {other:?}"),
    }
}

#[test]
fn consent_page_is_unparsable() {
    let err = extract_data_stores(&fixture("consent.html"), URL).unwrap_err();
    assert!(err.is_unparsable());
}

#[test]
fn garbage_after_marker_is_unparsable() {
    let html = quote_page("function () { return 1 }");
    let err = extract_data_stores(&html, URL).unwrap_err();
    assert!(err.is_unparsable());
}

#[test]
fn missing_stores_path_is_unparsable() {
    let html = quote_page(r#"{"context":{"dispatcher":{}}}"#);
    let err = extract_data_stores(&html, URL).unwrap_err();
    assert!(err.is_unparsable());
}

#[test]
fn json_text_is_cut_between_markers() {
    let html = "<script>\nroot.App.main = {\"a\":1};\n}(this));\n</script>";
    assert_eq!(extract_json_str(html), Some("{\"a\":1}"));
    assert_eq!(extract_json_str("<html></html>"), None);
}

#[test]
fn trailing_markers_are_optional() {
    let html = r#"root.App.main = {"context":{"dispatcher":{"stores":{"QuoteSummaryStore":{}}}}}   "#;
    let stores = extract_data_stores(html, URL).unwrap();
    assert_eq!(stores["QuoteSummaryStore"], serde_json::Value::Null);
}

#[test]
fn empty_objects_become_null() {
    let html = page_with_stores(r#"{"QuoteSummaryStore":{"price":{},"list":[{}, {"x":1}]}}"#);
    let stores = extract_data_stores(&html, URL).unwrap();
    assert_eq!(
        stores["QuoteSummaryStore"],
        json!({"price": null, "list": [null, {"x": 1}]})
    );
}

#[test]
fn wrappers_collapse_everywhere() {
    let html = page_with_stores(
        r#"{"QuoteSummaryStore":{
            "price":{"regularMarketPrice":{"raw":181.99,"fmt":"181.99"},"currency":"USD"},
            "stats":{"marketCap":{"raw":2862516813824,"fmt":"2.863T","longFmt":"2,862,516,813,824"}},
            "history":[{"date":{"raw":1690761600,"fmt":"2023-07-31"},"eps":{"raw":-0.5,"fmt":"-0.50"}}]
        },"OtherStore":{"n":{"raw":1,"fmt":"1"}}}"#,
    );
    let stores = extract_data_stores(&html, URL).unwrap();
    assert_eq!(
        serde_json::Value::Object(stores),
        json!({
            "QuoteSummaryStore": {
                "price": {"regularMarketPrice": 181.99, "currency": "USD"},
                "stats": {"marketCap": 2862516813824_u64},
                "history": [{"date": 1690761600, "eps": -0.5}]
            },
            "OtherStore": {"n": 1}
        })
    );
}

#[test]
fn wrapper_nested_in_raw_is_collapsed_one_level() {
    // Single pass: the outer match ends at the inner wrapper's brace.
    let rewritten = unwrap_raw_values(r#"{"a":{"raw":{"raw":1,"fmt":"x"},"fmt":"y"}}"#);
    assert_eq!(rewritten, r#"{"a":{"raw":1,"fmt":"y"}}"#);

    let html = page_with_stores(r#"{"QuoteSummaryStore":{"a":{"raw":{"raw":1,"fmt":"x"},"fmt":"y"}}}"#);
    let stores = extract_data_stores(&html, URL).unwrap();
    assert_eq!(stores["QuoteSummaryStore"]["a"], json!({"raw": 1, "fmt": "y"}));
}

#[test]
fn single_quoted_wrappers_are_rewritten() {
    assert_eq!(unwrap_raw_values("[{'raw':5,'fmt':'5.00'}]"), "[5]");
}

#[test]
fn wrapper_with_raw_not_first_is_kept() {
    let html = page_with_stores(r#"{"QuoteSummaryStore":{"a":{"fmt":"5.00","raw":5}}}"#);
    let stores = extract_data_stores(&html, URL).unwrap();
    assert_eq!(stores["QuoteSummaryStore"]["a"], json!({"fmt": "5.00", "raw": 5}));
}

#[test]
fn captured_quote_page() {
    let stores = extract_data_stores(&fixture("quote_AAPL.html"), URL).unwrap();

    let keys: Vec<&str> = stores.keys().map(String::as_str).collect();
    assert_eq!(keys, ["PageStore", "StreamDataStore", "QuoteSummaryStore"]);

    let summary = &stores["QuoteSummaryStore"];
    assert_eq!(summary["price"]["regularMarketPrice"], json!(181.99));
    assert_eq!(summary["price"]["regularMarketChange"], json!(-0.9));
    assert_eq!(summary["price"]["marketCap"], json!(2862516813824_u64));
    assert_eq!(summary["price"]["shortName"], "Apple Inc.");
    assert_eq!(summary["summaryDetail"]["dividendYield"], json!(0.0052));
    assert_eq!(summary["summaryDetail"]["expireDate"], json!(null));
    assert_eq!(summary["summaryDetail"]["maxAge"], json!(1));
    assert_eq!(
        summary["earnings"]["earningsChart"]["quarterly"][1],
        json!({"date": "4Q2022", "actual": 1.88, "estimate": 1.94})
    );
    assert_eq!(
        summary["earnings"]["earningsChart"]["currentQuarterEstimate"],
        json!(1.39)
    );
    assert_eq!(stores["StreamDataStore"]["quoteData"], json!(null));
}
