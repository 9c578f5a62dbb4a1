use crate::common::setup_server;
use httpmock::Method::GET;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use yfinance_data::{ProxySpec, TickerData, YfClient};

#[tokio::test]
async fn proxied_clients_keep_the_builder_settings() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/ua").header("user-agent", "custom/1");
        then.status(200).body("ok");
    });

    let client = YfClient::builder()
        .user_agent("custom/1")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    // no per-request headers, so the transport's own User-Agent goes out
    let data = TickerData::builder("AAPL")
        .transport(Arc::new(client))
        .user_agent_headers(BTreeMap::new())
        .build()
        .unwrap();
    let url = server.url("/ua");

    let direct = data.fetch(&url, None, None, ProxySpec::None, None).await.unwrap();
    // https-only proxy: a plain http request still goes direct, through the proxied client
    let proxied = data.fetch(&url, None, None, "127.0.0.1:9", None).await.unwrap();

    mock.assert_calls(2);
    assert_eq!(direct.status, 200);
    assert_eq!(proxied.status, 200);
}

#[tokio::test]
async fn expired_responses_are_dropped_on_the_next_store() {
    let server = setup_server();
    let a = server.mock(|when, then| {
        when.method(GET).path("/a");
        then.status(200).body("a");
    });
    let b = server.mock(|when, then| {
        when.method(GET).path("/b");
        then.status(200).body("b");
    });

    let client = YfClient::builder()
        .cache_ttl(Duration::from_millis(50))
        .build()
        .unwrap();
    let data = TickerData::with_transport("AAPL", Arc::new(client.clone()));

    data.fetch(&server.url("/a"), None, None, ProxySpec::None, None)
        .await
        .unwrap();
    assert_eq!(client.cache_len(), 1);

    tokio::time::sleep(Duration::from_millis(150)).await;
    // still held, just no longer served
    assert_eq!(client.cache_len(), 1);

    data.fetch(&server.url("/b"), None, None, ProxySpec::None, None)
        .await
        .unwrap();
    assert_eq!(client.cache_len(), 1);

    a.assert_calls(1);
    b.assert_calls(1);
}

#[tokio::test]
async fn live_responses_survive_a_store() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).body("ok");
    });

    let client = YfClient::builder()
        .cache_ttl(Duration::from_secs(60))
        .build()
        .unwrap();
    let data = TickerData::with_transport("AAPL", Arc::new(client.clone()));

    for path in ["/a", "/b", "/c"] {
        data.fetch(&server.url(path), None, None, ProxySpec::None, None)
            .await
            .unwrap();
    }
    assert_eq!(client.cache_len(), 3);
    mock.assert_calls(3);
}
