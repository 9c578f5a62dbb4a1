#[cfg(feature = "test-mode")]
use std::env;
use url::Url;

/// Read the response body as text.
/// In `test-mode`, if `YF_RECORD=1`, the body is saved as a fixture named after the request URL.
pub(crate) async fn get_text(resp: reqwest::Response, _url: &Url) -> Result<String, reqwest::Error> {
    let text = resp.text().await?;

    #[cfg(feature = "test-mode")]
    {
        if env::var("YF_RECORD").ok().as_deref() == Some("1")
            && let Err(e) = crate::core::fixtures::record_fixture(_url, &text)
        {
            eprintln!("YF_RECORD: failed to write fixture for {_url}: {e}");
        }
    }

    Ok(text)
}
