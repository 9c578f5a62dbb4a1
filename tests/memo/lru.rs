use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use yfinance_data::{CACHE_MAXSIZE, CacheInfo, CallArgs, Memoized, YfError};

fn args(n: u32) -> CallArgs {
    CallArgs::new().arg(&n)
}

async fn square(memo: &Memoized<u32>, calls: &AtomicUsize, n: u32) -> u32 {
    memo.call(args(n), move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, YfError>(n * n)
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn equal_mappings_hit_the_cache() {
    let memo: Memoized<String> = Memoized::new("lookup", CACHE_MAXSIZE);
    let calls = &AtomicUsize::new(0);

    let mut first = HashMap::new();
    first.insert("interval", "1d");
    first.insert("range", "1y");
    let mut second = HashMap::new();
    second.insert("range", "1y");
    second.insert("interval", "1d");

    for params in [&first, &second] {
        let out = memo
            .call(CallArgs::new().kwarg("params", params), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("body".to_string())
            })
            .await
            .unwrap();
        assert_eq!(out, "body");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        memo.cache_info(),
        CacheInfo {
            hits: 1,
            misses: 1,
            max_size: CACHE_MAXSIZE,
            current_size: 1,
        }
    );
}

#[tokio::test]
async fn least_recently_used_entry_is_evicted_first() {
    let memo = Memoized::new("square", 2);
    let calls = &AtomicUsize::new(0);

    square(&memo, calls, 1).await;
    square(&memo, calls, 2).await;
    // touch 1 so 2 becomes the eviction candidate
    square(&memo, calls, 1).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    square(&memo, calls, 3).await;
    assert_eq!(memo.cache_info().current_size, 2);

    // 1 survived, 2 did not
    square(&memo, calls, 1).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    square(&memo, calls, 2).await;
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(memo.cache_info().current_size, 2);
}

#[tokio::test]
async fn size_never_exceeds_capacity() {
    let memo = Memoized::new("square", 4);
    let calls = &AtomicUsize::new(0);

    for n in 0..20 {
        assert_eq!(square(&memo, calls, n).await, n * n);
        assert!(memo.cache_info().current_size <= 4);
    }
    let info = memo.cache_info();
    assert_eq!(info.current_size, 4);
    assert_eq!(info.misses, 20);
    assert_eq!(info.hits, 0);
}

#[tokio::test]
async fn errors_are_not_cached() {
    let memo: Memoized<u32> = Memoized::new("flaky", CACHE_MAXSIZE);
    let calls = &AtomicUsize::new(0);

    let first = memo
        .call(args(7), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(YfError::Data("boom".into()))
        })
        .await;
    assert!(first.is_err());
    assert_eq!(memo.cache_info().current_size, 0);

    let second = memo
        .call(args(7), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(49)
        })
        .await
        .unwrap();
    assert_eq!(second, 49);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cache_clear_empties_and_resets_statistics() {
    let memo = Memoized::new("square", CACHE_MAXSIZE);
    let calls = &AtomicUsize::new(0);

    square(&memo, calls, 3).await;
    square(&memo, calls, 3).await;
    assert_eq!(memo.cache_info().hits, 1);

    memo.cache_clear();
    assert_eq!(
        memo.cache_info(),
        CacheInfo {
            hits: 0,
            misses: 0,
            max_size: CACHE_MAXSIZE,
            current_size: 0,
        }
    );

    square(&memo, calls, 3).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_capacity_disables_memoization() {
    let memo = Memoized::new("square", 0);
    let calls = &AtomicUsize::new(0);

    square(&memo, calls, 5).await;
    square(&memo, calls, 5).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let info = memo.cache_info();
    assert_eq!(info.current_size, 0);
    assert_eq!(info.misses, 2);
}

#[tokio::test]
async fn unhashable_arguments_skip_the_call() {
    let memo: Memoized<u32> = Memoized::new("never", CACHE_MAXSIZE);
    let calls = &AtomicUsize::new(0);

    let err = memo
        .call(CallArgs::new().arg("AAPL").arg(&f64::NAN), move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        })
        .await
        .unwrap_err();

    assert!(matches!(err, YfError::Unhashable(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(memo.cache_info().misses, 0);
}
