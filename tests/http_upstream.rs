//! End-to-end tests of the HTTP fetch path against a local mock upstream.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aare_fetch::fanout::FanOut;
use aare_fetch::service::{compare_cities, ServiceError};
use aare_fetch::{FetchError, ScopedClient};

mod common;

#[tokio::test]
async fn test_current_with_app_params_and_cache() {
    let addr: SocketAddr = "127.0.0.1:28281".parse().unwrap();

    let targets = Arc::new(Mutex::new(Vec::new()));
    let seen = targets.clone();
    common::start_programmable_upstream(addr, move |target| {
        seen.lock().unwrap().push(target);
        async move { (200, r#"{"aare":{"temperature":18.2,"flow":95}}"#.to_string()) }
    })
    .await;

    let client = ScopedClient::open(&common::local_config(addr)).unwrap();

    let first = client.current("bern").await.expect("upstream reachable");
    assert_eq!(first["aare"]["temperature"], 18.2);

    let second = client.current("bern").await.unwrap();
    assert_eq!(first, second);

    let targets = targets.lock().unwrap();
    assert_eq!(targets.len(), 1, "second call should be served from cache");
    assert!(targets[0].starts_with("/v2018/current?"));
    assert_eq!(common::query_param(&targets[0], "city").as_deref(), Some("bern"));
    assert_eq!(common::query_param(&targets[0], "app").as_deref(), Some("aare-fetch-tests"));
    assert_eq!(common::query_param(&targets[0], "version").as_deref(), Some("0.0.1"));

    client.close();
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let addr: SocketAddr = "127.0.0.1:28286".parse().unwrap();

    let targets = Arc::new(Mutex::new(Vec::new()));
    let seen = targets.clone();
    common::start_programmable_upstream(addr, move |target| {
        seen.lock().unwrap().push(target);
        async move { (200, r#"[{"city":"bern"}]"#.to_string()) }
    })
    .await;

    let mut config = common::local_config(addr);
    config.upstream.base_url = format!("http://{}/aareguru", addr);
    let client = ScopedClient::open(&config).unwrap();

    client.cities().await.unwrap();

    let targets = targets.lock().unwrap();
    assert_eq!(targets.len(), 1);
    assert!(
        targets[0].starts_with("/aareguru/v2018/cities?"),
        "prefix lost: {}",
        targets[0]
    );
}

#[tokio::test]
async fn test_error_status_is_not_cached() {
    let addr: SocketAddr = "127.0.0.1:28282".parse().unwrap();

    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    common::start_programmable_upstream(addr, move |_| {
        cc.fetch_add(1, Ordering::SeqCst);
        async move { (503, r#"{"error":"maintenance"}"#.to_string()) }
    })
    .await;

    let client = ScopedClient::open(&common::local_config(addr)).unwrap();

    for _ in 0..2 {
        let err = client.today("thun").await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                status: 503,
                endpoint: "/v2018/today".into()
            }
        );
        assert!(err.is_transient());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let addr: SocketAddr = "127.0.0.1:28283".parse().unwrap();

    common::start_programmable_upstream(addr, |_| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, "{}".to_string())
    })
    .await;

    let client = ScopedClient::open(&common::local_config(addr)).unwrap();

    let start = std::time::Instant::now();
    let err = client.widget().await.unwrap_err();
    assert_eq!(err, FetchError::Timeout(Duration::from_secs(1)));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let addr: SocketAddr = "127.0.0.1:28284".parse().unwrap();

    common::start_programmable_upstream(addr, |_| async { (200, "<html>oops</html>".to_string()) }).await;

    let client = ScopedClient::open(&common::local_config(addr)).unwrap();

    let err = client.cities().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_unreachable_upstream_is_transport_error() {
    // Nothing listens here.
    let addr: SocketAddr = "127.0.0.1:28289".parse().unwrap();
    let client = ScopedClient::open(&common::local_config(addr)).unwrap();

    let err = client.current("basel").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn test_compare_over_http() {
    let addr: SocketAddr = "127.0.0.1:28285".parse().unwrap();

    common::start_programmable_upstream(addr, |target| async move {
        let body = if target.starts_with("/v2018/cities") {
            r#"[{"city":"bern"},{"city":"thun"},{"city":"brienz"}]"#
        } else {
            match common::query_param(&target, "city").as_deref() {
                Some("bern") => r#"{"aare":{"temperature":19.1,"flow":160.0}}"#,
                Some("thun") => r#"{"aare":{"temperature":16.4,"flow":90.0}}"#,
                _ => return (404, r#"{"error":"unknown city"}"#.to_string()),
            }
        };
        (200, body.to_string())
    })
    .await;

    let client = ScopedClient::open(&common::local_config(addr)).unwrap();
    let report = compare_cities(&client, &FanOut::new(), None).await.unwrap();

    assert_eq!(report.requested_count, 3);
    assert_eq!(report.total_count, 2);
    assert_eq!(report.safe_count, 1);
    assert_eq!(report.warmest.unwrap().city, "bern");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].city, "brienz");

    let err = compare_cities(&client, &FanOut::new(), Some(vec!["brienz".into()]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::AllFailed { requested: 1, .. }));
}
