mod support;

use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;

use jobfeed_core::{EmploymentType, JobListView, ViewBus};
use jobfeed_engine::{ErrorKind, SavedStatusCache};

use support::{job, MockGateway};

fn cache_with(gateway: Arc<MockGateway>) -> (SavedStatusCache, ViewBus) {
    let bus = ViewBus::new();
    let cache = SavedStatusCache::new(gateway, bus.clone());
    (cache, bus)
}

#[tokio::test]
async fn batch_fetch_returns_one_entry_per_requested_id() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_saved("a", true);
    let (cache, _bus) = cache_with(Arc::clone(&gateway));

    // Duplicates collapse; ids the server never saw default to false.
    let ids = vec!["a".to_string(), "b".to_string(), "a".to_string()];
    let statuses = cache.fetch_batch(&ids).await.unwrap();

    assert_eq!(
        statuses,
        HashMap::from([("a".to_string(), true), ("b".to_string(), false)])
    );
    assert_eq!(gateway.batch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.get(&"b".to_string()), Some(false));
}

#[tokio::test]
async fn empty_batch_fetch_issues_no_request() {
    let gateway = Arc::new(MockGateway::new());
    let (cache, _bus) = cache_with(Arc::clone(&gateway));

    let statuses = cache.fetch_batch(&[]).await.unwrap();
    assert!(statuses.is_empty());
    assert_eq!(gateway.batch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn toggle_twice_round_trips() {
    let gateway = Arc::new(MockGateway::new());
    let (cache, bus) = cache_with(Arc::clone(&gateway));
    let id = "a".to_string();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _sub = bus.saved_status_changed.subscribe(move |event| {
        sink.lock().unwrap().push((event.job_id.clone(), event.saved));
    });

    assert_eq!(cache.toggle(&id).await.unwrap(), true);
    assert_eq!(cache.toggle(&id).await.unwrap(), false);

    assert_eq!(cache.get(&id), Some(false));
    assert_eq!(*gateway.server_saved.lock().unwrap().get(&id).unwrap(), false);
    assert_eq!(
        *events.lock().unwrap(),
        vec![(id.clone(), true), (id, false)]
    );
}

#[tokio::test]
async fn failed_toggle_rolls_back_and_publishes_nothing() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_saved("a", true);
    let (cache, bus) = cache_with(Arc::clone(&gateway));
    let id = "a".to_string();

    // Seed the mirror, then make the gateway fail.
    cache.fetch_batch(&[id.clone()]).await.unwrap();
    *gateway.toggle_failure.lock().unwrap() = Some(ErrorKind::Network);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _sub = bus.saved_status_changed.subscribe(move |event| {
        sink.lock().unwrap().push(event.clone());
    });

    let err = cache.toggle(&id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(cache.get(&id), Some(true));
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_toggle_on_unknown_id_rolls_back_to_absent() {
    let gateway = Arc::new(MockGateway::new());
    *gateway.toggle_failure.lock().unwrap() = Some(ErrorKind::Network);
    let (cache, _bus) = cache_with(Arc::clone(&gateway));

    let id = "never-seen".to_string();
    cache.toggle(&id).await.unwrap_err();
    assert_eq!(cache.get(&id), None);
}

#[tokio::test(start_paused = true)]
async fn concurrent_toggles_on_one_id_serialize_fifo() {
    let gateway = Arc::new(MockGateway::new());
    *gateway.toggle_delay.lock().unwrap() = Some(Duration::from_millis(100));
    let (cache, bus) = cache_with(Arc::clone(&gateway));
    let id = "a".to_string();

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let _sub = bus.saved_status_changed.subscribe(move |event| {
        sink.lock().unwrap().push(event.saved);
    });

    // The second toggle queues behind the first's resolution instead of
    // firing concurrently, so the pair round-trips.
    let (first, second) = tokio::join!(cache.toggle(&id), cache.toggle(&id));
    assert_eq!(first.unwrap(), true);
    assert_eq!(second.unwrap(), false);

    assert_eq!(gateway.toggle_calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.get(&id), Some(false));
    assert_eq!(*events.lock().unwrap(), vec![true, false]);
}

#[tokio::test]
async fn toggle_propagates_across_mounted_views_without_refetch() {
    let gateway = Arc::new(MockGateway::new());
    let (cache, bus) = cache_with(Arc::clone(&gateway));

    // Two independently mounted views, each with its own batch fetch.
    let home = Arc::new(Mutex::new(JobListView::with_jobs(vec![
        job("a", EmploymentType::FullTime),
        job("b", EmploymentType::FullTime),
    ])));
    let detail = Arc::new(Mutex::new(JobListView::with_jobs(vec![job(
        "a",
        EmploymentType::FullTime,
    )])));

    let home_ids = home.lock().unwrap().job_ids();
    let statuses = cache.fetch_batch(&home_ids).await.unwrap();
    home.lock().unwrap().apply_saved_statuses(statuses);
    let detail_ids = detail.lock().unwrap().job_ids();
    let statuses = cache.fetch_batch(&detail_ids).await.unwrap();
    detail.lock().unwrap().apply_saved_statuses(statuses);
    let batches_before = gateway.batch_calls.load(Ordering::SeqCst);

    let home_sink = Arc::clone(&home);
    let _home_sub = bus.saved_status_changed.subscribe(move |event| {
        home_sink.lock().unwrap().apply_saved_change(event);
    });
    let detail_sink = Arc::clone(&detail);
    let _detail_sub = bus.saved_status_changed.subscribe(move |event| {
        detail_sink.lock().unwrap().apply_saved_change(event);
    });

    // Toggle from the detail view; the home view converges with no
    // additional network traffic.
    cache.toggle(&"a".to_string()).await.unwrap();

    assert!(home.lock().unwrap().is_saved(&"a".to_string()));
    assert!(detail.lock().unwrap().is_saved(&"a".to_string()));
    assert_eq!(gateway.batch_calls.load(Ordering::SeqCst), batches_before);
}

#[tokio::test]
async fn auth_failures_announce_session_expiry() {
    let gateway = Arc::new(MockGateway::new());
    *gateway.batch_failure.lock().unwrap() = Some(ErrorKind::Auth);
    let (cache, bus) = cache_with(Arc::clone(&gateway));

    let expired = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&expired);
    let _sub = bus.session_expired.subscribe(move |_| {
        *sink.lock().unwrap() += 1;
    });

    let err = cache.fetch_batch(&["a".to_string()]).await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(*expired.lock().unwrap(), 1);
}
