use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use pagewatch::application::usecases::CheckPageUseCase;
use pagewatch::application::{AppError, AppResult, Notifier, PageFetcher, SnapshotStore};
use pagewatch::domain::{normalize, PageUrl, Snapshot};
use pagewatch::infrastructure::memory_store::InMemorySnapshotStore;

/// Returns one scripted response per fetch, in order.
#[derive(Clone, Default)]
struct ScriptedFetcher {
    responses: Arc<Mutex<VecDeque<Result<String, String>>>>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<Result<&str, &str>>) -> Self {
        let responses = responses
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();
        Self {
            responses: Arc::new(Mutex::new(responses)),
        }
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &PageUrl) -> AppResult<String> {
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(body)) => Ok(body),
            Some(Err(e)) => Err(AppError::Fetch(e)),
            None => Err(AppError::Fetch("script exhausted".into())),
        }
    }
}

#[derive(Clone, Default)]
struct CountingNotifier {
    texts: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl CountingNotifier {
    fn new() -> Self {
        Self::default()
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn count(&self) -> usize {
        self.texts.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn notify(&self, text: &str) -> AppResult<()> {
        self.texts.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(AppError::Notify("sink unreachable".into()));
        }
        Ok(())
    }
}

fn checker(
    fetcher: ScriptedFetcher,
    store: Arc<dyn SnapshotStore>,
    notifier: CountingNotifier,
) -> CheckPageUseCase {
    CheckPageUseCase {
        fetcher: Arc::new(fetcher),
        store,
        notifier: Arc::new(notifier),
    }
}

fn url() -> PageUrl {
    PageUrl::parse("https://a.test").unwrap()
}

const PAGE_V1: &str = "<html><body><p>Hi</p></body></html>";
const PAGE_V2: &str = "<html><body><p>Hi there</p></body></html>";

#[tokio::test]
async fn first_check_stores_baseline_without_notifying() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    let notifier = CountingNotifier::new();
    let check = checker(ScriptedFetcher::new(vec![Ok(PAGE_V1)]), store.clone(), notifier.clone());
    store.register(&url()).await.unwrap();

    check.execute(&url()).await.unwrap();

    assert_eq!(notifier.count(), 0);
    let stored = store.get(&url()).await.unwrap().unwrap();
    assert_eq!(stored.as_str(), normalize(PAGE_V1));
}

#[tokio::test]
async fn changed_content_notifies_once_and_persists_new_snapshot() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    let notifier = CountingNotifier::new();
    let check = checker(
        ScriptedFetcher::new(vec![Ok(PAGE_V1), Ok(PAGE_V2)]),
        store.clone(),
        notifier.clone(),
    );
    store.register(&url()).await.unwrap();

    check.execute(&url()).await.unwrap();
    check.execute(&url()).await.unwrap();

    assert_eq!(notifier.count(), 1);
    let text = notifier.texts.lock().unwrap()[0].clone();
    assert!(text.contains("https://a.test"));
    let stored = store.get(&url()).await.unwrap().unwrap();
    assert_eq!(stored.as_str(), normalize(PAGE_V2));
}

#[tokio::test]
async fn volatile_attributes_do_not_count_as_changes() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    let notifier = CountingNotifier::new();
    let check = checker(
        ScriptedFetcher::new(vec![
            Ok(r#"<html><body><p data-csrf="aaa111">Hi</p></body></html>"#),
            Ok(r#"<html><body><p data-csrf="zzz999">Hi</p></body></html>"#),
        ]),
        store.clone(),
        notifier.clone(),
    );

    check.execute(&url()).await.unwrap();
    check.execute(&url()).await.unwrap();

    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn failed_fetch_leaves_prior_snapshot_untouched() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    let notifier = CountingNotifier::new();
    let check = checker(
        ScriptedFetcher::new(vec![Ok(PAGE_V1), Err("connection refused")]),
        store.clone(),
        notifier.clone(),
    );

    check.execute(&url()).await.unwrap();
    let err = check.execute(&url()).await.unwrap_err();
    assert!(matches!(err, AppError::Fetch(_)));

    assert_eq!(notifier.count(), 0);
    let stored = store.get(&url()).await.unwrap().unwrap();
    assert_eq!(stored.as_str(), normalize(PAGE_V1));
}

#[tokio::test]
async fn notifier_failure_never_blocks_persistence() {
    let store: Arc<dyn SnapshotStore> = Arc::new(InMemorySnapshotStore::new());
    let notifier = CountingNotifier::failing();
    let check = checker(
        ScriptedFetcher::new(vec![Ok(PAGE_V1), Ok(PAGE_V2)]),
        store.clone(),
        notifier.clone(),
    );

    check.execute(&url()).await.unwrap();
    // change detected, notify fails, the cycle must still complete
    check.execute(&url()).await.unwrap();

    assert_eq!(notifier.count(), 1);
    let stored = store.get(&url()).await.unwrap().unwrap();
    assert_eq!(stored.as_str(), normalize(PAGE_V2));
}

#[tokio::test]
async fn write_through_get_observes_put_immediately() {
    let store = InMemorySnapshotStore::new();
    let snapshot = Snapshot::new("<p>s</p>".to_string());

    store.put(&url(), &snapshot).await.unwrap();

    assert_eq!(store.get(&url()).await.unwrap(), Some(snapshot));
}

#[tokio::test]
async fn registered_but_never_checked_is_absent_not_empty() {
    let store = InMemorySnapshotStore::new();
    store.register(&url()).await.unwrap();
    store.register(&url()).await.unwrap(); // duplicate is a no-op

    assert_eq!(store.get(&url()).await.unwrap(), None);

    // an empty snapshot is a value, not absence
    store
        .put(&url(), &Snapshot::new(String::new()))
        .await
        .unwrap();
    assert_eq!(
        store.get(&url()).await.unwrap(),
        Some(Snapshot::new(String::new()))
    );
}
