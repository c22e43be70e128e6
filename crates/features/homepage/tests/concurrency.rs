use folio_event_bus::EventBus;
use folio_homepage::catalog::{SECTION_COUNT, SectionId, default_sections};
use folio_homepage::reorder::move_section;
use folio_homepage::{
    HomepageError, LayoutCommitted, LayoutService, LayoutVersion, MemoryLayoutStore,
};
use std::sync::Arc;
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn exactly_one_commit_wins_per_version() {
    let events = EventBus::new();
    let mut commits = events.subscribe::<LayoutCommitted>().unwrap();
    let service = Arc::new(LayoutService::new(MemoryLayoutStore::new(), events));
    let base = service.read().await.unwrap().version;

    let mut editors = JoinSet::new();
    for index in 0..16usize {
        let service = Arc::clone(&service);
        editors.spawn(async move {
            let candidate =
                move_section(&default_sections(), SectionId::Contact, index % SECTION_COUNT);
            service.commit(candidate, base).await
        });
    }

    let mut winners = 0;
    let mut conflicts = 0;
    while let Some(joined) = editors.join_next().await {
        match joined.unwrap() {
            Ok(layout) => {
                assert_eq!(layout.version, base.next());
                winners += 1;
            },
            Err(HomepageError::Conflict { current, .. }) => {
                assert_eq!(current, base.next());
                conflicts += 1;
            },
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!((winners, conflicts), (1, 15));
    assert_eq!(service.read().await.unwrap().version, LayoutVersion(2));
    assert_eq!(commits.recv().await.unwrap().layout.version, LayoutVersion(2));
    assert!(commits.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sequential_editors_each_advance_version() {
    let service = Arc::new(LayoutService::new(MemoryLayoutStore::new(), EventBus::new()));

    let mut editors = JoinSet::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        editors.spawn(async move {
            // Re-read and retry on conflict, as an editor would after reloading.
            loop {
                let current = service.read().await?;
                let candidate = move_section(&current.sections, SectionId::Hero, 6);
                match service.commit(candidate, current.version).await {
                    Err(HomepageError::Conflict { .. }) => {},
                    other => return other,
                }
            }
        });
    }

    while let Some(joined) = editors.join_next().await {
        joined.unwrap().unwrap();
    }
    assert_eq!(service.read().await.unwrap().version, LayoutVersion(9));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_observe_partial_layouts() {
    let service = Arc::new(LayoutService::new(MemoryLayoutStore::new(), EventBus::new()));

    let writer = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            for step in 0..50usize {
                let current = service.read().await.unwrap();
                let candidate =
                    move_section(&current.sections, SectionId::Blog, step % SECTION_COUNT);
                service.commit(candidate, current.version).await.unwrap();
            }
        })
    };

    let mut readers = JoinSet::new();
    for _ in 0..4 {
        let service = Arc::clone(&service);
        readers.spawn(async move {
            for _ in 0..50 {
                let layout = service.read().await.unwrap();
                assert_eq!(folio_homepage::validator::validate(&layout.sections), Ok(()));
                tokio::task::yield_now().await;
            }
        });
    }

    writer.await.unwrap();
    while let Some(joined) = readers.join_next().await {
        joined.unwrap();
    }
    assert_eq!(service.read().await.unwrap().version, LayoutVersion(51));
}
