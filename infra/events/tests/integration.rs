use folio_event_bus::{EventBus, EventReceiverExt};

#[derive(Debug, Clone, PartialEq, Eq)]
struct LayoutCommitted(u64);

#[tokio::test]
async fn broadcast_reaches_every_subscriber() {
    let bus = EventBus::new();
    let mut first = bus.subscribe::<LayoutCommitted>().unwrap();
    let mut second = bus.subscribe::<LayoutCommitted>().unwrap();

    assert_eq!(bus.publish(LayoutCommitted(2)).unwrap(), 2);

    assert_eq!(*first.next_event().await.unwrap(), LayoutCommitted(2));
    assert_eq!(*second.next_event().await.unwrap(), LayoutCommitted(2));
}

#[tokio::test]
async fn lagged_receiver_recovers() {
    let bus = EventBus::new();
    let capacity = 2;
    let mut rx = bus.subscribe_with_capacity::<LayoutCommitted>(capacity).unwrap();

    for version in 0..50 {
        bus.publish(LayoutCommitted(version)).unwrap();
    }

    let first = rx.next_event().await.unwrap();
    assert!(first.0 >= 50 - capacity as u64);
    let second = rx.next_event().await.unwrap();
    assert_eq!(second.0, first.0 + 1);
}

#[tokio::test]
async fn event_types_are_isolated() {
    let bus = EventBus::new();
    let mut commits = bus.subscribe::<LayoutCommitted>().unwrap();
    let mut labels = bus.subscribe::<&'static str>().unwrap();

    bus.publish(LayoutCommitted(7)).unwrap();
    bus.publish("hero").unwrap();

    assert_eq!(commits.next_event().await.unwrap().0, 7);
    assert_eq!(*labels.next_event().await.unwrap(), "hero");
}

#[tokio::test]
async fn dropped_bus_closes_receivers() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<LayoutCommitted>().unwrap();
    bus.publish(LayoutCommitted(4)).unwrap();
    drop(bus);

    assert_eq!(rx.next_event().await.unwrap().0, 4);
    assert!(rx.next_event().await.is_none());
}

#[tokio::test]
async fn publishing_from_many_tasks_is_safe() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe_with_capacity::<LayoutCommitted>(64).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let bus = bus.clone();
            tokio::spawn(async move { bus.publish(LayoutCommitted(n)).unwrap() })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..8 {
        seen.push(rx.next_event().await.unwrap().0);
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..8).collect::<Vec<_>>());
}
