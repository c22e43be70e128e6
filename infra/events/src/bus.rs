use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Buffer size of broadcast channels created implicitly by `publish`/`subscribe`.
const DEFAULT_CAPACITY: usize = 128;

/// Marker trait for types that can be sent across the [`EventBus`].
///
/// Implemented for every `Send + Sync + 'static` type.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct ChannelState {
    capacity: usize,
    sender: Box<dyn Any + Send + Sync>,
}

impl ChannelState {
    fn sender<T: Event>(&self) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        self.sender
            .downcast_ref::<broadcast::Sender<Arc<T>>>()
            .cloned()
            .ok_or_else(type_mismatch::<T>)
    }
}

/// A thread-safe, cheaply cloneable event bus.
///
/// Channels are created lazily on first use and indexed by the [`TypeId`] of the event.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, ChannelState>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T`.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the channel registry is inconsistent.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to broadcast events of type `T`, creating the channel with `capacity`.
    ///
    /// The capacity only applies when this call creates the channel.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] for a zero capacity.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event to every current subscriber of `T`.
    ///
    /// Returns the number of subscribers that received the event; zero when nobody listens.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the channel registry is inconsistent.
    ///
    /// # Examples
    /// ```rust
    /// use folio_event_bus::EventBus;
    ///
    /// #[derive(Debug)]
    /// struct Ping;
    ///
    /// # fn main() -> Result<(), folio_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// assert_eq!(bus.publish(Ping)?, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(Arc::new(event)).unwrap_or(0);
        trace!(event = type_name::<T>(), delivered, "Event dispatched");
        Ok(delivered)
    }

    fn sender<T: Event>(&self, capacity: usize) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();
        if let Some(state) = self.channels.read().get(&id) {
            return state.sender::<T>();
        }

        let mut channels = self.channels.write();
        let state = channels.entry(id).or_insert_with(|| {
            trace!(event = type_name::<T>(), capacity, "Initializing broadcast channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            ChannelState { capacity, sender: Box::new(tx) }
        });

        if state.capacity != capacity && capacity != DEFAULT_CAPACITY {
            warn!(
                event = type_name::<T>(),
                existing = state.capacity,
                requested = capacity,
                "Broadcast channel already initialized with a different capacity"
            );
        }
        state.sender::<T>()
    }
}

fn type_mismatch<T: Event>() -> EventBusError {
    EventBusError::TypeMismatch {
        message: type_name::<T>().into(),
        context: Some("Unexpected event type".into()),
    }
}
