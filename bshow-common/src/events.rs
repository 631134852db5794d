//! Showroom event types and EventBus
//!
//! Catalog, scheduling and import operations publish what they did here so a
//! front end can refresh without polling. Publishing never blocks and never
//! fails the operation that published.

use crate::models::{GallerySegment, UploadSegment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Showroom event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShowroomEvent {
    /// One more file of an upload batch finished (upload and URL resolution)
    UploadProgress {
        /// Files finished so far, across all segments
        completed: usize,
        /// Files in the batch
        total: usize,
        /// Segment of the file that just finished
        segment: UploadSegment,
    },

    /// A fabric document was created
    FabricAdded {
        fabric_id: String,
        name: String,
        timestamp: DateTime<Utc>,
    },

    /// Images were appended to a fabric gallery
    GalleryUpdated {
        fabric_id: String,
        segment: GallerySegment,
        added: usize,
        timestamp: DateTime<Utc>,
    },

    /// An image URL was removed from a fabric gallery
    ImageDeleted {
        fabric_id: String,
        segment: GallerySegment,
        url: String,
        /// False when the stored blob could not be removed
        blob_removed: bool,
        timestamp: DateTime<Utc>,
    },

    /// Fabric name or main image changed
    FabricEdited {
        fabric_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A machine document was created
    MachineAdded {
        machine_id: String,
        name: String,
        timestamp: DateTime<Utc>,
    },

    /// An order was written and linked to its machine
    OrderSubmitted {
        order_id: String,
        machine_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A spreadsheet import produced a result
    ImportParsed {
        /// Groups (machine tokens or machine blocks) found
        groups: usize,
        /// Entries across all groups
        entries: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally: publishing does not wait on slow
/// subscribers, and subscribers that fall behind observe a lag error.
///
/// # Examples
///
/// ```
/// use bshow_common::events::{EventBus, ShowroomEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(ShowroomEvent::ImportParsed {
///     groups: 2,
///     entries: 5,
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ShowroomEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ShowroomEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ShowroomEvent,
    ) -> Result<usize, broadcast::error::SendError<ShowroomEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ShowroomEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
