//! Broadcast bus for swap events.
//!
//! The engine publishes after state commits; subscribers come and go
//! freely and a publish with no listeners is not an error.

use swap_types::SwapEvent;
use tokio::sync::broadcast;

/// Broadcast channel wrapper for [`SwapEvent`]s.
pub struct EventBus {
	sender: broadcast::Sender<SwapEvent>,
}

impl EventBus {
	/// Creates a bus retaining up to `capacity` undelivered events per
	/// subscriber before older ones are dropped.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	pub fn publish(&self, event: SwapEvent) {
		// A send error only means nobody is listening right now.
		let _ = self.sender.send(event);
	}

	/// Creates a new subscription receiving events published from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<SwapEvent> {
		self.sender.subscribe()
	}
}
