//! Routes change notifications to every registered notifier.
//!
//! The dispatcher is itself a [`ChangeNotifier`], so a coordinator holds one
//! notifier regardless of how many views are listening.

use crate::traits::{CellRange, ChangeNotifier};

/// Fans each change out to all channels, in registration order.
#[derive(Default)]
pub struct Dispatcher {
    channels: Vec<Box<dyn ChangeNotifier>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    pub fn add_channel(&mut self, channel: Box<dyn ChangeNotifier>) {
        self.channels.push(channel);
    }
}

impl ChangeNotifier for Dispatcher {
    fn cells_changed(&self, range: &CellRange) {
        if self.channels.is_empty() {
            tracing::trace!("No change channels configured");
            return;
        }
        for channel in &self.channels {
            tracing::trace!(channel = channel.channel_name(), "dispatching cell change");
            channel.cells_changed(range);
        }
    }

    fn channel_name(&self) -> &str {
        "dispatcher"
    }
}
