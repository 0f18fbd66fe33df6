use tokio::sync::watch;

use super::profile::SmeProfile;

/// Publisher half of the profile subscription. Each publish delivers the full
/// current matching set, not a diff. Dropping the handle (or calling
/// [`ProfileFeedHandle::close`]) ends the stream explicitly, so consumers
/// never need to sniff abort errors.
#[derive(Debug)]
pub struct ProfileFeedHandle {
    sender: watch::Sender<Vec<SmeProfile>>,
}

impl ProfileFeedHandle {
    pub fn publish(&self, snapshot: Vec<SmeProfile>) {
        // Receivers may all be gone; that only means nobody is watching.
        let _ = self.sender.send(snapshot);
    }

    pub fn close(self) {
        drop(self.sender);
    }
}

/// Consumer half: a last-write-wins snapshot stream.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    receiver: watch::Receiver<Vec<SmeProfile>>,
}

impl ProfileFeed {
    /// The most recent snapshot.
    pub fn latest(&self) -> Vec<SmeProfile> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `None` once the publisher closes
    /// the feed.
    pub async fn next(&mut self) -> Option<Vec<SmeProfile>> {
        match self.receiver.changed().await {
            Ok(()) => Some(self.receiver.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

/// Create a connected feed pair seeded with an initial snapshot.
pub fn profile_feed(initial: Vec<SmeProfile>) -> (ProfileFeedHandle, ProfileFeed) {
    let (sender, receiver) = watch::channel(initial);
    (ProfileFeedHandle { sender }, ProfileFeed { receiver })
}
