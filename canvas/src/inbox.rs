//! Single-consumer queue for documents produced off the UI turn.
//!
//! Transports run on their own tasks or threads and never touch the surface.
//! They hold a cloneable [`DocumentPoster`] and post whole documents; the core
//! drains the matching [`DocumentInbox`] when it is its turn to run.

#[cfg(test)]
#[path = "inbox_test.rs"]
mod inbox_test;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::doc::AnnotationDocument;

/// Sending half. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct DocumentPoster {
    tx: UnboundedSender<AnnotationDocument>,
}

impl DocumentPoster {
    /// Queue a document for the next drain. Returns `false` once the inbox
    /// has been dropped.
    pub fn post(&self, doc: AnnotationDocument) -> bool {
        match self.tx.send(doc) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(elements = e.0.len(), "document inbox closed; dropping document");
                false
            }
        }
    }
}

/// Receiving half, owned by the core.
#[derive(Debug)]
pub struct DocumentInbox {
    rx: UnboundedReceiver<AnnotationDocument>,
}

impl DocumentInbox {
    /// Create a connected poster and inbox.
    #[must_use]
    pub fn channel() -> (DocumentPoster, Self) {
        let (tx, rx) = unbounded_channel();
        (DocumentPoster { tx }, Self { rx })
    }

    /// Take every document queued so far, in posting order, without waiting.
    pub fn drain(&mut self) -> Vec<AnnotationDocument> {
        let mut docs = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(doc) => docs.push(doc),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        docs
    }

    /// Whether any poster is still alive.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.rx.is_closed()
    }
}
