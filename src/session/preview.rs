use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::{
    foundation::error::{PostcompError, PostcompResult},
    pipeline::{Compositor, PostImage, PostRequest},
};

/// The frame currently on screen and the ticket of the render that produced it.
#[derive(Clone, Debug)]
pub struct PreviewFrame {
    pub ticket: u64,
    pub image: Arc<PostImage>,
}

/// What happened to one submitted render.
#[derive(Debug)]
pub enum PreviewOutcome {
    /// The render became the visible frame.
    Shown { ticket: u64 },
    /// A newer render was started before this one finished; its result was dropped.
    Superseded { ticket: u64 },
    /// The render failed; the previous frame stays visible.
    Failed { ticket: u64, error: PostcompError },
}

impl PreviewOutcome {
    pub fn ticket(&self) -> u64 {
        match self {
            Self::Shown { ticket } | Self::Superseded { ticket } | Self::Failed { ticket, .. } => {
                *ticket
            }
        }
    }
}

/// Live preview with last-render-wins semantics.
///
/// Every render gets a ticket from a monotonically increasing counter. A finished render only
/// replaces the visible frame when no newer render has been started since; renders never share a
/// surface and results are never merged.
pub struct PreviewSession {
    compositor: Compositor,
    last_ticket: AtomicU64,
    visible: watch::Sender<Option<PreviewFrame>>,
}

impl PreviewSession {
    pub fn new(compositor: Compositor) -> Self {
        let (visible, _) = watch::channel(None);
        Self {
            compositor,
            last_ticket: AtomicU64::new(0),
            visible,
        }
    }

    /// Reserve the next ticket. Starting a render makes every older in-flight render stale.
    pub fn begin(&self) -> u64 {
        self.last_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Offer the result of render `ticket` for display.
    pub fn complete(&self, ticket: u64, result: PostcompResult<PostImage>) -> PreviewOutcome {
        let image = match result {
            Ok(image) => image,
            Err(error) => {
                tracing::warn!(ticket, error = %error, "preview render failed");
                return PreviewOutcome::Failed { ticket, error };
            }
        };

        if ticket != self.last_ticket.load(Ordering::SeqCst) {
            tracing::debug!(ticket, "dropping superseded preview render");
            return PreviewOutcome::Superseded { ticket };
        }

        let frame = PreviewFrame {
            ticket,
            image: Arc::new(image),
        };
        let shown = self.visible.send_if_modified(|current| match current {
            Some(existing) if existing.ticket >= ticket => false,
            _ => {
                *current = Some(frame);
                true
            }
        });

        if shown {
            PreviewOutcome::Shown { ticket }
        } else {
            PreviewOutcome::Superseded { ticket }
        }
    }

    /// Render `request` and offer it for display.
    pub async fn submit(&self, request: &PostRequest) -> PreviewOutcome {
        let ticket = self.begin();
        let result = self.compositor.render(request).await;
        self.complete(ticket, result)
    }

    pub fn current(&self) -> Option<PreviewFrame> {
        self.visible.borrow().clone()
    }

    /// Receiver notified on every visible-frame swap.
    pub fn subscribe(&self) -> watch::Receiver<Option<PreviewFrame>> {
        self.visible.subscribe()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview.rs"]
mod tests;
