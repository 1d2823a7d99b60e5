//! Shell for the review list core.
//!
//! A single thread owns the crux [`Core`] and handles every message in
//! arrival order, so row mutations (including photo completions racing each
//! other) are serialized without locks. Requests the core emits are carried
//! out as tokio tasks against the injected [`Services`] and resolved back
//! through the same queue. Observers get value snapshots over a `watch`
//! channel.

use std::sync::Arc;

use crux_core::{Core, Request};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::app::{ListSnapshot, ReviewsApp};
use crate::capabilities::{
    Capabilities, Effect, PageResult, PhotoBytesResult, PhotoOperation, ReviewsOperation,
};
use crate::config::ReviewsConfig;
use crate::event::Event;
use crate::model::{ExpandHandle, RowId};
use crate::prefetch::ScrollGeometry;
use crate::services::Services;
use crate::table::ReviewsTable;
use crate::text::TextMeasurer;

enum Message {
    Event(Event),
    Page(Request<ReviewsOperation>, PageResult),
    Photo(Request<PhotoOperation>, PhotoBytesResult),
    Shutdown,
}

type Queue = mpsc::UnboundedSender<Message>;

pub struct ReviewsController {
    queue: Queue,
    state: watch::Receiver<ListSnapshot>,
}

impl ReviewsController {
    /// Starts the shell. Must be called inside a tokio runtime.
    pub fn spawn(services: Services, config: ReviewsConfig) -> Self {
        let (queue, inbox) = mpsc::unbounded_channel();
        let core: Core<Effect, ReviewsApp> = Core::new::<Capabilities>();
        let (state_tx, state) = watch::channel(core.view());

        let configured = Event::Configured {
            config,
            expand_handle: expand_handle(&queue),
        };
        // The inbox is alive until `run` returns, so this cannot fail yet.
        let _ = queue.send(Message::Event(configured));

        let shell = Shell {
            core,
            services,
            runtime: Handle::current(),
            queue: queue.clone(),
            state: state_tx,
        };
        tokio::task::spawn_blocking(move || shell.run(inbox));

        Self { queue, state }
    }

    /// Requests the next page unless one is in flight or the list is complete.
    pub fn load_more(&self) {
        self.send(Event::LoadMoreRequested);
    }

    /// Lifts the line cap on a row; unknown ids are ignored.
    pub fn expand(&self, id: RowId) {
        self.send(Event::ShowMoreTapped { id });
    }

    /// Feeds the prefetch policy with the geometry at the end of a drag.
    pub fn on_scroll(&self, geometry: ScrollGeometry) {
        self.send(Event::ScrollEnded(geometry));
    }

    pub fn expand_handle(&self) -> ExpandHandle {
        expand_handle(&self.queue)
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.state.borrow().clone()
    }

    /// Renderer-facing view of the latest snapshot.
    pub fn table(&self, measurer: Arc<dyn TextMeasurer>) -> ReviewsTable {
        ReviewsTable::new(self.snapshot(), measurer)
    }

    fn send(&self, event: Event) {
        if self.queue.send(Message::Event(event)).is_err() {
            debug!("reviews shell stopped; event dropped");
        }
    }
}

impl Drop for ReviewsController {
    fn drop(&mut self) {
        let _ = self.queue.send(Message::Shutdown);
    }
}

fn expand_handle(queue: &Queue) -> ExpandHandle {
    let queue = queue.clone();
    ExpandHandle::new(move |id| {
        queue
            .send(Message::Event(Event::ShowMoreTapped { id }))
            .is_ok()
    })
}

struct Shell {
    core: Core<Effect, ReviewsApp>,
    services: Services,
    runtime: Handle,
    queue: Queue,
    state: watch::Sender<ListSnapshot>,
}

impl Shell {
    fn run(self, mut inbox: mpsc::UnboundedReceiver<Message>) {
        info!("reviews shell started");

        while let Some(message) = inbox.blocking_recv() {
            let effects = match message {
                Message::Event(event) => self.core.process_event(event),
                Message::Page(mut request, result) => self.core.resolve(&mut request, result),
                Message::Photo(mut request, result) => self.core.resolve(&mut request, result),
                Message::Shutdown => break,
            };
            for effect in effects {
                self.handle(effect);
            }
        }

        info!("reviews shell stopped");
    }

    fn handle(&self, effect: Effect) {
        match effect {
            Effect::Render(_) => {
                self.state.send_replace(self.core.view());
            }

            Effect::Reviews(request) => {
                let ReviewsOperation::GetReviews { offset } = request.operation.clone();
                let provider = Arc::clone(&self.services.reviews);
                let queue = self.queue.clone();
                self.runtime.spawn(async move {
                    let result = provider.get_reviews(offset).await;
                    if queue.send(Message::Page(request, result)).is_err() {
                        debug!(offset, "page arrived after teardown");
                    }
                });
            }

            Effect::Photos(request) => {
                let PhotoOperation::Get { url } = request.operation.clone();
                let fetcher = Arc::clone(&self.services.photos);
                let queue = self.queue.clone();
                self.runtime.spawn(async move {
                    let result = fetcher.get_photo(&url).await;
                    if queue.send(Message::Photo(request, result)).is_err() {
                        debug!(url, "photo arrived after teardown");
                    }
                });
            }
        }
    }
}
