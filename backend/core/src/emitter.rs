//! Deferred publish/subscribe.
//!
//! `fire` never runs a listener inside the caller's turn: it snapshots the
//! listeners registered for the event and queues them for the emitter's
//! delivery task. That task drains firings in the order they were made and
//! invokes each listener on its own scheduler turn, in registration order.

use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::SendError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

pub type Listener<P> = Arc<dyn Fn(&P) + Send + Sync>;

type ListenerMap<P> = HashMap<String, Vec<Listener<P>>>;

/// One queued firing.
struct Delivery<P> {
    event: String,
    chain: Vec<Listener<P>>,
    payload: P,
}

pub struct Emitter<P> {
    listeners: RwLock<ListenerMap<P>>,
    /// Sender to the delivery task; replaced when that task's runtime is gone.
    queue: Mutex<Option<UnboundedSender<Delivery<P>>>>,
}

impl<P> Default for Emitter<P> {
    fn default() -> Self {
        Self { listeners: RwLock::new(HashMap::new()), queue: Mutex::new(None) }
    }
}

impl<P> Emitter<P>
where
    P: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` under `event`. Registering the same closure twice
    /// makes it fire twice.
    pub fn on<F>(&self, event: impl Into<String>, listener: F) -> &Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.listeners
            .write()
            .entry(event.into())
            .or_default()
            .push(Arc::new(listener));
        self
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, Vec::len)
    }

    /// Schedule delivery of `payload` to every listener currently registered
    /// for `event`. Firings of one emitter are delivered in call order.
    ///
    /// Returns `false` when nothing was scheduled: either no listener exists
    /// or there is no Tokio runtime to defer onto.
    pub fn fire(&self, event: &str, payload: P) -> bool {
        let chain = match self.listeners.read().get(event) {
            Some(chain) if !chain.is_empty() => chain.clone(),
            _ => return false,
        };
        debug!(event, listeners = chain.len(), "scheduling event delivery");
        let delivery = Delivery { event: event.to_string(), chain, payload };

        let mut queue = self.queue.lock();
        let delivery = match queue.as_ref() {
            Some(tx) => match tx.send(delivery) {
                Ok(()) => return true,
                Err(SendError(delivery)) => delivery,
            },
            None => delivery,
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(event, error = %e, "no async runtime; dropping event delivery");
                return false;
            }
        };
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(drain(rx));
        if tx.send(delivery).is_err() {
            error!(event, "delivery task stopped before its first firing");
            return false;
        }
        *queue = Some(tx);
        true
    }
}

async fn drain<P>(mut rx: UnboundedReceiver<Delivery<P>>) {
    while let Some(delivery) = rx.recv().await {
        for listener in &delivery.chain {
            tokio::task::yield_now().await;
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(&delivery.payload))) {
                warn!(
                    event = %delivery.event,
                    error = %panic_message(&*panic),
                    "listener panicked"
                );
            }
        }
    }
}

/// Best-effort text of a caught panic payload.
pub fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
