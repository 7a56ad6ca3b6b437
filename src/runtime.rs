//! Event loop owning coordinators and running their provider queries.
//!
//! Queries run on the rayon pool. Results come back over a channel and are
//! applied by [`EventLoop::pump`] on the thread that owns the loop, so
//! coordinator state is never shared between threads.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::coordinator::{Completion, Coordinator, MapEvent, PendingQuery};
use crate::geo::Coordinate;
use crate::overlay::OverlayOptions;
use crate::registry::{Handle, Registry};
use crate::traits::{MapSurface, RoutingProvider, WidgetHost};

pub type CoordinatorHandle = Handle;

struct Delivery {
    owner: CoordinatorHandle,
    completion: Completion,
}

pub struct EventLoop<P, M, W> {
    provider: Arc<P>,
    coordinators: Registry<Coordinator<M, W>>,
    sender: Sender<Delivery>,
    receiver: Receiver<Delivery>,
    in_flight: usize,
}

impl<P, M, W> EventLoop<P, M, W>
where
    P: RoutingProvider + 'static,
    M: MapSurface,
    W: WidgetHost,
{
    pub fn new(provider: P) -> Self {
        Self::with_provider(Arc::new(provider))
    }

    pub fn with_provider(provider: Arc<P>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            provider,
            coordinators: Registry::new(),
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Creates a coordinator for one map screen.
    pub fn open(&mut self, destination: Coordinate, map: M, host: W) -> CoordinatorHandle {
        self.open_with(destination, map, host, OverlayOptions::default())
    }

    pub fn open_with(
        &mut self,
        destination: Coordinate,
        map: M,
        host: W,
        options: OverlayOptions,
    ) -> CoordinatorHandle {
        let handle = self
            .coordinators
            .insert(Coordinator::with_options(destination, map, host, options));
        info!(?handle, ?destination, "opened route coordinator");
        handle
    }

    /// Tears the coordinator down. Its in-flight queries are ignored on arrival.
    pub fn close(&mut self, handle: CoordinatorHandle) -> Option<(M, W)> {
        let coordinator = self.coordinators.remove(handle)?;
        info!(?handle, "closed route coordinator");
        Some(coordinator.teardown())
    }

    pub fn coordinator(&self, handle: CoordinatorHandle) -> Option<&Coordinator<M, W>> {
        self.coordinators.get(handle)
    }

    pub fn add_route(
        &mut self,
        handle: CoordinatorHandle,
        source: Coordinate,
        destination: Coordinate,
    ) -> bool {
        self.with_coordinator(handle, |c| c.add_route(source, destination))
    }

    pub fn add_routes(
        &mut self,
        handle: CoordinatorHandle,
        sources: &[Coordinate],
        destination: Coordinate,
    ) -> bool {
        self.with_coordinator(handle, |c| c.add_routes(sources, destination))
    }

    pub fn dispatch(&mut self, handle: CoordinatorHandle, event: MapEvent) -> bool {
        self.with_coordinator(handle, |c| c.handle_event(event))
    }

    /// Applies every completion that has already arrived. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(delivery) = self.receiver.try_recv() {
            self.deliver(delivery);
            applied += 1;
        }
        applied
    }

    /// Applies completions until nothing is in flight or `timeout` passes.
    pub fn run_until_idle(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut applied = 0;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(delivery) => {
                    self.deliver(delivery);
                    applied += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    debug!(in_flight = self.in_flight, "timed out waiting for routes");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        applied
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn with_coordinator<F>(&mut self, handle: CoordinatorHandle, f: F) -> bool
    where
        F: FnOnce(&mut Coordinator<M, W>),
    {
        let Some(coordinator) = self.coordinators.get_mut(handle) else {
            debug!(?handle, "no coordinator for handle");
            return false;
        };
        f(coordinator);
        let queries = coordinator.take_queries();
        for pending in queries {
            self.spawn(handle, pending);
        }
        true
    }

    fn spawn(&mut self, owner: CoordinatorHandle, pending: PendingQuery) {
        let provider = Arc::clone(&self.provider);
        let sender = self.sender.clone();
        self.in_flight += 1;
        rayon::spawn(move || {
            let outcome = provider.route(&pending.query);
            // The loop may already be gone; nothing to report to.
            let _ = sender.send(Delivery {
                owner,
                completion: Completion { pending, outcome },
            });
        });
    }

    fn deliver(&mut self, delivery: Delivery) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let Delivery { owner, completion } = delivery;
        match self.coordinators.get_mut(owner) {
            Some(coordinator) => coordinator.complete(completion),
            None => debug!(handle = ?owner, "dropping route for closed coordinator"),
        }
    }
}
