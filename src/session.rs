//! Connection bootstrap

use wayland_client::{
    protocol::{wl_display, wl_registry::WlRegistry},
    Connection, EventQueue, Proxy, QueueHandle,
};

use crate::{
    event_loop::EventSource,
    registry::{Capabilities, CapabilityHandler},
    Result,
};

/// A connection to the compositor, with the event queue of a client state `D`
///
/// Creating a session performs exactly one blocking round trip, so every global advertised at
/// connection time has been offered to the [`Capabilities`] of `D` before any surface exists.
#[derive(Debug)]
pub struct Session<D> {
    conn: Connection,
    queue: EventQueue<D>,
}

impl<D: CapabilityHandler> Session<D> {
    /// Bootstrap on top of an established connection
    ///
    /// Fails if one of the capabilities wanted by `state` was not advertised.
    pub fn with_connection(conn: Connection, state: &mut D) -> Result<Self> {
        let mut queue = conn.new_event_queue::<D>();
        let qh = queue.handle();

        let data = qh.make_data::<WlRegistry, _, Capabilities>(());
        // events reach the registry through its object data, the proxy is not kept
        let _: WlRegistry =
            conn.display().send_constructor(wl_display::Request::GetRegistry {}, data)?;

        queue.roundtrip(state)?;
        state.capabilities().require_all()?;

        Ok(Self { conn, queue })
    }
}

impl<D: 'static> Session<D> {
    /// The underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Handle to the event queue, for creating objects
    pub fn handle(&self) -> QueueHandle<D> {
        self.queue.handle()
    }

    /// Block until the compositor has processed every request sent so far
    pub fn roundtrip(&mut self, state: &mut D) -> Result<usize> {
        Ok(self.queue.roundtrip(state)?)
    }

    /// Send pending requests to the compositor
    pub fn flush(&self) -> Result<()> {
        Ok(self.conn.flush()?)
    }
}

impl<D: 'static> EventSource<D> for Session<D> {
    fn dispatch_blocking(&mut self, state: &mut D) -> Result<usize> {
        Ok(self.queue.blocking_dispatch(state)?)
    }
}
