//! Client: call a request and block until its own reply arrives.
//!
//! # The wait loop (for beginners)
//!
//! Replies do not necessarily arrive in the order requests were sent, and
//! asynchronous messages can arrive at any time.  [`Client::call`] therefore
//! reads frames one at a time with [`Client::pump`] until the reply for its
//! own ref-no shows up:
//!
//! - an OK or ERROR frame for another ref-no is parked in a drain queue
//!   until whoever sent that request asks for it;
//! - an asynchronous message is handed straight to every handler registered
//!   for its tag, in registration order, before the loop continues.
//!
//! Everything runs on the calling thread.  A handler receives `&mut Client`
//! and may itself call [`Client::call`]; the nested call runs its own wait
//! loop over the same socket.  A message whose tag is already being
//! dispatched when it arrives is held back and delivered to every handler
//! for that tag as soon as the running dispatch finishes, so no message is
//! lost and each tag sees its messages in arrival order.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, trace};

use crate::catalog::asynchronous::{AsyncMessage, AsyncNo};
use crate::catalog::errors::{CallError, ServerError};
use crate::catalog::requests::Request;
use crate::catalog::responses::Response;
use crate::connection::{Connection, Reply};
use crate::protocol::cursor::Transport;
use crate::protocol::error::ProtocolError;

/// A callback for one asynchronous message tag.
pub type AsyncHandler<S> = Box<dyn FnMut(&AsyncMessage, &mut Client<S>)>;

/// Synchronous facade over a [`Connection`].
pub struct Client<S> {
    conn: Connection<S>,
    ok_queue: HashMap<u64, Response>,
    error_queue: HashMap<u64, ServerError>,
    handlers: HashMap<AsyncNo, Vec<AsyncHandler<S>>>,
    /// Tags whose handlers are running further up the stack.
    dispatching: HashSet<AsyncNo>,
    /// Messages that arrived for a tag in `dispatching`.
    held_back: HashMap<AsyncNo, VecDeque<AsyncMessage>>,
}

impl<S: Transport> Client<S> {
    pub fn new(conn: Connection<S>) -> Self {
        Self {
            conn,
            ok_queue: HashMap::new(),
            error_queue: HashMap::new(),
            handlers: HashMap::new(),
            dispatching: HashSet::new(),
            held_back: HashMap::new(),
        }
    }

    /// Adds `handler` to the end of the list for `tag`.
    ///
    /// This only affects local dispatch; the server sends a tag only after
    /// it has been requested with [`Request::AcceptAsync`].
    pub fn register_async_handler<F>(&mut self, tag: AsyncNo, handler: F)
    where
        F: FnMut(&AsyncMessage, &mut Client<S>) + 'static,
    {
        self.handlers.entry(tag).or_default().push(Box::new(handler));
    }

    /// Number of handlers registered for `tag`.
    pub fn handler_count(&self, tag: AsyncNo) -> usize {
        self.handlers.get(&tag).map_or(0, Vec::len)
    }

    /// Sends `request` and waits for its reply.
    ///
    /// # Errors
    ///
    /// - [`CallError::Server`] if the server answered with an error frame.
    ///   The connection stays usable.
    /// - [`CallError::Protocol`] for any fatal failure.  The connection is
    ///   closed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lyskom_core::mock::MockStream;
    /// use lyskom_core::{Client, Connection, Request, Response};
    ///
    /// let stream = MockStream::with_input(b"LysKOM\n=1 42\n");
    /// let mut client = Client::new(Connection::new(stream, "guest").unwrap());
    ///
    /// let session = client.call(&Request::WhoAmI).unwrap();
    /// assert!(matches!(session, Response::SessionNo(no) if no.0 == 42));
    /// ```
    pub fn call(&mut self, request: &Request) -> Result<Response, CallError> {
        let ref_no = self.register_request(request)?;
        self.wait_and_dequeue(ref_no)
    }

    /// Sends `request` without waiting.  The reply must later be collected
    /// with [`Client::wait_and_dequeue`].
    pub fn register_request(&mut self, request: &Request) -> Result<u64, ProtocolError> {
        self.conn.send_request(request)
    }

    /// Blocks until the reply for `ref_no` has been read, then returns it.
    ///
    /// # Errors
    ///
    /// As for [`Client::call`].  [`ProtocolError::BadRequestId`] if `ref_no`
    /// is neither outstanding nor already queued.
    pub fn wait_and_dequeue(&mut self, ref_no: u64) -> Result<Response, CallError> {
        loop {
            if let Some(response) = self.ok_queue.remove(&ref_no) {
                return Ok(response);
            }
            if let Some(error) = self.error_queue.remove(&ref_no) {
                return Err(CallError::Server(error));
            }
            if !self.conn.outstanding().contains(ref_no) {
                return Err(ProtocolError::BadRequestId(ref_no).into());
            }
            self.pump()?;
        }
    }

    /// Reads one frame and routes it: OK and ERROR frames go to the drain
    /// queues, async messages go to their handlers.
    pub fn pump(&mut self) -> Result<(), ProtocolError> {
        match self.conn.read_response()? {
            Reply::Ok { ref_no, response } => {
                trace!(ref_no, "queued ok reply");
                self.ok_queue.insert(ref_no, response);
            }
            Reply::Error { ref_no, error } => {
                trace!(ref_no, "queued error reply");
                self.error_queue.insert(ref_no, error);
            }
            Reply::Async(msg) => self.dispatch(msg),
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: AsyncMessage) {
        let tag = msg.async_no();
        if self.dispatching.contains(&tag) {
            trace!(%tag, "holding back async message until its handlers return");
            self.held_back.entry(tag).or_default().push_back(msg);
            return;
        }
        if self.handler_count(tag) == 0 {
            debug!(%tag, "no handler for async message");
            return;
        }

        // The handlers are taken out of the map while they run, since each
        // one receives `&mut self`.
        self.dispatching.insert(tag);
        let mut running: Vec<AsyncHandler<S>> = Vec::new();
        let mut next = Some(msg);
        while let Some(msg) = next {
            // Handlers registered since the last message go last.
            running.extend(self.handlers.remove(&tag).unwrap_or_default());
            for handler in running.iter_mut() {
                handler(&msg, self);
            }
            next = self.held_back.get_mut(&tag).and_then(VecDeque::pop_front);
        }
        self.held_back.remove(&tag);
        running.extend(self.handlers.remove(&tag).unwrap_or_default());
        self.handlers.insert(tag, running);
        self.dispatching.remove(&tag);
    }

    /// Replies that have been read but not yet collected.
    pub fn queued_replies(&self) -> usize {
        self.ok_queue.len() + self.error_queue.len()
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection<S> {
        &mut self.conn
    }

    /// Closes the connection and drops anything still queued.
    pub fn close(&mut self) -> Result<(), ProtocolError> {
        self.ok_queue.clear();
        self.error_queue.clear();
        self.conn.close()
    }

    /// Unwraps the connection, dropping queued replies and handlers.
    pub fn into_connection(self) -> Connection<S> {
        self.conn
    }
}
