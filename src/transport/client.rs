// SPDX-License-Identifier: GPL-3.0-only

//! Bus client
//!
//! One connection per instance. A writer task drains an unbounded queue so that
//! publishing never blocks the UI loop; a reader task fans incoming topic
//! messages out to subscribers and completes pending service calls.

use super::envelope::Envelope;
use super::BusAddress;
use crate::errors::TransportError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

type PendingCall = oneshot::Sender<Result<Value, TransportError>>;

/// Item of the writer queue
enum Outgoing {
    Envelope(Envelope),
    /// Answered once everything queued before it has been written
    Flush(oneshot::Sender<()>),
}

struct Inner {
    node: String,
    outbound: mpsc::UnboundedSender<Outgoing>,
    connected: AtomicBool,
    next_call: AtomicU64,
    advertised: Mutex<HashSet<String>>,
    subscribers: Mutex<HashMap<String, broadcast::Sender<Value>>>,
    pending: Mutex<HashMap<u64, PendingCall>>,
}

/// Handle to the bus connection, cheap to clone
#[derive(Clone)]
pub struct BusClient {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for BusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusClient")
            .field("node", &self.inner.node)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl BusClient {
    /// Open a TCP connection to the bus and announce `node`
    pub async fn connect(address: &BusAddress, node: String) -> Result<Self, TransportError> {
        info!(address = %address, node = %node, "Connecting to bus");
        let stream = tokio::net::TcpStream::connect((address.host.as_str(), address.port))
            .await
            .map_err(|e| TransportError::ConnectFailed(format!("{}: {}", address, e)))?;
        stream.set_nodelay(true)?;
        Ok(Self::from_stream(stream, node))
    }

    /// Run the client over an already established byte stream
    ///
    /// Must be called from within a tokio runtime.
    pub fn from_stream<S>(stream: S, node: String) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        let (outbound, queue) = mpsc::unbounded_channel();

        let inner = Arc::new(Inner {
            node: node.clone(),
            outbound,
            connected: AtomicBool::new(true),
            next_call: AtomicU64::new(1),
            advertised: Mutex::new(HashSet::new()),
            subscribers: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
        });

        tokio::spawn(write_loop(writer, queue));
        tokio::spawn(read_loop(reader, Arc::downgrade(&inner)));

        let client = Self { inner };
        client.send(Envelope::Hello { node }).ok();
        client
    }

    pub fn node_name(&self) -> &str {
        &self.inner.node
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    fn send(&self, envelope: Envelope) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        self.inner
            .outbound
            .send(Outgoing::Envelope(envelope))
            .map_err(|_| TransportError::Disconnected)
    }

    /// Wait until every message queued so far has been written to the bus
    pub async fn flush(&self) -> Result<(), TransportError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.inner
            .outbound
            .send(Outgoing::Flush(done_tx))
            .map_err(|_| TransportError::Disconnected)?;
        done_rx.await.map_err(|_| TransportError::Disconnected)
    }

    /// Announce a topic this node publishes on (once per topic)
    pub fn advertise(&self, topic: &str) -> Result<(), TransportError> {
        let fresh = lock(&self.inner.advertised).insert(topic.to_string());
        if fresh {
            debug!(topic, "Advertising topic");
            self.send(Envelope::Advertise {
                topic: topic.to_string(),
            })?;
        }
        Ok(())
    }

    /// Queue a message for `topic`; returns once queued, not once delivered
    pub fn publish<T: Serialize>(&self, topic: &str, message: &T) -> Result<(), TransportError> {
        self.advertise(topic)?;
        let payload = serde_json::to_value(message)?;
        self.send(Envelope::Publish {
            topic: topic.to_string(),
            payload,
        })
    }

    /// Receive messages published on `topic`
    ///
    /// Each subscriber buffers at most `depth` messages; a slow subscriber skips
    /// straight to the newest ones.
    pub fn subscribe<T: DeserializeOwned>(
        &self,
        topic: &str,
        depth: usize,
    ) -> Result<Subscriber<T>, TransportError> {
        let (receiver, fresh) = {
            let mut subscribers = lock(&self.inner.subscribers);
            match subscribers.get(topic) {
                Some(sender) => (sender.subscribe(), false),
                None => {
                    let (sender, receiver) = broadcast::channel(depth.max(1));
                    subscribers.insert(topic.to_string(), sender);
                    (receiver, true)
                }
            }
        };

        if fresh {
            info!(topic, "Subscribing to topic");
            self.send(Envelope::Subscribe {
                topic: topic.to_string(),
            })?;
        }

        Ok(Subscriber {
            topic: topic.to_string(),
            receiver,
            _message: PhantomData,
        })
    }

    /// Call a service and wait for its reply
    pub async fn call<Req, Resp>(
        &self,
        service: &str,
        request: &Req,
        timeout: Duration,
    ) -> Result<Resp, TransportError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let id = self.inner.next_call.fetch_add(1, Ordering::Relaxed);
        let payload = serde_json::to_value(request)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        lock(&self.inner.pending).insert(id, reply_tx);

        debug!(service, id, "Calling service");
        if let Err(err) = self.send(Envelope::Call {
            id,
            service: service.to_string(),
            payload,
        }) {
            lock(&self.inner.pending).remove(&id);
            return Err(err);
        }

        let reply = match tokio::time::timeout(timeout, reply_rx).await {
            Ok(Ok(reply)) => reply?,
            Ok(Err(_)) => return Err(TransportError::Disconnected),
            Err(_) => {
                lock(&self.inner.pending).remove(&id);
                return Err(TransportError::Timeout);
            }
        };

        Ok(serde_json::from_value(reply)?)
    }
}

/// Typed stream of messages from one topic
pub struct Subscriber<T> {
    topic: String,
    receiver: broadcast::Receiver<Value>,
    _message: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscriber<T> {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next message, or `None` once the connection is gone
    ///
    /// Messages that fail to decode are returned as errors so the caller can
    /// decide whether to keep listening.
    pub async fn recv(&mut self) -> Option<Result<T, TransportError>> {
        loop {
            match self.receiver.recv().await {
                Ok(value) => return Some(serde_json::from_value(value).map_err(Into::into)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(topic = %self.topic, skipped, "Subscriber behind, skipping to newest");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn write_loop<W>(mut writer: W, mut queue: mpsc::UnboundedReceiver<Outgoing>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(item) = queue.recv().await {
        let envelope = match item {
            Outgoing::Envelope(envelope) => envelope,
            Outgoing::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };
        let line = match envelope.to_line() {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "Dropping unencodable envelope");
                continue;
            }
        };
        if let Err(err) = writer.write_all(line.as_bytes()).await {
            warn!(error = %err, "Bus write failed");
            break;
        }
        if let Err(err) = writer.flush().await {
            warn!(error = %err, "Bus flush failed");
            break;
        }
    }
    let _ = writer.shutdown().await;
}

async fn read_loop<R>(reader: R, shared: Weak<Inner>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Bus closed the connection");
                break;
            }
            Err(err) => {
                warn!(error = %err, "Bus read failed");
                break;
            }
        };

        let Some(inner) = shared.upgrade() else {
            return;
        };

        if line.trim().is_empty() {
            continue;
        }

        match Envelope::from_line(&line) {
            Ok(Envelope::Publish { topic, payload }) => {
                if let Some(sender) = lock(&inner.subscribers).get(&topic) {
                    // No live receivers is not an error
                    let _ = sender.send(payload);
                }
            }
            Ok(Envelope::Reply { id, payload, error }) => {
                let Some(waiter) = lock(&inner.pending).remove(&id) else {
                    debug!(id, "Reply for unknown or expired call");
                    continue;
                };
                let result = match error {
                    Some(msg) => Err(TransportError::Remote(msg)),
                    None => Ok(payload),
                };
                let _ = waiter.send(result);
            }
            Ok(other) => debug!(?other, "Ignoring envelope"),
            Err(err) => warn!(error = %err, "Malformed line from bus"),
        }
    }

    if let Some(inner) = shared.upgrade() {
        inner.connected.store(false, Ordering::Release);
        for (_, waiter) in lock(&inner.pending).drain() {
            let _ = waiter.send(Err(TransportError::Disconnected));
        }
        // Dropping the senders ends every subscriber stream
        lock(&inner.subscribers).clear();
    }
}
