//! Message-based entry points.
//!
//! Layout computation is meant to run away from the caller's own thread. A
//! caller sends a [`LayoutRequest`] carrying the structure tree and the traces
//! and receives a [`WorkerMessage`] with the resulting [`CityLayout`]. Every
//! request carries a sequence number that is echoed in the answer, so a caller
//! that has moved on can recognise and drop stale results; requests are never
//! interrupted.
//!
//! Two transports are provided around the same [`handle_request`] function:
//!
//! - [`LayoutWorker`]: an in-process background thread fed through channels.
//! - [`serve`]: line-delimited JSON over any reader/writer pair, e.g. stdin/stdout.
//!
//! Both post [`WorkerMessage::Ready`] once before answering any request.

use std::{
    io::{self, BufRead, Write},
    sync::mpsc,
    thread,
};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use skyline_core::{city::CityLayout, structure::Application, trace::Trace};

use crate::{config::LayoutConfig, error::SkylineError, layout};

/// A request to lay out one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    /// Caller-chosen number echoed in the answer.
    #[serde(default)]
    pub sequence: u64,
    /// The structure tree.
    pub structure: Application,
    /// Observed traces.
    #[serde(default)]
    pub dynamic: Vec<Trace>,
}

impl LayoutRequest {
    pub fn new(sequence: u64, structure: Application, dynamic: Vec<Trace>) -> Self {
        Self {
            sequence,
            structure,
            dynamic,
        }
    }
}

/// A message posted by a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerMessage {
    /// The worker is ready to accept requests.
    Ready,
    /// The layout computed for request `sequence`.
    Layout { sequence: u64, layout: CityLayout },
    /// Request `sequence` could not be laid out.
    Error { sequence: u64, message: String },
}

/// Computes the answer to a single request.
pub fn handle_request(config: &LayoutConfig, request: &LayoutRequest) -> WorkerMessage {
    let sequence = request.sequence;
    match layout::compute(&request.structure, &request.dynamic, config) {
        Ok(layout) => WorkerMessage::Layout { sequence, layout },
        Err(err) => {
            warn!(sequence, err:err; "Layout request failed");
            WorkerMessage::Error {
                sequence,
                message: err.to_string(),
            }
        }
    }
}

/// A background thread answering layout requests in submission order.
///
/// Dropping the worker stops accepting requests and waits for the thread to
/// finish the request it is working on.
#[derive(Debug)]
pub struct LayoutWorker {
    requests: Option<mpsc::Sender<LayoutRequest>>,
    messages: mpsc::Receiver<WorkerMessage>,
    thread: Option<thread::JoinHandle<()>>,
}

impl LayoutWorker {
    /// Starts the worker thread. Its first message is [`WorkerMessage::Ready`].
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Io`] if the thread cannot be spawned.
    pub fn spawn(config: LayoutConfig) -> Result<Self, SkylineError> {
        let (request_tx, request_rx) = mpsc::channel::<LayoutRequest>();
        let (message_tx, message_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("skyline-layout".to_string())
            .spawn(move || {
                if message_tx.send(WorkerMessage::Ready).is_err() {
                    return;
                }
                for request in request_rx {
                    debug!(sequence = request.sequence; "Layout request received");
                    let message = handle_request(&config, &request);
                    if message_tx.send(message).is_err() {
                        break;
                    }
                }
                debug!("Layout worker stopped");
            })?;

        Ok(Self {
            requests: Some(request_tx),
            messages: message_rx,
            thread: Some(thread),
        })
    }

    /// Queues a request.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Worker`] if the worker thread is gone.
    pub fn submit(&self, request: LayoutRequest) -> Result<(), SkylineError> {
        self.requests
            .as_ref()
            .ok_or_else(|| SkylineError::Worker("layout worker is shut down".to_string()))?
            .send(request)
            .map_err(|_| SkylineError::Worker("layout worker has stopped".to_string()))
    }

    /// Blocks until the next message arrives.
    ///
    /// # Errors
    ///
    /// Returns [`SkylineError::Worker`] if the worker thread is gone.
    pub fn recv(&self) -> Result<WorkerMessage, SkylineError> {
        self.messages
            .recv()
            .map_err(|_| SkylineError::Worker("layout worker has stopped".to_string()))
    }

    /// Returns the next message if one is already available.
    pub fn try_recv(&self) -> Option<WorkerMessage> {
        self.messages.try_recv().ok()
    }
}

impl Drop for LayoutWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Layout worker panicked");
            }
        }
    }
}

/// Answers line-delimited JSON requests from `reader` on `writer`.
///
/// Posts `ready` first, then one message per non-blank input line. A line
/// that is not a valid request is answered with an `error` message carrying
/// sequence 0, and serving continues.
///
/// # Errors
///
/// Returns [`SkylineError::Io`] if reading or writing fails.
pub fn serve<R: BufRead, W: Write>(
    config: &LayoutConfig,
    reader: R,
    mut writer: W,
) -> Result<(), SkylineError> {
    info!("Serving layout requests");
    write_message(&mut writer, &WorkerMessage::Ready)?;

    let mut answered = 0_usize;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message = match serde_json::from_str::<LayoutRequest>(line) {
            Ok(request) => handle_request(config, &request),
            Err(err) => {
                warn!(err:err; "Malformed layout request");
                WorkerMessage::Error {
                    sequence: 0,
                    message: format!("invalid layout request: {err}"),
                }
            }
        };
        write_message(&mut writer, &message)?;
        answered += 1;
    }

    info!(answered; "Input closed, stopping");
    Ok(())
}

fn write_message<W: Write>(writer: &mut W, message: &WorkerMessage) -> Result<(), SkylineError> {
    serde_json::to_writer(&mut *writer, message).map_err(io::Error::from)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
