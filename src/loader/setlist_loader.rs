// Runs the setlist source on its own thread so the TUI keeps drawing while the
// model thinks. The ui thread sends a request in and later picks the finished
// session up with poll_completed(), same shape as the audio handle.

use std::sync::Arc;
use std::thread;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::pipeline::setlist::{Setlist, SetlistParams};
use crate::source::{self, SetlistSource};

#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub session_id: u64, // echoed back so stale results can be dropped
    pub params: SetlistParams,
    pub cancel: CancellationToken, // fired by the middle layer on stop
}

#[derive(Clone, Debug)]
pub struct LoadedSession {
    pub session_id: u64,
    pub setlist: Setlist,
    pub caption: String,
}

pub struct SetlistLoader {
    tx: Sender<FetchRequest>,
    completed_rx: Receiver<LoadedSession>,
    _worker: thread::JoinHandle<()>,
}

impl SetlistLoader {
    // Fails only once the worker thread is gone.
    pub fn send(&self, request: FetchRequest) -> anyhow::Result<()> {
        self.tx.send(request).map_err(|e| {
            anyhow::anyhow!("setlist loader has stopped, set {} dropped", e.0.session_id)
        })
    }

    pub fn poll_completed(&self) -> Option<LoadedSession> {
        self.completed_rx.try_recv().ok()
    }
}

pub fn start_loader(setlist_source: Arc<dyn SetlistSource>) -> anyhow::Result<SetlistLoader> {
    // unbounded, the worker drains it down to the newest request each time
    let (tx, rx) = crossbeam_channel::unbounded::<FetchRequest>();
    let (completed_tx, completed_rx) = crossbeam_channel::bounded::<LoadedSession>(8);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build loader runtime")?;

    let worker = thread::Builder::new()
        .name("setlist-loader".into())
        .spawn(move || {
            // ends once the ui side drops its sender
            while let Ok(mut request) = rx.recv() {
                // only the newest request matters, anything queued before it
                // was cancelled or superseded
                while let Ok(newer) = rx.try_recv() {
                    request.cancel.cancel();
                    request = newer;
                }
                if request.cancel.is_cancelled() {
                    debug!(session = request.session_id, "Skipping cancelled fetch");
                    continue;
                }

                debug!(session = request.session_id, "Fetching setlist");
                let cancel = request.cancel.clone();
                let fetch = source::load_session(setlist_source.as_ref(), &request.params);
                let fetched = runtime.block_on(async {
                    tokio::select! {
                        _ = cancel.cancelled() => None,
                        loaded = fetch => Some(loaded),
                    }
                });
                let Some((setlist, caption)) = fetched else {
                    info!(session = request.session_id, "Fetch cancelled");
                    continue;
                };
                info!(
                    session = request.session_id,
                    tracks = setlist.len(),
                    "Session loaded"
                );
                let loaded = LoadedSession {
                    session_id: request.session_id,
                    setlist,
                    caption,
                };
                if completed_tx.send(loaded).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn setlist loader thread")?;

    Ok(SetlistLoader {
        tx,
        completed_rx,
        _worker: worker,
    })
}
