//! Worker pool that runs scan requests off the caller's task.
//!
//! Requests go through a bounded queue to a fixed set of workers. Each
//! request is answered exactly once through its [`ScanTicket`], with either
//! the linked tree or the error that failed the scan. A failed or panicked
//! scan never takes its worker down.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::{ScanError, ScanResult};
use crate::types::DirectoryNode;

use super::link::{link, ScanTree};
use super::source::FileSource;
use super::walker::{DirectoryInfo, DirectoryWalker};

struct Job {
    info: DirectoryInfo,
    reply: oneshot::Sender<ScanResult<DirectoryNode>>,
}

/// Completion handle for one submitted scan.
pub struct ScanTicket {
    directory: String,
    reply: oneshot::Receiver<ScanResult<DirectoryNode>>,
}

impl ScanTicket {
    /// Library-relative directory this ticket is for.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Wait for the scan and link the result.
    pub async fn outcome(self) -> ScanResult<ScanTree> {
        let root = self.reply.await.map_err(|_| {
            ScanError::Dispatch(format!("scan of {:?} was dropped", self.directory))
        })??;
        Ok(link(root))
    }
}

/// A fixed pool of scan workers fed by a bounded queue.
pub struct ScanPool {
    image_root: PathBuf,
    sender: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl ScanPool {
    /// Start `config.pool.workers` workers scanning beneath the configured image root.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &Config, source: Arc<dyn FileSource>) -> Self {
        let image_root = config.image_root();
        let walker = Arc::new(DirectoryWalker::new(source, config.library.preview_photos));
        let (sender, receiver) = mpsc::channel(config.pool.queue_size);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..config.pool.workers)
            .map(|n| tokio::spawn(run_worker(n, receiver.clone(), walker.clone())))
            .collect();

        tracing::debug!(
            "Started {} scan workers for {:?}",
            config.pool.workers,
            image_root
        );

        Self {
            image_root,
            sender,
            workers,
        }
    }

    pub fn image_root(&self) -> &Path {
        &self.image_root
    }

    /// Queue a scan of `relative` (relative to the image root).
    ///
    /// Waits while the queue is full.
    pub async fn submit(&self, relative: &str) -> ScanResult<ScanTicket> {
        let info = DirectoryInfo::resolve(&self.image_root, relative);
        let directory = info.relative.clone();
        let (reply, receiver) = oneshot::channel();

        self.sender
            .send(Job { info, reply })
            .await
            .map_err(|_| ScanError::Dispatch("scan pool has stopped".to_string()))?;

        Ok(ScanTicket {
            directory,
            reply: receiver,
        })
    }

    /// Scan `relative` and wait for the linked tree.
    pub async fn scan(&self, relative: &str) -> ScanResult<ScanTree> {
        self.submit(relative).await?.outcome().await
    }

    /// Stop accepting requests, let queued scans finish, and join the workers.
    pub async fn shutdown(self) {
        drop(self.sender);
        for handle in self.workers {
            if let Err(e) = handle.await {
                tracing::error!("Scan worker panicked: {e}");
            }
        }
        tracing::debug!("Scan pool stopped");
    }
}

async fn run_worker(
    worker: usize,
    jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
    walker: Arc<DirectoryWalker>,
) {
    loop {
        let job = jobs.lock().await.recv().await;
        let Some(Job { info, reply }) = job else {
            break;
        };

        tracing::debug!("Worker {worker} scanning {:?}", info.absolute);
        let task_walker = walker.clone();
        let task_info = info.clone();
        let result = match tokio::spawn(async move { task_walker.walk_root(&task_info).await }).await
        {
            Ok(result) => result,
            Err(e) => Err(ScanError::Dispatch(format!(
                "scan of {:?} aborted: {e}",
                info.absolute
            ))),
        };

        if let Err(e) = &result {
            tracing::error!("Scan of {:?} failed: {e}", info.absolute);
        }
        if reply.send(result).is_err() {
            tracing::debug!("Nobody waiting for scan of {:?}", info.absolute);
        }
    }
    tracing::trace!("Worker {worker} stopped");
}
