use std::sync::{
    mpsc::{self, Receiver, Sender, TryRecvError},
    Arc,
};
#[cfg(test)]
use std::time::Duration;

use aec_core::eval::{
    BannerReply, Evaluator, StatementReply, StatementRequest, TransportError,
};
use tokio::runtime::Runtime;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Banner,
    Statement { id: u64, req: StatementRequest },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Banner(Result<BannerReply, TransportError>),
    Statement {
        id: u64,
        highlight: bool,
        result: Result<StatementReply, TransportError>,
    },
}

/// Runs evaluator calls off the UI thread and hands replies back through a
/// channel the event loop drains.
pub struct Dispatcher<E> {
    evaluator: Arc<E>,
    rt: Option<Runtime>,
    tx: Sender<Reply>,
    rx: Receiver<Reply>,
}

impl<E: Evaluator + 'static> Dispatcher<E> {
    pub fn new(evaluator: E) -> anyhow::Result<Self> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("aec-net")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            evaluator: Arc::new(evaluator),
            rt: Some(rt),
            tx,
            rx,
        })
    }

    /// Fire and forget: the reply shows up later in [`Dispatcher::try_recv`].
    pub fn send(&self, req: Request) {
        let Some(rt) = &self.rt else {
            return;
        };
        let handle = rt.handle().clone();
        let evaluator = self.evaluator.clone();
        let tx = self.tx.clone();
        rt.spawn_blocking(move || {
            let reply = handle.block_on(async move {
                match req {
                    Request::Banner => Reply::Banner(evaluator.banner().await),
                    Request::Statement { id, req } => Reply::Statement {
                        id,
                        highlight: req.highlight,
                        result: evaluator.statement(&req).await,
                    },
                }
            });
            if tx.send(reply).is_err() {
                debug!(target: "tui", "reply dropped, ui gone");
            }
        });
    }

    pub fn try_recv(&self) -> Option<Reply> {
        match self.rx.try_recv() {
            Ok(r) => Some(r),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Reply> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl<E> Drop for Dispatcher<E> {
    fn drop(&mut self) {
        // in-flight requests are abandoned rather than awaited
        if let Some(rt) = self.rt.take() {
            rt.shutdown_background();
        }
    }
}
