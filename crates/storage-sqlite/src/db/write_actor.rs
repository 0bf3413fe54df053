use super::DbPool;
use crate::errors::SqliteError;
use cotizaciones_core::errors::{Result, StorageError};
use diesel::SqliteConnection;
use log::debug;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A write job runs against the actor's connection inside an immediate transaction.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type AnyBox = Box<dyn Any + Send + 'static>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job<AnyBox>, oneshot::Sender<Result<AnyBox>>)>,
}

impl WriteHandle {
    /// Executes a job on the writer actor's dedicated connection.
    ///
    /// Jobs run one at a time, each in its own immediate transaction; an error
    /// from the job rolls the transaction back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as AnyBox)),
                ret_tx,
            ))
            .await
            .map_err(|_| StorageError::Internal("writer actor has stopped".to_string()))?;

        let boxed = ret_rx.await.map_err(|_| {
            StorageError::Internal("writer actor dropped the reply channel".to_string())
        })??;

        boxed
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| StorageError::Internal("unexpected writer result type".to_string()).into())
    }
}

/// Spawns the single database writer.
///
/// The actor owns one pooled connection for its lifetime and stops once every
/// `WriteHandle` has been dropped.
pub fn spawn_writer(pool: &DbPool) -> Result<WriteHandle> {
    let mut conn = super::get_connection(pool)?;
    let (tx, mut rx) = mpsc::channel::<(Job<AnyBox>, oneshot::Sender<Result<AnyBox>>)>(1024);

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<AnyBox> = conn
                .immediate_transaction::<_, SqliteError, _>(|c| job(c).map_err(SqliteError::from))
                .map_err(Into::into);

            // The requester may have gone away.
            let _ = reply_tx.send(result);
        }
        debug!("Writer actor stopped");
    });

    Ok(WriteHandle { tx })
}
