use std::any::Any;

use diesel::{Connection, SqliteConnection};
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::{Error, Result};

// A job is a closure executed on the writer's dedicated connection. Return
// types are erased behind Box<dyn Any> so one channel can carry them all.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

/// Handle for submitting write jobs to the single writer task.
///
/// Every job runs inside `immediate_transaction` on one dedicated connection,
/// so multi-row writes submitted as one job commit or roll back as one unit,
/// and no two write jobs ever interleave.
#[derive(Clone)]
pub struct WriteHandle {
    #[allow(clippy::type_complexity)]
    tx: mpsc::Sender<(
        Job<Box<dyn Any + Send + 'static>>,
        oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>,
    )>,
}

impl WriteHandle {
    /// Executes `job` on the writer connection inside a single transaction.
    ///
    /// Any error returned by the job rolls back every write the job staged;
    /// the error is handed back to the caller unchanged.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .expect("writer task receiver closed; the writer has stopped");

        ret_rx
            .await
            .expect("writer task dropped the reply sender without responding")
            .map(|boxed: Box<dyn Any + Send + 'static>| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("writer job result had an unexpected type"))
            })
    }
}

/// Spawns the background writer task and returns a handle to it.
///
/// The task takes one connection from the pool and holds it for its entire
/// lifetime; jobs are processed strictly in arrival order. The task ends when
/// the last `WriteHandle` is dropped.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(
        Job<Box<dyn Any + Send + 'static>>,
        oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>,
    )>(1024);

    tokio::spawn(async move {
        let mut conn = pool
            .get()
            .expect("failed to acquire the writer connection from the pool");

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> =
                conn.immediate_transaction::<_, Error, _>(|c| job(c));

            // Receiver may have given up (cancelled request); nothing to do.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
