//! Change notification and live re-query delivery.
//!
//! The store publishes a [`Change`] after every committed mutation; a watcher
//! registered through [`watch`] re-runs its query and re-delivers the full
//! result whenever a change touches one of its collections.

use crate::db::Store;
use crate::errors::AppResult;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Lists,
    Tasks,
    Categories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub collection: Collection,
}

pub type QueryFuture<T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send>>;
pub type Query<T> = Box<dyn Fn(Arc<Store>) -> QueryFuture<T> + Send + Sync>;

/// Subscribe a query to store changes. The initial result is delivered
/// immediately; afterwards every change touching one of `collections`
/// triggers a re-run. Delivery stops when the receiver is dropped.
pub fn watch<T>(store: Arc<Store>, collections: &[Collection], query: Query<T>) -> mpsc::Receiver<T>
where
    T: Send + 'static,
{
    let (sender, receiver) = mpsc::channel(16);
    let watched = collections.to_vec();
    let mut changes = store.subscribe();

    tokio::spawn(async move {
        if !run_and_send(&store, &query, &sender).await {
            return;
        }
        loop {
            match changes.recv().await {
                Ok(change) if watched.contains(&change.collection) => {
                    if !run_and_send(&store, &query, &sender).await {
                        break;
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Coalesced anyway: one catch-up re-run covers them all.
                    tracing::debug!(skipped, "live query lagged behind change stream");
                    if !run_and_send(&store, &query, &sender).await {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    receiver
}

async fn run_and_send<T>(store: &Arc<Store>, query: &Query<T>, sender: &mpsc::Sender<T>) -> bool
where
    T: Send + 'static,
{
    match query(store.clone()).await {
        Ok(value) => sender.send(value).await.is_ok(),
        Err(err) => {
            tracing::warn!(%err, "live query failed; keeping previous result");
            true
        }
    }
}
