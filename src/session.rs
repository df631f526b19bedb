//! Per client display state kept by the web server between requests.

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use log::debug;

/// Lock, carrying on with the data if another thread panicked holding it
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub type SessionId = u64;

pub struct SessionContainer<S> {
    map: Mutex<HashMap<SessionId, Arc<Mutex<S>>>>,
    next_session_id: AtomicU64,
    new_session: Box<dyn Fn() -> S + Send + Sync>,
}

impl<S> SessionContainer<S> {
    pub fn new(new_session: impl Fn() -> S + Send + Sync + 'static) -> SessionContainer<S> {
        SessionContainer {
            map: Mutex::new(HashMap::new()),
            next_session_id: AtomicU64::new(1000),
            new_session: Box::new(new_session),
        }
    }

    /// Start a session under a fresh id. Ids are only ever handed out here,
    /// a client can't pick one.
    pub fn create(&self) -> (SessionId, Arc<Mutex<S>>) {
        let session_id = self.new_session_id();
        debug!("starting session {}", session_id);
        let session = Arc::new(Mutex::new((self.new_session)()));
        lock(&self.map).insert(session_id, session.clone());
        (session_id, session)
    }

    /// The session with `id` only if it exists
    pub fn existing(&self, id: SessionId) -> Option<Arc<Mutex<S>>> {
        lock(&self.map).get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.map).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn new_session_id(&self) -> SessionId {
        self.next_session_id.fetch_add(1, Ordering::SeqCst)
    }
}
