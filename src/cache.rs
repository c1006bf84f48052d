use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::error::Result;
use crate::request::{Request, Response};
use crate::transport::Transport;

/// Remembers the response to every request sent through it.
///
/// Entries live until invalidated; there is no eviction.  Failed sends are
/// never stored, so the next cached send of the same request goes back to
/// the network.
#[derive(Default)]
pub struct RequestCache {
    map: Mutex<HashMap<Request, Arc<Response>>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<Request, Arc<Response>>> {
        // A panic while holding the lock can not leave the map half-updated.
        self.map.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contains(&self, req: &Request) -> bool {
        self.map().contains_key(req)
    }

    pub fn invalidate(&self, req: &Request) {
        if self.map().remove(req).is_some() {
            debug!("invalidated {} {}", req.method, req.url);
        }
    }

    pub fn send(
        &self,
        transport: &dyn Transport,
        req: &Request,
        use_cached: bool,
    ) -> Result<Arc<Response>> {
        if use_cached {
            if let Some(resp) = self.map().get(req) {
                debug!("cache hit: {} {}", req.method, req.url);
                return Ok(Arc::clone(resp));
            }
        }

        debug!("cache miss: {} {}", req.method, req.url);
        let resp = Arc::new(transport.execute(req)?);
        self.map().insert(req.clone(), Arc::clone(&resp));
        Ok(resp)
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map().is_empty()
    }

    pub fn clear(&self) {
        self.map().clear();
    }
}
