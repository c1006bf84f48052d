//! Client for the Kattis judge.
//!
//! [`Kattis`] reads a `.kattisrc`, derives the URL of every page on the
//! site, and sends authenticated requests through a cache keyed by the full
//! request, so a login happens once per session unless the cache is told
//! otherwise.
//!
//! ```no_run
//! let kattis = kattis::Kattis::from_default_config()?;
//! let hello = kattis.problem("hello");
//! let page = kattis.get(&hello.url(None), None, None, true)?;
//! println!("{}", page.status);
//! # Ok::<(), kattis::Error>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod kattis;
pub mod request;
pub mod transport;

pub use crate::cache::RequestCache;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::kattis::{Contest, Entity, Kattis, Problem, Submission, User};
pub use crate::request::{Request, Response};
pub use crate::transport::{ReqwestTransport, Transport};
