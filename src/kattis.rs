mod entity;
mod urls;

pub use entity::{Contest, Entity, Problem, Submission, User};

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use log::{debug, info};
use reqwest::{Method, StatusCode};

use crate::cache::RequestCache;
use crate::config::{Config, USER};
use crate::error::{Error, Result};
use crate::request::{Fields, Request, Response};
use crate::transport::{ReqwestTransport, Transport};

pub const USER_AGENT: &str = "kattis-cli-submit";

fn default_headers() -> Fields {
    let mut h = Fields::new();
    h.insert(String::from("User-Agent"), String::from(USER_AGENT));
    h
}

/// One client identity on a Kattis site.
///
/// Whether we are logged in is never stored: it is exactly "the login
/// request is in the request cache", and the session cookies are always
/// read back from that cached response.
pub struct Kattis {
    config: Config,
    transport: Box<dyn Transport>,
    cache: OnceLock<RequestCache>,
    // Held across check, send and store in `login`.
    login_lock: Mutex<()>,
}

impl Kattis {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_transport(config, Box::new(ReqwestTransport::new()?)))
    }

    pub fn with_transport(config: Config, transport: Box<dyn Transport>) -> Self {
        Kattis {
            config,
            transport,
            cache: OnceLock::new(),
            login_lock: Mutex::new(()),
        }
    }

    /// Read config from the default `.kattisrc` locations.
    pub fn from_default_config() -> Result<Self> {
        Self::new(Config::load(Config::default_paths())?)
    }

    pub fn from_config_files<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::new(Config::load(paths)?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &RequestCache {
        self.cache.get_or_init(RequestCache::new)
    }

    pub fn username(&self) -> Result<&str> {
        self.config.require(USER, "username")
    }

    pub fn password(&self) -> Option<&str> {
        self.config.get(USER, "password")
    }

    pub fn token(&self) -> Option<&str> {
        self.config.get(USER, "token")
    }

    pub fn user(&self, name: &str) -> User<'_> {
        User::new(self, name)
    }

    /// The configured user.
    pub fn me(&self) -> Result<User<'_>> {
        Ok(User::new(self, self.username()?))
    }

    pub fn problem(&self, name: &str) -> Problem<'_> {
        Problem::new(self, name)
    }

    pub fn contest(&self, id: &str) -> Contest<'_> {
        Contest::new(self, id)
    }

    pub fn submission(&self, id: &str) -> Submission<'_> {
        Submission::new(self, id)
    }

    pub fn login_request(&self) -> Result<Request> {
        let (password, token) = (self.password(), self.token());
        if password.is_none() && token.is_none() {
            return Err(Error::MissingCredentials {
                username: self.config.get_or(USER, "username", "<unset>").to_string(),
            });
        }
        let username = self.username()?;

        let mut req = Request::post(self.login_url())
            .headers(default_headers())
            .data("user", username)
            .data("script", "true");
        if let Some(p) = password {
            req = req.data("password", p);
        }
        if let Some(t) = token {
            req = req.data("token", t);
        }
        Ok(req)
    }

    pub fn login(&self, use_cached: bool) -> Result<Arc<Response>> {
        let req = self.login_request()?;
        let _guard = self.login_lock.lock().unwrap_or_else(|e| e.into_inner());

        if !use_cached || !self.cache().contains(&req) {
            info!("logging in to {} as {}", req.url, self.username()?);
        }
        let resp = self.cache().send(self.transport.as_ref(), &req, use_cached)?;
        if resp.status == StatusCode::OK {
            return Ok(resp);
        }

        // Only a successful login may count as a session.
        self.cache().invalidate(&req);
        match resp.status.as_u16() {
            403 => Err(Error::Authentication {
                username: self.username()?.to_string(),
            }),
            404 => Err(Error::Endpoint { url: req.url }),
            _ => Err(Error::Login {
                status: resp.status,
                url: req.url,
            }),
        }
    }

    /// Log in unless a login response is already cached.  This is the only
    /// way session cookies are obtained, so it may hit the network.
    pub fn ensure_authenticated(&self) -> Result<Arc<Response>> {
        self.login(true)
    }

    pub fn is_logged_in(&self) -> bool {
        match self.login_request() {
            Ok(req) => self.cache().contains(&req),
            Err(_) => false,
        }
    }

    /// Forget the cached login.  No request is sent to the site.
    pub fn logout(&self) -> Result<()> {
        let req = self.login_request()?;
        self.cache().invalidate(&req);
        debug!("logged out");
        Ok(())
    }

    pub fn cookies(&self) -> Result<BTreeMap<String, String>> {
        Ok(self.ensure_authenticated()?.cookies.clone())
    }

    fn authenticated(
        &self,
        method: Method,
        url: &str,
        data: Option<Fields>,
        params: Option<Fields>,
    ) -> Result<Request> {
        Ok(Request::new(method, url)
            .headers(default_headers())
            .form(data.unwrap_or_default())
            .query(params.unwrap_or_default())
            .cookies(self.cookies()?))
    }

    pub fn get(
        &self,
        url: &str,
        data: Option<Fields>,
        params: Option<Fields>,
        use_cached: bool,
    ) -> Result<Arc<Response>> {
        let req = self.authenticated(Method::GET, url, data, params)?;
        self.cache().send(self.transport.as_ref(), &req, use_cached)
    }

    pub fn post(
        &self,
        url: &str,
        data: Option<Fields>,
        params: Option<Fields>,
        use_cached: bool,
    ) -> Result<Arc<Response>> {
        let req = self.authenticated(Method::POST, url, data, params)?;
        self.cache().send(self.transport.as_ref(), &req, use_cached)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transport::stub::StubTransport;

    pub fn kattis_with(cfg: &str) -> (Kattis, StubTransport) {
        let t = StubTransport::new();
        let k = Kattis::with_transport(cfg.parse().unwrap(), Box::new(t.clone()));
        (k, t)
    }

    const ALICE: &str = "[user]\nusername: alice\npassword: hunter2\n";

    #[test]
    fn test_login_request_fields() {
        let (k, _) = kattis_with("[user]\nusername: alice\npassword: p\ntoken: t\n");
        let req = k.login_request().unwrap();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.url, "https://open.kattis.com/login");
        assert_eq!(req.headers.get("User-Agent").map(String::as_str), Some(USER_AGENT));
        assert_eq!(req.data.get("user").map(String::as_str), Some("alice"));
        assert_eq!(req.data.get("script").map(String::as_str), Some("true"));
        assert_eq!(req.data.get("password").map(String::as_str), Some("p"));
        assert_eq!(req.data.get("token").map(String::as_str), Some("t"));

        let (k, _) = kattis_with("[user]\nusername: alice\ntoken: t\n");
        let req = k.login_request().unwrap();
        assert!(!req.data.contains_key("password"));
        assert!(req.data.contains_key("token"));
    }

    #[test]
    fn test_missing_credentials() {
        let (k, t) = kattis_with("[user]\nusername: alice\n");
        match k.login_request().unwrap_err() {
            Error::MissingCredentials { username } => assert_eq!(username, "alice"),
            other => panic!("unexpected error {}", other),
        }
        assert!(k.login(true).is_err());
        assert!(k.cookies().is_err());
        assert!(!k.is_logged_in());
        assert_eq!(t.calls(), 0);
    }

    #[test]
    fn test_credentials_checked_before_username() {
        let (k, _) = kattis_with("[site]\nhostname: example.com\n");
        match k.login_request().unwrap_err() {
            Error::MissingCredentials { username } => assert_eq!(username, "<unset>"),
            other => panic!("unexpected error {}", other),
        }

        let (k, _) = kattis_with("[user]\ntoken: t\n");
        assert!(matches!(
            k.login_request().unwrap_err(),
            Error::MissingOption { .. }
        ));
    }

    #[test]
    fn test_kattis_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Kattis>();
    }

    #[test]
    fn test_concurrent_first_login_sends_once() {
        let (k, t) = kattis_with(ALICE);
        t.reply_with(200, &[("EduSiteCookie", "abc")]);

        let k = &k;
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(move || k.cookies())).collect();
            for h in handles {
                let cookies = h.join().unwrap().unwrap();
                assert_eq!(cookies.get("EduSiteCookie").map(String::as_str), Some("abc"));
            }
        });
        assert_eq!(t.calls(), 1);
        assert!(k.is_logged_in());
    }

    #[test]
    fn test_login_success() {
        let (k, t) = kattis_with(ALICE);
        t.reply_with(200, &[("EduSiteCookie", "abc")]);
        assert!(!k.is_logged_in());

        let resp = k.login(true).unwrap();
        assert_eq!(resp.status, StatusCode::OK);
        assert!(k.is_logged_in());

        // Cached: no second login.
        let again = k.login(true).unwrap();
        assert!(Arc::ptr_eq(&resp, &again));
        assert_eq!(t.calls(), 1);

        k.login(false).unwrap();
        assert_eq!(t.calls(), 2);
    }

    #[test]
    fn test_login_status_codes() {
        let (k, t) = kattis_with(ALICE);
        t.reply(403);
        match k.login(true).unwrap_err() {
            Error::Authentication { username } => assert_eq!(username, "alice"),
            other => panic!("unexpected error {}", other),
        }

        t.reply(404);
        match k.login(false).unwrap_err() {
            Error::Endpoint { url } => assert_eq!(url, "https://open.kattis.com/login"),
            other => panic!("unexpected error {}", other),
        }

        t.reply(500);
        match k.login(false).unwrap_err() {
            Error::Login { status, .. } => assert_eq!(status.as_u16(), 500),
            other => panic!("unexpected error {}", other),
        }

        t.reply(200);
        k.login(false).unwrap();
        assert!(k.is_logged_in());
        assert_eq!(t.calls(), 4);
    }

    #[test]
    fn test_failed_status_is_not_a_session() {
        let (k, t) = kattis_with(ALICE);
        t.reply(403);
        assert!(k.login(true).is_err());
        assert!(!k.is_logged_in());

        t.reply(200);
        k.login(true).unwrap();
        assert!(k.is_logged_in());
        assert_eq!(t.calls(), 2);
    }

    #[test]
    fn test_transport_failure_leaves_session_logged_out() {
        let (k, t) = kattis_with(ALICE);
        t.fail("dns failure");
        assert!(matches!(k.login(true).unwrap_err(), Error::Transport { .. }));
        assert!(!k.is_logged_in());

        k.login(true).unwrap();
        assert!(k.is_logged_in());
        assert_eq!(t.calls(), 2);
    }

    #[test]
    fn test_logout_clears_state() {
        let (k, t) = kattis_with(ALICE);
        t.reply_with(200, &[("EduSiteCookie", "one")]);
        k.login(true).unwrap();
        assert!(k.is_logged_in());

        k.logout().unwrap();
        assert!(!k.is_logged_in());
        assert_eq!(t.calls(), 1);

        t.reply_with(200, &[("EduSiteCookie", "two")]);
        let cookies = k.cookies().unwrap();
        assert_eq!(cookies.get("EduSiteCookie").map(String::as_str), Some("two"));
        assert_eq!(t.calls(), 2);

        k.cookies().unwrap();
        assert_eq!(t.calls(), 2);
    }

    #[test]
    fn test_get_carries_session_cookies() {
        let (k, t) = kattis_with(ALICE);
        t.reply_with(200, &[("EduSiteCookie", "abc")]);

        let url = k.problems_url(None);
        let a = k.get(&url, None, None, true).unwrap();
        let b = k.get(&url, None, None, true).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        // One login, one GET.
        assert_eq!(t.calls(), 2);

        let reqs = t.requests();
        assert_eq!(reqs[1].method, Method::GET);
        assert_eq!(reqs[1].url, "https://open.kattis.com/problems");
        assert_eq!(reqs[1].cookies.get("EduSiteCookie").map(String::as_str), Some("abc"));
        assert!(reqs[1].data.is_empty() && reqs[1].params.is_empty());

        k.get(&url, None, None, false).unwrap();
        assert_eq!(t.calls(), 3);
    }

    #[test]
    fn test_new_session_cookies_give_new_cache_key() {
        let (k, t) = kattis_with(ALICE);
        t.reply_with(200, &[("EduSiteCookie", "one")]);
        let url = k.contests_url();
        k.get(&url, None, None, true).unwrap();

        k.logout().unwrap();
        t.reply_with(200, &[("EduSiteCookie", "two")]);
        k.get(&url, None, None, true).unwrap();

        // login, get, login, get
        assert_eq!(t.calls(), 4);
        assert_eq!(k.cache().len(), 3);
    }

    #[test]
    fn test_post_with_params() {
        let (k, t) = kattis_with(ALICE);
        let mut params = Fields::new();
        params.insert(String::from("q"), String::from("hello"));
        let url = k.search_url();
        k.post(&url, None, Some(params), true).unwrap();

        let reqs = t.requests();
        assert_eq!(reqs[1].method, Method::POST);
        assert_eq!(reqs[1].params.get("q").map(String::as_str), Some("hello"));
    }

    #[test]
    fn test_cache_is_lazily_created() {
        let (k, _) = kattis_with(ALICE);
        assert!(k.cache.get().is_none());
        assert!(!k.is_logged_in());
        assert!(k.cache.get().is_some());
    }
}
