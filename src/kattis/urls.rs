// URLs of everything on the site.  A configured override key always wins
// over the `https://{hostname}/{suffix}` default; contest-scoped pages hang
// off the contest's own URL instead.

use super::Kattis;
use crate::config::{DEFAULT_HOSTNAME, HOSTNAME, SITE};
use crate::error::Result;

impl Kattis {
    pub fn hostname(&self) -> &str {
        self.config.get_or(SITE, HOSTNAME, DEFAULT_HOSTNAME)
    }

    /// Resolve `option` in `section`, falling back to
    /// `https://{hostname}/{default}`.
    pub fn url_in(
        &self,
        option: &str,
        default: &str,
        section: &str,
        hostname: Option<&str>,
    ) -> String {
        if let Some(u) = self.config.get(section, option) {
            return u.to_string();
        }
        let hostname = hostname.unwrap_or_else(|| self.hostname());
        format!("https://{}/{}", hostname, default)
    }

    pub fn url(&self, option: &str, default: &str) -> String {
        self.url_in(option, default, SITE, None)
    }

    pub fn login_url(&self) -> String {
        self.url("loginurl", "login")
    }

    pub fn logout_url(&self) -> String {
        self.url("logouturl", "logout")
    }

    pub fn submit_url(&self, contest: Option<&str>) -> String {
        match contest {
            None => self.url("submissionurl", "submit"),
            Some(c) => format!("{}/submit", self.contest_url(c)),
        }
    }

    pub fn submissions_url(&self, contest: Option<&str>) -> String {
        match contest {
            None => self.url("submissionsurl", "submissions"),
            Some(c) => format!("{}/submissions", self.contest_url(c)),
        }
    }

    pub fn problems_url(&self, contest: Option<&str>) -> String {
        match contest {
            None => self.url("problemsurl", "problems"),
            Some(c) => format!("{}/problems", self.contest_url(c)),
        }
    }

    pub fn contests_url(&self) -> String {
        self.url("contestsurl", "contests")
    }

    pub fn past_contests_url(&self) -> String {
        self.url("pastcontestsurl", "past-contests")
    }

    pub fn challenge_url(&self) -> String {
        self.url("challengeurl", "challenge")
    }

    pub fn users_url(&self) -> String {
        self.url("usersurl", "users")
    }

    pub fn ranklist_url(&self) -> String {
        self.url("ranklisturl", "ranklist")
    }

    pub fn affiliations_url(&self) -> String {
        self.url("affiliationsurl", "affiliations")
    }

    pub fn countries_url(&self) -> String {
        self.url("countriesurl", "countries")
    }

    pub fn authors_url(&self) -> String {
        self.url("authorsurl", "problem-authors")
    }

    pub fn sources_url(&self) -> String {
        self.url("sourcesurl", "problem-sources")
    }

    pub fn jobs_url(&self) -> String {
        self.url("jobsurl", "jobs")
    }

    pub fn relay_url(&self) -> String {
        self.url("relayurl", "relay")
    }

    pub fn languages_url(&self) -> String {
        self.url("languagesurl", "languages")
    }

    pub fn info_url(&self) -> String {
        self.url("infourl", "info")
    }

    pub fn policies_url(&self) -> String {
        self.url("policiesurl", "policies")
    }

    pub fn search_url(&self) -> String {
        self.url("searchurl", "search")
    }

    pub fn support_url(&self) -> String {
        self.url("supporturl", "supporter")
    }

    pub fn request_affiliation_url(&self) -> String {
        self.url("requestaffiliationurl", "request-affiliation")
    }

    pub fn submission_url(&self, submission: &str, contest: Option<&str>) -> String {
        format!("{}/{}", self.submissions_url(contest), submission)
    }

    pub fn problem_url(&self, problem: &str, contest: Option<&str>) -> String {
        format!("{}/{}", self.problems_url(contest), problem)
    }

    pub fn problem_statistics_url(&self, problem: &str, contest: Option<&str>) -> String {
        format!("{}/statistics", self.problem_url(problem, contest))
    }

    pub fn contest_url(&self, contest: &str) -> String {
        format!("{}/{}", self.contests_url(), contest)
    }

    /// Page of `user`, or of the configured user if `None`.
    pub fn user_url(&self, user: Option<&str>) -> Result<String> {
        let user = match user {
            Some(u) => u,
            None => self.username()?,
        };
        Ok(format!("{}/{}", self.users_url(), user))
    }
}
