use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::Kattis;
use crate::error::{Error, Result};

// Identity is the identifier alone; the session reference is only used to
// derive URLs.
macro_rules! entity {
    ($name:ident, $kind:literal) => {
        #[derive(Clone)]
        pub struct $name<'k> {
            kattis: &'k Kattis,
            id: String,
        }

        impl<'k> $name<'k> {
            pub(super) fn new<S: ToString>(kattis: &'k Kattis, id: S) -> Self {
                $name {
                    kattis,
                    id: id.to_string(),
                }
            }

            pub fn id(&self) -> &str {
                &self.id
            }

            pub const KIND: &'static str = $kind;
        }

        impl fmt::Display for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.id)
            }
        }

        impl fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.id)
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $name<'_> {}

        impl Hash for $name<'_> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state)
            }
        }

        impl PartialOrd for $name<'_> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name<'_> {
            fn cmp(&self, other: &Self) -> Ordering {
                self.id.cmp(&other.id)
            }
        }

        impl<'k> From<$name<'k>> for Entity<'k> {
            fn from(e: $name<'k>) -> Self {
                Entity::$name(e)
            }
        }
    };
}

entity!(User, "user");
entity!(Problem, "problem");
entity!(Contest, "contest");
entity!(Submission, "submission");

impl User<'_> {
    pub fn url(&self) -> String {
        // Never fails: the user is given.
        format!("{}/{}", self.kattis.users_url(), self.id)
    }
}

impl Problem<'_> {
    pub fn url(&self, contest: Option<&str>) -> String {
        self.kattis.problem_url(&self.id, contest)
    }

    pub fn statistics_url(&self, contest: Option<&str>) -> String {
        self.kattis.problem_statistics_url(&self.id, contest)
    }
}

impl Contest<'_> {
    pub fn url(&self) -> String {
        self.kattis.contest_url(&self.id)
    }

    pub fn problems_url(&self) -> String {
        self.kattis.problems_url(Some(&self.id))
    }

    pub fn submissions_url(&self) -> String {
        self.kattis.submissions_url(Some(&self.id))
    }

    pub fn submit_url(&self) -> String {
        self.kattis.submit_url(Some(&self.id))
    }
}

impl Submission<'_> {
    pub fn url(&self, contest: Option<&str>) -> String {
        self.kattis.submission_url(&self.id, contest)
    }
}

/// Any entity, for mixing kinds in one collection.
///
/// Entities of different kinds are never equal and have no order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Entity<'k> {
    User(User<'k>),
    Problem(Problem<'k>),
    Contest(Contest<'k>),
    Submission(Submission<'k>),
}

impl<'k> Entity<'k> {
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::User(_) => User::KIND,
            Entity::Problem(_) => Problem::KIND,
            Entity::Contest(_) => Contest::KIND,
            Entity::Submission(_) => Submission::KIND,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::User(e) => e.id(),
            Entity::Problem(e) => e.id(),
            Entity::Contest(e) => e.id(),
            Entity::Submission(e) => e.id(),
        }
    }

    /// Order two entities of the same kind by identifier.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        if self.kind() != other.kind() {
            return Err(Error::EntityKindMismatch {
                left: self.kind(),
                right: other.kind(),
            });
        }
        Ok(self.id().cmp(other.id()))
    }
}

impl fmt::Display for Entity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl PartialOrd for Entity<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}
