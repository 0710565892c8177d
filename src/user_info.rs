use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::utils::SUPPORTED_SITES;

static PROFILE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/users/(\d+)/.*").expect("profile path pattern"));
static ACCOUNT_INFO_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)users/account-info/(\d+)").expect("account-info pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(UserId)
    }
}

/// Pulls a user id out of `/users/{id}/...` or `/users/account-info/{id}`.
pub fn user_id_from_href(href: &str) -> Option<UserId> {
    let captures = PROFILE_PATH
        .captures(href)
        .or_else(|| ACCOUNT_INFO_PATH.captures(href))?;
    captures.get(1)?.as_str().parse().ok()
}

pub fn profile_path(user_id: UserId) -> String {
    format!("/users/{}", user_id)
}

pub fn message_compose_path(user_id: UserId) -> String {
    format!("/users/message/create/{}", user_id)
}

/// True for `*://*{site}/users/account-info/*` on one of the supported sites.
pub fn is_supported_page(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    SUPPORTED_SITES.iter().any(|site| host.ends_with(site))
        && url.path().starts_with("/users/account-info/")
}
