use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;
use validator::ValidateEmail;

/// Personal mail providers guests are expected to use
pub const COMMON_DOMAINS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "outlook.com",
    "outlook.it",
    "hotmail.com",
    "hotmail.it",
    "live.com",
    "live.it",
    "msn.com",
    "yahoo.com",
    "yahoo.it",
    "ymail.com",
    "icloud.com",
    "me.com",
    "mac.com",
    "proton.me",
    "protonmail.com",
    "libero.it",
    "inwind.it",
    "iol.it",
    "blu.it",
    "virgilio.it",
    "alice.it",
    "tim.it",
    "tin.it",
    "tiscali.it",
    "fastwebnet.it",
    "poste.it",
    "vodafone.it",
    "email.it",
    "albmail.com",
    "abissnet.al",
    "tring.al",
    "corp.albtelecom.al",
];

static DEFAULT_ALLOW_LIST: Lazy<Arc<HashSet<String>>> =
    Lazy::new(|| Arc::new(COMMON_DOMAINS.iter().map(|d| d.to_string()).collect()));

/// Shared handle to the built-in allow-list
pub fn default_allow_list() -> Arc<HashSet<String>> {
    Arc::clone(&DEFAULT_ALLOW_LIST)
}

/// Lowercased domain part of an address, if it has one
pub fn email_domain(email: &str) -> Option<String> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    let domain = domain.trim().to_lowercase();
    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

pub fn is_email_syntax_valid(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

pub fn is_email_allowed(email: &str, allowed: &HashSet<String>) -> bool {
    match email_domain(email) {
        Some(domain) => allowed.contains(&domain),
        None => false,
    }
}
