//! Route-level authorization table.
//!
//! Rules are evaluated top to bottom and the first rule whose verb and path
//! pattern match decides the required access. Patterns use Ant syntax: `*`
//! matches exactly one path segment, `**` matches any number of segments
//! (including none). Anything unmatched requires an authenticated caller.

use axum::http::Method;

use crate::database::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    AnyRole(&'static [Role]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// No usable credentials (401).
    Unauthenticated,
    /// Authenticated, wrong role (403).
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

struct Rule {
    /// Empty means every verb.
    verbs: &'static [Verb],
    pattern: &'static str,
    access: Access,
}

const ANY: &[Verb] = &[];
const GET: &[Verb] = &[Verb::Get];
const POST: &[Verb] = &[Verb::Post];
const PUT: &[Verb] = &[Verb::Put];
const DELETE: &[Verb] = &[Verb::Delete];
const WRITE: &[Verb] = &[Verb::Put, Verb::Patch, Verb::Delete];
const READ_WRITE: &[Verb] = &[Verb::Get, Verb::Put, Verb::Patch, Verb::Delete];

const STAFF: &[Role] = &[Role::FoundationAdmin, Role::SuperAdmin];
const ADMIN: &[Role] = &[Role::SuperAdmin];

const fn rule(verbs: &'static [Verb], pattern: &'static str, access: Access) -> Rule {
    Rule { verbs, pattern, access }
}

static RULES: &[Rule] = &[
    // Anonymous
    rule(ANY, "/api/v1/auth/**", Access::Public),
    rule(ANY, "/api/v1/public/**", Access::Public),
    rule(GET, "/api/v1/pets/**", Access::Public),
    rule(GET, "/api/v1/foundations/**", Access::Public),
    rule(GET, "/api/v1/pet-images/**", Access::Public),
    rule(POST, "/api/v1/contact-messages", Access::Public),
    rule(POST, "/api/v1/users/register", Access::Public),
    rule(ANY, "/v3/api-docs/**", Access::Public),
    rule(ANY, "/swagger-ui/**", Access::Public),
    rule(ANY, "/swagger-ui.html", Access::Public),
    rule(ANY, "/", Access::Public),
    rule(ANY, "/actuator/health", Access::Public),
    rule(ANY, "/actuator/info", Access::Public),
    // Any signed-in account
    rule(READ_WRITE, "/api/v1/users/profile/**", Access::Authenticated),
    rule(POST, "/api/v1/adoption-requests", Access::Authenticated),
    rule(GET, "/api/v1/adoption-requests/user/**", Access::Authenticated),
    rule(PUT, "/api/v1/adoption-requests/*/cancel", Access::Authenticated),
    // Foundation staff
    rule(POST, "/api/v1/foundations", Access::AnyRole(STAFF)),
    rule(WRITE, "/api/v1/foundations/**", Access::AnyRole(STAFF)),
    rule(POST, "/api/v1/pets", Access::AnyRole(STAFF)),
    rule(WRITE, "/api/v1/pets/**", Access::AnyRole(STAFF)),
    rule(POST, "/api/v1/pet-images", Access::AnyRole(STAFF)),
    rule(WRITE, "/api/v1/pet-images/**", Access::AnyRole(STAFF)),
    rule(PUT, "/api/v1/adoption-requests/*/approve", Access::AnyRole(STAFF)),
    rule(PUT, "/api/v1/adoption-requests/*/reject", Access::AnyRole(STAFF)),
    rule(PUT, "/api/v1/adoption-requests/*/status", Access::AnyRole(STAFF)),
    rule(GET, "/api/v1/adoption-requests/pet/**", Access::AnyRole(STAFF)),
    rule(DELETE, "/api/v1/adoption-requests/**", Access::AnyRole(STAFF)),
    rule(READ_WRITE, "/api/v1/contact-messages/**", Access::AnyRole(STAFF)),
    // Platform administrators
    rule(POST, "/api/v1/users", Access::AnyRole(ADMIN)),
    rule(READ_WRITE, "/api/v1/users/**", Access::AnyRole(ADMIN)),
    rule(ANY, "/api/v1/admin/**", Access::AnyRole(ADMIN)),
];

/// Access level required for `method` on `path`.
pub fn required_access(method: &Method, path: &str) -> Access {
    if method == Method::OPTIONS {
        return Access::Public;
    }

    let verb = verb_of(method);
    RULES
        .iter()
        .find(|rule| {
            let verb_ok = rule.verbs.is_empty() || verb.map_or(false, |v| rule.verbs.contains(&v));
            verb_ok && path_matches(rule.pattern, path)
        })
        .map(|rule| rule.access)
        .unwrap_or(Access::Authenticated)
}

/// Decide a request given the caller's role (`None` for anonymous).
pub fn decide(access: Access, role: Option<Role>) -> Decision {
    match (access, role) {
        (Access::Public, _) => Decision::Allow,
        (_, None) => Decision::Unauthenticated,
        (Access::Authenticated, Some(_)) => Decision::Allow,
        (Access::AnyRole(roles), Some(role)) if roles.contains(&role) => Decision::Allow,
        (Access::AnyRole(_), Some(_)) => Decision::Forbidden,
    }
}

fn verb_of(method: &Method) -> Option<Verb> {
    // HEAD is an existence probe and is treated as a read.
    if method == Method::GET || method == Method::HEAD {
        Some(Verb::Get)
    } else if method == Method::POST {
        Some(Verb::Post)
    } else if method == Method::PUT {
        Some(Verb::Put)
    } else if method == Method::PATCH {
        Some(Verb::Patch)
    } else if method == Method::DELETE {
        Some(Verb::Delete)
    } else {
        None
    }
}

/// Ant-style path match.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = segments(pattern);
    let path: Vec<&str> = segments(path);
    match_segments(&pattern, &path)
}

fn segments(s: &str) -> Vec<&str> {
    s.split('/').filter(|seg| !seg.is_empty()).collect()
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|skip| match_segments(rest, &path[skip..])),
        Some((&"*", rest)) => !path.is_empty() && match_segments(rest, &path[1..]),
        Some((segment, rest)) => path.first() == Some(segment) && match_segments(rest, &path[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ant_patterns() {
        assert!(path_matches("/api/v1/pets/**", "/api/v1/pets"));
        assert!(path_matches("/api/v1/pets/**", "/api/v1/pets/123/images"));
        assert!(path_matches("/api/v1/adoption-requests/*/cancel", "/api/v1/adoption-requests/abc/cancel"));
        assert!(!path_matches("/api/v1/adoption-requests/*/cancel", "/api/v1/adoption-requests/cancel"));
        assert!(!path_matches("/api/v1/adoption-requests/*/cancel", "/api/v1/adoption-requests/a/b/cancel"));
        assert!(path_matches("/", "/"));
        assert!(!path_matches("/", "/api"));
        assert!(path_matches("/api/v1/users/profile/**", "/api/v1/users/profile/"));
    }

    #[test]
    fn catalogue_reads_are_public_but_writes_need_staff() {
        assert_eq!(required_access(&Method::GET, "/api/v1/pets/available"), Access::Public);
        assert_eq!(required_access(&Method::HEAD, "/api/v1/pets/1"), Access::Public);
        assert_eq!(required_access(&Method::GET, "/api/v1/foundations"), Access::Public);
        assert_eq!(required_access(&Method::POST, "/api/v1/pets"), Access::AnyRole(STAFF));
        assert_eq!(required_access(&Method::PUT, "/api/v1/pets/1/adopt"), Access::AnyRole(STAFF));
        assert_eq!(required_access(&Method::DELETE, "/api/v1/pet-images/pet/1"), Access::AnyRole(STAFF));
    }

    #[test]
    fn adoption_request_rules() {
        let create = required_access(&Method::POST, "/api/v1/adoption-requests");
        assert_eq!(create, Access::Authenticated);
        assert_eq!(required_access(&Method::PUT, "/api/v1/adoption-requests/1/cancel"), Access::Authenticated);
        assert_eq!(required_access(&Method::GET, "/api/v1/adoption-requests/user/1"), Access::Authenticated);
        assert_eq!(required_access(&Method::PUT, "/api/v1/adoption-requests/1/approve"), Access::AnyRole(STAFF));
        assert_eq!(required_access(&Method::PUT, "/api/v1/adoption-requests/1/reject"), Access::AnyRole(STAFF));
        assert_eq!(required_access(&Method::GET, "/api/v1/adoption-requests/pet/1"), Access::AnyRole(STAFF));
        assert_eq!(required_access(&Method::DELETE, "/api/v1/adoption-requests/1"), Access::AnyRole(STAFF));
        // falls through to the default
        assert_eq!(required_access(&Method::GET, "/api/v1/adoption-requests/statistics"), Access::Authenticated);
    }

    #[test]
    fn user_administration_is_admin_only_except_profile_and_register() {
        assert_eq!(required_access(&Method::POST, "/api/v1/users/register"), Access::Public);
        assert_eq!(required_access(&Method::GET, "/api/v1/users/profile"), Access::Authenticated);
        assert_eq!(required_access(&Method::PUT, "/api/v1/users/profile/password"), Access::Authenticated);
        assert_eq!(required_access(&Method::GET, "/api/v1/users"), Access::AnyRole(ADMIN));
        assert_eq!(required_access(&Method::POST, "/api/v1/users"), Access::AnyRole(ADMIN));
        assert_eq!(required_access(&Method::DELETE, "/api/v1/users/1"), Access::AnyRole(ADMIN));
        assert_eq!(required_access(&Method::GET, "/api/v1/admin/anything"), Access::AnyRole(ADMIN));
    }

    #[test]
    fn contact_messages_are_write_only_for_the_public() {
        assert_eq!(required_access(&Method::POST, "/api/v1/contact-messages"), Access::Public);
        assert_eq!(required_access(&Method::GET, "/api/v1/contact-messages"), Access::AnyRole(STAFF));
        assert_eq!(required_access(&Method::PUT, "/api/v1/contact-messages/1/mark-read"), Access::AnyRole(STAFF));
    }

    #[test]
    fn operational_endpoints_are_public() {
        for path in ["/", "/actuator/health", "/actuator/info", "/v3/api-docs", "/swagger-ui", "/swagger-ui.html"] {
            assert_eq!(required_access(&Method::GET, path), Access::Public, "{}", path);
        }
        assert_eq!(required_access(&Method::GET, "/unknown"), Access::Authenticated);
        assert_eq!(required_access(&Method::OPTIONS, "/api/v1/users"), Access::Public);
    }

    #[test]
    fn decisions() {
        assert_eq!(decide(Access::Public, None), Decision::Allow);
        assert_eq!(decide(Access::Authenticated, None), Decision::Unauthenticated);
        assert_eq!(decide(Access::Authenticated, Some(Role::Visitor)), Decision::Allow);
        assert_eq!(decide(Access::AnyRole(STAFF), Some(Role::User)), Decision::Forbidden);
        assert_eq!(decide(Access::AnyRole(STAFF), Some(Role::FoundationAdmin)), Decision::Allow);
        assert_eq!(decide(Access::AnyRole(ADMIN), Some(Role::FoundationAdmin)), Decision::Forbidden);
        assert_eq!(decide(Access::AnyRole(ADMIN), None), Decision::Unauthenticated);
    }
}
