//! Route guard integration tests — redirect decisions against a live
//! resolver, including the wait-for-resolution behavior

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use biolab_auth::error::Result;
use biolab_auth::navigator::MemoryNavigator;
use biolab_auth::session::{
    AuthUser, MemoryProfileStore, MemorySessionSource, ProfileStore, Role, Session,
    SessionResolver,
};
use biolab_auth::{AuthConfig, GuardDecision, RouteGuard};

fn session_for(user_id: &str) -> Session {
    Session {
        access_token: format!("token-{user_id}"),
        expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
        user: AuthUser {
            id: user_id.to_string(),
            email: format!("{user_id}@biolab.kz"),
        },
    }
}

struct SlowProfiles {
    role: Role,
    delay: Duration,
}

#[async_trait]
impl ProfileStore for SlowProfiles {
    async fn role_for_user(&self, _user_id: &str) -> Result<Option<Role>> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(self.role))
    }
}

#[tokio::test]
async fn test_student_redirected_from_admin_page() {
    let source = Arc::new(MemorySessionSource::new());
    source.install_session(session_for("u-stud"));
    let profiles = Arc::new(MemoryProfileStore::new());
    profiles.upsert("u-stud", Role::Student);

    let handle = SessionResolver::spawn(
        source,
        profiles,
        Arc::new(MemoryNavigator::new("/admin")),
        AuthConfig::new(),
    );

    let guard = RouteGuard::admin_only("/labs");
    let decision = guard.resolve(&mut handle.state()).await;
    assert_eq!(decision, GuardDecision::Redirect("/labs".into()));
}

#[tokio::test]
async fn test_admin_allowed_on_admin_page() {
    let source = Arc::new(MemorySessionSource::new());
    source.install_session(session_for("u-adm"));
    let profiles = Arc::new(MemoryProfileStore::new());
    profiles.upsert("u-adm", Role::Admin);

    let handle = SessionResolver::spawn(
        source,
        profiles,
        Arc::new(MemoryNavigator::new("/admin")),
        AuthConfig::new(),
    );

    let guard = RouteGuard::admin_only("/labs");
    let decision = guard.resolve(&mut handle.state()).await;
    assert_eq!(decision, GuardDecision::Allow);
}

#[tokio::test]
async fn test_guard_waits_for_role_resolution() {
    // The lookup takes a while; the guard must stay pending through it
    // rather than letting the student glimpse the admin page.
    let source = Arc::new(MemorySessionSource::new());
    source.install_session(session_for("u-slow"));
    let profiles = Arc::new(SlowProfiles {
        role: Role::Student,
        delay: Duration::from_millis(100),
    });

    let handle = SessionResolver::spawn(
        source,
        profiles,
        Arc::new(MemoryNavigator::new("/admin")),
        AuthConfig::new(),
    );

    let guard = RouteGuard::admin_only("/labs");
    assert_eq!(guard.evaluate(&handle.current()), GuardDecision::Pending);

    let decision = guard.resolve(&mut handle.state()).await;
    assert_eq!(decision, GuardDecision::Redirect("/labs".into()));
}

#[tokio::test]
async fn test_unauthenticated_visitor_not_redirected() {
    // No session at all: the guard leaves the sign-in handling to the
    // page; only a resolved foreign role redirects.
    let source = Arc::new(MemorySessionSource::new());
    let profiles = Arc::new(MemoryProfileStore::new());

    let handle = SessionResolver::spawn(
        source,
        profiles,
        Arc::new(MemoryNavigator::new("/admin")),
        AuthConfig::new(),
    );

    let guard = RouteGuard::admin_only("/labs");
    let decision = guard.resolve(&mut handle.state()).await;
    assert_eq!(decision, GuardDecision::Allow);
}

#[tokio::test]
async fn test_guard_reevaluates_on_role_change() {
    // Admin page stays allowed for the admin, then a different account
    // signs in and the same guard flips to redirect.
    let source = Arc::new(MemorySessionSource::new());
    let profiles = Arc::new(MemoryProfileStore::new());
    profiles.upsert("u-adm", Role::Admin);
    profiles.upsert("u-stud", Role::Student);

    let handle = SessionResolver::spawn(
        source.clone(),
        profiles,
        Arc::new(MemoryNavigator::new("/admin")),
        AuthConfig::new(),
    );
    let guard = RouteGuard::admin_only("/labs");

    source.install_session(session_for("u-adm"));
    let mut state = handle.state();
    assert_eq!(guard.resolve(&mut state).await, GuardDecision::Allow);

    source.install_session(session_for("u-stud"));
    loop {
        let snapshot = {
            let st = state.borrow_and_update();
            st.clone()
        };
        if snapshot.role == Some(Role::Student) {
            assert_eq!(
                guard.evaluate(&snapshot),
                GuardDecision::Redirect("/labs".into())
            );
            break;
        }
        state.changed().await.unwrap();
    }
}
