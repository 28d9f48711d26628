//! Startup authentication through the real web adapter against a local server

#[cfg(test)]
mod tests {
    use crate::auth::{Authenticator, LoginCredentials, LoginSource, SessionBundle, SessionStore};
    use crate::client::endpoints::Endpoints;
    use crate::client::WebConnector;
    use mockito::Matcher;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn connector(server: &mockito::ServerGuard) -> Box<WebConnector> {
        Box::new(WebConnector::new("test-agent", "en").with_endpoints(Endpoints {
            api_base: server.url(),
            caps_base: server.url(),
        }))
    }

    async fn settings_mock(server: &mut mockito::ServerGuard, token: &str, hits: usize) -> mockito::Mock {
        server
            .mock("GET", "/1.1/account/settings.json")
            .match_header("cookie", Matcher::Regex(format!("auth_token={}", token)))
            .with_status(200)
            .with_body(r#"{"screen_name":"alice"}"#)
            .expect(hits)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn saved_session_starts_without_login() {
        let mut server = mockito::Server::new_async().await;
        let probe = settings_mock(&mut server, "saved", 1).await;

        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let mut bundle = SessionBundle::new(LoginCredentials::from_tokens("saved", "csrf").cookies, BTreeMap::new());
        bundle.account = Some("alice".into());
        store.save(&bundle).unwrap();

        let auth = Authenticator::new(SessionStore::new(dir.path()), connector(&server), 3);
        // no configured cookies and no prompt: any login attempt would fail
        let mut source = LoginSource::new(None, false);
        let session = auth.ensure_session(&mut source).await.unwrap();

        assert_eq!(session.account(), "alice");
        assert_eq!(session.bundle, bundle);
        probe.assert_async().await;
    }

    #[tokio::test]
    async fn corrupt_session_logs_in_with_configured_cookies() {
        let mut server = mockito::Server::new_async().await;
        let probe = settings_mock(&mut server, "fresh", 1).await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("session.json"), r#"{"cookies": {"auth_token": "x"}}"#).unwrap();

        let auth = Authenticator::new(SessionStore::new(dir.path()), connector(&server), 3);
        let configured = LoginCredentials::from_cookie_header("auth_token=fresh; ct0=csrf; twid=u%3D42");
        let mut source = LoginSource::new(Some(configured), false);
        let session = auth.ensure_session(&mut source).await.unwrap();

        let reloaded = SessionStore::new(dir.path()).load().unwrap();
        assert_eq!(reloaded, session.bundle);
        assert_eq!(reloaded.account.as_deref(), Some("alice"));
        assert_eq!(reloaded.viewer_id().as_deref(), Some("42"));
        probe.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_cookies_fail_startup() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/1.1/account/settings.json")
            .with_status(401)
            .with_body(r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let auth = Authenticator::new(SessionStore::new(dir.path()), connector(&server), 3);
        let mut source = LoginSource::new(Some(LoginCredentials::from_tokens("bad", "csrf")), false);

        let err = auth.ensure_session(&mut source).await.err().unwrap();
        assert_eq!(err.kind(), "AuthenticationFailure");
        assert!(err.to_string().contains("Could not authenticate you."));
        assert!(SessionStore::new(dir.path()).load().is_none());
    }

    #[tokio::test]
    async fn unavailable_platform_keeps_saved_session() {
        let mut server = mockito::Server::new_async().await;
        let probe = server
            .mock("GET", "/1.1/account/settings.json")
            .with_status(503)
            .with_body("Service Unavailable")
            .expect(1)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path());
        let bundle = SessionBundle::new(LoginCredentials::from_tokens("saved", "csrf").cookies, BTreeMap::new());
        store.save(&bundle).unwrap();

        let auth = Authenticator::new(SessionStore::new(dir.path()), connector(&server), 3);
        let mut source = LoginSource::new(None, false);
        let err = auth.ensure_session(&mut source).await.err().unwrap();

        assert_eq!(err.kind(), "RemoteOperationFailure");
        assert!(store.bundle_path().exists());
        assert_eq!(store.load().unwrap(), bundle);
        probe.assert_async().await;
    }
}
