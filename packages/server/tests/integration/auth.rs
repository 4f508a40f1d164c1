use serde_json::json;

use crate::common::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn valid_credentials_go_to_dashboard() {
        let app = TestApp::spawn().await;

        let res = app
            .post_urlencoded(
                routes::LOGIN,
                &[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)],
            )
            .await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location(), routes::DASHBOARD);
        assert_eq!(res.flash().unwrap().success.as_deref(), Some("Welcome back."));
    }

    #[tokio::test]
    async fn email_match_ignores_case() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::LOGIN,
                &json!({ "email": "Admin@Example.COM", "password": ADMIN_PASSWORD }),
            )
            .await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location(), routes::DASHBOARD);
    }

    #[tokio::test]
    async fn wrong_password_returns_to_login() {
        let app = TestApp::spawn().await;

        let res = app
            .post_urlencoded(
                routes::LOGIN,
                &[("email", ADMIN_EMAIL), ("password", "wrong password")],
            )
            .await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location(), routes::LOGIN);
        assert_eq!(
            res.flash().unwrap().error.as_deref(),
            Some("These credentials do not match our records.")
        );
    }

    #[tokio::test]
    async fn unknown_email_gets_same_message() {
        let app = TestApp::spawn().await;

        let res = app
            .post_urlencoded(
                routes::LOGIN,
                &[("email", "someone@example.com"), ("password", ADMIN_PASSWORD)],
            )
            .await;

        assert_eq!(res.status, 303);
        assert_eq!(
            res.flash().unwrap().error.as_deref(),
            Some("These credentials do not match our records.")
        );
    }

    #[tokio::test]
    async fn missing_fields_are_reported() {
        let app = TestApp::spawn().await;

        let res = app.post_urlencoded(routes::LOGIN, &[("email", "")]).await;

        assert_eq!(res.status, 303);
        assert_eq!(res.location(), routes::LOGIN);
        assert_eq!(
            res.flash().unwrap().error.as_deref(),
            Some("The email field is required. (and 1 more error)")
        );
    }
}
