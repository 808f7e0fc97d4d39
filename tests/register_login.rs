mod common;

use common::location;

#[tokio::test]
async fn register_then_login_lands_on_account_page() {
    let app = common::spawn_app().await;

    let response = app.register("test", "test@email.com", "test").await;
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/login");

    let response = app.login("test", "test").await;
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/account/test");

    let page = app.get("/account/test").await;
    assert_eq!(page.status().as_u16(), 200);
    let body = page.text().await.unwrap();
    assert!(body.contains("test@email.com"));
    assert!(body.contains("Logout"));
}

#[tokio::test]
async fn second_registration_with_same_username_is_rejected() {
    let app = common::spawn_app().await;
    app.register("test", "test@email.com", "test").await;

    let response = app.register("test", "other@email.com", "test").await;
    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Username is taken"));

    let users = app.store.list_users().await.unwrap();
    assert_eq!(users.iter().filter(|u| u.username == "test").count(), 1);
}

#[tokio::test]
async fn registration_username_length() {
    let app = common::spawn_app().await;

    let response = app.register("", "a@email.com", "pw").await;
    assert!(response.text().await.unwrap().contains("This field is required."));

    let response = app.register(&"p".repeat(41), "b@email.com", "pw").await;
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Field must be between 1 and 40 characters long."));

    let response = app.register(&"p".repeat(40), "c@email.com", "pw").await;
    assert_eq!(response.status().as_u16(), 302);

    let response = app.register("p", "d@email.com", "pw").await;
    assert_eq!(response.status().as_u16(), 302);

    assert_eq!(app.store.list_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn mismatched_confirmation_creates_nothing() {
    let app = common::spawn_app().await;

    let response = app
        .post_form(
            "/register",
            &[
                ("username", "test"),
                ("email", "test@email.com"),
                ("password", "test"),
                ("confirm_password", "test2"),
            ],
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Field must be equal to password."));
    assert!(app.store.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_flashes_and_binds_no_session() {
    let app = common::spawn_app().await;
    app.register("test", "test@email.com", "test").await;

    let response = app.login("test", "wrong").await;
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/login");
    assert!(response.cookies().all(|c| c.name() != app.session_cookie));

    let page = app.get("/login").await;
    let body = page.text().await.unwrap();
    assert!(body.contains("Login failed. Check your username and/or password"));

    // shown once
    let body = app.get("/login").await.text().await.unwrap();
    assert!(!body.contains("Login failed"));

    let response = app.get("/account").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn unknown_user_cannot_log_in() {
    let app = common::spawn_app().await;

    let response = app.login("ghost", "boo").await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn authenticated_users_are_sent_home_from_login_and_register() {
    let app = common::spawn_app().await;
    app.register("test", "test@email.com", "test").await;
    app.login("test", "test").await;

    assert_eq!(location(&app.get("/login").await), "/");
    assert_eq!(location(&app.get("/register").await), "/");
    let response = app.register("other", "other@email.com", "pw").await;
    assert_eq!(location(&response), "/");
    assert_eq!(app.store.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = common::spawn_app().await;
    app.register("test", "test@email.com", "test").await;
    app.login("test", "test").await;

    let response = app.logout().await;
    assert_eq!(location(&response), "/");

    let response = app.get("/account/test").await;
    assert_eq!(response.status().as_u16(), 302);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn forged_session_cookie_is_ignored() {
    let app = common::spawn_app().await;
    app.register("test", "test@email.com", "test").await;

    let response = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
        .get(app.url("/account"))
        .header(
            reqwest::header::COOKIE,
            format!("{}=test.AAAA", app.session_cookie),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn index_lists_members() {
    let app = common::spawn_app().await;
    app.register("alice", "alice@email.com", "pw").await;
    app.register("bob", "bob@email.com", "pw").await;

    let body = app.get("/").await.text().await.unwrap();
    assert!(body.contains("/user/alice"));
    assert!(body.contains("/user/bob"));

    let response = app.post_form("/", &[]).await;
    assert_eq!(response.status().as_u16(), 200);
}
