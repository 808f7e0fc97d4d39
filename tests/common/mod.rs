use listboard::configuration::{get_configuration, StoreBackend};
use listboard::db::{MemoryStore, Store};
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub store: Arc<dyn Store>,
    pub session_cookie: String,
    /// Keeps cookies between requests and never follows redirects.
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post_form(
            "/register",
            &[
                ("username", username),
                ("email", email),
                ("password", password),
                ("confirm_password", password),
                ("submit", "Sign Up"),
            ],
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_form(
            "/login",
            &[
                ("username", username),
                ("password", password),
                ("submit", "Login"),
            ],
        )
        .await
    }

    pub async fn logout(&self) -> reqwest::Response {
        self.get("/logout").await
    }
}

pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("response has no Location header")
        .to_str()
        .unwrap()
}

pub async fn spawn_app() -> TestApp {
    let mut configuration = get_configuration().expect("Failed to get configuration");
    configuration.store = StoreBackend::Memory;
    configuration.password_hash_cost = 4;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let session_cookie = configuration.session.cookie_name.clone();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let server = listboard::startup::run(listener, store.clone(), configuration)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        store,
        session_cookie,
        client,
    }
}
