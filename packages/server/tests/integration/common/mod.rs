use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use ::common::storage::filesystem::LocalFileStore;
use reqwest::header::{self, HeaderMap};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, redirect};
use sea_orm::DbErr;
use serde_json::Value;
use tempfile::TempDir;

use storeadmin::config::{
    AppConfig, AuthConfig, DatabaseConfig, ServerConfig, StorageConfig, ViewsConfig,
};
use storeadmin::entity::brand;
use storeadmin::flash::{FLASH_COOKIE, Flash};
use storeadmin::repository::{BrandFields, BrandRepository, SeaOrmBrandRepository};
use storeadmin::state::AppState;
use storeadmin::utils::hash::hash_password;
use storeadmin::views::Views;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery";
pub const ASSET_VERSION: &str = "test-assets";

/// A minimal valid PNG header followed by padding.
pub fn png_bytes(size: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
    bytes.resize(size.max(bytes.len()), 0);
    bytes
}

pub fn gif_bytes() -> Vec<u8> {
    b"GIF89a\x01\0\x01\0\x80\0\0".to_vec()
}

pub mod routes {
    pub const HOME: &str = "/";
    pub const DASHBOARD: &str = "/dashboard";
    pub const LOGIN: &str = "/login";
    pub const BRANDS: &str = "/brands";
    pub const BRANDS_CREATE: &str = "/brands/create";

    pub fn brand(id: i32) -> String {
        format!("/brands/{id}")
    }

    pub fn brand_edit(id: i32) -> String {
        format!("/brands/{id}/edit")
    }
}

/// Fields of a brand form submission.
#[derive(Default)]
pub struct BrandForm<'a> {
    pub name: Option<&'a str>,
    pub image: Option<(&'a str, Vec<u8>)>,
    pub referer: Option<&'a str>,
}

/// Repository that reads through to a real one but refuses every write.
pub struct FailingWrites(pub Arc<dyn BrandRepository>);

#[async_trait]
impl BrandRepository for FailingWrites {
    async fn find_all(&self) -> Result<Vec<brand::Model>, DbErr> {
        self.0.find_all().await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<brand::Model>, DbErr> {
        self.0.find_by_id(id).await
    }

    async fn count(&self) -> Result<u64, DbErr> {
        self.0.count().await
    }

    async fn create(&self, _fields: BrandFields) -> Result<brand::Model, DbErr> {
        Err(DbErr::Custom("database is locked (code 5)".into()))
    }

    async fn update(&self, _id: i32, _fields: BrandFields) -> Result<brand::Model, DbErr> {
        Err(DbErr::Custom("database is locked (code 5)".into()))
    }

    async fn delete(&self, _id: i32) -> Result<bool, DbErr> {
        Err(DbErr::Custom("database is locked (code 5)".into()))
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    /// The repository underneath any failure injection, for direct assertions.
    pub brands: Arc<dyn BrandRepository>,
    pub file_store: Arc<LocalFileStore>,
    _storage_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            headers,
            text,
            body,
        }
    }

    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .expect("Response has no Location header")
            .to_str()
            .unwrap()
    }

    /// Raw `name=value` of the flash cookie set by this response, if any.
    pub fn flash_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{FLASH_COOKIE}=")))
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }

    /// The flash this response carries to the next page.
    pub fn flash(&self) -> Option<Flash> {
        let cookie = self.flash_cookie()?;
        let value = cookie.split_once('=')?.1;
        let bytes = hex::decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|repo| repo).await
    }

    /// Spawn with the brand repository wrapped by `wrap`.
    pub async fn spawn_with(
        wrap: impl FnOnce(Arc<dyn BrandRepository>) -> Arc<dyn BrandRepository>,
    ) -> Self {
        let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            storage: StorageConfig {
                root: storage_dir.path().join("public"),
                url_prefix: "/storage".to_string(),
                max_file_size: 8 * 1024 * 1024,
            },
            auth: AuthConfig {
                admin_email: ADMIN_EMAIL.to_string(),
                admin_password_hash: hash_password(ADMIN_PASSWORD)
                    .expect("Failed to hash test password"),
            },
            views: ViewsConfig {
                title: "Store Admin".to_string(),
                asset_version: ASSET_VERSION.to_string(),
                entry_script: "/build/app.js".to_string(),
            },
        };

        let db = storeadmin::database::init_db(&config.database)
            .await
            .expect("Failed to initialize test database");
        let brands: Arc<dyn BrandRepository> = Arc::new(SeaOrmBrandRepository::new(db));

        let file_store = Arc::new(
            LocalFileStore::new(
                config.storage.root.clone(),
                config.storage.url_prefix.clone(),
                config.storage.max_file_size,
            )
            .await
            .expect("Failed to create file store"),
        );

        let views = Views::new(&config.views).expect("Failed to compile views");

        let state = AppState {
            config,
            brands: wrap(brands.clone()),
            file_store: file_store.clone(),
            views: Arc::new(views),
        };

        let app = storeadmin::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            addr,
            client,
            brands,
            file_store,
            _storage_dir: storage_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Plain browser GET (HTML shell).
    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    /// Client-side visit (JSON page object), optionally replaying a cookie.
    pub async fn visit(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut req = self
            .client
            .get(self.url(path))
            .header("X-Inertia", "true")
            .header("X-Inertia-Version", ASSET_VERSION);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }

        let res = req.send().await.expect("Failed to send GET request");
        TestResponse::from_response(res).await
    }

    /// Submit a brand form as `multipart/form-data`.
    pub async fn submit_brand(&self, method: Method, path: &str, form: BrandForm<'_>) -> TestResponse {
        let mut multipart = Form::new();
        if let Some(name) = form.name {
            multipart = multipart.text("name", name.to_string());
        }
        if let Some((file_name, bytes)) = form.image {
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str("application/octet-stream")
                .expect("Failed to set MIME type");
            multipart = multipart.part("image", part);
        }

        let mut req = self.client.request(method, self.url(path)).multipart(multipart);
        if let Some(referer) = form.referer {
            req = req.header(header::REFERER, self.url(referer));
        }

        let res = req.send().await.expect("Failed to send form request");
        TestResponse::from_response(res).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn post_urlencoded(&self, path: &str, pairs: &[(&str, &str)]) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .form(pairs)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Create a brand through the HTTP surface and return its record.
    pub async fn create_brand(&self, name: &str, image: Option<(&str, Vec<u8>)>) -> brand::Model {
        let res = self
            .submit_brand(
                Method::POST,
                routes::BRANDS,
                BrandForm {
                    name: Some(name),
                    image,
                    ..Default::default()
                },
            )
            .await;
        assert_eq!(res.status, 303, "create failed: {}", res.text);

        self.brands
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|b| b.name == name)
            .max_by_key(|b| b.id)
            .expect("Created brand not found")
    }

    /// Files currently stored in the brand namespace.
    pub fn brand_files(&self) -> Vec<PathBuf> {
        let dir = self.file_store.root().join("brands");
        match std::fs::read_dir(dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}
