#![allow(dead_code)]

use image::{ImageFormat, RgbaImage};
use medinfo_web::config::{ChatSettings, ServerSettings, Settings, TelemetrySettings};
use medinfo_web::services::{CompletionProvider, GroqProvider, MockCompletionProvider};
use medinfo_web::startup::Application;
use secrecy::Secret;
use std::io::Cursor;
use std::sync::Arc;

pub const COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    /// Keeps cookies and does not follow redirects.
    pub client: reqwest::Client,
}

pub fn test_settings(api_url: &str) -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            session_secret: Secret::new("integration-test-session-secret".to_string()),
            static_dir: "static".to_string(),
            secure_cookies: false,
        },
        chat: ChatSettings {
            api_url: api_url.to_string(),
            model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            max_tokens: 1000,
            timeout_secs: 30,
            api_key: Some(Secret::new("test-api-key".to_string())),
            max_upload_bytes: None,
        },
        telemetry: TelemetrySettings::default(),
    }
}

impl TestApp {
    /// App backed by an in-process mock provider.
    pub async fn spawn(provider: Arc<MockCompletionProvider>) -> Self {
        Self::spawn_with(test_settings("http://127.0.0.1:9"), provider).await
    }

    /// App talking to a real HTTP completion endpoint (usually wiremock).
    pub async fn spawn_with_groq(settings: Settings) -> Self {
        let provider =
            GroqProvider::new(&settings.chat).expect("Failed to build completion provider");
        Self::spawn_with(settings, Arc::new(provider)).await
    }

    pub async fn spawn_with(settings: Settings, provider: Arc<dyn CompletionProvider>) -> Self {
        let app = Application::build_with_provider(settings, provider)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        // Wait for the server by polling the health endpoint
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_html(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status(), 200, "GET {} failed", path);
        response.text().await.expect("Failed to read body")
    }

    pub async fn post_chat(&self, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(format!("{}/api/chat", self.address))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn png_bytes() -> Vec<u8> {
    let image = RgbaImage::from_pixel(4, 4, image::Rgba([200, 30, 30, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode PNG");
    buffer.into_inner()
}

pub fn image_part(bytes: Vec<u8>, file_name: &str) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string())
}
