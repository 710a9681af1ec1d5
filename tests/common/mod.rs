//! Shared fixtures: mock image hosts and a recording object store.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Mutex;

use event_thumbnailer::{ObjectMetadata, ObjectStore, StoreError};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 200 advertising `length` bytes without sending them; meant for `HEAD`.
pub fn advertising(length: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("Content-Length", length.to_string())
}

/// Serve `body` at `route`: `HEAD` advertises its length, `GET` returns it.
pub async fn mount_image(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(advertising(body.len() as u64))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Respond to `verb` on `route` with `response`.
pub async fn mount(server: &MockServer, verb: &str, route: &str, response: ResponseTemplate) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn url(server: &MockServer, route: &str) -> String {
    format!("{}{}", server.uri(), route)
}

/// `"METHOD /path"` for every request the server has seen.
pub async fn received(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| format!("{} {}", request.method, request.url.path()))
        .collect()
}

/// HTTP client that never goes through an environment proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 140, 200])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Object store that keeps every write in memory.
#[derive(Default)]
pub struct RecordingStore {
    objects: Mutex<Vec<(String, Vec<u8>, ObjectMetadata)>>,
}

impl RecordingStore {
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _, _)| key.clone())
            .collect()
    }

    pub fn body(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, body, _)| body.clone())
    }

    pub fn metadata(&self, key: &str) -> Option<ObjectMetadata> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _, _)| k == key)
            .map(|(_, _, metadata)| metadata.clone())
    }
}

impl ObjectStore for RecordingStore {
    async fn put(&self, key: &str, body: Vec<u8>, metadata: &ObjectMetadata) -> Result<(), StoreError> {
        self.objects
            .lock()
            .unwrap()
            .push((key.to_string(), body, metadata.clone()));
        Ok(())
    }
}
