#![cfg(target_arch = "wasm32")]

use crate::config::AppConfig;
use crate::create_app;
use eframe::WebRunner;
use journey::{BlobStore, StorageError};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

/// Launch the egui app inside the canvas referenced by `index.html`.
#[wasm_bindgen]
pub async fn start() -> Result<(), JsValue> {
    use web_sys::HtmlCanvasElement;

    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .ok_or("No window")?
        .document()
        .ok_or("No document")?;

    let canvas = document
        .get_element_by_id("the_canvas_id")
        .ok_or("Canvas not found")?
        .dyn_into::<HtmlCanvasElement>()?;

    let web_options = eframe::WebOptions::default();

    WebRunner::new()
        .start(
            canvas,
            web_options,
            Box::new(|cc| Ok(Box::new(create_app(cc, AppConfig::default())))),
        )
        .await
}

/// Journey library kept in the browser's `localStorage`, one key per slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBlobStore;

fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .ok_or_else(|| StorageError::Unavailable("localStorage is not available".to_string()))
}

fn js_error(err: JsValue) -> StorageError {
    StorageError::Unavailable(format!("{err:?}"))
}

impl BlobStore for LocalStorageBlobStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        local_storage()?.get_item(slot).map_err(js_error)
    }

    fn write(&mut self, slot: &str, blob: &str) -> Result<(), StorageError> {
        local_storage()?.set_item(slot, blob).map_err(js_error)
    }
}
