//! Browser-backed storage and fun-fact fetching.

use crate::config::FunFactConfig;
use crate::error::{Error, Result};
use crate::fun_fact::{parse_response, request_body, request_url, resolve, FunFact, FunFactProvider};
use crate::high_score::ScoreStore;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response, Storage};

/// `window.localStorage`.
pub struct LocalStorageStore;

fn local_storage() -> Result<Storage> {
    let window = web_sys::window().ok_or_else(|| Error::Storage("no window".to_string()))?;
    window
        .local_storage()
        .map_err(|e| Error::Storage(format!("{:?}", e)))?
        .ok_or_else(|| Error::Storage("localStorage is disabled".to_string()))
}

impl ScoreStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        local_storage()?
            .get_item(key)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("{:?}", e)))
    }
}

fn http_error(e: JsValue) -> Error {
    Error::Http(format!("{:?}", e))
}

async fn fetch(config: &FunFactConfig, api_key: &str) -> Result<Option<String>> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&request_body(config).to_string()));

    let request = Request::new_with_str_and_init(&request_url(config, api_key), &opts)
        .map_err(http_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(http_error)?;

    let window = web_sys::window().ok_or_else(|| Error::Http("no window".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(http_error)?
        .dyn_into()
        .map_err(http_error)?;

    if !response.ok() {
        return Err(Error::Http(format!("status {}", response.status())));
    }

    let body = JsFuture::from(response.text().map_err(http_error)?)
        .await
        .map_err(http_error)?
        .as_string()
        .ok_or_else(|| Error::Http("response body is not text".to_string()))?;
    parse_response(&body)
}

/// Issues `fetch` requests on the browser event loop.
pub struct FetchProvider {
    config: FunFactConfig,
    api_key: String,
    ready: Rc<RefCell<Vec<FunFact>>>,
}

impl FetchProvider {
    pub fn new(config: FunFactConfig, api_key: String) -> Self {
        Self {
            config,
            api_key,
            ready: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl FunFactProvider for FetchProvider {
    fn request(&mut self, generation: u64) {
        let api_key = self.api_key.clone();
        let config = self.config.clone();
        let ready = self.ready.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let text = resolve(fetch(&config, &api_key).await);
            ready.borrow_mut().push(FunFact { generation, text });
        });
    }

    fn poll(&mut self) -> Option<FunFact> {
        let mut ready = self.ready.borrow_mut();
        if ready.is_empty() {
            None
        } else {
            Some(ready.remove(0))
        }
    }
}
