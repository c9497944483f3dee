//! FetchTransport: GET + JSON decode through `window.fetch`

use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

use super::describe_js;
use crate::remote::{JsonFuture, RemoteError, Transport};

pub struct FetchTransport {
    window: Window,
}

impl FetchTransport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Transport for FetchTransport {
    fn get_json(&self, url: Url) -> JsonFuture {
        let promise = self.window.fetch_with_str(url.as_str());

        Box::pin(async move {
            let response: Response = JsFuture::from(promise)
                .await
                .map_err(|e| RemoteError::Network(describe_js(&e)))?
                .dyn_into()
                .map_err(|e| RemoteError::Network(describe_js(&e)))?;

            if !response.ok() {
                return Err(RemoteError::Status(response.status()));
            }

            let body = response
                .json()
                .map_err(|e| RemoteError::Decode(describe_js(&e)))?;
            let json = JsFuture::from(body)
                .await
                .map_err(|e| RemoteError::Decode(describe_js(&e)))?;

            serde_wasm_bindgen::from_value::<serde_json::Value>(json)
                .map_err(|e| RemoteError::Decode(e.to_string()))
        })
    }
}
