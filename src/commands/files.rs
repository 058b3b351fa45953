//! File Commands
//!
//! Photo upload to backend storage and reading picked files.

use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use declutter_core::upload::UploadFile;
use super::js_error;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__DECLUTTER__"], js_name = uploadFile, catch)]
    async fn bridge_upload_file(name: &str, bytes: js_sys::Uint8Array) -> Result<JsValue, JsValue>;
}

#[derive(Deserialize)]
struct UploadResult {
    id: String,
}

/// Store a compressed photo. Returns the storage file id.
pub async fn upload_file(name: &str, bytes: &[u8]) -> Result<String, String> {
    let array = js_sys::Uint8Array::from(bytes);
    let result = bridge_upload_file(name, array).await.map_err(js_error)?;
    let parsed: UploadResult = serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())?;
    Ok(parsed.id)
}

/// Read the bytes of a picked file
pub async fn read_file(file: &web_sys::File) -> Result<UploadFile, String> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_error)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(UploadFile::new(file.name(), file.type_(), bytes))
}

/// Every file of a file input's list, in order
pub async fn read_file_list(list: &web_sys::FileList) -> Vec<Result<UploadFile, String>> {
    let mut files = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(file) = list.get(i) {
            files.push(read_file(&file).await);
        }
    }
    files
}
