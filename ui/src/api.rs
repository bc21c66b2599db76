//! API client for the model demo server

use crate::types::*;
use gloo_net::http::Request;
use serde_json::Value;
use std::collections::HashMap;

const API_BASE: &str = "";

/// Fetch the model metadata document
pub async fn get_metadata() -> Result<Metadata, String> {
    let url = format!("{}/metadata", API_BASE);
    fetch_json::<Metadata>(&url).await
}

// ============================================================================
// Predictions
// ============================================================================

/// Submit a prediction request; file fields must already be serving URLs
pub async fn create_prediction(
    input: &HashMap<String, Value>,
) -> Result<PostPredictionResponse, String> {
    let url = format!("{}/predictions", API_BASE);
    post_json::<HashMap<String, Value>, PostPredictionResponse>(&url, input).await
}

pub async fn get_prediction(prediction_id: &str) -> Result<Prediction, String> {
    let url = format!(
        "{}/predictions/{}",
        API_BASE,
        urlencoding_encode(prediction_id)
    );
    fetch_json::<Prediction>(&url).await
}

pub async fn cancel_prediction(prediction_id: &str) -> Result<(), String> {
    let url = format!(
        "{}/predictions/{}/cancel",
        API_BASE,
        urlencoding_encode(prediction_id)
    );
    post_empty(&url).await
}

/// Save a succeeded prediction as a gallery example
pub async fn save_prediction_as_example(
    prediction_id: &str,
) -> Result<PostExampleResponse, String> {
    let url = format!(
        "{}/predictions/{}/save",
        API_BASE,
        urlencoding_encode(prediction_id)
    );
    let response = Request::post(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    decode_json::<PostExampleResponse>(response).await
}

// ============================================================================
// Examples
// ============================================================================

pub async fn list_examples() -> Result<Vec<Example>, String> {
    let url = format!("{}/examples", API_BASE);
    fetch_json::<Vec<Example>>(&url).await
}

pub async fn delete_example(example_id: &str) -> Result<(), String> {
    let url = format!("{}/examples/{}", API_BASE, urlencoding_encode(example_id));
    let response = Request::delete(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    check_status(&response)
}

// ============================================================================
// Files
// ============================================================================

/// Upload one file as multipart form data; returns its serving URL
pub async fn upload_file(file: &web_sys::File) -> Result<FileUploadResponse, String> {
    let url = format!("{}/files", API_BASE);

    let form = web_sys::FormData::new().map_err(|_| "Failed to build form data".to_string())?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| "Failed to attach file".to_string())?;

    let response = Request::post(&url)
        .body(form)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    decode_json::<FileUploadResponse>(response).await
}

// ============================================================================
// Helper functions
// ============================================================================

fn urlencoding_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

fn check_status(response: &gloo_net::http::Response) -> Result<(), String> {
    if response.ok() {
        Ok(())
    } else {
        Err(format!("Server returned {}", response.status()))
    }
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: gloo_net::http::Response,
) -> Result<T, String> {
    check_status(&response)?;
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    decode_json::<T>(response).await
}

async fn post_json<T: serde::Serialize, R: serde::de::DeserializeOwned>(
    url: &str,
    body: &T,
) -> Result<R, String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    decode_json::<R>(response).await
}

/// POST with no body, expecting no data back
async fn post_empty(url: &str) -> Result<(), String> {
    let response = Request::post(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    check_status(&response)
}
