//! WASM bindings for ics-codec and ics-audit.
//!
//! Exposes serialization, parsing, validation, and validated export to
//! JavaScript via `wasm-bindgen`. Events and reports cross the boundary as
//! JSON strings, in the same shape `serde` gives `CalendarEvent` and
//! `ValidationReport`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p ics-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/ics-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/ics_wasm.wasm
//! # Rename .js -> .cjs for ESM compatibility
//! mv packages/ics-js/wasm/ics_wasm.js packages/ics-js/wasm/ics_wasm.cjs
//! ```

use ics_codec::{CalendarEvent, SerializeOptions};
use wasm_bindgen::prelude::*;

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

fn events_from_json(events_json: &str) -> Result<Vec<CalendarEvent>, String> {
    serde_json::from_str(events_json).map_err(|e| format!("Invalid events JSON: {e}"))
}

fn options(product_id: Option<String>) -> SerializeOptions {
    match product_id {
        Some(id) => SerializeOptions::default().with_product_id(id),
        None => SerializeOptions::default(),
    }
}

fn serialize_json(events_json: &str, product_id: Option<String>) -> Result<String, String> {
    let events = events_from_json(events_json)?;
    Ok(ics_codec::serialize_with(&events, &options(product_id)))
}

fn export_json(events_json: &str, product_id: Option<String>) -> Result<String, String> {
    let events = events_from_json(events_json)?;
    ics_audit::export(&events, &options(product_id)).map_err(|e| e.to_string())
}

fn parse_json(ics: &str) -> Result<String, String> {
    serde_json::to_string(&ics_codec::parse(ics)).map_err(|e| e.to_string())
}

fn validate_json(ics: &str) -> Result<String, String> {
    serde_json::to_string(&ics_audit::validate(ics)).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Exported functions
// ---------------------------------------------------------------------------

/// Serialize a JSON array of events into a VCALENDAR document.
///
/// Throws if the input is not a valid event array. The output is not
/// validated; use `exportCalendar` for that.
#[wasm_bindgen]
pub fn serialize(events_json: &str, product_id: Option<String>) -> Result<String, JsValue> {
    serialize_json(events_json, product_id).map_err(js_err)
}

/// Serialize and validate. Throws with the joined failure messages if the
/// calendar does not pass every check.
#[wasm_bindgen(js_name = exportCalendar)]
pub fn export_calendar(events_json: &str, product_id: Option<String>) -> Result<String, JsValue> {
    export_json(events_json, product_id).map_err(js_err)
}

/// Parse ICS text into a JSON array of events. Unparseable blocks are
/// dropped, so this only throws on an internal serialization failure.
#[wasm_bindgen]
pub fn parse(ics: &str) -> Result<String, JsValue> {
    parse_json(ics).map_err(js_err)
}

/// Validate ICS text and return the report as a JSON array of checks.
#[wasm_bindgen]
pub fn validate(ics: &str) -> Result<String, JsValue> {
    validate_json(ics).map_err(js_err)
}
