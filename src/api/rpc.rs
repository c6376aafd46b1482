//! Request/reply framing for the mobile client.
//!
//! The app posts either a JSON-RPC style envelope
//! (`{"jsonrpc": "2.0", "method": "call", "id": 1, "params": {...}}`) or the
//! bare params object. Replies mirror the request: enveloped requests get
//! `{"jsonrpc": "2.0", "id": 1, "result": {...}}`.

use std::fmt;

use actix_web::{
    FromRequest, HttpRequest, HttpResponse,
    dev::Payload,
    error::{InternalError, JsonPayloadError},
    web,
};
use futures::future::LocalBoxFuture;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::models::{MALFORMED_REQUEST, MessageReply};

pub struct Rpc<T> {
    pub params: T,
    /// Request id when the body came enveloped.
    envelope: Option<Value>,
}

impl<T: DeserializeOwned> Rpc<T> {
    pub fn from_value(body: Value) -> Result<Self, serde_json::Error> {
        let (params, envelope) = match body {
            Value::Object(mut map) if map.contains_key("jsonrpc") => {
                let id = map.remove("id").unwrap_or(Value::Null);
                let params = map
                    .remove("params")
                    .unwrap_or_else(|| Value::Object(Map::new()));
                (params, Some(id))
            }
            other => (other, None),
        };
        Ok(Self {
            params: serde_json::from_value(params)?,
            envelope,
        })
    }
}

impl<T> Rpc<T> {
    pub fn is_enveloped(&self) -> bool {
        self.envelope.is_some()
    }

    /// HTTP 200 carrying `result`, enveloped if the request was.
    pub fn reply<R: Serialize>(&self, result: R) -> HttpResponse {
        match &self.envelope {
            Some(id) => HttpResponse::Ok().json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": result,
            })),
            None => HttpResponse::Ok().json(result),
        }
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for Rpc<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move {
            let web::Json(value) = body.await?;
            Rpc::from_value(value).map_err(malformed)
        })
    }
}

/// 400 with the generic `{status: error}` body.
pub fn malformed<E>(err: E) -> actix_web::Error
where
    E: fmt::Debug + fmt::Display + 'static,
{
    debug!(error = %err, "Rejecting malformed payload");
    InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(MessageReply::error(MALFORMED_REQUEST)),
    )
    .into()
}

/// `JsonConfig` error handler so body-level failures share the same shape.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed(err)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Params {
        employee_id: u64,
    }

    #[test]
    fn unwraps_enveloped_params() {
        let rpc = Rpc::<Params>::from_value(json!({
            "jsonrpc": "2.0",
            "method": "call",
            "id": 9,
            "params": {"employee_id": 3}
        }))
        .unwrap();

        assert!(rpc.is_enveloped());
        assert_eq!(rpc.params, Params { employee_id: 3 });
    }

    #[test]
    fn bare_object_is_taken_as_params() {
        let rpc = Rpc::<Params>::from_value(json!({"employee_id": 3})).unwrap();

        assert!(!rpc.is_enveloped());
        assert_eq!(rpc.params.employee_id, 3);
    }

    #[test]
    fn envelope_without_params_yields_empty_object() {
        #[derive(Deserialize)]
        struct Optional {
            #[serde(default)]
            employee_id: Option<u64>,
        }

        let rpc = Rpc::<Optional>::from_value(json!({"jsonrpc": "2.0", "id": 1})).unwrap();
        assert_eq!(rpc.params.employee_id, None);
    }
}
