use serde::Deserialize;

/// Inbound event in the API Gateway proxy shape. Fields other than the
/// method and body are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl HttpEvent {
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref().map(str::as_bytes)
    }
}

pub fn is_preflight(method: &str) -> bool {
    method.eq_ignore_ascii_case("OPTIONS")
}
