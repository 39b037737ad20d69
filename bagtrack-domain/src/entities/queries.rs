// Query string parameters

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct BagScanQuery {
    #[serde(default)]
    pub latest: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub since_minutes: Option<i64>,
}
