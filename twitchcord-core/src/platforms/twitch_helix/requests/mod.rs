pub mod clips;
pub mod stream;
pub mod users;

use serde::Deserialize;

/// Every Helix list endpoint wraps its records in `data`.
#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    pub data: Vec<T>,
}
