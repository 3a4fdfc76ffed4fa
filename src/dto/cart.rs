use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartItem;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartItemRequest {
    pub product: String,
    pub quantity: i32,
    pub customized: Option<String>,
    pub content_message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItem>,
}
