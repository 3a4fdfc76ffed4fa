//! Cart mutation API, always scoped to the caller.
//!
//! Each item row names its owner, so add and delete touch a single table and
//! concurrent adds for the same user insert independent rows.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::cart::{CartItemRequest, CartList},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartItem,
    response::{ApiResponse, Meta},
    state::AppState,
    validation::{ValidationError, non_empty},
};

struct CartFields {
    product: String,
    quantity: i32,
    customized: Option<String>,
    content_message: Option<String>,
}

fn validate(payload: CartItemRequest) -> Result<CartFields, ValidationError> {
    let product = non_empty("product", &payload.product)?;
    if payload.quantity <= 0 {
        return Err(ValidationError::TooSmall {
            field: "quantity",
            min: 0,
        });
    }
    let optional = |v: Option<String>| {
        v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
    };
    Ok(CartFields {
        product,
        quantity: payload.quantity,
        customized: optional(payload.customized),
        content_message: optional(payload.content_message),
    })
}

async fn load_items<C: ConnectionTrait>(db: &C, user_id: Uuid) -> AppResult<Vec<CartItem>> {
    Ok(CartItems::find()
        .filter(CartCol::UserId.eq(user_id))
        .order_by_asc(CartCol::CreatedAt)
        .order_by_asc(CartCol::Id)
        .all(db)
        .await?
        .into_iter()
        .map(CartItem::from)
        .collect())
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let items = load_items(&state.orm, user.user_id).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("OK", CartList { items }, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: CartItemRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let fields = validate(payload)?;

    let txn = state.orm.begin().await?;

    if Users::find_by_id(user.user_id).one(&txn).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let now = Utc::now();
    let item = CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        product: Set(fields.product),
        quantity: Set(fields.quantity),
        customized: Set(fields.customized),
        content_message: Set(fields.content_message),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "cart_add",
        "cart_items",
        serde_json::json!({ "cart_item_id": item.id, "quantity": item.quantity }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product added to cart successfully",
        item.into(),
        None,
    ))
}

pub async fn update_cart_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CartItemRequest,
) -> AppResult<ApiResponse<CartList>> {
    let fields = validate(payload)?;

    let existing = CartItems::find()
        .filter(CartCol::Id.eq(id))
        .filter(CartCol::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CartActive = existing.into();
    active.product = Set(fields.product);
    active.quantity = Set(fields.quantity);
    active.customized = Set(fields.customized);
    active.content_message = Set(fields.content_message);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "cart_update",
        "cart_items",
        serde_json::json!({ "cart_item_id": id }),
    )
    .await;

    let items = load_items(&state.orm, user.user_id).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Product updated in cart successfully",
        CartList { items },
        Some(meta),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CartList>> {
    let txn = state.orm.begin().await?;

    let result = CartItems::delete_many()
        .filter(CartCol::Id.eq(id))
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    let items = load_items(&txn, user.user_id).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        Some(user.user_id),
        "cart_remove",
        "cart_items",
        serde_json::json!({ "cart_item_id": id }),
    )
    .await;

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Product removed from cart successfully",
        CartList { items },
        Some(meta),
    ))
}
