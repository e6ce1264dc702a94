//! Order CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{ItemId, OrderId};
use domain::{CreateOrder, ItemUpdate, NewItem, Order, OrderService, UpdateOrder};
use order_store::OrderStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{JsonBody, null_as_default};

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub order_service: OrderService<S>,
}

// -- Request types --
//
// Missing and null fields decode to their zero value.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<CreateItemRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateItemRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub item_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOrderRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<UpdateItemRequest>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateItemRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub line_item_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub item_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: i32,
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(req: CreateOrderRequest) -> Self {
        let items = req
            .items
            .into_iter()
            .map(|item| NewItem::new(item.item_code, item.description, item.quantity))
            .collect();
        CreateOrder::new(req.customer_name, items)
    }
}

impl UpdateOrderRequest {
    fn into_command(self, order_id: OrderId) -> UpdateOrder {
        let items = self
            .items
            .into_iter()
            .map(|item| {
                ItemUpdate::new(
                    ItemId::new(item.line_item_id),
                    item.item_code,
                    item.description,
                    item.quantity,
                )
            })
            .collect();
        UpdateOrder::new(order_id, self.customer_name, items)
    }
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// -- Handlers --

/// POST /orders — create an order with its items.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    JsonBody(req): JsonBody<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.order_service.create_order(req.into()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders — list every order with its items.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.order_service.list_orders().await?;
    Ok(Json(orders))
}

/// GET /order/:order_id — load one order.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id = parse_order_id(&order_id)?;
    let order = state.order_service.get_order(order_id).await?;
    Ok(Json(order))
}

/// PUT /order/:order_id — rewrite the customer name and existing items.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<String>,
    JsonBody(req): JsonBody<UpdateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let order_id = parse_order_id(&order_id)?;
    let order = state
        .order_service
        .update_order(req.into_command(order_id))
        .await?;
    Ok(Json(order))
}

/// DELETE /order/:order_id — delete an order and its items.
#[tracing::instrument(skip(state))]
pub async fn delete<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(order_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id = parse_order_id(&order_id)?;
    state.order_service.delete_order(order_id).await?;
    Ok(Json(MessageResponse {
        message: "order deleted",
    }))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::BadRequest("invalid order ID".to_string()))
}
