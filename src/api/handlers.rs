use crate::api::AppState;
use crate::error::LedgerError;
use crate::models::{
    Expense, ExpenseCategory, ExpenseParticipant, MemberId, NewExpense, ShoppingItem,
    ShoppingItemDraft, ShoppingList,
};
use axum::{
    extract::{Json, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Error body: `{ success: false, error, message, remaining? }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<String>,
}

/// Handler error wrapper mapping ledger errors onto HTTP statuses
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LedgerError::InvalidInput(_) | LedgerError::EmptyParticipants => StatusCode::BAD_REQUEST,
            LedgerError::ValidationMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
            LedgerError::ConcurrencyConflict { .. } => StatusCode::CONFLICT,
            LedgerError::Forbidden { .. } => StatusCode::FORBIDDEN,
            LedgerError::Database(_) | LedgerError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }

        let remaining = match &self.0 {
            LedgerError::ValidationMismatch { delta, .. } => Some(money(delta)),
            _ => None,
        };
        let body = ErrorResponse {
            success: false,
            error: self.0.kind(),
            message: self.0.to_string(),
            remaining,
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Two-decimal money string, e.g. "12.34"
fn money(amount: &BigDecimal) -> String {
    crate::service::rounding::to_cents(amount).to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceEntry {
    pub member_id: String,
    pub balance: String,
}

#[derive(Debug, Serialize)]
pub struct SettlementEntry {
    pub from: String,
    pub to: String,
    pub amount: String,
    pub currency: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEntry {
    pub member_id: String,
    pub amount_owed: String,
}

impl From<ExpenseParticipant> for ParticipantEntry {
    fn from(p: ExpenseParticipant) -> Self {
        Self {
            member_id: p.member_id.to_string(),
            amount_owed: money(&p.amount_owed),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub acting_member_id: MemberId,
    pub payer_id: MemberId,
    pub amount: BigDecimal,
    pub currency: Option<String>,
    pub category: ExpenseCategory,
    pub description: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct EqualSplitRequest {
    pub acting_member_id: MemberId,
    pub member_ids: Vec<MemberId>,
}

#[derive(Debug, Deserialize)]
pub struct CustomSplitRequest {
    pub acting_member_id: MemberId,
    pub amounts: IndexMap<MemberId, BigDecimal>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub recipe_ids: Vec<i64>,
    pub people_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ManualItemRequest {
    pub name: String,
    pub quantity: BigDecimal,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Deserialize)]
pub struct PurchasedRequest {
    pub purchased: bool,
}

#[derive(Debug, Serialize)]
pub struct ShoppingListResponse {
    pub list: ShoppingList,
    pub items: Vec<ShoppingItem>,
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn balances(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Json<Vec<BalanceEntry>>> {
    let balances = state.ledger.compute_balances(trip_id).await?;
    Ok(Json(
        balances
            .iter()
            .map(|(member_id, balance)| BalanceEntry {
                member_id: member_id.to_string(),
                balance: money(balance),
            })
            .collect(),
    ))
}

pub async fn settlements(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Json<Vec<SettlementEntry>>> {
    let suggestions = state.ledger.compute_settlements(trip_id).await?;
    Ok(Json(
        suggestions
            .into_iter()
            .map(|s| SettlementEntry {
                from: s.from_member.to_string(),
                to: s.to_member.to_string(),
                amount: money(&s.amount),
                currency: s.currency,
            })
            .collect(),
    ))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
    Json(req): Json<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    state.ledger.ensure_can_manage(trip_id, req.acting_member_id).await?;

    let expense = state
        .ledger
        .record_expense(
            trip_id,
            NewExpense {
                payer_id: req.payer_id,
                amount: req.amount,
                currency: req.currency,
                category: req.category,
                description: req.description,
                date: req.date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn equal_split(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
    Json(req): Json<EqualSplitRequest>,
) -> ApiResult<Json<Vec<ParticipantEntry>>> {
    let trip_id = state.ledger.expense_trip(expense_id).await?;
    state.ledger.ensure_can_manage(trip_id, req.acting_member_id).await?;

    let participants = state
        .ledger
        .apply_equal_split(expense_id, &req.member_ids)
        .await?;
    Ok(Json(participants.into_iter().map(ParticipantEntry::from).collect()))
}

pub async fn custom_split(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
    Json(req): Json<CustomSplitRequest>,
) -> ApiResult<Json<Vec<ParticipantEntry>>> {
    let trip_id = state.ledger.expense_trip(expense_id).await?;
    state.ledger.ensure_can_manage(trip_id, req.acting_member_id).await?;

    let participants = state
        .ledger
        .apply_custom_split(expense_id, &req.amounts)
        .await?;
    Ok(Json(participants.into_iter().map(ParticipantEntry::from).collect()))
}

pub async fn shopping_list(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Json<ShoppingListResponse>> {
    let (list, items) = state.shopping.list_items(trip_id).await?;
    Ok(Json(ShoppingListResponse { list, items }))
}

pub async fn generate_shopping_list(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<Vec<ShoppingItemDraft>>> {
    let drafts = state
        .shopping
        .generate_shopping_list(trip_id, &req.recipe_ids, req.people_count)
        .await?;
    Ok(Json(drafts))
}

pub async fn add_manual_item(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
    Json(req): Json<ManualItemRequest>,
) -> ApiResult<(StatusCode, Json<ShoppingItem>)> {
    let item = state
        .shopping
        .add_manual_item(trip_id, &req.name, req.quantity, &req.unit, &req.category)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn set_purchased(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
    Json(req): Json<PurchasedRequest>,
) -> ApiResult<Json<ShoppingItem>> {
    let item = state.shopping.set_purchased(item_id, req.purchased).await?;
    Ok(Json(item))
}

pub async fn export_shopping_list(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Response> {
    let csv = state.shopping.export_csv(trip_id).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv).into_response())
}
