//! Domain DTOs for the console API.
//!
//! # Design
//! These types mirror the mock-server's records but are defined
//! independently; integration tests catch schema drift. Money is integer
//! cents and rates are basis points so report arithmetic stays exact.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record type served from a REST collection.
///
/// `PATH` is the collection segment (`employees` for `/employees`). `New`
/// is the create payload and `Patch` the partial update payload.
pub trait Resource: DeserializeOwned {
    const PATH: &'static str;
    type New: Serialize;
    type Patch: Serialize;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub position_id: Option<Uuid>,
    #[serde(default)]
    pub region_id: Option<Uuid>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<Uuid>,
}

/// Partial update; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl Resource for Employee {
    const PATH: &'static str = "employees";
    type New = NewEmployee;
    type Patch = EmployeePatch;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub id: Uuid,
    pub title: String,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPosition {
    pub title: String,
    pub level: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

impl Resource for Position {
    const PATH: &'static str = "positions";
    type New = NewPosition;
    type Patch = PositionPatch;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegion {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Resource for Region {
    const PATH: &'static str = "regions";
    type New = NewRegion;
    type Patch = RegionPatch;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    Store,
    Warehouse,
}

/// Links an employee to a store or warehouse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreAssignment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub store_code: String,
    pub kind: AssignmentKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStoreAssignment {
    pub employee_id: Uuid,
    pub store_code: String,
    pub kind: AssignmentKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreAssignmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<AssignmentKind>,
}

impl Resource for StoreAssignment {
    const PATH: &'static str = "store-assignments";
    type New = NewStoreAssignment;
    type Patch = StoreAssignmentPatch;
}

/// Body of `POST /store-assignments/bulk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAssignment {
    pub assignments: Vec<NewStoreAssignment>,
}

/// Sales target for a position over a period such as `2026-09`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hurdle {
    pub id: Uuid,
    pub position_id: Uuid,
    pub period: String,
    pub target_cents: i64,
    pub rate_bps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHurdle {
    pub position_id: Uuid,
    pub period: String,
    pub target_cents: i64,
    pub rate_bps: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HurdlePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_bps: Option<u32>,
}

impl Resource for Hurdle {
    const PATH: &'static str = "hurdles";
    type New = NewHurdle;
    type Patch = HurdlePatch;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub store_code: String,
    pub amount_cents: i64,
    /// ISO date, `YYYY-MM-DD`.
    pub occurred_on: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub employee_id: Uuid,
    pub store_code: String,
    pub amount_cents: i64,
    pub occurred_on: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_on: Option<String>,
}

impl Resource for Transaction {
    const PATH: &'static str = "transactions";
    type New = NewTransaction;
    type Patch = TransactionPatch;
}

/// Body of `POST /transactions/upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionUpload {
    pub file_name: String,
    pub rows: Vec<NewTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadSummary {
    pub imported: usize,
}

/// Filter for the incentive report.
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub period: String,
    pub region_id: Option<Uuid>,
}

/// One employee's line in the incentive report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncentiveRow {
    pub employee_id: Uuid,
    pub employee_name: String,
    pub total_sales_cents: i64,
    pub target_cents: i64,
    pub achieved: bool,
    pub incentive_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn default_true() -> bool {
    true
}
