use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One continuous attendance interval for a worker. Opens with a rate
/// snapshot, closes exactly once; `minutes_worked` and `payout` are set at
/// close and never change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub opened_at: DateTime<Utc>,
    /// Informational only; never used in payout math.
    pub expected_end: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub status: ShiftStatus,
    /// Worker's hourly rate in minor units, copied at open time. The worker's
    /// live rate may change later without touching this.
    pub hourly_rate_snapshot: i64,
    pub minutes_worked: Option<i64>,
    pub payout: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftInput {
    /// Caller-clock override; defaults to now. The client may be
    /// authoritative for local wall-clock time in a single-timezone shop.
    pub opened_at: Option<DateTime<Utc>>,
    pub expected_end: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseShiftInput {
    pub closed_at: Option<DateTime<Utc>>,
    /// When absent the shift's existing notes are preserved, not cleared.
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Open,
    Closed,
}

impl std::fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftStatus::Open => write!(f, "open"),
            ShiftStatus::Closed => write!(f, "closed"),
        }
    }
}

impl std::str::FromStr for ShiftStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(ShiftStatus::Open),
            "closed" => Ok(ShiftStatus::Closed),
            _ => Err(format!("Invalid shift status: {}", s)),
        }
    }
}

impl sqlx::Type<sqlx::Sqlite> for ShiftStatus {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for ShiftStatus {
    fn encode_by_ref(
        &self,
        args: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        let s = self.to_string();
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&s, args)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for ShiftStatus {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        s.parse::<ShiftStatus>().map_err(|e| e.into())
    }
}
