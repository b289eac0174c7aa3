//! Account model, roles and the role permission table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Account role slug (stored as text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    /// Operations this role may perform
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Member => MEMBER_PERMISSIONS,
            Role::Admin => ADMIN_PERMISSIONS,
        }
    }

    pub fn permits(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" | "user" => Ok(Role::Member),
            "admin" | "administrator" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Capabilities checked before an operation runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    BrowseCatalog,
    BorrowBooks,
    ReturnBooks,
    ManageCatalog,
    ViewLedger,
    ViewStatistics,
}

const MEMBER_PERMISSIONS: &[Permission] = &[
    Permission::BrowseCatalog,
    Permission::BorrowBooks,
    Permission::ReturnBooks,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::BrowseCatalog,
    Permission::BorrowBooks,
    Permission::ReturnBooks,
    Permission::ManageCatalog,
    Permission::ViewLedger,
    Permission::ViewStatistics,
];

/// Account row from database
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: i32,
    pub username: String,
    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing)]
    pub credential: String,
    pub email: Option<String>,
    pub role: Role,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require(&self, permission: Permission) -> AppResult<()> {
        if self.role.permits(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "{} accounts may not {:?}",
                self.role, permission
            )))
        }
    }
}

/// Account fields shown next to ledger entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: i32,
    pub username: String,
    pub role: Role,
    pub points: i32,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
            points: account.points,
        }
    }
}

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterAccount {
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub credential: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

impl RegisterAccount {
    pub fn new(username: impl Into<String>, credential: impl Into<String>, email: Option<&str>) -> Self {
        Self {
            username: username.into(),
            credential: credential.into(),
            email: email.filter(|e| !e.trim().is_empty()).map(str::to_string),
        }
    }
}
