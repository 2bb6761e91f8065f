use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type TripId = i64;
pub type MemberId = i64;

/// Trip read model (owned by the trip management layer)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Member,
    Guest,
}

text_enum!(Role, "role", {
    Owner => "owner",
    Admin => "admin",
    Member => "member",
    Guest => "guest",
});

impl Role {
    /// Guests can read balances but cannot create or split expenses
    pub fn can_manage_expenses(&self) -> bool {
        !matches!(self, Role::Guest)
    }
}

/// Trip membership row, ordered by `position` within the trip
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Member {
    pub trip_id: TripId,
    pub member_id: MemberId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub position: i32,
}

impl Member {
    pub fn can_manage_expenses(&self) -> bool {
        self.role.can_manage_expenses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_guests_are_read_only() {
        assert!(Role::Owner.can_manage_expenses());
        assert!(Role::Admin.can_manage_expenses());
        assert!(Role::Member.can_manage_expenses());
        assert!(!Role::Guest.can_manage_expenses());
    }

    #[test]
    fn role_parses_stored_text() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::try_from("guest".to_string()).unwrap(), Role::Guest);
        assert!("visitor".parse::<Role>().is_err());
    }
}
