use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::user::UserId;

pub type EmployeeId = i64;

/// Column width of every employee text field.
pub const MAX_FIELD_LEN: usize = 255;

/// Stored employee record. `owner_id` is set once, at insert.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub owner_id: UserId,
}

/// The mutable part of an employee, as accepted on create and update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
}

impl EmployeeInput {
    /// Trims every field and rejects blank or oversized ones.
    pub fn normalized(&self) -> Result<Self, String> {
        let first_name = bounded(self.first_name.trim(), "First name")?;
        let last_name = bounded(self.last_name.trim(), "Last name")?;
        let email = bounded(self.email.trim(), "Email")?;

        if !looks_like_email(email) {
            return Err("Email must be a valid address".into());
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        })
    }
}

fn bounded<'a>(value: &'a str, field: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        return Err(format!("{field} is required"));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(format!("{field} must be at most {MAX_FIELD_LEN} characters"));
    }
    Ok(value)
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Employee as returned to the client. The owner is never echoed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "firstName": "John",
        "lastName": "Doe",
        "email": "john.doe@company.com"
    })
)]
pub struct EmployeeResponse {
    #[schema(example = 1)]
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(first: &str, last: &str, email: &str) -> EmployeeInput {
        EmployeeInput {
            first_name: first.into(),
            last_name: last.into(),
            email: email.into(),
        }
    }

    #[test]
    fn normalized_trims_fields() {
        let n = input("  Ada ", " Lovelace", " ada@example.com ").normalized().unwrap();
        assert_eq!(n.first_name, "Ada");
        assert_eq!(n.last_name, "Lovelace");
        assert_eq!(n.email, "ada@example.com");
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(input("", "x", "a@b.c").normalized().is_err());
        assert!(input("x", "   ", "a@b.c").normalized().is_err());
        assert!(input("x", "y", " ").normalized().is_err());
    }

    #[test]
    fn email_needs_a_local_part_and_a_domain() {
        assert!(input("x", "y", "nobody").normalized().is_err());
        assert!(input("x", "y", "@example.com").normalized().is_err());
        assert!(input("x", "y", "a@").normalized().is_err());
        assert!(input("x", "y", "a b@example.com").normalized().is_err());
        assert!(input("x", "y", "e@x.com").normalized().is_ok());
    }

    #[test]
    fn fields_are_bounded_by_the_column_width() {
        let at_limit = "n".repeat(MAX_FIELD_LEN);
        let over = "n".repeat(MAX_FIELD_LEN + 1);

        assert!(input(&at_limit, &at_limit, "a@b.c").normalized().is_ok());
        assert_eq!(
            input(&over, "y", "a@b.c").normalized().unwrap_err(),
            "First name must be at most 255 characters"
        );
        assert!(input("x", &over, "a@b.c").normalized().is_err());

        let domain = "d".repeat(MAX_FIELD_LEN - 2);
        assert!(input("x", "y", &format!("a@{domain}")).normalized().is_ok());
        assert!(input("x", "y", &format!("ab@{domain}")).normalized().is_err());

        // width is counted in characters, not bytes
        let wide = "é".repeat(MAX_FIELD_LEN);
        assert!(input(&wide, "y", "a@b.c").normalized().is_ok());
    }
}
