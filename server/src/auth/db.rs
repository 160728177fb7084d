use crate::models::{NewUser, User};
use crate::schema::users;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use thiserror::Error;

use super::crypto::{hash_password, verify_dummy_password, verify_password};

#[derive(Debug)]
pub enum RegisterOutcome {
    Created(User),
    EmailTaken,
}

#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("Failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),

    #[error("Database error: {0}")]
    Database(#[from] DieselError),
}

/// Emails are compared case-insensitively and stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn register_user(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    password: &str,
) -> Result<RegisterOutcome, RegisterError> {
    let password_hash = hash_password(password).map_err(RegisterError::Hash)?;
    let email = normalize_email(email);

    let new_user = NewUser {
        name: name.trim(),
        email: &email,
        password_hash: &password_hash,
    };

    match diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(conn)
    {
        Ok(user) => Ok(RegisterOutcome::Created(user)),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Ok(RegisterOutcome::EmailTaken)
        }
        Err(e) => Err(e.into()),
    }
}

/// `None` for an unknown email and for a wrong password alike.
pub fn authenticate_user(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
) -> QueryResult<Option<User>> {
    let user = users::table
        .filter(users::email.eq(normalize_email(email)))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    match user {
        Some(user) => Ok(verify_password(password, &user.password_hash).then_some(user)),
        None => {
            verify_dummy_password(password);
            Ok(None)
        }
    }
}

pub fn find_user(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<Option<User>> {
    users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()
}

pub fn update_user_name(conn: &mut SqliteConnection, user_id: i32, name: &str) -> QueryResult<bool> {
    let updated = diesel::update(users::table.find(user_id))
        .set(users::name.eq(name.trim()))
        .execute(conn)?;
    Ok(updated > 0)
}
