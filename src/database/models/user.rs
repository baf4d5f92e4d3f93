use serde::ser::{Serialize, SerializeStruct, Serializer};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Serialized as `{id, username, role}` plus the `nombreUsuario`/`rol`
/// spellings the web client reads. The hash is never written.
impl Serialize for User {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("User", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("username", &self.username)?;
        state.serialize_field("role", &self.role)?;
        state.serialize_field("nombreUsuario", &self.username)?;
        state.serialize_field("rol", &self.role)?;
        state.end()
    }
}

/// Validated, normalized input for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Full replacement values for an existing account
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub username: String,
    /// `None` keeps the stored hash
    pub password_hash: Option<String>,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 7,
            username: "alice".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
            role: "administrador".to_string(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 7,
                "username": "alice",
                "role": "administrador",
                "nombreUsuario": "alice",
                "rol": "administrador",
            })
        );
    }
}
