//! Identity and response fixtures

use campus_connect::app::StoredTokens;
use campus_connect::shared::{Credentials, Identity, Role, TokenPair};
use serde_json::{json, Value};

pub const ACCESS: &str = "A";
pub const REFRESH: &str = "R";

pub fn alice_credentials() -> Credentials {
    Credentials::new("alice", "secret")
}

pub fn user_json(id: i64, username: &str, role: Role) -> Value {
    json!({"id": id, "username": username, "role": role.as_str()})
}

pub fn identity(id: i64, username: &str, role: Role) -> Identity {
    serde_json::from_value(user_json(id, username, role)).expect("fixture identity")
}

pub fn tokens(access: &str, refresh: &str) -> TokenPair {
    TokenPair {
        access: access.to_string(),
        refresh: refresh.to_string(),
    }
}

/// Body of a successful login or registration
pub fn auth_body(user: Value, access: &str, refresh: &str) -> Value {
    json!({"user": user, "tokens": {"access": access, "refresh": refresh}})
}

pub fn alice_auth_body() -> Value {
    auth_body(user_json(1, "alice", Role::Student), ACCESS, REFRESH)
}

/// Tokens left behind by a previous run
pub fn stored(access: &str, refresh: &str) -> StoredTokens {
    StoredTokens {
        access: Some(access.to_string()),
        refresh: Some(refresh.to_string()),
    }
}
