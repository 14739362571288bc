//! User entity <-> document mapper

use reel_core::{Document, Fields, User, UserRole};
use serde_json::Value;

use super::fields::user as f;
use super::{put_opt, string_field, FromDocument};

impl FromDocument for User {
    fn from_document(doc: &Document) -> Self {
        User {
            id: doc.id.clone(),
            email: string_field(doc, f::EMAIL),
            display_name: string_field(doc, f::DISPLAY_NAME),
            username: string_field(doc, f::USERNAME),
            role: doc.get_str(f::ROLE).and_then(UserRole::parse),
        }
    }
}

/// User entity values for insertion
pub struct UserInsert<'a> {
    user: &'a User,
}

impl<'a> UserInsert<'a> {
    pub fn new(user: &'a User) -> Self {
        Self { user }
    }

    pub fn into_fields(self) -> Fields {
        let u = self.user;
        let mut fields = Fields::new();
        put_opt(&mut fields, f::EMAIL, u.email.clone(), Value::String);
        put_opt(&mut fields, f::DISPLAY_NAME, u.display_name.clone(), Value::String);
        put_opt(&mut fields, f::USERNAME, u.username.clone(), Value::String);
        put_opt(&mut fields, f::ROLE, u.role, |role| Value::String(role.as_str().to_string()));
        fields
    }
}
