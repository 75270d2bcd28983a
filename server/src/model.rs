//! Request and response bodies of the lost-and-found API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Roles known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub personal_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetailsResponse {
    pub username: String,
    pub role: String,
    pub email: String,
    pub personal_name: String,
}

/// Contact details kept next to the credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub email: String,
    pub personal_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub username: String,
    pub email: String,
    pub personal_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Lost,
    Found,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub kind: ItemKind,
    pub name: String,
    pub category: String,
    pub color: String,
    pub brand: String,
    pub location: String,
    pub date: String,
    pub description: String,
    /// Username of the student who reported the item.
    pub reporter: String,
}

impl Item {
    /// Fields searched by the fuzzy endpoints.
    pub fn searchable_fields(&self) -> [&str; 5] {
        [
            &self.name,
            &self.category,
            &self.color,
            &self.brand,
            &self.location,
        ]
    }
}

/// Body of `POST /lost-found/{lost,found}-items`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub color: String,
    pub brand: String,
    pub location: String,
    pub date: String,
    pub description: String,
}

impl NewItem {
    pub fn into_item(self, id: u64, kind: ItemKind, reporter: &str) -> Item {
        Item {
            id,
            kind,
            name: self.name,
            category: self.category,
            color: self.color,
            brand: self.brand,
            location: self.location,
            date: self.date,
            description: self.description,
            reporter: reporter.to_string(),
        }
    }
}
