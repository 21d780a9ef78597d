use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub color: String, // "#RRGGBB"
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub department_id: Option<i64>,
}
