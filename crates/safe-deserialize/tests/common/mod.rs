//! Destination types shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use safe_deserialize::shaped;
use serde::{Deserialize, Serialize};

shaped! {
    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct SimpleUser {
        pub id: u64,
        pub name: String,
        pub email: String,
    }
}

shaped! {
    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Settings {
        pub enabled: bool,
        pub retries: u32,
    }
}

shaped! {
    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NestedConfig {
        pub name: String,
        pub settings: Settings,
        pub tags: Vec<String>,
        pub limits: HashMap<String, u32>,
    }
}

shaped! {
    #[derive(Debug, Default, Deserialize)]
    pub struct UnsafeStruct {
        pub name: String,
        pub data: serde_json::Value,
    }
}

shaped! {
    #[derive(Debug, Default, Deserialize)]
    pub struct MapInterfaceStruct {
        pub name: String,
        pub fields: HashMap<String, serde_json::Value>,
    }
}

shaped! {
    #[derive(Debug, Default, Deserialize)]
    pub struct SliceInterfaceStruct {
        pub name: String,
        pub items: Vec<serde_json::Value>,
    }
}

shaped! {
    #[derive(Debug, Default, Deserialize)]
    pub struct Chain {
        pub a: Option<Box<Chain>>,
    }
}

pub const USER_JSON: &[u8] = br#"{"id":1,"name":"a","email":"a@b.c"}"#;

pub fn expected_user() -> SimpleUser {
    SimpleUser {
        id: 1,
        name: "a".into(),
        email: "a@b.c".into(),
    }
}

/// `{"a":{"a":...null...}}` nested `levels` deep.
pub fn chain_json(levels: usize) -> Vec<u8> {
    format!("{}null{}", r#"{"a":"#.repeat(levels), "}".repeat(levels)).into_bytes()
}
