// 🔧 Tool - never persisted, built per request

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub make: String,
}

impl Tool {
    pub fn new(name: &str, make: &str) -> Self {
        Tool {
            name: name.to_string(),
            make: make.to_string(),
        }
    }
}

/// Body of `GET /vehicles/list_tools/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolListing {
    pub tools: Vec<Tool>,
}

/// The fixed tool listing. Independent of anything in storage.
pub fn list_tools() -> ToolListing {
    ToolListing {
        tools: vec![Tool::new("hammer", "Mastercraft"), Tool::new("wrench", "Husky")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_tools_is_fixed_pair() {
        let json = serde_json::to_value(list_tools()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "tools": [
                    {"name": "hammer", "make": "Mastercraft"},
                    {"name": "wrench", "make": "Husky"},
                ]
            })
        );
    }
}
