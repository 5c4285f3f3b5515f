//! Request payloads sent to the server.

use crate::error::ValidationError;
use crate::types::StreamRuleType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload for creating a stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateStreamRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<String>,
    #[serde(default)]
    pub rules: Vec<CreateStreamRuleRequest>,
}

impl CreateStreamRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn creator_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.creator_user_id = Some(user_id.into());
        self
    }

    pub fn rule(mut self, rule: CreateStreamRuleRequest) -> Self {
        self.rules.push(rule);
        self
    }

    /// Check the title and every rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::new("title", "is required"));
        }
        for (i, rule) in self.rules.iter().enumerate() {
            rule.validate().map_err(|e| {
                ValidationError::new(format!("rules[{}].{}", i, e.field), e.reason)
            })?;
        }
        Ok(())
    }
}

/// Payload for one stream rule, standalone or nested in [`CreateStreamRequest`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateStreamRuleRequest {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: i32,
    #[serde(default)]
    pub inverted: bool,
}

impl CreateStreamRuleRequest {
    pub fn new(field: impl Into<String>, rule_type: StreamRuleType) -> Self {
        Self {
            field: field.into(),
            value: None,
            rule_type: rule_type.code(),
            inverted: false,
        }
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.field.is_empty() {
            return Err(ValidationError::new("field", "is required"));
        }
        if !StreamRuleType::from_code(self.rule_type).is_known() {
            return Err(ValidationError::new(
                "type",
                format!("unknown rule type {}", self.rule_type),
            ));
        }
        Ok(())
    }
}

/// Payload for attaching an alert condition to a stream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateAlertConditionRequest {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

impl CreateAlertConditionRequest {
    pub fn new(condition_type: impl Into<String>) -> Self {
        Self {
            condition_type: condition_type.into(),
            parameters: Map::new(),
        }
    }

    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.condition_type.is_empty() {
            return Err(ValidationError::new("type", "is required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_required() {
        assert_eq!(
            CreateStreamRequest::new("").validate(),
            Err(ValidationError::new("title", "is required"))
        );
        assert!(CreateStreamRequest::new("errors").validate().is_ok());
    }

    #[test]
    fn test_required_fields_accept_whitespace() {
        assert!(CreateStreamRequest::new(" ").validate().is_ok());
        assert!(CreateStreamRuleRequest::new(" ", StreamRuleType::Presence)
            .validate()
            .is_ok());
        assert!(CreateAlertConditionRequest::new(" ").validate().is_ok());
        assert_eq!(
            CreateAlertConditionRequest::new("").validate().unwrap_err().field,
            "type"
        );
    }

    #[test]
    fn test_rules_validated_independently() {
        let request = CreateStreamRequest::new("errors")
            .rule(CreateStreamRuleRequest::new("level", StreamRuleType::Smaller).value("4"))
            .rule(CreateStreamRuleRequest::new("", StreamRuleType::Presence));

        let err = request.validate().unwrap_err();
        assert_eq!(err.field, "rules[1].field");
    }

    #[test]
    fn test_unknown_rule_type_rejected() {
        let rule = CreateStreamRuleRequest {
            field: "source".to_string(),
            value: Some("web01".to_string()),
            rule_type: 9,
            inverted: false,
        };
        assert_eq!(rule.validate().unwrap_err().field, "type");
    }

    #[test]
    fn test_create_stream_wire_format() {
        let request = CreateStreamRequest::new("errors")
            .creator_user_id("admin")
            .rule(CreateStreamRuleRequest::new("level", StreamRuleType::Exact).value("3"));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "title": "errors",
                "creator_user_id": "admin",
                "rules": [{"field": "level", "value": "3", "type": 1, "inverted": false}]
            })
        );
    }

    #[test]
    fn test_alert_condition_parameters() {
        let request = CreateAlertConditionRequest::new("message_count")
            .parameter("threshold", 100)
            .parameter("threshold_type", "more")
            .parameter("time", 5);

        assert!(request.validate().is_ok());
        assert_eq!(request.parameters["threshold"], json!(100));
    }
}
