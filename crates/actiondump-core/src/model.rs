//! Read-only snapshot of a Zabbix action.
//!
//! [`Action`] is deserialized from one element of the `action.get` result.
//! The typed view only carries what the report needs; the untouched JSON
//! of the filter and the three operation lists is kept in [`RawPayloads`]
//! so the export can reproduce it losslessly.

use crate::de;
use crate::vocab::{ActionStatus, ConditionType, EventSource, OperationType, Operator};
use serde::Deserialize;
use serde_json::{json, Value};

/// A single filter condition: `(conditiontype, operator, value)`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Condition {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub conditiontype: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub operator: Option<String>,
    /// Raw value; an identifier, an enumerated code or free text depending
    /// on the condition type.
    #[serde(default, deserialize_with = "de::string")]
    pub value: String,
}

impl Condition {
    /// A missing type reads as code `-1`.
    pub fn condition_type(&self) -> ConditionType {
        ConditionType::from_code(de::parse_code(self.conditiontype.as_deref(), -1))
    }

    /// A missing operator reads as `=` (code `0`).
    pub fn operator(&self) -> Operator {
        Operator::from_code(de::parse_code(self.operator.as_deref(), 0))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Filter {
    #[serde(default, deserialize_with = "de::null_default")]
    pub conditions: Vec<Condition>,
}

/// Message payload of a "send message" operation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpMessage {
    #[serde(default, deserialize_with = "de::string")]
    pub subject: String,
    #[serde(default, deserialize_with = "de::string")]
    pub message: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub mediatypeid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserRef {
    #[serde(default, deserialize_with = "de::string")]
    pub userid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserGroupRef {
    #[serde(default, deserialize_with = "de::string")]
    pub usrgrpid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Operation {
    #[serde(default, deserialize_with = "de::opt_string")]
    pub operationtype: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub esc_step_from: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub esc_step_to: Option<String>,
    #[serde(default, deserialize_with = "de::object_or_none")]
    pub opmessage: Option<OpMessage>,
    /// Recipient users. Servers name this list `opmessage_usr`.
    #[serde(default, alias = "opmessage_usr", deserialize_with = "de::null_default")]
    pub opmessage_user: Vec<UserRef>,
    /// Recipient groups. Servers name this list `opmessage_grp`.
    #[serde(default, alias = "opmessage_grp", deserialize_with = "de::null_default")]
    pub opmessage_usrgrp: Vec<UserGroupRef>,
}

impl Operation {
    /// A missing type reads as code `-1`.
    pub fn operation_type(&self) -> OperationType {
        OperationType::from_code(de::parse_code(self.operationtype.as_deref(), -1))
    }

    /// Media type referenced by the message payload, if any.
    pub fn mediatype_id(&self) -> Option<&str> {
        self.opmessage
            .as_ref()
            .and_then(|m| m.mediatypeid.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Untouched JSON of the nested structures, as fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPayloads {
    pub filter: Value,
    pub operations: Value,
    pub recovery_operations: Value,
    pub acknowledge_operations: Value,
}

impl RawPayloads {
    /// Copies the nested payloads out of an `action.get` element.
    ///
    /// A missing or `null` filter becomes `{}`, missing lists become `[]`.
    fn capture(action: &Value) -> Self {
        let member = |key: &str, empty: Value| {
            action
                .get(key)
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or(empty)
        };
        Self {
            filter: member("filter", json!({})),
            operations: member("operations", json!([])),
            recovery_operations: member("recoveryOperations", json!([])),
            acknowledge_operations: member("acknowledgeOperations", json!([])),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ActionFields {
    #[serde(default, deserialize_with = "de::string")]
    actionid: String,
    #[serde(default, deserialize_with = "de::string")]
    name: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    eventsource: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    esc_period: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    def_shortdata: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    def_longdata: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    r_shortdata: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    r_longdata: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    ack_shortdata: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    ack_longdata: Option<String>,
    #[serde(default, deserialize_with = "de::object_or_none")]
    filter: Option<Filter>,
    #[serde(default, deserialize_with = "de::null_default")]
    operations: Vec<Operation>,
    #[serde(default, rename = "recoveryOperations", deserialize_with = "de::null_default")]
    recovery_operations: Vec<Operation>,
    #[serde(default, rename = "acknowledgeOperations", deserialize_with = "de::null_default")]
    acknowledge_operations: Vec<Operation>,
}

/// A Zabbix action ("rule"): filter conditions plus notification operations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Action {
    pub actionid: String,
    pub name: String,
    pub eventsource: Option<String>,
    pub status: Option<String>,
    pub esc_period: Option<String>,
    pub def_shortdata: Option<String>,
    pub def_longdata: Option<String>,
    pub r_shortdata: Option<String>,
    pub r_longdata: Option<String>,
    pub ack_shortdata: Option<String>,
    pub ack_longdata: Option<String>,
    pub filter: Filter,
    pub operations: Vec<Operation>,
    pub recovery_operations: Vec<Operation>,
    pub acknowledge_operations: Vec<Operation>,
    pub raw: RawPayloads,
}

impl Action {
    pub fn event_source(&self) -> Option<EventSource> {
        self.eventsource.as_deref().map(EventSource::parse)
    }

    pub fn action_status(&self) -> Option<ActionStatus> {
        self.status.as_deref().map(ActionStatus::parse)
    }

    /// Primary, recovery and acknowledge operations, in that order.
    pub fn all_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations
            .iter()
            .chain(&self.recovery_operations)
            .chain(&self.acknowledge_operations)
    }
}

impl TryFrom<Value> for Action {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let raw = RawPayloads::capture(&value);
        let fields = ActionFields::deserialize(&value)?;
        Ok(Self {
            actionid: fields.actionid,
            name: fields.name,
            eventsource: fields.eventsource,
            status: fields.status,
            esc_period: fields.esc_period,
            def_shortdata: fields.def_shortdata,
            def_longdata: fields.def_longdata,
            r_shortdata: fields.r_shortdata,
            r_longdata: fields.r_longdata,
            ack_shortdata: fields.ack_shortdata,
            ack_longdata: fields.ack_longdata,
            filter: fields.filter.unwrap_or_default(),
            operations: fields.operations,
            recovery_operations: fields.recovery_operations,
            acknowledge_operations: fields.acknowledge_operations,
            raw,
        })
    }
}
