//! Human-readable summaries of conditions and operations.
//!
//! Pure functions over one action's data and the resolved
//! [`LookupTables`]; they never fail; unknown codes render raw.

use crate::lookup::{LookupKind, LookupTables};
use actiondump_core::{Condition, ConditionType, Operation, OperationType, Severity, TriggerValue};

/// Message bodies longer than this are shortened.
const MESSAGE_LIMIT: usize = 120;
/// Characters kept from a shortened body, before the ellipsis.
const MESSAGE_KEEP: usize = 117;
const ELLIPSIS: &str = "...";
const NO_RECIPIENT: &str = "nessun destinatario";

/// `"<type> <operator> <value>"`, e.g. `Host group = Linux servers (ID 14)`.
pub fn describe(condition: &Condition, tables: &LookupTables) -> String {
    let ct = condition.condition_type();
    let raw = condition.value.as_str();

    let value = match (LookupKind::for_condition(ct), ct) {
        (Some(kind), _) => format!("{} (ID {raw})", tables.resolve(kind, raw)),
        (None, ConditionType::TriggerSeverity) => Severity::parse(raw).to_string(),
        (None, ConditionType::TriggerValue) => TriggerValue::parse(raw).to_string(),
        (None, _) => raw.to_string(),
    };
    format!("{ct} {} {value}", condition.operator())
}

/// One described condition per line.
pub fn describe_all(conditions: &[Condition], tables: &LookupTables) -> String {
    conditions
        .iter()
        .map(|c| describe(c, tables))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per operation, in input order. Empty input gives `""`.
pub fn summarize(operations: &[Operation], tables: &LookupTables) -> String {
    operations
        .iter()
        .map(|op| summarize_one(op, tables))
        .collect::<Vec<_>>()
        .join("\n")
}

fn summarize_one(op: &Operation, tables: &LookupTables) -> String {
    let steps = step_fragment(op);
    let targets = recipients(op, tables);

    match op.operation_type() {
        OperationType::SendMessage => {
            let mut line = format!("[SEND MSG] {steps} -> {targets}");
            if let Some(msg) = &op.opmessage {
                if !msg.subject.is_empty() {
                    line.push_str(" | subject: ");
                    line.push_str(&msg.subject);
                }
                if !msg.message.is_empty() {
                    line.push_str(" | msg: ");
                    line.push_str(&shorten_message(&msg.message));
                }
            }
            line
        }
        OperationType::Other(code) => format!("[OP type {code}] {steps} -> {targets}"),
    }
}

/// `step N`, `steps N-M`, or empty when a bound is missing or zero.
fn step_fragment(op: &Operation) -> String {
    let bound = |raw: Option<&str>| {
        raw.and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|n| *n != 0)
    };
    match (bound(op.esc_step_from.as_deref()), bound(op.esc_step_to.as_deref())) {
        (Some(from), Some(to)) if from == to => format!("step {from}"),
        (Some(from), Some(to)) => format!("steps {from}-{to}"),
        _ => String::new(),
    }
}

fn recipients(op: &Operation, tables: &LookupTables) -> String {
    let users = op
        .opmessage_user
        .iter()
        .filter(|u| !u.userid.is_empty())
        .map(|u| tables.resolve(LookupKind::User, &u.userid))
        .collect::<Vec<_>>();
    let groups = op
        .opmessage_usrgrp
        .iter()
        .filter(|g| !g.usrgrpid.is_empty())
        .map(|g| tables.resolve(LookupKind::UserGroup, &g.usrgrpid))
        .collect::<Vec<_>>();

    let mut parts = Vec::with_capacity(3);
    if !users.is_empty() {
        parts.push(format!("utenti: {}", users.join(", ")));
    }
    if !groups.is_empty() {
        parts.push(format!("gruppi: {}", groups.join(", ")));
    }
    if let Some(mediatype) = op.mediatype_id() {
        parts.push(format!(
            "media type: {}",
            tables.resolve(LookupKind::MediaType, mediatype)
        ));
    }

    if parts.is_empty() {
        NO_RECIPIENT.to_string()
    } else {
        parts.join("; ")
    }
}

/// Folds newlines into spaces and caps the body at [`MESSAGE_LIMIT`] characters.
fn shorten_message(body: &str) -> String {
    let flat = body.replace('\n', " ");
    if flat.chars().count() > MESSAGE_LIMIT {
        let mut short: String = flat.chars().take(MESSAGE_KEEP).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        flat
    }
}
