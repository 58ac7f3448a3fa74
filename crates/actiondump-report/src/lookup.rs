//! Batched resolution of the identifiers referenced by a set of actions.
//!
//! Identifiers are gathered per category across the whole action set first,
//! then each non-empty category is resolved with exactly one `*.get` call.
//! Rendering afterwards never touches the network. Identifiers the server
//! does not return simply stay unresolved and render as themselves.

use crate::error::{ReportError, Result};
use actiondump_core::{Action, ConditionType};
use actiondump_rpc::{AuthToken, RpcClient, Transport};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

/// Foreign-key categories found in actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LookupKind {
    HostGroup,
    Host,
    Template,
    Trigger,
    User,
    UserGroup,
    MediaType,
}

impl LookupKind {
    pub const ALL: [LookupKind; 7] = [
        Self::HostGroup,
        Self::Host,
        Self::Template,
        Self::Trigger,
        Self::User,
        Self::UserGroup,
        Self::MediaType,
    ];

    /// Category whose identifiers a condition of type `ct` carries as value.
    ///
    /// Severity, trigger value, time period and the remaining types hold
    /// codes or free text and are never resolved remotely.
    pub fn for_condition(ct: ConditionType) -> Option<Self> {
        match ct {
            ConditionType::HostGroup => Some(Self::HostGroup),
            ConditionType::Host => Some(Self::Host),
            ConditionType::Trigger => Some(Self::Trigger),
            ConditionType::HostTemplate => Some(Self::Template),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::HostGroup => "host groups",
            Self::Host => "hosts",
            Self::Template => "templates",
            Self::Trigger => "triggers",
            Self::User => "users",
            Self::UserGroup => "user groups",
            Self::MediaType => "media types",
        })
    }
}

/// How a resolved object is turned into its display label.
#[derive(Debug, Clone, Copy)]
enum LabelRule {
    Field(&'static str),
    /// `alias (name surname)` with fallbacks.
    User,
    /// `name`, else `description`.
    MediaType,
}

/// One batched lookup: which API method resolves a category and how.
#[derive(Debug)]
struct Descriptor {
    kind: LookupKind,
    method: &'static str,
    id_field: &'static str,
    output: &'static [&'static str],
    label: LabelRule,
}

const DESCRIPTORS: [Descriptor; 7] = [
    Descriptor {
        kind: LookupKind::HostGroup,
        method: "hostgroup.get",
        id_field: "groupid",
        output: &["groupid", "name"],
        label: LabelRule::Field("name"),
    },
    Descriptor {
        kind: LookupKind::Host,
        method: "host.get",
        id_field: "hostid",
        output: &["hostid", "host"],
        label: LabelRule::Field("host"),
    },
    Descriptor {
        kind: LookupKind::Template,
        method: "template.get",
        id_field: "templateid",
        output: &["templateid", "name"],
        label: LabelRule::Field("name"),
    },
    Descriptor {
        kind: LookupKind::Trigger,
        method: "trigger.get",
        id_field: "triggerid",
        output: &["triggerid", "description"],
        label: LabelRule::Field("description"),
    },
    Descriptor {
        kind: LookupKind::User,
        method: "user.get",
        id_field: "userid",
        output: &["userid", "alias", "name", "surname"],
        label: LabelRule::User,
    },
    Descriptor {
        kind: LookupKind::UserGroup,
        method: "usergroup.get",
        id_field: "usrgrpid",
        output: &["usrgrpid", "name"],
        label: LabelRule::Field("name"),
    },
    Descriptor {
        kind: LookupKind::MediaType,
        method: "mediatype.get",
        id_field: "mediatypeid",
        output: &["mediatypeid", "name", "description"],
        label: LabelRule::MediaType,
    },
];

impl Descriptor {
    /// `{"output": [...], "<id_field>s": [...]}`
    fn params(&self, ids: &BTreeSet<String>) -> Value {
        let mut params = Map::new();
        params.insert(
            "output".into(),
            Value::from(self.output.iter().map(|f| f.to_string()).collect::<Vec<_>>()),
        );
        params.insert(
            format!("{}s", self.id_field),
            Value::from(ids.iter().cloned().collect::<Vec<_>>()),
        );
        Value::Object(params)
    }

    /// Extracts `(id, label)` from one returned object.
    fn entry(&self, object: &Value) -> Option<(String, String)> {
        let id = text(object, self.id_field)?;
        let label = match self.label {
            LabelRule::Field(field) => text(object, field)?,
            LabelRule::User => user_label(object).unwrap_or_else(|| id.clone()),
            LabelRule::MediaType => text(object, "name")
                .or_else(|| text(object, "description"))
                .unwrap_or_else(|| id.clone()),
        };
        Some((id, label))
    }
}

/// Non-empty string or number member of `object`.
fn text(object: &Value, field: &str) -> Option<String> {
    match object.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Account name combined with the real name: `alias (first last)`.
fn user_label(user: &Value) -> Option<String> {
    let alias = text(user, "alias")
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());
    let full_name = [text(user, "name"), text(user, "surname")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    match (alias, full_name.is_empty()) {
        (Some(alias), false) => Some(format!("{alias} ({full_name})")),
        (Some(alias), true) => Some(alias),
        (None, false) => Some(full_name),
        (None, true) => None,
    }
}

/// Distinct identifiers per category, ordered for deterministic requests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdSets {
    sets: [BTreeSet<String>; 7],
}

impl IdSets {
    pub fn collect(actions: &[Action]) -> Self {
        let mut ids = Self::default();
        for action in actions {
            for condition in &action.filter.conditions {
                if let Some(kind) = LookupKind::for_condition(condition.condition_type()) {
                    ids.insert(kind, &condition.value);
                }
            }
            for op in action.all_operations() {
                for user in &op.opmessage_user {
                    ids.insert(LookupKind::User, &user.userid);
                }
                for group in &op.opmessage_usrgrp {
                    ids.insert(LookupKind::UserGroup, &group.usrgrpid);
                }
                if let Some(mediatype) = op.mediatype_id() {
                    ids.insert(LookupKind::MediaType, mediatype);
                }
            }
        }
        ids
    }

    fn insert(&mut self, kind: LookupKind, id: &str) {
        if !id.is_empty() {
            self.sets[kind.index()].insert(id.to_string());
        }
    }

    pub fn get(&self, kind: LookupKind) -> &BTreeSet<String> {
        &self.sets[kind.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.sets.iter().all(BTreeSet::is_empty)
    }
}

/// Seven id → label tables, one per [`LookupKind`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LookupTables {
    maps: [BTreeMap<String, String>; 7],
}

impl LookupTables {
    pub fn get(&self, kind: LookupKind) -> &BTreeMap<String, String> {
        &self.maps[kind.index()]
    }

    pub fn insert(&mut self, kind: LookupKind, id: impl Into<String>, label: impl Into<String>) {
        self.maps[kind.index()].insert(id.into(), label.into());
    }

    /// Label for `id`, or `id` itself when it was not resolved.
    pub fn resolve<'a>(&'a self, kind: LookupKind, id: &'a str) -> &'a str {
        self.get(kind).get(id).map_or(id, String::as_str)
    }
}

/// Resolves every identifier referenced by `actions`.
///
/// Issues at most one call per category and none for categories without
/// references.
pub fn build<T: Transport>(
    actions: &[Action],
    rpc: &RpcClient<T>,
    token: &AuthToken,
) -> Result<LookupTables> {
    let ids = IdSets::collect(actions);
    let mut tables = LookupTables::default();

    for descriptor in &DESCRIPTORS {
        let wanted = ids.get(descriptor.kind);
        if wanted.is_empty() {
            debug!(kind = %descriptor.kind, "no references, skipping lookup");
            continue;
        }
        info!(kind = %descriptor.kind, count = wanted.len(), "resolving identifiers");

        let result = rpc.call(descriptor.method, descriptor.params(wanted), Some(token))?;
        let objects = match &result {
            Value::Array(objects) => objects,
            other => {
                return Err(ReportError::UnexpectedShape {
                    method: descriptor.method,
                    found: json_kind(other),
                })
            }
        };
        for (id, label) in objects.iter().filter_map(|o| descriptor.entry(o)) {
            tables.insert(descriptor.kind, id, label);
        }

        let missing = wanted
            .iter()
            .filter(|id| !tables.get(descriptor.kind).contains_key(*id))
            .count();
        if missing > 0 {
            debug!(kind = %descriptor.kind, missing, "unresolved identifiers keep their raw id");
        }
    }

    Ok(tables)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
