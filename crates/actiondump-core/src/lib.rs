//! Shared vocabulary for actiondump.
//!
//! Holds the read-only snapshot of a Zabbix action as returned by
//! `action.get` ([`model`]) and the static code tables used to turn the
//! numeric codes inside it into labels ([`vocab`]).

pub mod de;
pub mod model;
pub mod vocab;

pub use model::{
    Action, Condition, Filter, OpMessage, Operation, RawPayloads, UserGroupRef, UserRef,
};
pub use vocab::{
    ActionStatus, ConditionType, EventSource, OperationType, Operator, Severity, TriggerValue,
};
