//! Static code tables of the Zabbix action API.
//!
//! Every table is a closed enum with a catch-all variant so that codes
//! introduced by newer server versions still render (as their raw form)
//! instead of failing the export.

use std::fmt;

/// Kind of a filter condition (`conditiontype`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionType {
    HostGroup,
    Host,
    Trigger,
    TriggerName,
    TriggerSeverity,
    TriggerValue,
    TimePeriod,
    HostTemplate,
    Application,
    MaintenanceStatus,
    /// Code not covered by the table.
    Unknown(i64),
}

impl ConditionType {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::HostGroup,
            1 => Self::Host,
            2 => Self::Trigger,
            3 => Self::TriggerName,
            4 => Self::TriggerSeverity,
            5 => Self::TriggerValue,
            6 => Self::TimePeriod,
            13 => Self::HostTemplate,
            15 => Self::Application,
            16 => Self::MaintenanceStatus,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::HostGroup => 0,
            Self::Host => 1,
            Self::Trigger => 2,
            Self::TriggerName => 3,
            Self::TriggerSeverity => 4,
            Self::TriggerValue => 5,
            Self::TimePeriod => 6,
            Self::HostTemplate => 13,
            Self::Application => 15,
            Self::MaintenanceStatus => 16,
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostGroup => write!(f, "Host group"),
            Self::Host => write!(f, "Host"),
            Self::Trigger => write!(f, "Trigger"),
            Self::TriggerName => write!(f, "Trigger name"),
            Self::TriggerSeverity => write!(f, "Trigger severity"),
            Self::TriggerValue => write!(f, "Trigger value"),
            Self::TimePeriod => write!(f, "Time period"),
            Self::HostTemplate => write!(f, "Host template"),
            Self::Application => write!(f, "Application"),
            Self::MaintenanceStatus => write!(f, "Maintenance status"),
            Self::Unknown(code) => write!(f, "Type {code}"),
        }
    }
}

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    Like,
    NotLike,
    In,
    GreaterOrEqual,
    LessOrEqual,
    NotIn,
    Unknown(i64),
}

impl Operator {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Equal,
            1 => Self::NotEqual,
            2 => Self::Like,
            3 => Self::NotLike,
            4 => Self::In,
            5 => Self::GreaterOrEqual,
            6 => Self::LessOrEqual,
            7 => Self::NotIn,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "<>"),
            Self::Like => write!(f, "like"),
            Self::NotLike => write!(f, "not like"),
            Self::In => write!(f, "in"),
            Self::GreaterOrEqual => write!(f, ">="),
            Self::LessOrEqual => write!(f, "<="),
            Self::NotIn => write!(f, "not in"),
            Self::Unknown(code) => write!(f, "{code}"),
        }
    }
}

/// Trigger severity, carried as the value of a severity condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    NotClassified,
    Information,
    Warning,
    Average,
    High,
    Disaster,
    Unknown(String),
}

impl Severity {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "0" => Self::NotClassified,
            "1" => Self::Information,
            "2" => Self::Warning,
            "3" => Self::Average,
            "4" => Self::High,
            "5" => Self::Disaster,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotClassified => write!(f, "Not classified"),
            Self::Information => write!(f, "Information"),
            Self::Warning => write!(f, "Warning"),
            Self::Average => write!(f, "Average"),
            Self::High => write!(f, "High"),
            Self::Disaster => write!(f, "Disaster"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Trigger state, carried as the value of a trigger-value condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TriggerValue {
    Ok,
    Problem,
    Unknown(String),
}

impl TriggerValue {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "0" => Self::Ok,
            "1" => Self::Problem,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TriggerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Problem => write!(f, "PROBLEM"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Origin of the events an action reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventSource {
    Trigger,
    Discovery,
    AutoRegistration,
    Internal,
    Service,
    Unknown(String),
}

impl EventSource {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "0" => Self::Trigger,
            "1" => Self::Discovery,
            "2" => Self::AutoRegistration,
            "3" => Self::Internal,
            "4" => Self::Service,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire code used in `action.get` filters.
    pub fn code(&self) -> &str {
        match self {
            Self::Trigger => "0",
            Self::Discovery => "1",
            Self::AutoRegistration => "2",
            Self::Internal => "3",
            Self::Service => "4",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trigger => write!(f, "Trigger"),
            Self::Discovery => write!(f, "Discovery"),
            Self::AutoRegistration => write!(f, "Auto registration"),
            Self::Internal => write!(f, "Internal"),
            Self::Service => write!(f, "Service"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionStatus {
    Enabled,
    Disabled,
    Unknown(String),
}

impl ActionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "0" => Self::Enabled,
            "1" => Self::Disabled,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => write!(f, "Enabled"),
            Self::Disabled => write!(f, "Disabled"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// Operation kind. Only "send message" gets a dedicated rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    SendMessage,
    Other(i64),
}

impl OperationType {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::SendMessage,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::SendMessage => 0,
            Self::Other(code) => code,
        }
    }
}
