//! Flattening of actions into CSV records.

use crate::error::Result;
use crate::lookup::LookupTables;
use crate::render::{describe_all, summarize};
use actiondump_core::Action;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Header of the report, in column order.
pub const COLUMNS: [&str; 21] = [
    "actionid",
    "name",
    "eventsource",
    "eventsource_text",
    "status",
    "status_text",
    "esc_period",
    "def_shortdata",
    "def_longdata",
    "r_shortdata",
    "r_longdata",
    "ack_shortdata",
    "ack_longdata",
    "conditions_human",
    "operations_human",
    "recovery_operations_human",
    "ack_operations_human",
    "filter_raw_json",
    "operations_raw_json",
    "recoveryOperations_raw_json",
    "acknowledgeOperations_raw_json",
];

/// One CSV record. Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub actionid: String,
    pub name: String,
    pub eventsource: Option<String>,
    pub eventsource_text: String,
    pub status: Option<String>,
    pub status_text: String,
    pub esc_period: Option<String>,
    pub def_shortdata: Option<String>,
    pub def_longdata: Option<String>,
    pub r_shortdata: Option<String>,
    pub r_longdata: Option<String>,
    pub ack_shortdata: Option<String>,
    pub ack_longdata: Option<String>,
    pub conditions_human: String,
    pub operations_human: String,
    pub recovery_operations_human: String,
    pub ack_operations_human: String,
    pub filter_raw_json: String,
    pub operations_raw_json: String,
    #[serde(rename = "recoveryOperations_raw_json")]
    pub recovery_operations_raw_json: String,
    #[serde(rename = "acknowledgeOperations_raw_json")]
    pub acknowledge_operations_raw_json: String,
}

impl ReportRow {
    pub fn render(action: &Action, tables: &LookupTables) -> Result<Self> {
        Ok(Self {
            actionid: action.actionid.clone(),
            name: action.name.clone(),
            eventsource: action.eventsource.clone(),
            eventsource_text: action
                .event_source()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            status: action.status.clone(),
            status_text: action
                .action_status()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            esc_period: action.esc_period.clone(),
            def_shortdata: action.def_shortdata.clone(),
            def_longdata: action.def_longdata.clone(),
            r_shortdata: action.r_shortdata.clone(),
            r_longdata: action.r_longdata.clone(),
            ack_shortdata: action.ack_shortdata.clone(),
            ack_longdata: action.ack_longdata.clone(),
            conditions_human: describe_all(&action.filter.conditions, tables),
            operations_human: summarize(&action.operations, tables),
            recovery_operations_human: summarize(&action.recovery_operations, tables),
            ack_operations_human: summarize(&action.acknowledge_operations, tables),
            filter_raw_json: serde_json::to_string(&action.raw.filter)?,
            operations_raw_json: serde_json::to_string(&action.raw.operations)?,
            recovery_operations_raw_json: serde_json::to_string(&action.raw.recovery_operations)?,
            acknowledge_operations_raw_json: serde_json::to_string(
                &action.raw.acknowledge_operations,
            )?,
        })
    }
}

/// Renders every action, in fetch order.
pub fn render_all(actions: &[Action], tables: &LookupTables) -> Result<Vec<ReportRow>> {
    actions
        .iter()
        .map(|action| ReportRow::render(action, tables))
        .collect()
}

/// Writes the header and `rows` as CSV (minimal quoting, CRLF records).
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the report into it.
pub fn write_csv_file(rows: &[ReportRow], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_csv(rows, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupKind;
    use serde_json::{json, Value};

    fn action() -> Action {
        serde_json::from_value(json!({
            "actionid": "7",
            "name": "Notify \"ops\", then escalate",
            "eventsource": "0",
            "status": "0",
            "esc_period": "1h",
            "def_shortdata": "Problem: {EVENT.NAME}",
            "def_longdata": "Host: {HOST.NAME}\nSeverity: {EVENT.SEVERITY}",
            "filter": {
                "evaltype": "0",
                "conditions": [
                    {"conditiontype": "0", "operator": "0", "value": "14", "formulaid": "A"},
                    {"conditiontype": "4", "operator": "5", "value": "4", "formulaid": "B"}
                ]
            },
            "operations": [{
                "operationtype": "0",
                "esc_step_from": "1",
                "esc_step_to": "3",
                "opmessage": {"subject": "Città", "message": "M"},
                "opmessage_user": [{"userid": "5"}]
            }],
            "recoveryOperations": [{"operationtype": "11"}]
        }))
        .unwrap()
    }

    fn tables() -> LookupTables {
        let mut t = LookupTables::default();
        t.insert(LookupKind::HostGroup, "14", "Linux servers");
        t.insert(LookupKind::User, "5", "jdoe (John Doe)");
        t
    }

    fn to_csv(rows: &[ReportRow]) -> String {
        let mut out = Vec::new();
        write_csv(rows, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn serialized_field_order_matches_columns() {
        let row = ReportRow::render(&action(), &tables()).unwrap();
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(Vec::new());
        wtr.serialize(&row).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn row_carries_decoded_and_human_fields() {
        let row = ReportRow::render(&action(), &tables()).unwrap();
        assert_eq!(row.eventsource_text, "Trigger");
        assert_eq!(row.status_text, "Enabled");
        assert_eq!(
            row.conditions_human,
            "Host group = Linux servers (ID 14)\nTrigger severity >= High"
        );
        assert_eq!(
            row.operations_human,
            "[SEND MSG] steps 1-3 -> utenti: jdoe (John Doe) | subject: Città | msg: M"
        );
        assert_eq!(row.recovery_operations_human, "[OP type 11]  -> nessun destinatario");
        assert_eq!(row.ack_operations_human, "");
        assert_eq!(row.acknowledge_operations_raw_json, "[]");
        assert!(row.r_shortdata.is_none());
    }

    #[test]
    fn raw_json_columns_parse_back_to_fetched_payloads() {
        let action = action();
        let row = ReportRow::render(&action, &tables()).unwrap();
        let parse = |s: &str| serde_json::from_str::<Value>(s).unwrap();
        assert_eq!(parse(&row.filter_raw_json), action.raw.filter);
        assert_eq!(parse(&row.operations_raw_json), action.raw.operations);
        assert_eq!(
            parse(&row.recovery_operations_raw_json),
            action.raw.recovery_operations
        );
        // non-ASCII stays literal
        assert!(row.operations_raw_json.contains("Città"));
    }

    #[test]
    fn raw_json_keeps_fetched_key_order() {
        let action: Action = serde_json::from_value(json!({
            "actionid": "9",
            "filter": {
                "evaltype": "0",
                "formula": "",
                "conditions": [{"value": "14", "operator": "0", "conditiontype": "0"}]
            }
        }))
        .unwrap();
        let row = ReportRow::render(&action, &tables()).unwrap();
        assert_eq!(
            row.filter_raw_json,
            r#"{"evaltype":"0","formula":"","conditions":[{"value":"14","operator":"0","conditiontype":"0"}]}"#
        );
    }

    #[test]
    fn csv_quotes_multiline_fields_and_round_trips() {
        let rows = vec![ReportRow::render(&action(), &tables()).unwrap()];
        let text = to_csv(&rows);
        assert!(text.starts_with(&format!("{}\r\n", COLUMNS.join(","))));

        let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS);

        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.len(), COLUMNS.len());
        assert_eq!(&record[1], "Notify \"ops\", then escalate");
        assert_eq!(&record[8], "Host: {HOST.NAME}\nSeverity: {EVENT.SEVERITY}");
        assert_eq!(&record[9], "");
        let filter: Value = serde_json::from_str(&record[17]).unwrap();
        assert_eq!(filter["conditions"][1]["value"], "4");
    }

    #[test]
    fn rendering_is_deterministic() {
        let actions = vec![action(), action()];
        let first = to_csv(&render_all(&actions, &tables()).unwrap());
        let second = to_csv(&render_all(&actions, &tables()).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn header_is_written_even_without_rows() {
        assert_eq!(to_csv(&[]), format!("{}\r\n", COLUMNS.join(",")));
    }
}
