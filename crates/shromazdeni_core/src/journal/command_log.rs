//! CSV command log writer and replay of recorded commands.

use super::{JournalError, JournalResult};
use crate::ledger::{Command, Ledger};
use chrono::{DateTime, Local};
use log::warn;
use std::io::{Read, Write};

/// Fixed first record of every command log.
pub const LOG_HEADER: [&str; 3] = ["date", "operation", "*args"];
/// Wall-clock resolution of record timestamps.
pub const TIME_FORMAT: &str = "%H:%M";

/// Append-only CSV sink of mutating ledger calls.
pub struct CommandLog<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CommandLog<W> {
    /// Wraps a sink positioned after existing records.
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_writer(sink);
        Self { writer }
    }

    /// Starts a new log by writing and flushing the header record.
    pub fn create(sink: W) -> JournalResult<Self> {
        let mut log = Self::new(sink);
        log.writer.write_record(LOG_HEADER)?;
        log.writer.flush()?;
        Ok(log)
    }

    /// Appends `command` stamped with the current local time.
    pub fn append(&mut self, command: &Command) -> JournalResult<()> {
        self.append_at(command, Local::now())
    }

    /// Appends `command` stamped with `at`, then flushes the sink.
    pub fn append_at(&mut self, command: &Command, at: DateTime<Local>) -> JournalResult<()> {
        let time = at.format(TIME_FORMAT).to_string();
        let mut record = vec![time.as_str(), command.operation()];
        record.extend(command.args());
        self.writer.write_record(&record)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }
}

/// Replays a command log into `ledger`, returning the number of applied
/// records.
///
/// An empty source yields zero records. Replay stops at the first record that
/// cannot be decoded or applied; `ledger` then holds the state reached so far
/// and must not be used for the meeting.
pub fn replay<R: Read>(source: R, ledger: &mut Ledger) -> JournalResult<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    let mut records = reader.records();

    match records.next() {
        None => return Ok(0),
        Some(header) => {
            let header = header?;
            if !header.iter().eq(LOG_HEADER.iter().copied()) {
                return Err(JournalError::InvalidHeader(
                    header.iter().map(str::to_string).collect(),
                ));
            }
        }
    }

    let mut applied = 0;
    for record in records {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let command = decode_record(&record, line)?;
        ledger
            .apply(&command)
            .map_err(|source| JournalError::Replay {
                line,
                operation: command.operation().to_string(),
                source,
            })?;
        applied += 1;
    }

    Ok(applied)
}

fn decode_record(record: &csv::StringRecord, line: u64) -> JournalResult<Command> {
    let operation = record
        .get(1)
        .ok_or(JournalError::TruncatedRecord { line })?;
    let args: Vec<String> = record.iter().skip(2).map(str::to_string).collect();

    let Some(expected) = Command::arity(operation) else {
        warn!("event=journal_replay module=journal status=error error_code=unknown_operation line={line}");
        return Err(JournalError::UnknownOperation {
            line,
            operation: operation.to_string(),
        });
    };
    Command::from_parts(operation, &args).ok_or_else(|| JournalError::InvalidArity {
        line,
        operation: operation.to_string(),
        expected,
        found: args.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::{replay, CommandLog};
    use crate::journal::JournalError;
    use crate::ledger::{Command, Ledger, LedgerError};
    use crate::model::flat::{Flat, Owner};
    use crate::model::fraction::parse_fraction;
    use chrono::{Local, TimeZone};
    use std::collections::BTreeSet;

    fn ledger() -> Ledger {
        Ledger::new(vec![
            Flat::new("1", parse_fraction("1/2").unwrap(), vec![Owner::sole("A")], BTreeSet::new()),
            Flat::new("2", parse_fraction("1/2").unwrap(), vec![Owner::sole("B")], BTreeSet::new()),
        ])
    }

    fn written(log: &CommandLog<Vec<u8>>) -> String {
        String::from_utf8(log.get_ref().clone()).unwrap()
    }

    #[test]
    fn create_writes_header_and_append_writes_records() {
        let mut log = CommandLog::create(Vec::new()).unwrap();
        let at = Local.with_ymd_and_hms(2024, 5, 1, 18, 7, 42).unwrap();
        log.append_at(
            &Command::RepresentFlat {
                flat: "1".to_string(),
                person: "Novák, Petr".to_string(),
            },
            at,
        )
        .unwrap();

        assert_eq!(
            written(&log),
            "date,operation,*args\n18:07,represent_flat,1,\"Novák, Petr\"\n"
        );
    }

    #[test]
    fn replay_skips_header_and_applies_in_order() {
        let source = "date,operation,*args\n\
                      18:00,add_person,Jana\n\
                      18:01,represent_flat,1,Jana\n\
                      18:02,represent_flat,2,Jana\n\
                      18:03,remove_flat_representative,1\n";
        let mut ledger = ledger();

        let applied = replay(source.as_bytes(), &mut ledger).unwrap();

        assert_eq!(applied, 4);
        assert_eq!(ledger.get_representative_flats("Jana"), vec!["2"]);
    }

    #[test]
    fn replay_of_empty_source_is_a_noop() {
        let mut ledger = ledger();
        assert_eq!(replay("".as_bytes(), &mut ledger).unwrap(), 0);
    }

    #[test]
    fn replay_rejects_foreign_header() {
        let mut ledger = ledger();
        let err = replay("time,op\n".as_bytes(), &mut ledger).unwrap_err();
        assert!(matches!(err, JournalError::InvalidHeader(_)));
    }

    #[test]
    fn replay_reports_unknown_operation_with_line() {
        let mut ledger = ledger();
        let source = "date,operation,*args\n18:00,add_person,Jana\n18:01,explode,1\n";
        let err = replay(source.as_bytes(), &mut ledger).unwrap_err();
        assert!(
            matches!(err, JournalError::UnknownOperation { line: 3, ref operation } if operation == "explode"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn replay_reports_wrong_arity() {
        let mut ledger = ledger();
        let source = "date,operation,*args\n18:00,represent_flat,1\n";
        let err = replay(source.as_bytes(), &mut ledger).unwrap_err();
        assert!(matches!(
            err,
            JournalError::InvalidArity {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn replay_surfaces_ledger_failures() {
        let mut ledger = ledger();
        let source = "date,operation,*args\n18:00,remove_person,Ghost\n";
        let err = replay(source.as_bytes(), &mut ledger).unwrap_err();
        assert!(matches!(
            err,
            JournalError::Replay {
                line: 2,
                source: LedgerError::PersonNotFound(_),
                ..
            }
        ));
    }
}
