//! Interactive line shell over the logged ledger.
//!
//! # Responsibility
//! - Turn typed commands into ledger queries and logged mutations.
//! - Print ledger rejections and continue; stop only on journal failures.
//!
//! # Invariants
//! - The shell never mutates flats or persons except through `LoggedLedger`.
//! - The prompt always reflects the current quorum state.
//! - Ctrl-C and end of input ask before leaving, like `quit`.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use shromazdeni_core::{format_percent, Flat, LoggedLedger, SessionError, SessionResult};
use std::collections::BTreeSet;
use std::io::Write;

const FLATS_PER_ROW: usize = 10;
const NEW_PERSON_CHOICE: &str = "New Person";

/// Why no line was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Input is exhausted; later reads end the same way.
    Eof,
}

/// Source of typed lines.
pub trait LineInput {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputEnd>;
}

impl LineInput for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputEnd> {
        match self.readline(prompt) {
            Ok(line) => {
                let _ = self.add_history_entry(line.as_str());
                Ok(line)
            }
            Err(ReadlineError::Interrupted) => Err(InputEnd::Interrupted),
            Err(_) => Err(InputEnd::Eof),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W: Write, I: LineInput, O: Write> {
    session: LoggedLedger<W>,
    input: I,
    out: O,
}

impl<W: Write, I: LineInput, O: Write> Shell<W, I, O> {
    pub fn new(session: LoggedLedger<W>, input: I, out: O) -> Self {
        Self {
            session,
            input,
            out,
        }
    }

    /// Reads and executes commands until a confirmed quit.
    ///
    /// Ctrl-C and end of input ask for the same confirmation as `quit`.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let prompt = self.prompt();
            let flow = match self.input.read_line(&prompt) {
                Ok(line) => self.execute(&line)?,
                Err(_) => {
                    writeln!(self.out)?;
                    self.quit_if_confirmed()
                }
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// `Y` or `N` for the quorum, then the represented percentage.
    pub fn prompt(&self) -> String {
        let ledger = self.session.ledger();
        let can_start = if ledger.quorum_reached() { 'Y' } else { 'N' };
        format!(
            "{can_start}{}> ",
            format_percent(&ledger.percent_represented(), 1)
        )
    }

    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, args)) => (command, args.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "flat" | "f" => self.do_flat(args)?,
            "add" => self.do_add(args)?,
            "remove" => self.do_remove(args)?,
            "persons" => self.do_persons()?,
            "help" => self.do_help()?,
            "quit" | "q" => return Ok(self.quit_if_confirmed()),
            _ => writeln!(self.out, "*** Unknown syntax: {line}")?,
        }
        Ok(Flow::Continue)
    }

    fn do_flat(&mut self, args: &str) -> Result<()> {
        let ledger = self.session.ledger();
        if args.is_empty() {
            let names: Vec<String> = ledger.flats().map(Flat::display_name).collect();
            for row in names.chunks(FLATS_PER_ROW) {
                writeln!(self.out, "{}", row.join("  "))?;
            }
            return Ok(());
        }

        let Ok(flat) = ledger.get_flat(args) else {
            writeln!(self.out, "Unit \"{args}\" not found.")?;
            return Ok(());
        };
        writeln!(self.out, "Owners:")?;
        write_owners(&mut self.out, flat)?;
        if let Some(person) = flat.representative() {
            writeln!(self.out, "Represented by {person}")?;
        }
        Ok(())
    }

    fn do_add(&mut self, args: &str) -> Result<()> {
        if args.is_empty() {
            writeln!(self.out, "No flats passed.\nuse \"add [flat1] [flat2]\"")?;
            return Ok(());
        }

        // Listing an already represented flat still offers its representative.
        let mut candidates = BTreeSet::new();
        let mut new_flats = Vec::new();
        let ledger = self.session.ledger();
        for name in args.split_whitespace() {
            let Ok(flat) = ledger.get_flat(name) else {
                writeln!(self.out, "Unit \"{name}\" not found.")?;
                return Ok(());
            };
            match flat.representative() {
                Some(person) => {
                    candidates.insert(person.to_string());
                    writeln!(
                        self.out,
                        "Ignoring {name}. It is already represented by {person}."
                    )?;
                }
                None => {
                    candidates.extend(flat.persons.iter().cloned());
                    new_flats.push(name.to_string());
                    write_flat_owners(&mut self.out, flat)?;
                }
            }
        }
        if new_flats.is_empty() {
            return Ok(());
        }

        let Some(person) = self.choose_person(&candidates)? else {
            return Ok(());
        };
        let mut represented_owners = BTreeSet::new();
        for name in &new_flats {
            if self.represent(name, &person, &mut represented_owners)?.is_none() {
                return Ok(());
            }
        }

        // The person may co-own another unit, e.g. a share of the garage.
        let others = self.session.ledger().get_other_representatives(&person);
        for other in others {
            write_flat_owners(&mut self.out, self.session.ledger().get_flat(&other)?)?;
            let question = format!("Should the person also represent flat {other}?");
            if self.confirm(&question) {
                self.represent(&other, &person, &mut represented_owners)?;
            }
        }

        let hints: Vec<&str> = self
            .session
            .ledger()
            .flats()
            .filter(|flat| !flat.is_represented() && !flat.persons.is_disjoint(&represented_owners))
            .map(|flat| flat.name.as_str())
            .collect();
        if !hints.is_empty() {
            writeln!(
                self.out,
                "Should {person} also represent: {}?",
                hints.join(", ")
            )?;
        }
        Ok(())
    }

    fn do_remove(&mut self, args: &str) -> Result<()> {
        if args.is_empty() {
            writeln!(self.out, "No argument. Use \"remove [flat or person]\"")?;
            return Ok(());
        }

        let flat_representative = self
            .session
            .ledger()
            .get_flat(args)
            .ok()
            .map(|flat| flat.representative().map(str::to_string));
        match flat_representative {
            Some(None) => writeln!(self.out, "\"{args}\" is not represented.")?,
            Some(Some(person)) => {
                let flats = self.session.ledger().get_representative_flats(&person);
                if flats.len() <= 1 {
                    self.remove_person(&person)?;
                } else {
                    writeln!(self.out, "{person} no longer represents {args}.")?;
                    let result = self.session.remove_flat_representative(args);
                    self.handle(result)?;
                }
            }
            None if self.session.ledger().person_exists(args) => self.remove_person(args)?,
            None => writeln!(self.out, "\"{args}\" is neither flat or person.")?,
        }
        Ok(())
    }

    fn do_persons(&mut self) -> Result<()> {
        let ledger = self.session.ledger();
        let mut any = false;
        for person in ledger.persons() {
            any = true;
            let flats = ledger.get_representative_flats(&person.name);
            writeln!(
                self.out,
                "{} ({}): {}",
                person.name,
                person.created_at.format("%H:%M"),
                flats.join(", ")
            )?;
        }
        if !any {
            writeln!(self.out, "Nobody is present.")?;
        }
        Ok(())
    }

    fn do_help(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "flat [unit]         list units or show one unit\n\
             add unit...         add a representative for units\n\
             remove unit|person  remove a representative or a person\n\
             persons             list present persons\n\
             quit                leave the shell"
        )?;
        Ok(())
    }

    fn remove_person(&mut self, name: &str) -> Result<()> {
        let result = self.session.remove_person(name);
        if let Some(released) = self.handle(result)? {
            for flat in released {
                writeln!(self.out, "{name} no longer represents {flat}.")?;
            }
            writeln!(self.out, "{name} left.")?;
        }
        Ok(())
    }

    fn represent(
        &mut self,
        flat_name: &str,
        person: &str,
        represented_owners: &mut BTreeSet<String>,
    ) -> Result<Option<()>> {
        let result = self.session.represent_flat(flat_name, person);
        let outcome = self.handle(result)?;
        if outcome.is_some() {
            let flat = self.session.ledger().get_flat(flat_name)?;
            represented_owners.extend(flat.persons.iter().cloned());
        }
        Ok(outcome)
    }

    fn choose_person(&mut self, candidates: &BTreeSet<String>) -> Result<Option<String>> {
        let mut options = vec![NEW_PERSON_CHOICE.to_string()];
        options.extend(candidates.iter().cloned());

        let Some(index) = self.choice_from("Select representation", &options)? else {
            return Ok(None);
        };
        let name = if index == 0 {
            let Ok(name) = self.input.read_line("Name: ") else {
                return Ok(None);
            };
            let name = name.trim().to_string();
            if name.is_empty() || !self.confirm("Create new person?") {
                return Ok(None);
            }
            name
        } else {
            options.swap_remove(index)
        };

        if !self.session.ledger().person_exists(&name) {
            let result = self.session.add_person(&name);
            if self.handle(result)?.is_none() {
                return Ok(None);
            }
        }
        Ok(Some(name))
    }

    fn choice_from(&mut self, title: &str, choices: &[String]) -> Result<Option<usize>> {
        loop {
            writeln!(self.out, "{title}")?;
            for (index, choice) in choices.iter().enumerate() {
                writeln!(self.out, "{index:2}) {choice}")?;
            }
            let Ok(line) = self.input.read_line("Choice [empty to cancel]> ") else {
                return Ok(None);
            };
            let line = line.trim();
            if line.is_empty() {
                return Ok(None);
            }
            match line.parse::<usize>() {
                Ok(index) if index < choices.len() => return Ok(Some(index)),
                _ => writeln!(self.out, "invalid choice")?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.input
            .read_line(&format!("\n{question} [yN]> "))
            .is_ok_and(|answer| is_yes(&answer))
    }

    /// Exhausted input counts as yes, otherwise the shell could never leave.
    fn quit_if_confirmed(&mut self) -> Flow {
        match self.input.read_line("\nReally quit? [yN]> ") {
            Ok(answer) if is_yes(&answer) => Flow::Quit,
            Err(InputEnd::Eof) => Flow::Quit,
            Ok(_) | Err(InputEnd::Interrupted) => Flow::Continue,
        }
    }

    /// Prints rejected operations; journal failures end the session.
    fn handle<T>(&mut self, result: SessionResult<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(SessionError::Ledger(err)) => {
                writeln!(self.out, "{err}")?;
                Ok(None)
            }
            Err(err @ SessionError::Journal(_)) => Err(err.into()),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

fn write_flat_owners(out: &mut impl Write, flat: &Flat) -> std::io::Result<()> {
    writeln!(out, "{} owners:", flat.name)?;
    write_owners(out, flat)
}

fn write_owners(out: &mut impl Write, flat: &Flat) -> std::io::Result<()> {
    for (index, owner) in flat.owners.iter().enumerate() {
        writeln!(out, "{:2}. {}", index + 1, owner.name)?;
    }
    Ok(())
}
