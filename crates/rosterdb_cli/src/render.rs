//! Text rendering of menus, records, and tables.

use crate::menu::MenuChoice;
use rosterdb_core::{LoadReport, StudentRecord};
use std::io::{self, Write};

const TITLE: &str = "STUDENT MANAGEMENT SYSTEM";
const MENU_WIDTH: usize = 50;
const RECORD_WIDTH: usize = 80;

fn rule(out: &mut impl Write, ch: char, width: usize) -> io::Result<()> {
    writeln!(out, "{}", ch.to_string().repeat(width))
}

/// The main menu, ending with the choice prompt (no newline).
pub fn menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    rule(out, '=', MENU_WIDTH)?;
    writeln!(out, "    {TITLE}")?;
    rule(out, '=', MENU_WIDTH)?;
    for choice in MenuChoice::ALL {
        writeln!(out, "{}. {}", choice.number(), choice.label())?;
    }
    rule(out, '=', MENU_WIDTH)?;
    write!(out, "Enter your choice (1-{}): ", MenuChoice::ALL.len())?;
    out.flush()
}

/// Section heading such as `=== ADD NEW STUDENT ===`.
pub fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "\n=== {title} ===")
}

/// One record as labelled lines between rules.
pub fn record(out: &mut impl Write, record: &StudentRecord) -> io::Result<()> {
    writeln!(out)?;
    rule(out, '-', RECORD_WIDTH)?;
    writeln!(out, "Roll Number: {}", record.roll_number)?;
    writeln!(out, "Name: {}", record.name)?;
    writeln!(out, "Department: {}", record.department)?;
    writeln!(out, "Age: {}", record.age)?;
    writeln!(out, "Email: {}", record.email)?;
    writeln!(out, "Phone: {}", record.phone)?;
    rule(out, '-', RECORD_WIDTH)
}

/// All records as a fixed-width table.
pub fn table(out: &mut impl Write, records: &[StudentRecord]) -> io::Result<()> {
    writeln!(out, "\nTotal students: {}", records.len())?;
    rule(out, '=', RECORD_WIDTH)?;
    writeln!(
        out,
        "{:>12} | {:>20} | {:>15} | {:>8} | {:>20} | {:>15}",
        "Roll Number", "Name", "Department", "Age", "Email", "Phone"
    )?;
    rule(out, '=', RECORD_WIDTH)?;
    for r in records {
        writeln!(
            out,
            "{:>12} | {:>20} | {:>15} | {:>8} | {:>20} | {:>15}",
            r.roll_number.to_string(),
            r.name,
            r.department,
            r.age,
            r.email,
            r.phone
        )?;
    }
    rule(out, '=', RECORD_WIDTH)
}

/// What the initial load found.
pub fn load_summary(out: &mut impl Write, report: &LoadReport, location: &str) -> io::Result<()> {
    if !report.found {
        return writeln!(out, "\nNo existing data file found. Starting with empty database.");
    }
    writeln!(out, "\nLoaded {} students from database.", report.loaded)?;
    if !report.skipped.is_empty() {
        writeln!(
            out,
            "Warning: skipped {} line(s) in {location} (kept unchanged in the file):",
            report.skipped.len()
        )?;
        for skipped in &report.skipped {
            writeln!(out, "  line {}: {}", skipped.line, skipped.reason)?;
        }
    }
    Ok(())
}
