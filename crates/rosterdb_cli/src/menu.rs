//! The interactive menu loop.

use crate::console::{Console, ConsoleError, ConsoleResult};
use crate::render;
use rosterdb_core::{CoreError, RecordStore, RollNumber, StudentRecord};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Add a new student.
    Add,
    /// Replace a student's details.
    Update,
    /// Remove a student after confirmation.
    Delete,
    /// Show the student with a given roll number.
    SearchByRoll,
    /// Show students whose name contains a fragment.
    SearchByName,
    /// Show every student as a table.
    DisplayAll,
    /// Leave the program.
    Exit,
}

impl MenuChoice {
    /// Every choice, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Add,
        Self::Update,
        Self::Delete,
        Self::SearchByRoll,
        Self::SearchByName,
        Self::DisplayAll,
        Self::Exit,
    ];

    /// The choice with menu number `n`.
    #[must_use]
    pub fn from_number(n: i64) -> Option<Self> {
        usize::try_from(n)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Parses a line of user input.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        input.trim().parse().ok().and_then(Self::from_number)
    }

    /// The number shown in the menu.
    #[must_use]
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).map_or(0, |i| i + 1)
    }

    /// The text shown in the menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add New Student",
            Self::Update => "Update Student",
            Self::Delete => "Delete Student",
            Self::SearchByRoll => "Search by Roll Number",
            Self::SearchByName => "Search by Name",
            Self::DisplayAll => "Display All Students",
            Self::Exit => "Exit",
        }
    }
}

/// The menu controller.
///
/// Owns nothing but the console; the store is borrowed for the whole
/// session. Data errors are reported and the loop continues. Only Exit,
/// end of input, or a terminal I/O failure ends [`Menu::run`].
pub struct Menu<'a, R, W> {
    store: &'a mut RecordStore,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    /// Creates a menu over `store`.
    pub fn new(store: &'a mut RecordStore, console: Console<R, W>) -> Self {
        Self { store, console }
    }

    /// Prints the welcome banner and what was loaded.
    pub fn greet(&mut self) -> ConsoleResult<()> {
        writeln!(self.console.out(), "Welcome to Student Management System!")?;
        let location = self.store.location();
        render::load_summary(self.console.out(), self.store.load_report(), &location)?;
        Ok(())
    }

    /// Runs the loop until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if the terminal cannot be read or written.
    pub fn run(&mut self) -> ConsoleResult<()> {
        match self.run_loop() {
            Err(ConsoleError::EndOfInput) => {
                debug!("input closed, exiting");
                self.exit()
            }
            other => other,
        }
    }

    fn run_loop(&mut self) -> ConsoleResult<()> {
        loop {
            render::menu(self.console.out())?;
            let line = self.console.read_line()?;

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => return self.exit(),
                Some(choice) => {
                    debug!(?choice, "menu choice");
                    self.dispatch(choice)?;
                }
                None => writeln!(
                    self.console.out(),
                    "\nInvalid choice! Please enter a number between 1-{}.",
                    MenuChoice::ALL.len()
                )?,
            }

            self.console.pause()?;
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> ConsoleResult<()> {
        match choice {
            MenuChoice::Add => self.add_student(),
            MenuChoice::Update => self.update_student(),
            MenuChoice::Delete => self.delete_student(),
            MenuChoice::SearchByRoll => self.search_by_roll(),
            MenuChoice::SearchByName => self.search_by_name(),
            MenuChoice::DisplayAll => self.display_all(),
            MenuChoice::Exit => self.exit(),
        }
    }

    fn add_student(&mut self) -> ConsoleResult<()> {
        render::heading(self.console.out(), "ADD NEW STUDENT")?;
        let student = self.read_student()?;
        let lossy = self.store.lossy_fields(&student);

        match self.store.add(student) {
            Ok(()) => {
                writeln!(self.console.out(), "\nStudent added successfully!")?;
                self.warn_lossy(&lossy)?;
            }
            Err(e) if e.is_applied() => {
                writeln!(self.console.out(), "\nStudent added successfully!")?;
                self.warn_lossy(&lossy)?;
                self.report(&e)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn update_student(&mut self) -> ConsoleResult<()> {
        render::heading(self.console.out(), "UPDATE STUDENT")?;
        let roll = self.read_roll("Enter Roll Number to update: ")?;

        let Some(current) = self.store.get_by_roll(roll) else {
            return self.report(&CoreError::not_found(roll));
        };
        write!(self.console.out(), "\nCurrent student details:")?;
        render::record(self.console.out(), current)?;

        writeln!(self.console.out(), "\nEnter new details:")?;
        let student = self.read_student()?;
        let lossy = self.store.lossy_fields(&student);

        match self.store.update(roll, student) {
            Ok(()) => {
                writeln!(self.console.out(), "\nStudent updated successfully!")?;
                self.warn_lossy(&lossy)?;
            }
            Err(e) if e.is_applied() => {
                writeln!(self.console.out(), "\nStudent updated successfully!")?;
                self.warn_lossy(&lossy)?;
                self.report(&e)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn delete_student(&mut self) -> ConsoleResult<()> {
        render::heading(self.console.out(), "DELETE STUDENT")?;
        let roll = self.read_roll("Enter Roll Number to delete: ")?;

        let Some(current) = self.store.get_by_roll(roll) else {
            return self.report(&CoreError::not_found(roll));
        };
        write!(self.console.out(), "\nStudent to be deleted:")?;
        render::record(self.console.out(), current)?;

        if !self
            .console
            .confirm("\nAre you sure you want to delete this student?")?
        {
            writeln!(self.console.out(), "\nDeletion cancelled.")?;
            return Ok(());
        }

        match self.store.delete(roll) {
            Ok(_) => writeln!(self.console.out(), "\nStudent deleted successfully!")?,
            Err(e) if e.is_applied() => {
                writeln!(self.console.out(), "\nStudent deleted successfully!")?;
                self.report(&e)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn search_by_roll(&mut self) -> ConsoleResult<()> {
        render::heading(self.console.out(), "SEARCH BY ROLL NUMBER")?;
        let roll = self.read_roll("Enter Roll Number: ")?;

        match self.store.get_by_roll(roll) {
            Some(student) => {
                write!(self.console.out(), "\nStudent found:")?;
                render::record(self.console.out(), student)?;
            }
            None => writeln!(
                self.console.out(),
                "\nStudent with Roll Number {roll} not found!"
            )?,
        }
        Ok(())
    }

    fn search_by_name(&mut self) -> ConsoleResult<()> {
        render::heading(self.console.out(), "SEARCH BY NAME")?;
        let part = self.console.prompt("Enter name (or partial name): ")?;

        let matches = self.store.find_by_name_part(&part);
        if matches.is_empty() {
            writeln!(
                self.console.out(),
                "\nNo students found with name containing '{part}'"
            )?;
            return Ok(());
        }

        writeln!(self.console.out(), "\nFound {} student(s):", matches.len())?;
        for index in matches {
            if let Some(student) = self.store.get(index) {
                render::record(self.console.out(), student)?;
            }
        }
        Ok(())
    }

    fn display_all(&mut self) -> ConsoleResult<()> {
        render::heading(self.console.out(), "ALL STUDENTS")?;
        if self.store.is_empty() {
            writeln!(self.console.out(), "\nNo students in the database.")?;
            return Ok(());
        }
        render::table(self.console.out(), self.store.all())?;
        Ok(())
    }

    fn exit(&mut self) -> ConsoleResult<()> {
        writeln!(
            self.console.out(),
            "\nThank you for using Student Management System!"
        )?;
        if self.store.is_dirty() {
            info!("saving unsaved changes before exit");
            if let Err(e) = self.store.persist() {
                return self.report(&e);
            }
        }
        writeln!(self.console.out(), "Data saved successfully.")?;
        Ok(())
    }

    fn read_roll(&mut self, label: &str) -> ConsoleResult<RollNumber> {
        self.console.prompt_integer(label)
    }

    fn read_student(&mut self) -> ConsoleResult<StudentRecord> {
        writeln!(self.console.out(), "\nEnter Student Details:")?;
        let roll = self.read_roll("Roll Number: ")?;
        let name = self.console.prompt("Name: ")?;
        let department = self.console.prompt("Department: ")?;
        let age = self.console.prompt_integer("Age: ")?;
        let email = self.console.prompt("Email: ")?;
        let phone = self.console.prompt("Phone: ")?;
        Ok(StudentRecord::new(roll, name, department, age, email, phone))
    }

    fn warn_lossy(&mut self, fields: &[&str]) -> ConsoleResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        writeln!(
            self.console.out(),
            "Warning: {} contains a comma, which the roster file cannot store.\n\
             This student will not load correctly next time; run with --format quoted to keep commas.",
            fields.join(", ")
        )?;
        Ok(())
    }

    fn report(&mut self, error: &CoreError) -> ConsoleResult<()> {
        let out = self.console.out();
        match error {
            CoreError::NotFound { roll } => {
                writeln!(out, "\nError: Student with Roll Number {roll} not found!")?;
            }
            CoreError::DuplicateKey { roll } => {
                writeln!(out, "\nError: Student with Roll Number {roll} already exists!")?;
            }
            CoreError::Persist { .. } => {
                writeln!(out, "\nError: {error}")?;
                writeln!(out, "The change is kept for this session but was not written to disk.")?;
            }
            other => writeln!(out, "\nError: {other}")?,
        }
        Ok(())
    }
}
