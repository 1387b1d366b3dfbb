//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands and the
//! line-oriented session they share.

use super::Backend;
use super::parser::CommandParser;
use crate::config::Preferences;
use crate::logging::TracingSink;
use nomnom_core::{
    CommandPipeline, ConsumptionRecord, DailyGoal, Food, MemoryStorage, ModelEvent, ModelOps,
    NomError, Storage, StoreKind, bootstrap, sample_catalog,
};
use std::cell::Cell;
use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::Arc;

// =============================================================================
// SESSION
// =============================================================================

/// What the front end should show after one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub is_error: bool,
    pub exit: bool,
}

/// A pipeline plus a parser, fed one line at a time.
///
/// Catalog changes are picked up through a model listener; whenever the
/// displayed list changes, the reply carries the refreshed list.
pub struct Session<S: Storage> {
    pipeline: CommandPipeline<S>,
    parser: CommandParser,
    list_changed: Rc<Cell<bool>>,
}

impl<S: Storage> Session<S> {
    /// Bootstrap the model from `storage` and wire the pipeline.
    pub fn open(storage: S, parser: CommandParser) -> Result<Self, NomError> {
        let sink = Arc::new(TracingSink);
        let model = bootstrap(&storage, sink.as_ref())?;
        let mut pipeline = CommandPipeline::new(model, storage, sink);

        let list_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&list_changed);
        pipeline.subscribe(Box::new(move |event: &ModelEvent| {
            tracing::debug!(?event, "model changed");
            if !matches!(
                event,
                ModelEvent::ConsumptionChanged(_) | ModelEvent::GoalChanged(_)
            ) {
                flag.set(true);
            }
        }));

        Ok(Self {
            pipeline,
            parser,
            list_changed,
        })
    }

    pub fn pipeline(&self) -> &CommandPipeline<S> {
        &self.pipeline
    }

    /// Parse and execute one line, keeping the error as-is.
    pub fn try_handle(&mut self, line: &str) -> Result<Reply, NomError> {
        self.list_changed.set(false);

        let command = self.parser.parse(line)?;
        let result = self.pipeline.execute(&command)?;

        let mut text = result.feedback;
        if self.list_changed.get() {
            text.push('\n');
            text.push_str(&render_food_list(&self.pipeline.model().filtered_foods()));
        }
        Ok(Reply {
            text,
            is_error: false,
            exit: result.exit,
        })
    }

    /// Parse and execute one line, turning failures into an error reply.
    pub fn handle(&mut self, line: &str) -> Reply {
        self.try_handle(line).unwrap_or_else(|e| {
            tracing::debug!("command failed: {}", e);
            Reply {
                text: e.to_string(),
                is_error: true,
                exit: false,
            }
        })
    }

    /// Read lines from `input` until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
        prompt: bool,
    ) -> io::Result<()> {
        if prompt {
            write!(output, "> ")?;
            output.flush()?;
        }
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                if prompt {
                    write!(output, "> ")?;
                    output.flush()?;
                }
                continue;
            }

            let reply = self.handle(&line);
            if reply.is_error {
                writeln!(output, "Error: {}", reply.text)?;
            } else {
                writeln!(output, "{}", reply.text)?;
            }
            if reply.exit {
                return Ok(());
            }
            if prompt {
                write!(output, "> ")?;
                output.flush()?;
            }
        }
        Ok(())
    }
}

/// Numbered list of foods, 1-based to match `delete INDEX`.
pub fn render_food_list(foods: &[&Food]) -> String {
    if foods.is_empty() {
        return "(no foods)".to_string();
    }
    let mut out = String::new();
    for (i, food) in foods.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:>3}. {}", i + 1, food);
    }
    out
}

// =============================================================================
// REPL COMMAND
// =============================================================================

/// Interactive session on stdin/stdout.
pub fn cmd_repl(prefs: &Preferences, backend: Backend, quiet: bool) -> Result<(), NomError> {
    if !quiet {
        print_banner(prefs, backend);
    }
    let parser = CommandParser::for_today();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let result = match backend {
        Backend::Json => Session::open(prefs.storage(), parser)?.run(stdin.lock(), &mut stdout, true),
        Backend::Memory => {
            Session::open(MemoryStorage::new(), parser)?.run(stdin.lock(), &mut stdout, true)
        }
    };
    result.map_err(|e| NomError::Io(e.to_string()))
}

fn print_banner(prefs: &Preferences, backend: Backend) {
    println!("nomnom v{}", env!("CARGO_PKG_VERSION"));
    match backend {
        Backend::Json => println!("Data: {}", prefs.data_dir.display()),
        Backend::Memory => println!("Data: in memory (nothing is kept after exit)"),
    }
    println!("Type `help` for the list of commands.");
    println!();
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Execute each line in order. Stops at the first failing line.
pub fn cmd_run(prefs: &Preferences, backend: Backend, lines: &[String]) -> Result<(), NomError> {
    let parser = CommandParser::for_today();
    match backend {
        Backend::Json => run_lines(Session::open(prefs.storage(), parser)?, lines),
        Backend::Memory => run_lines(Session::open(MemoryStorage::new(), parser)?, lines),
    }
}

/// Execute `lines` on `session`, printing each reply. The first failure is
/// returned unchanged.
pub fn run_lines<S: Storage>(mut session: Session<S>, lines: &[String]) -> Result<(), NomError> {
    for line in lines {
        let reply = session.try_handle(line).inspect_err(|e| {
            tracing::error!(line = %line, "Command failed: {}", e);
        })?;
        println!("{}", reply.text);
        if reply.exit {
            break;
        }
    }
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show where the stores are and what they hold.
pub fn cmd_status(prefs: &Preferences, backend: Backend, json_mode: bool) -> Result<(), NomError> {
    if json_mode {
        let output = status_json(prefs, backend)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
    } else {
        print!("{}", status_text(prefs, backend)?);
    }
    Ok(())
}

/// Machine-readable status.
pub fn status_json(prefs: &Preferences, backend: Backend) -> Result<serde_json::Value, NomError> {
    if backend == Backend::Memory {
        return Ok(serde_json::json!({
            "backend": "memory",
            "persistent": false,
        }));
    }

    let storage = prefs.storage();
    let catalog = storage.read_catalog()?;
    let record = storage.read_record()?;
    let goal = storage.read_goal()?;
    Ok(serde_json::json!({
        "backend": "json",
        "persistent": true,
        "data_dir": prefs.data_dir.to_string_lossy(),
        "stores": StoreKind::SAVE_ORDER
            .iter()
            .map(|&store| serde_json::json!({
                "store": store.as_str(),
                "path": storage.path(store).to_string_lossy(),
                "exists": storage.exists(store),
            }))
            .collect::<Vec<_>>(),
        "foods": catalog.as_ref().map(|c| c.len()),
        "logged_days": record.as_ref().map(ConsumptionRecord::len),
        "goal": goal.filter(DailyGoal::is_set).map(|g| g.get()),
    }))
}

/// Human-readable status.
pub fn status_text(prefs: &Preferences, backend: Backend) -> Result<String, NomError> {
    let mut out = String::new();
    let _ = writeln!(out, "nomnom Status");
    let _ = writeln!(out, "=============");
    let _ = writeln!(out, "Backend:  {:?}", backend);

    if backend == Backend::Memory {
        let _ = writeln!(out, "Data:     in memory (nothing is kept after exit)");
        return Ok(out);
    }

    let storage = prefs.storage();
    let catalog = storage.read_catalog()?;
    let record = storage.read_record()?;
    let goal = storage.read_goal()?;

    let _ = writeln!(out, "Data dir: {}", prefs.data_dir.display());
    let _ = writeln!(out);
    for store in StoreKind::SAVE_ORDER {
        let _ = writeln!(
            out,
            "  {:<8} {} ({})",
            store.as_str(),
            storage.path(store).display(),
            if storage.exists(store) {
                "present"
            } else {
                "missing"
            }
        );
    }
    let _ = writeln!(out);
    match catalog {
        Some(c) => {
            let _ = writeln!(out, "Foods:       {}", c.len());
        }
        None => {
            let _ = writeln!(out, "Foods:       (sample catalog on first start)");
        }
    }
    let _ = writeln!(out, "Logged days: {}", record.map(|r| r.len()).unwrap_or(0));
    match goal.filter(DailyGoal::is_set) {
        Some(g) => {
            let _ = writeln!(out, "Daily goal:  {} calories", g.get());
        }
        None => {
            let _ = writeln!(out, "Daily goal:  not set");
        }
    }
    Ok(out)
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write fresh stores: the sample catalog, an empty record and no goal.
pub fn cmd_init(prefs: &Preferences, backend: Backend, force: bool) -> Result<(), NomError> {
    if backend == Backend::Memory {
        return Err(NomError::InvalidArgument(
            "init needs a persistent backend; the memory backend starts fresh every time"
                .to_string(),
        ));
    }

    let storage = prefs.storage();
    if !force && StoreKind::SAVE_ORDER.iter().any(|&s| storage.exists(s)) {
        return Err(NomError::InvalidState(format!(
            "Data already exists in {}. Use --force to overwrite.",
            prefs.data_dir.display()
        )));
    }

    storage.save_catalog(&sample_catalog()?)?;
    storage.save_record(&ConsumptionRecord::new())?;
    storage.save_goal(&DailyGoal::unset())?;
    println!("Initialized new stores in {}", prefs.data_dir.display());

    Ok(())
}
