//! Counter - Minimal mvvm-kit demo
//!
//! A line-driven stand-in for a binding layer:
//! - View-model: observable state plus commands
//! - Bindings: listeners that re-render on property changes and re-query
//!   command gates on CanExecuteChanged
//! - Main loop: Input -> Command -> Notification -> Render
//!
//! Input: `+` = increment, `-` = decrement, `0` = reset, `q` = quit

use std::cell::RefCell;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use clap::Parser;
use mvvm_kit::debug::{NotificationLogConfig, NotificationLogger};
use mvvm_kit::prelude::*;
use tracing_subscriber::EnvFilter;

/// Counter - mvvm-kit demo
#[derive(Parser, Debug)]
#[command(name = "counter")]
#[command(about = "Drive a counter view-model from stdin")]
struct Args {
    /// Initial count
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    start: i32,

    /// Upper bound; increment is disabled once reached
    #[arg(long, default_value_t = 10)]
    max: i32,

    /// Log every notification and print the notification log on exit
    #[arg(long)]
    debug: bool,

    /// JSON notification log config (capacity, include/exclude patterns)
    #[arg(long)]
    log_config: Option<std::path::PathBuf>,
}

// ============================================================================
// View-model
// ============================================================================

#[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
enum CounterProperty {
    Count,
    IsAtMax,
}

#[derive(NotifyPropertyChanged)]
struct CounterState {
    observable: ObservableObject,
    count: i32,
    is_at_max: bool,
    max: i32,
}

impl CounterState {
    /// Store a new count, returning the properties whose values changed
    fn apply_count(&mut self, value: i32) -> Vec<CounterProperty> {
        let mut changed = Vec::new();
        let is_at_max = value >= self.max;
        if self.is_at_max != is_at_max {
            self.is_at_max = is_at_max;
            changed.push(CounterProperty::IsAtMax);
        }
        if self.count != value {
            self.count = value;
            changed.push(CounterProperty::Count);
        }
        changed
    }
}

/// Update the count and notify once the mutable borrow is released, so
/// listeners can read the state (and re-query gates) while handling it
fn set_count(state: &RefCell<CounterState>, value: i32) {
    let changed = state.borrow_mut().apply_count(value);
    let state = state.borrow();
    for property in changed {
        state.observable.notify_changed(property);
    }
}

struct CounterViewModel {
    state: Rc<RefCell<CounterState>>,
    increment: Rc<RelayCommand>,
    decrement: Rc<RelayCommand>,
    reset: RelayCommand,
}

impl CounterViewModel {
    fn new(start: i32, max: i32) -> Self {
        let state = Rc::new(RefCell::new(CounterState {
            observable: ObservableObject::new(),
            count: start,
            is_at_max: start >= max,
            max,
        }));

        let s = state.clone();
        let g = state.clone();
        let increment = Rc::new(RelayCommand::with_can_execute(
            move || {
                let next = s.borrow().count + 1;
                set_count(&s, next);
            },
            move || !g.borrow().is_at_max,
        ));

        let s = state.clone();
        let g = state.clone();
        let decrement = Rc::new(RelayCommand::with_can_execute(
            move || {
                let next = s.borrow().count - 1;
                set_count(&s, next);
            },
            move || g.borrow().count > 0,
        ));

        let s = state.clone();
        let reset = RelayCommand::new(move || set_count(&s, start));

        // Count drives both gates
        let (inc, dec) = (Rc::downgrade(&increment), Rc::downgrade(&decrement));
        state.borrow().subscribe_property_changed(move |event: &PropertyChanged| {
            if event.key::<CounterProperty>() == Some(CounterProperty::Count) {
                for command in [&inc, &dec].into_iter().filter_map(|c| c.upgrade()) {
                    command.notify_can_execute_changed();
                }
            }
        });

        Self {
            state,
            increment,
            decrement,
            reset,
        }
    }

    fn command_for(&self, input: &str) -> Option<&dyn Command> {
        match input {
            "+" => Some(self.increment.as_ref()),
            "-" => Some(self.decrement.as_ref()),
            "0" => Some(&self.reset),
            _ => None,
        }
    }

    fn render(&self) -> String {
        let state = self.state.borrow();
        let flag = |enabled: bool| if enabled { "on" } else { "off" };
        format!(
            "count = {} [+ {}] [- {}]{}",
            state.count,
            flag(self.increment.can_execute()),
            flag(self.decrement.can_execute()),
            if state.is_at_max { " (max)" } else { "" }
        )
    }
}

// ============================================================================
// Bindings
// ============================================================================

/// Bound "button": re-queries the gate whenever the command asks for it
fn bind_gate(command: &Rc<RelayCommand>, label: &'static str) -> SubscriptionId {
    let weak = Rc::downgrade(command);
    command.subscribe_can_execute_changed(Box::new(move |_: &CanExecuteChanged| {
        if let Some(command) = weak.upgrade() {
            tracing::debug!(button = label, enabled = command.can_execute(), "gate re-queried");
        }
    }))
}

// ============================================================================
// Main loop
// ============================================================================

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let vm = CounterViewModel::new(args.start, args.max);

    let logger = match &args.log_config {
        Some(path) => {
            let config = NotificationLogConfig::from_json(&std::fs::read_to_string(path)?)?;
            NotificationLogger::with_log(config)
        }
        None => NotificationLogger::with_default_log(),
    }
    .active(args.debug);
    logger.attach(&*vm.state.borrow());
    logger.attach_command(vm.increment.as_ref());
    logger.attach_command(vm.decrement.as_ref());

    bind_gate(&vm.increment, "+");
    bind_gate(&vm.decrement, "-");

    // Bound "label": re-renders whenever the view-model reports a change
    let rendered = Rc::new(RefCell::new(0usize));
    let r = rendered.clone();
    vm.state
        .borrow()
        .subscribe_property_changed(move |_: &PropertyChanged| *r.borrow_mut() += 1);

    let mut out = io::stdout().lock();
    writeln!(out, "{}", vm.render())?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let input = line.trim();
        if input == "q" {
            break;
        }
        match vm.command_for(input) {
            Some(command) => {
                if !execute_if_allowed(command, None) {
                    tracing::info!(input, "command disabled");
                }
            }
            None => tracing::warn!(input, "unknown input"),
        }
        writeln!(out, "{}", vm.render())?;
    }

    tracing::info!(renders = *rendered.borrow(), "exiting");
    if let Some(log) = logger.log().filter(|_| args.debug) {
        writeln!(out, "{}", log.to_json()?)?;
    }
    Ok(())
}
