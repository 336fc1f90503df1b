use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tracing::{debug, instrument};

use super::{
    CliError, CommandResult, Operation,
    formatting::{format_event, format_header, format_parameter},
};
use crate::{
    config::BusSettings,
    config_bus::{
        AccessMask, ConfigBus, Environment, NamedEnvironment, ParameterListener,
        new_synchronous_config_with,
    },
};

type EventLog = Arc<Mutex<Vec<String>>>;

/// Runs command-line operations against a fresh bus and reports what the
/// listeners observed.
///
/// Every key touched by a single-key operation gets a listener for both
/// access types, so the output shows each dispatch in order.
pub struct Evaluator {
    environment: NamedEnvironment<String, String>,
    bus: Arc<ConfigBus<String, String>>,
    listeners: HashMap<String, ParameterListener<String>>,
    events: EventLog,
}

impl Evaluator {
    /// Creates an environment called `name` and binds a bus built from `settings`.
    pub fn new(name: &str, settings: &BusSettings) -> Self {
        let mut environment = NamedEnvironment::new(name);
        let bus = new_synchronous_config_with(&mut environment, settings);

        Self {
            environment,
            bus,
            listeners: HashMap::new(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The environment owning the bus.
    pub fn environment(&self) -> &NamedEnvironment<String, String> {
        &self.environment
    }

    /// Applies `operations` in order and returns the formatted report.
    ///
    /// # Errors
    /// * `CliError::ConfigError` - If a bus operation fails
    #[instrument(skip_all, fields(environment = self.environment.name(), count = operations.len()))]
    pub fn run(&mut self, operations: &[Operation]) -> CommandResult {
        let mut lines = vec![format_header(&format!(
            "environment: {}",
            self.environment.name()
        ))];

        for operation in operations {
            if let Some(key) = operation.key() {
                self.watch(key)?;
            }

            debug!(%operation, "applying operation");
            let mut output = self.apply(operation)?;
            lines.append(&mut self.drain_events());
            lines.append(&mut output);
        }

        Ok(lines.join("\n"))
    }

    fn apply(&self, operation: &Operation) -> Result<Vec<String>, CliError> {
        let lines = match operation {
            Operation::Set { key, value } => {
                self.bus.set_parameter(key.clone(), value.clone())?;
                Vec::new()
            }
            Operation::Get { key } => {
                let value = self.bus.get_parameter(key)?;
                vec![format_parameter(key, value.as_deref())]
            }
            Operation::Remove { key } => {
                let removed = self.bus.remove_parameter(key)?;
                vec![format!("removed {}", format_parameter(key, removed.as_deref()))]
            }
            Operation::GetAll => {
                let mut parameters: Vec<(String, String)> =
                    self.bus.get_parameters()?.into_iter().collect();
                parameters.sort();
                parameters
                    .iter()
                    .map(|(key, value)| format_parameter(key, Some(value)))
                    .collect()
            }
        };

        Ok(lines)
    }

    fn watch(&mut self, key: &str) -> Result<(), CliError> {
        if self.listeners.contains_key(key) {
            return Ok(());
        }

        let events = Arc::clone(&self.events);
        let label = key.to_string();
        let listener = ParameterListener::new(move |previous: Option<&String>, access| {
            let previous = previous.map_or("<unset>", String::as_str);
            events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(format!("{access} {label} (previous: {previous})"));
            Ok(())
        });

        self.bus
            .add_parameter_listener(key.to_string(), AccessMask::ANY, &listener)?;
        self.listeners.insert(key.to_string(), listener);

        Ok(())
    }

    fn drain_events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .map(|event| format_event(&event))
            .collect()
    }
}
