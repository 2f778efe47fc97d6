use std::collections::hash_map::{self, HashMap};

use log::{debug, info};

use crate::error::{CalcError, Result};
use crate::prelude;
use crate::syntax::NameKind;

/// A native function: a pure transform from argument strings to a result
/// string.  Plain function pointers cannot capture state, so dispatch order
/// never matters.  The `Err` string becomes [`CalcError::FunctionFailed`].
pub type NativeFn = fn(&[String]) -> std::result::Result<String, String>;

/// One stored variable, keyed in the environment by its sigiled name.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `$NAME` → value
    Scalar(String),

    /// `@NAME` → positionally indexed values, 0‑based
    Array(Vec<String>),
}

/// Registry of variables, arrays and native functions for one session.
///
/// The environment is created empty by the caller and entries live until they
/// are explicitly unregistered.  Registration is insert‑only.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    values: HashMap<String, Entry>,
    functions: HashMap<String, NativeFn>,
}

impl Environment {
    pub fn new() -> Self {
        info!("Creating empty Environment");

        Environment {
            values: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    /// An environment with the built‑in functions of [`prelude`] registered.
    pub fn with_prelude() -> Self {
        let mut env = Environment::new();

        for (name, func) in prelude::FUNCTIONS.entries() {
            debug!("Defining native function '{}'", name);

            env.functions.insert((*name).to_string(), *func);
        }

        info!("Environment created with {} native functions", env.functions.len());

        env
    }

    // ───────────────────────────── variables ────────────────────────────────

    /// Add a scalar (`$NAME`) or an array (`@NAME`, `value` split on `,`).
    /// Array values may not contain empty elements.
    pub fn register_variable(&mut self, name: &str, value: &str) -> Result<()> {
        let entry = match NameKind::of(name) {
            Some(NameKind::Scalar) => Entry::Scalar(value.to_string()),
            Some(NameKind::Array) => {
                let values: Vec<String> = value.split(',').map(str::to_string).collect();

                if values.iter().any(String::is_empty) {
                    return Err(CalcError::MalformedSeparator {
                        body: value.to_string(),
                    });
                }

                Entry::Array(values)
            }
            _ => return Err(CalcError::invalid_name(name)),
        };

        match self.values.entry(name.to_string()) {
            hash_map::Entry::Occupied(_) => Err(CalcError::duplicate_name(name)),
            hash_map::Entry::Vacant(slot) => {
                info!("Registered '{}' as {:?}", name, entry);

                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Remove a scalar or array.  Removing an absent name is not an error.
    pub fn unregister_variable(&mut self, name: &str) -> Result<()> {
        match NameKind::of(name) {
            Some(NameKind::Scalar | NameKind::Array) => {
                if self.values.remove(name).is_some() {
                    info!("Unregistered '{}'", name);
                }
                Ok(())
            }
            _ => Err(CalcError::invalid_name(name)),
        }
    }

    /// Value of `$NAME`, or element `i` of `@NAME` when asked for `NAME[i]`.
    pub fn get_variable_value(&self, name: &str) -> Result<String> {
        debug!("Looking up variable '{}'", name);

        match NameKind::of(name) {
            Some(NameKind::Scalar) => match self.values.get(name) {
                Some(Entry::Scalar(value)) => Ok(value.clone()),
                Some(Entry::Array(_)) => Err(CalcError::invalid_name(name)),
                None => Err(CalcError::not_found(name)),
            },

            Some(NameKind::Element { array, index }) => {
                let values = self.array_values(&array)?;

                index
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| values.get(i))
                    .cloned()
                    .ok_or_else(|| CalcError::IndexOutOfRange {
                        name: array.clone(),
                        index: index.to_string(),
                        len: values.len(),
                    })
            }

            _ => Err(CalcError::invalid_name(name)),
        }
    }

    /// Every value of the array `@NAME`.
    pub fn array_values(&self, name: &str) -> Result<&[String]> {
        if NameKind::of(name) != Some(NameKind::Array) {
            return Err(CalcError::invalid_name(name));
        }

        match self.values.get(name) {
            Some(Entry::Array(values)) => Ok(values),
            Some(Entry::Scalar(_)) => Err(CalcError::invalid_name(name)),
            None => Err(CalcError::not_found(name)),
        }
    }

    /// Marshal a function argument: a whole array for `@NAME`, otherwise a
    /// single value from [`get_variable_value`](Self::get_variable_value).
    pub fn get_operand(&self, name: &str) -> Result<Vec<String>> {
        if name.starts_with('@') {
            Ok(self.array_values(name)?.to_vec())
        } else {
            Ok(vec![self.get_variable_value(name)?])
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of stored variables and arrays.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // ───────────────────────────── functions ────────────────────────────────

    pub fn register_function(&mut self, name: &str, func: NativeFn) -> Result<()> {
        if NameKind::of(name) != Some(NameKind::Function) {
            return Err(CalcError::invalid_name(name));
        }

        match self.functions.entry(name.to_string()) {
            hash_map::Entry::Occupied(_) => Err(CalcError::duplicate_name(name)),
            hash_map::Entry::Vacant(slot) => {
                info!("Registered native function '{}'", name);

                slot.insert(func);
                Ok(())
            }
        }
    }

    pub fn unregister_function(&mut self, name: &str) -> Result<()> {
        if NameKind::of(name) != Some(NameKind::Function) {
            return Err(CalcError::invalid_name(name));
        }

        if self.functions.remove(name).is_some() {
            info!("Unregistered native function '{}'", name);
        }

        Ok(())
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Invoke the function `name` with already marshalled arguments.
    pub fn call_function(&self, name: &str, args: &[String]) -> Result<String> {
        if NameKind::of(name) != Some(NameKind::Function) {
            return Err(CalcError::invalid_name(name));
        }

        let func = self
            .functions
            .get(name)
            .ok_or_else(|| CalcError::not_found(name))?;

        debug!("Calling native function '{}' with {:?}", name, args);

        let result = func(args).map_err(|message| CalcError::FunctionFailed {
            name: name.to_string(),
            message,
        })?;

        info!("Native function '{}' returned: {}", name, result);

        Ok(result)
    }
}
