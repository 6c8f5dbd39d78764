//! Configuration management module.
//!
//! This module handles loading and saving form definitions: the fields of a
//! form, their native-style constraints, cross-field rules and the form's
//! initial state.

mod error;

pub use error::ConfigError;

use crate::binder::FieldProps;
use crate::error::FormError;
use crate::state::{FormData, FormOptions};
use crate::validity::{validator, Constraints, Control, InputKind, MemorySurface, Validator};
use log::*;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashSet,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

const FILE_NAME: &str = "form.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/form-state";

/// Oversees management of the form definition file.
///
#[derive(Clone)]
pub struct Config {
    pub definition: FormDefinition,
    file_path: Option<PathBuf>,
}

/// Definition of a form: its title, fields and initial state.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub initial_state: FormData,
}

/// Definition of a single field.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub kind: InputKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>, // name of a field this one must equal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_text: Option<String>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: InputKind) -> FieldSpec {
        FieldSpec {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            matches: None,
            invalid_text: None,
        }
    }

    /// Native-style constraints declared by this field.
    ///
    pub fn constraints(&self) -> Result<Constraints, ConfigError> {
        let mut constraints = Constraints::new(self.kind);
        constraints.required = self.required;
        constraints.min_length = self.min_length;
        constraints.max_length = self.max_length;
        if let Some(pattern) = &self.pattern {
            constraints = constraints
                .pattern(pattern)
                .map_err(|e| ConfigError::InvalidPattern {
                    field: self.name.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(constraints)
    }

    /// Cross-field predicate for `matches`, if declared.
    ///
    pub fn validator(&self) -> Option<Validator> {
        let target = self.matches.clone()?;
        Some(validator(move |value, data, _| {
            data.get(&target).unwrap_or(&serde_json::Value::Null) == value
        }))
    }

    /// Props for binding this field.
    ///
    pub fn props(&self) -> FieldProps {
        let mut props = FieldProps::named(&self.name)
            .with("label", self.label.as_str())
            .with(
                "kind",
                serde_json::to_value(self.kind).unwrap_or(serde_json::Value::Null),
            )
            .with_validator(self.validator());
        if let Some(text) = &self.invalid_text {
            props = props.with("invalid_text", text.as_str());
        }
        props
    }
}

impl FormDefinition {
    /// The built-in registration form.
    ///
    pub fn registration() -> FormDefinition {
        let mut email = FieldSpec::new("email", "Email", InputKind::Email);
        email.required = true;

        let mut password = FieldSpec::new("password", "Password", InputKind::Password);
        password.required = true;
        password.min_length = Some(8);
        password.invalid_text = Some("Please enter at least 8 characters".to_string());

        let mut confirm = FieldSpec::new("password2", "Confirm Password", InputKind::Password);
        confirm.required = true;
        confirm.matches = Some("password".to_string());
        confirm.invalid_text = Some("Passwords must match".to_string());

        let mut terms = FieldSpec::new("terms", "I accept the terms", InputKind::Checkbox);
        terms.required = true;

        FormDefinition {
            title: "Example Registration Form".to_string(),
            class_name: Some("registration".to_string()),
            fields: vec![email, password, confirm, terms],
            initial_state: FormData::new(),
        }
    }

    /// Parse a YAML definition and check it.
    ///
    pub fn from_yaml(contents: &str) -> Result<FormDefinition, ConfigError> {
        let definition: FormDefinition = serde_yaml::from_str(contents)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        definition.check()?;
        Ok(definition)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializationFailed(e.to_string()))
    }

    /// Reject duplicate names, unknown `matches` targets and bad patterns.
    ///
    pub fn check(&self) -> Result<(), ConfigError> {
        let mut names = HashSet::new();
        for field in &self.fields {
            if !names.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
        }
        for field in &self.fields {
            if let Some(target) = &field.matches {
                if !names.contains(target.as_str()) {
                    return Err(ConfigError::UnknownField {
                        field: field.name.clone(),
                        target: target.clone(),
                    });
                }
            }
            field.constraints()?;
        }
        Ok(())
    }

    /// Build a headless surface holding one control per field.
    ///
    pub fn surface(&self) -> Result<MemorySurface, ConfigError> {
        let mut surface = MemorySurface::new();
        for field in &self.fields {
            surface.add_control(Control::new(&field.name, field.constraints()?));
        }
        Ok(surface)
    }

    /// Form options carrying this definition's initial state and class name.
    ///
    pub fn options(&self) -> FormOptions {
        let mut options = FormOptions::new().initial_state(self.initial_state.clone());
        if let Some(class_name) = &self.class_name {
            options = options.class_name(class_name);
        }
        options
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding the built-in definition.
    ///
    pub fn new() -> Config {
        Config {
            definition: FormDefinition::registration(),
            file_path: None,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Try to load an existing definition from the disk using the custom
    /// directory if provided. If no file exists there yet, write the current
    /// definition to it so it can be edited.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), FormError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            debug!("Loading form definition from {}", file_path.display());
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            self.definition = FormDefinition::from_yaml(&contents)?;
        } else {
            info!(
                "No form definition at {}; writing the built-in one",
                file_path.display()
            );
            self.save()?;
        }

        Ok(())
    }

    /// Save the current definition to disk.
    ///
    pub fn save(&self) -> Result<(), FormError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let content = self.definition.to_yaml()?;

        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, FormError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(Path::new(DEFAULT_DIRECTORY_PATH))),
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
