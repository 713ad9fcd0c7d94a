//! # Form Fields
//!
//! The render-side model of a form: [`FieldSpec`]s produced by a
//! [`FormSchema`](crate::FormSchema), the [`FieldValue`]s a user enters, and the
//! [`AuxiliaryData`] that feeds choice fields.

use crate::error::ValidationErrors;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// A value held by one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Choice(Option<String>),
    Many(BTreeSet<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn choice(value: impl Into<String>) -> Self {
        FieldValue::Choice(Some(value.into()))
    }

    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Many(values.into_iter().map(Into::into).collect())
    }

    /// Empty text, no choice, or an empty multi-selection.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Choice(c) => c.as_deref().map_or(true, |v| v.is_empty()),
            FieldValue::Many(set) => set.is_empty(),
        }
    }

    fn holds(&self, candidate: &str) -> bool {
        match self {
            FieldValue::Text(s) => s == candidate,
            FieldValue::Choice(c) => c.as_deref() == Some(candidate),
            FieldValue::Many(set) => set.contains(candidate),
        }
    }
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    /// Multi-line text in a named syntax, e.g. `"yaml"`.
    Code { syntax: String },
    Radio { options: Vec<Choice> },
    /// `degraded` carries the reason when the choices could not be loaded.
    Select {
        choices: Vec<Choice>,
        degraded: Option<String>,
    },
    MultiSelect {
        choices: Vec<Choice>,
        degraded: Option<String>,
    },
}

/// A renderable field bound to a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub help: Vec<String>,
    pub kind: FieldKind,
    pub value: FieldValue,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind, value: FieldValue) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            required: false,
            help: Vec::new(),
            kind,
            value,
        }
    }

    pub fn text(name: &str, label: &str, value: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text, FieldValue::text(value))
    }

    pub fn code(name: &str, label: &str, syntax: &str, value: impl Into<String>) -> Self {
        let kind = FieldKind::Code {
            syntax: syntax.to_string(),
        };
        Self::new(name, label, kind, FieldValue::text(value))
    }

    pub fn radio(name: &str, label: &str, options: Vec<Choice>, value: Option<String>) -> Self {
        let mut field = Self::new(
            name,
            label,
            FieldKind::Radio { options },
            FieldValue::Choice(value),
        );
        field.mark_selected();
        field
    }

    pub fn select(name: &str, label: &str, source: ChoiceSet<'_>, value: Option<String>) -> Self {
        let kind = FieldKind::Select {
            choices: source.choices.to_vec(),
            degraded: source.degraded.map(str::to_string),
        };
        let mut field = Self::new(name, label, kind, FieldValue::Choice(value));
        field.mark_selected();
        field
    }

    pub fn multi_select(
        name: &str,
        label: &str,
        source: ChoiceSet<'_>,
        value: BTreeSet<String>,
    ) -> Self {
        let kind = FieldKind::MultiSelect {
            choices: source.choices.to_vec(),
            degraded: source.degraded.map(str::to_string),
        };
        let mut field = Self::new(name, label, kind, FieldValue::Many(value));
        field.mark_selected();
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help.push(text.into());
        self
    }

    /// Rebinds the field to `value` and recomputes choice selection.
    pub fn bind(&mut self, value: FieldValue) {
        self.value = value;
        self.mark_selected();
    }

    /// Selection of every choice is a membership test against the bound value.
    fn mark_selected(&mut self) {
        let value = &self.value;
        let choices = match &mut self.kind {
            FieldKind::Radio { options } => options,
            FieldKind::Select { choices, .. } | FieldKind::MultiSelect { choices, .. } => choices,
            FieldKind::Text | FieldKind::Code { .. } => return,
        };
        for choice in choices.iter_mut() {
            choice.selected = value.holds(&choice.value);
        }
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            FieldKind::Radio { options } => options,
            FieldKind::Select { choices, .. } | FieldKind::MultiSelect { choices, .. } => choices,
            FieldKind::Text | FieldKind::Code { .. } => &[],
        }
    }
}

/// Checks every required field in `fields` against `values`.
pub fn check_required(fields: &[FieldSpec], values: &FormValues) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in fields.iter().filter(|f| f.required) {
        let blank = values.get(&field.name).map_or(true, FieldValue::is_blank);
        if blank {
            errors.add(field.name.clone(), REQUIRED_MESSAGE);
        }
    }
    errors.into_result()
}

/// Values entered into a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the values bound to `fields`.
    pub fn from_fields(fields: &[FieldSpec]) -> Self {
        Self {
            values: fields
                .iter()
                .map(|f| (f.name.clone(), f.value.clone()))
                .collect(),
        }
    }

    pub fn with(mut self, name: &str, value: FieldValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Trimmed text of `name`; empty if absent or not a text value.
    pub fn text(&self, name: &str) -> String {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s.trim().to_string(),
            _ => String::new(),
        }
    }

    pub fn choice(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FieldValue::Choice(Some(v))) if !v.is_empty() => Some(v),
            _ => None,
        }
    }

    pub fn many(&self, name: &str) -> BTreeSet<String> {
        match self.values.get(name) {
            Some(FieldValue::Many(set)) => set.clone(),
            _ => BTreeSet::new(),
        }
    }

    /// Adds `value` to a multi-selection, or removes it if already present.
    pub fn toggle(&mut self, name: &str, value: &str) {
        let entry = self
            .values
            .entry(name.to_string())
            .or_insert_with(|| FieldValue::Many(BTreeSet::new()));
        match entry {
            FieldValue::Many(set) => {
                if !set.remove(value) {
                    set.insert(value.to_string());
                }
            }
            other => *other = FieldValue::many([value]),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }
}

/// Reference data loaded for a form, one entry per auxiliary kind.
///
/// A kind that failed to load is kept with its error so the field that needs
/// it can render as degraded instead of blocking the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxiliaryData {
    sets: BTreeMap<String, Result<Vec<Choice>, String>>,
}

/// Borrowed view of one auxiliary kind.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceSet<'a> {
    pub choices: &'a [Choice],
    pub degraded: Option<&'a str>,
}

impl AuxiliaryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: &str, loaded: Result<Vec<Choice>, String>) {
        self.sets.insert(kind.to_string(), loaded);
    }

    /// Choices for `kind`; empty and degraded if it failed or was never loaded.
    pub fn choices(&self, kind: &str) -> ChoiceSet<'_> {
        match self.sets.get(kind) {
            Some(Ok(choices)) => ChoiceSet {
                choices,
                degraded: None,
            },
            Some(Err(reason)) => ChoiceSet {
                choices: &[],
                degraded: Some(reason.as_str()),
            },
            None => ChoiceSet {
                choices: &[],
                degraded: Some("not loaded"),
            },
        }
    }

    /// Kinds that failed to load, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sets.iter().filter_map(|(kind, loaded)| match loaded {
            Ok(_) => None,
            Err(reason) => Some((kind.as_str(), reason.as_str())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint_choices() -> Vec<Choice> {
        vec![
            Choice::new("1", "alpha"),
            Choice::new("2", "bravo"),
            Choice::new("3", "charlie"),
        ]
    }

    #[test]
    fn test_multi_select_marks_members_selected() {
        let mut aux = AuxiliaryData::new();
        aux.insert("endpoints", Ok(endpoint_choices()));
        let value: BTreeSet<String> = ["1".to_string(), "3".to_string()].into();

        let field = FieldSpec::multi_select("endpoints", "Endpoints", aux.choices("endpoints"), value);
        let selected: Vec<_> = field
            .choices()
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(selected, vec!["1", "3"]);
    }

    #[test]
    fn test_failed_kind_degrades_to_empty_choices() {
        let mut aux = AuxiliaryData::new();
        aux.insert("flows", Err("Remote error: 502".into()));

        let field = FieldSpec::select("flow", "Flow", aux.choices("flows"), None);
        assert!(field.choices().is_empty());
        assert!(matches!(
            field.kind,
            FieldKind::Select { degraded: Some(_), .. }
        ));
        assert_eq!(aux.failures().count(), 1);
    }

    #[test]
    fn test_required_check_flags_blank_values() {
        let fields = vec![
            FieldSpec::text("name", "Name", "").required(),
            FieldSpec::text("host", "Host", "").required(),
            FieldSpec::code("settings", "Settings", "yaml", ""),
        ];
        let values = FormValues::new()
            .with("name", FieldValue::text("  "))
            .with("host", FieldValue::text("10.0.0.5"));

        let errors = check_required(&fields, &values).unwrap_err();
        assert_eq!(errors.messages_for("name"), [REQUIRED_MESSAGE.to_string()]);
        assert!(errors.messages_for("host").is_empty());
        assert!(errors.messages_for("settings").is_empty());
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut values = FormValues::new().with("endpoints", FieldValue::many(["1", "3"]));
        values.toggle("endpoints", "3");
        values.toggle("endpoints", "2");
        assert_eq!(
            values.many("endpoints").into_iter().collect::<Vec<_>>(),
            vec!["1", "2"]
        );
    }
}
