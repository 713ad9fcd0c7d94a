//! A small resource type shared by the framework tests.
#![allow(dead_code)]

use admin_framework::{
    AuxiliaryData, Cell, Choice, ClientError, Column, FieldSpec, FormMode, FormSchema,
    FormValues, ListView, Page, ResourceEntity, RowAction, SortKey, UsedByAction, UsedByEntry,
    ValidationErrors, REQUIRED_MESSAGE,
};
use async_trait::async_trait;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
    pub id: u32,
    pub name: String,
    pub tier: String,
    pub parts: BTreeSet<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WidgetPayload {
    pub name: String,
    pub tier: String,
    pub parts: BTreeSet<String>,
}

impl WidgetPayload {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tier: "silver".to_string(),
            parts: BTreeSet::new(),
        }
    }
}

pub fn widget(id: u32, name: &str) -> Widget {
    Widget {
        id,
        name: name.to_string(),
        tier: "silver".to_string(),
        parts: BTreeSet::new(),
    }
}

pub fn page_of(items: Vec<Widget>) -> Page<Widget> {
    Page {
        total_count: items.len() as u64,
        items,
        page_number: 1,
        page_size: 20,
    }
}

#[async_trait]
impl ResourceEntity for Widget {
    type Id = u32;
    type Payload = WidgetPayload;
    type Context = ();
    const KIND: &'static str = "Widget";

    fn pk(&self) -> &u32 {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "pk" => Some(SortKey::Number(self.id as i64)),
            "name" => Some(SortKey::text(&self.name)),
            "tier" => Some(SortKey::text(&self.tier)),
            _ => None,
        }
    }

    fn from_payload(id: u32, payload: WidgetPayload) -> Result<Self, ValidationErrors> {
        let mut widget = widget(id, "");
        widget.apply_payload(payload)?;
        Ok(widget)
    }

    fn apply_payload(&mut self, payload: WidgetPayload) -> Result<(), ValidationErrors> {
        if payload.name.trim().is_empty() {
            return Err(ValidationErrors::field("name", REQUIRED_MESSAGE));
        }
        self.name = payload.name;
        self.tier = payload.tier;
        self.parts = payload.parts;
        Ok(())
    }

    async fn validate(&self, _ctx: &()) -> Result<(), ValidationErrors> {
        if self.name == "forbidden" {
            return Err(ValidationErrors::field("name", "Name is reserved."));
        }
        Ok(())
    }

    async fn used_by(&self, _ctx: &()) -> Result<Vec<UsedByEntry>, ClientError> {
        if !self.name.starts_with("shared") {
            return Ok(Vec::new());
        }
        Ok(vec![UsedByEntry {
            resource_kind: "Gadget".to_string(),
            resource_label: format!("gadget using {}", self.name),
            referencing_id: "7".to_string(),
            action: UsedByAction::Cascade,
        }])
    }
}

pub struct WidgetList;

impl ListView for WidgetList {
    type Item = Widget;

    fn title(&self) -> &str {
        "Widgets"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::sortable("Name", "name"),
            Column::sortable("Tier", "tier"),
            Column::new("Actions"),
        ]
    }

    fn row(&self, item: &Widget) -> Vec<Cell> {
        vec![
            Cell::Text(item.name.clone()),
            Cell::Text(item.tier.clone()),
            Cell::Actions(vec![RowAction::Edit]),
        ]
    }
}

/// Form for widgets. `parts` is the auxiliary kind feeding the multi-select.
pub struct WidgetSchema {
    pub parts: Result<Vec<Choice>, ClientError>,
}

impl WidgetSchema {
    pub fn with_parts(values: &[&str]) -> Self {
        Self {
            parts: Ok(values.iter().map(|v| Choice::new(*v, v.to_uppercase())).collect()),
        }
    }
}

#[async_trait]
impl FormSchema for WidgetSchema {
    type Model = Widget;

    fn auxiliary_kinds(&self) -> Vec<&'static str> {
        vec!["parts"]
    }

    async fn load_auxiliary(&self, _kind: &str) -> Result<Vec<Choice>, ClientError> {
        self.parts.clone()
    }

    fn fields(&self, instance: Option<&Widget>, auxiliary: &AuxiliaryData) -> Vec<FieldSpec> {
        let tiers = vec![Choice::new("gold", "Gold"), Choice::new("silver", "Silver")];
        vec![
            FieldSpec::text("name", "Name", instance.map_or("", |w| w.name.as_str())).required(),
            FieldSpec::radio(
                "tier",
                "Tier",
                tiers,
                Some(instance.map_or("silver", |w| w.tier.as_str()).to_string()),
            ),
            FieldSpec::multi_select(
                "parts",
                "Parts",
                auxiliary.choices("parts"),
                instance.map(|w| w.parts.clone()).unwrap_or_default(),
            ),
        ]
    }

    fn payload(
        &self,
        values: &FormValues,
        _instance: Option<&Widget>,
    ) -> Result<WidgetPayload, ValidationErrors> {
        Ok(WidgetPayload {
            name: values.text("name"),
            tier: values.choice("tier").unwrap_or("silver").to_string(),
            parts: values.many("parts"),
        })
    }

    fn success_message(&self, mode: FormMode) -> String {
        match mode {
            FormMode::Create => "Successfully created widget.".to_string(),
            FormMode::Edit => "Successfully updated widget.".to_string(),
        }
    }
}
