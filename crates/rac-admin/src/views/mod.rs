//! # Console Views
//!
//! The RAC pages built on the generic controllers:
//!
//! - [`endpoint_list`] - the Endpoints table with edit, permissions and bulk delete
//! - [`endpoint_form`] - create/update form for a single endpoint
//! - [`provider_form`] - create/update form for a RAC provider, with flow and endpoint choices

pub mod endpoint_form;
pub mod endpoint_list;
pub mod provider_form;

pub use endpoint_form::EndpointForm;
pub use endpoint_list::{mount_endpoint_list, EndpointList, EndpointListPage};
pub use provider_form::ProviderForm;

use admin_framework::{Choice, FormValues, ValidationErrors};
use std::str::FromStr;

/// Parses the selected value of a choice field, recording a field error if it
/// does not parse. `None` when nothing is selected.
fn parse_choice<T: FromStr>(
    values: &FormValues,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let raw = values.choice(field)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, format!("\"{raw}\" is not a valid choice."));
            None
        }
    }
}

fn options<T: Copy>(all: &[T], value: fn(&T) -> &'static str, label: fn(&T) -> &'static str) -> Vec<Choice> {
    all.iter().map(|item| Choice::new(value(item), label(item))).collect()
}
