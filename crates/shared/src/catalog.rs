//! Static catalog of requestable resource types and the quantity rule each
//! one carries.

use serde::Serialize;

use crate::error::QuantityError;

pub const DEFAULT_UNIT: &str = "units";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceType {
    pub label: &'static str,
    pub unit: &'static str,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

impl ResourceType {
    const fn new(label: &'static str, unit: &'static str, max_quantity: u32) -> Self {
        Self {
            label,
            unit,
            min_quantity: 1,
            max_quantity,
        }
    }
}

pub const RESOURCE_TYPES: &[ResourceType] = &[
    ResourceType::new("Desks", "units", 500),
    ResourceType::new("Chairs", "units", 1000),
    ResourceType::new("Blackboards", "boards", 50),
    ResourceType::new("Textbooks", "books", 5000),
    ResourceType::new("Notebooks", "notebooks", 10000),
    ResourceType::new("Stationery", "kits", 2000),
    ResourceType::new("Computers", "units", 100),
    ResourceType::new("Projectors", "units", 20),
    ResourceType::new("Sports Equipment", "sets", 100),
    ResourceType::new("Library Books", "books", 2000),
    ResourceType::new("Water Filters", "units", 20),
    ResourceType::new("Fans", "units", 200),
];

pub fn resource_types() -> &'static [ResourceType] {
    RESOURCE_TYPES
}

pub fn find_resource_type(label: &str) -> Option<&'static ResourceType> {
    RESOURCE_TYPES.iter().find(|resource| resource.label == label)
}

/// Unit shown for `label`, falling back to [`DEFAULT_UNIT`] for labels not in
/// the catalog.
pub fn unit_for(label: &str) -> &'static str {
    find_resource_type(label)
        .map(|resource| resource.unit)
        .unwrap_or(DEFAULT_UNIT)
}

/// Checks `quantity` against the rule of the resource type named `label` and
/// returns the parsed base-10 value.
pub fn validate_quantity(label: &str, quantity: &str) -> Result<u32, QuantityError> {
    if label.is_empty() {
        return Err(QuantityError::NoResourceType);
    }
    let resource = find_resource_type(label)
        .ok_or_else(|| QuantityError::UnknownResourceType(label.to_string()))?;

    let trimmed = quantity.trim();
    if trimmed.is_empty() {
        return Err(QuantityError::Empty);
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(QuantityError::NotAWholeNumber);
    }

    let above_maximum = || QuantityError::AboveMaximum {
        label: resource.label.to_string(),
        max: resource.max_quantity,
        unit: resource.unit.to_string(),
    };
    // All-digit text only fails to parse on overflow.
    let value = trimmed.parse::<u64>().map_err(|_| above_maximum())?;

    if value < u64::from(resource.min_quantity) {
        return Err(QuantityError::BelowMinimum {
            label: resource.label.to_string(),
            min: resource.min_quantity,
            unit: resource.unit.to_string(),
        });
    }
    if value > u64::from(resource.max_quantity) {
        return Err(above_maximum());
    }

    u32::try_from(value).map_err(|_| above_maximum())
}
