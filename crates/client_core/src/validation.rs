use shared::{catalog, error::QuantityError};

/// Quantity rule the form consults. Implementations must be pure: the same
/// inputs always give the same verdict.
pub trait QuantityValidator: Send + Sync {
    fn validate(&self, resource_type: &str, quantity: &str) -> Result<u32, QuantityError>;
}

/// Rule backed by the bounds in the static resource catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogValidator;

impl QuantityValidator for CatalogValidator {
    fn validate(&self, resource_type: &str, quantity: &str) -> Result<u32, QuantityError> {
        catalog::validate_quantity(resource_type, quantity)
    }
}
