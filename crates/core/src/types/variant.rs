//! Product variant sub-documents.
//!
//! Variants are stored as JSONB on the product row and travel between the
//! admin service (which writes them) and the storefront (which renders
//! them), so the shape lives here.

use serde::{Deserialize, Serialize};

/// A single selectable value within a variant, e.g. the color "walnut".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    /// Option value, e.g. "walnut" or "XL".
    pub value: String,
    /// Images specific to this option.
    #[serde(default)]
    pub images: Vec<String>,
}

/// A variant axis on a product, e.g. "color" with its options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant axis name, e.g. "color" or "size".
    #[serde(rename = "type")]
    pub kind: String,
    /// The selectable options along this axis.
    pub options: Vec<VariantOption>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_json_shape() {
        let variant = Variant {
            kind: "color".to_string(),
            options: vec![VariantOption {
                value: "walnut".to_string(),
                images: vec!["/img/walnut.jpg".to_string()],
            }],
        };

        let json = serde_json::to_value(&variant).unwrap();
        // The axis name serializes under "type" to match the stored documents.
        assert_eq!(json["type"], "color");
        assert_eq!(json["options"][0]["value"], "walnut");

        let back: Variant = serde_json::from_value(json).unwrap();
        assert_eq!(back, variant);
    }

    #[test]
    fn test_option_images_default_empty() {
        let option: VariantOption = serde_json::from_str(r#"{"value": "XL"}"#).unwrap();
        assert!(option.images.is_empty());
    }
}
