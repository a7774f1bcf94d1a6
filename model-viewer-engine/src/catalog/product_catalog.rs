use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One product the viewer can be opened for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: String,
    /// Display name.
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
}

/// Product list as a Bevy asset. Mirrors the JSON file.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath, Resource)]
pub struct ProductCatalog {
    pub products: Vec<ProductEntry>,
}

impl ProductCatalog {
    /// Entry bound to a 1-based number key.
    pub fn by_shortcut(&self, number: usize) -> Option<&ProductEntry> {
        number.checked_sub(1).and_then(|index| self.products.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED: &str = include_str!("../../assets/catalog.json");

    #[test]
    fn shipped_catalog_parses() {
        let catalog: ProductCatalog = serde_json::from_str(SHIPPED).unwrap();

        assert_eq!(catalog.products.len(), 4);
        let ids: Vec<_> = catalog.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["T-001", "T-002", "T-003", "T-004"]);
        assert!(catalog
            .products
            .iter()
            .all(|p| p.model_url == Some(format!("{}.glb", p.id))));
    }

    #[test]
    fn model_url_is_optional() {
        let catalog: ProductCatalog = serde_json::from_str(
            r#"{"products":[{"id":"X-1","model":"Prototype","type":"concept"}]}"#,
        )
        .unwrap();

        assert_eq!(catalog.products[0].model_url, None);
        assert_eq!(catalog.products[0].kind, "concept");
    }

    #[test]
    fn shortcuts_are_one_based() {
        let catalog: ProductCatalog = serde_json::from_str(SHIPPED).unwrap();

        assert_eq!(catalog.by_shortcut(0), None);
        assert_eq!(catalog.by_shortcut(1).map(|p| p.id.as_str()), Some("T-001"));
        assert_eq!(catalog.by_shortcut(9), None);
    }
}
