//! Destination model
//!
//! Destinations form a tree via `parent_id` (e.g. Asia -> Nepal -> Kathmandu).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Destination {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDestinationRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDestinationRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
}

/// Destination with its children, as served by the tree endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DestinationNode {
    #[serde(flatten)]
    pub destination: Destination,
    pub children: Vec<DestinationNode>,
}

impl DestinationNode {
    /// Assemble a forest from a flat list ordered arbitrarily.
    pub fn build_tree(destinations: Vec<Destination>) -> Vec<DestinationNode> {
        use std::collections::HashMap;

        let mut by_parent: HashMap<Option<i64>, Vec<Destination>> = HashMap::new();
        for destination in destinations {
            by_parent.entry(destination.parent_id).or_default().push(destination);
        }

        fn attach(
            parent: Option<i64>,
            by_parent: &mut std::collections::HashMap<Option<i64>, Vec<Destination>>,
        ) -> Vec<DestinationNode> {
            let mut nodes = Vec::new();
            if let Some(mut children) = by_parent.remove(&parent) {
                children.sort_by(|a, b| a.name.cmp(&b.name));
                for child in children {
                    let id = child.id;
                    nodes.push(DestinationNode {
                        destination: child,
                        children: attach(Some(id), by_parent),
                    });
                }
            }
            nodes
        }

        attach(None, &mut by_parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(id: i64, name: &str, parent_id: Option<i64>) -> Destination {
        Destination {
            id,
            slug: name.to_lowercase(),
            name: name.to_string(),
            description: None,
            parent_id,
            image_url: None,
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_tree_nests_children() {
        let flat = vec![
            destination(1, "Asia", None),
            destination(2, "Nepal", Some(1)),
            destination(3, "Kathmandu", Some(2)),
            destination(4, "Africa", None),
        ];

        let tree = DestinationNode::build_tree(flat);
        assert_eq!(tree.len(), 2);
        let asia = tree.iter().find(|n| n.destination.name == "Asia").unwrap();
        assert_eq!(asia.children.len(), 1);
        assert_eq!(asia.children[0].children[0].destination.name, "Kathmandu");
    }

    #[test]
    fn test_build_tree_orphans_are_dropped() {
        let flat = vec![destination(5, "Floating", Some(99))];
        let tree = DestinationNode::build_tree(flat);
        assert!(tree.is_empty());
    }
}
