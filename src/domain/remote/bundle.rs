//! Paginated result envelope returned by registry queries

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::resource::Resource;

/// Nested objects deeper than this are left as-is when linking
const MAX_LINK_DEPTH: usize = 3;

/// One page of heterogeneous items plus the size of the whole result
///
/// Related objects arrive as siblings in `item` rather than nested; call
/// [`Bundle::reconstitute`] before reading them as typed resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default)]
    pub item: Vec<Value>,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub total_results: usize,
}

impl Bundle {
    pub fn new(item: Vec<Value>, offset: usize, total_results: usize) -> Self {
        Self {
            count: item.len(),
            item,
            offset,
            total_results,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_empty()
    }

    /// Links references between items of this page
    ///
    /// For every property `p` holding the id of a sibling item, `pModel` is
    /// set to a copy of that sibling unless it is already populated. Copies
    /// are not linked again, so cycles between siblings terminate.
    pub fn reconstitute(&mut self) {
        let index: HashMap<Uuid, Value> = self
            .item
            .iter()
            .filter_map(|item| {
                let id = item.get("id")?.as_str()?;
                Some((Uuid::parse_str(id).ok()?, item.clone()))
            })
            .collect();

        if index.is_empty() {
            return;
        }

        for item in &mut self.item {
            if let Some(object) = item.as_object_mut() {
                link_object(object, &index, 0);
            }
        }
    }

    /// Items whose `$type` matches `T`, decoded; undecodable items are skipped
    pub fn items_of<T: Resource>(&self) -> Vec<T> {
        let expected = T::KIND.as_str();

        self.item
            .iter()
            .filter(|item| {
                item.get("$type")
                    .and_then(Value::as_str)
                    .is_none_or(|kind| kind == expected)
            })
            .filter_map(|item| match serde_json::from_value::<T>(item.clone()) {
                Ok(resource) => Some(resource),
                Err(e) => {
                    tracing::warn!(kind = expected, error = %e, "Skipping undecodable bundle item");
                    None
                }
            })
            .collect()
    }
}

fn link_object(object: &mut Map<String, Value>, index: &HashMap<Uuid, Value>, depth: usize) {
    let own_id = object.get("id").and_then(Value::as_str).map(str::to_owned);

    let links: Vec<(String, Value)> = object
        .iter()
        .filter(|(name, _)| is_link_candidate(name))
        .filter_map(|(name, value)| {
            let target = value.as_str()?;

            if own_id.as_deref() == Some(target) {
                return None;
            }

            let model_name = format!("{}Model", name);

            if object.get(&model_name).is_some_and(|model| !model.is_null()) {
                return None;
            }

            let sibling = index.get(&Uuid::parse_str(target).ok()?)?;
            Some((model_name, sibling.clone()))
        })
        .collect();

    for (name, sibling) in links {
        object.insert(name, sibling);
    }

    if depth + 1 >= MAX_LINK_DEPTH {
        return;
    }

    for (name, value) in object.iter_mut() {
        if name.ends_with("Model") {
            continue;
        }

        match value {
            Value::Object(nested) => link_object(nested, index, depth + 1),
            Value::Array(elements) => {
                for element in elements {
                    if let Value::Object(nested) = element {
                        link_object(nested, index, depth + 1);
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_link_candidate(name: &str) -> bool {
    name != "id" && name != "version" && !name.starts_with('$') && !name.ends_with("Model")
}
