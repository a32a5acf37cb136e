//! Field deserializers that never fail. The profile document is hand edited
//! and written by several page versions, so a value of the wrong type must
//! not make the whole document unreadable. Whatever a field could not read is
//! picked up again by [`keep_unread`] and written back untouched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `None` for null, a missing key or a value of another type.
pub(crate) fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Only a JSON `true` is true.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Record ids. Numbers keep their text form, anything else is empty.
pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Every object element that parses. Non-object elements are skipped.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// A document object with a flattened catch-all map.
pub(crate) trait Section: Serialize + Clone {
    fn extra_mut(&mut self) -> &mut Map<String, Value>;
}

/// Keys the typed fields of `section` currently write.
fn typed_keys<T: Section>(section: &T) -> Vec<String> {
    let mut bare = section.clone();
    bare.extra_mut().clear();
    match serde_json::to_value(bare) {
        Ok(Value::Object(map)) => map.into_iter().map(|(key, _)| key).collect(),
        _ => Vec::new(),
    }
}

/// Copy every key of `raw` that no typed field took into the catch-all map.
pub(crate) fn keep_unread<T: Section>(section: &mut T, raw: &Value) {
    let Value::Object(raw) = raw else {
        return;
    };
    let typed = typed_keys(section);
    let extra = section.extra_mut();
    for (key, value) in raw {
        if !typed.contains(key) && !extra.contains_key(key) {
            extra.insert(key.clone(), value.clone());
        }
    }
}

/// Forget kept raw values once a typed field writes the same key again.
pub(crate) fn drop_shadowed<T: Section>(section: &mut T) {
    let typed = typed_keys(section);
    section.extra_mut().retain(|key, _| !typed.contains(key));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "option", skip_serializing_if = "Option::is_none")]
        size: Option<u32>,
        #[serde(default, deserialize_with = "flag")]
        on: bool,
        #[serde(flatten)]
        extra: Map<String, Value>,
    }

    impl Section for Sample {
        fn extra_mut(&mut self) -> &mut Map<String, Value> {
            &mut self.extra
        }
    }

    #[test]
    fn wrong_types_read_as_unset() {
        let sample: Sample = serde_json::from_value(json!({"size": "big", "on": null})).unwrap();
        assert_eq!(sample.size, None);
        assert!(!sample.on);
    }

    #[test]
    fn unread_values_come_back_until_overwritten() {
        let raw = json!({"size": 1.5, "on": true});
        let mut sample: Sample = serde_json::from_value(raw.clone()).unwrap();
        keep_unread(&mut sample, &raw);
        assert_eq!(serde_json::to_value(&sample).unwrap(), raw);

        sample.size = Some(3);
        drop_shadowed(&mut sample);
        assert_eq!(
            serde_json::to_value(&sample).unwrap(),
            json!({"size": 3, "on": true})
        );
    }
}
