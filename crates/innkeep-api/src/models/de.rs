// Tolerant field deserializers.
//
// The backend is loose about nulls and about whether list-valued columns
// come back as JSON arrays or comma-joined strings. These helpers absorb
// that so the typed models stay strict everywhere else.

use serde::{Deserialize, Deserializer};

/// `null` (or a missing field, with `#[serde(default)]`) becomes `T::default()`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts `["a", "b"]`, `"a, b"`, or `null`. Blank entries are dropped.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<Option<String>>),
        Joined(String),
    }

    let items = match Option::<Raw>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Raw::List(list)) => list.into_iter().flatten().collect(),
        Some(Raw::Joined(s)) => s.split(',').map(str::to_owned).collect(),
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Accepts a JSON number, a numeric string, or `null`.
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u32),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Num(n)) => Some(n),
        Some(Raw::Str(s)) => s.trim().parse().ok(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "super::string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "super::lenient_u32")]
        size: Option<u32>,
        #[serde(default, deserialize_with = "super::nullable")]
        flag: bool,
    }

    #[test]
    fn comma_joined_and_array_agree() {
        let a: Fields = serde_json::from_str(r#"{"tags": "vip, repeat ,,late"}"#).unwrap();
        let b: Fields = serde_json::from_str(r#"{"tags": ["vip", "repeat", "late"]}"#).unwrap();
        assert_eq!(a.tags, b.tags);
        assert_eq!(a.tags, vec!["vip", "repeat", "late"]);
    }

    #[test]
    fn nulls_become_defaults() {
        let p: Fields = serde_json::from_str(r#"{"tags": null, "size": null, "flag": null}"#).unwrap();
        assert!(p.tags.is_empty());
        assert!(p.size.is_none());
        assert!(!p.flag);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let p: Fields = serde_json::from_str(r#"{"size": "4"}"#).unwrap();
        assert_eq!(p.size, Some(4));
        let p: Fields = serde_json::from_str(r#"{"size": "four"}"#).unwrap();
        assert_eq!(p.size, None);
    }
}
