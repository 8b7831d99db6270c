use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::PropertyPolicy;
use crate::error::MapError;

/// String-keyed metadata attached to a map, tileset or layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(HashMap<String, String>);

impl Properties {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any earlier one under the same key.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Raw string value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value parsed as `true`/`false`.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.parse().ok()
    }

    /// Value parsed as an integer.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name)?.parse().ok()
    }

    /// Value parsed as a float.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name)?.parse().ok()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Read the `<properties>` child of `node`, if any.
///
/// `scope` names the owner for error messages.
pub(crate) fn properties_from_xml(
    node: roxmltree::Node<'_, '_>,
    scope: &str,
    policy: PropertyPolicy,
) -> Result<Properties, MapError> {
    let mut out = Properties::new();
    for props in node.children().filter(|n| n.has_tag_name("properties")) {
        read_properties(props, scope, policy, &mut out)?;
    }
    Ok(out)
}

/// Read every `<property name=".." value=".."/>` under a `<properties>` element into `out`.
pub(crate) fn read_properties(
    props: roxmltree::Node<'_, '_>,
    scope: &str,
    policy: PropertyPolicy,
    out: &mut Properties,
) -> Result<(), MapError> {
    for p in props.children().filter(|n| n.has_tag_name("property")) {
        let missing = match (p.attribute("name"), p.attribute("value")) {
            (Some(name), Some(value)) => {
                out.insert(name, value);
                continue;
            }
            (None, _) => "name",
            (Some(_), None) => "value",
        };
        match policy {
            PropertyPolicy::Strict => {
                return Err(MapError::MalformedProperty {
                    scope: scope.to_owned(),
                    missing,
                })
            }
            PropertyPolicy::SkipMalformed => {
                log::warn!("skipping property in {scope} without '{missing}' attribute");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str, policy: PropertyPolicy) -> Result<Properties, MapError> {
        let doc = roxmltree::Document::parse(xml).expect("xml");
        properties_from_xml(doc.root_element(), "map", policy)
    }

    #[test]
    fn reads_name_value_pairs() {
        let props = read(
            r#"<map><properties>
                 <property name="theme" value="forest"/>
                 <property name="gravity" value="9.8"/>
                 <property name="is_night" value="true"/>
               </properties></map>"#,
            PropertyPolicy::Strict,
        )
        .expect("properties");
        assert_eq!(props.len(), 3);
        assert_eq!(props.get("theme"), Some("forest"));
        assert_eq!(props.get_f32("gravity"), Some(9.8));
        assert_eq!(props.get_bool("is_night"), Some(true));
        assert_eq!(props.get_i32("theme"), None);
    }

    #[test]
    fn no_properties_element_gives_empty_table() {
        let props = read("<map/>", PropertyPolicy::Strict).expect("properties");
        assert!(props.is_empty());
    }

    #[test]
    fn duplicate_key_last_write_wins() {
        let props = read(
            r#"<map><properties>
                 <property name="k" value="first"/>
                 <property name="k" value="second"/>
               </properties></map>"#,
            PropertyPolicy::Strict,
        )
        .expect("properties");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("k"), Some("second"));
    }

    #[test]
    fn missing_value_is_fatal_when_strict() {
        let err = read(
            r#"<map><properties><property name="k"/></properties></map>"#,
            PropertyPolicy::Strict,
        )
        .unwrap_err();
        assert!(matches!(err, MapError::MalformedProperty { missing: "value", .. }));
    }

    #[test]
    fn missing_name_is_skipped_when_lenient() {
        let props = read(
            r#"<map><properties>
                 <property value="orphan"/>
                 <property name="ok" value="1"/>
               </properties></map>"#,
            PropertyPolicy::SkipMalformed,
        )
        .expect("properties");
        assert_eq!(props.len(), 1);
        assert_eq!(props.get_i32("ok"), Some(1));
    }
}
