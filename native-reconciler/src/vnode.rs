use crate::value::{Name, PropMap, PropValue};
use serde::Deserialize;

/// One element of the declarative tree handed to the diffing algorithm.
///
/// Virtual nodes are produced fresh on every render and never mutated by the
/// host adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualNode {
    #[serde(rename = "type")]
    pub kind: Name,
    #[serde(default)]
    pub props: PropMap,
    #[serde(default)]
    pub children: Vec<VirtualChild>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VirtualChild {
    Text(String),
    Element(VirtualNode),
}

impl VirtualNode {
    pub fn new(kind: impl Into<Name>) -> Self {
        Self {
            kind: kind.into(),
            props: PropMap::new(),
            children: Vec::new(),
        }
    }

    pub fn prop(mut self, name: impl Into<Name>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: VirtualNode) -> Self {
        self.children.push(VirtualChild::Element(child));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(VirtualChild::Text(text.into()));
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = VirtualNode::new("gtk-box")
            .prop("spacing", 30)
            .child(VirtualNode::new("gtk-button").prop("label", "+"))
            .text("count");

        assert_eq!(node.kind, "gtk-box");
        assert!(node.props["spacing"].eq_value(&PropValue::Int(30)));
        assert_eq!(node.children.len(), 2);
        assert!(matches!(&node.children[1], VirtualChild::Text(t) if t == "count"));
    }

    #[test]
    fn test_from_json() {
        let node = VirtualNode::from_json(
            r#"{
                "type": "adw-application-window",
                "props": { "title": "Counter" },
                "children": [
                    { "type": "gtk-box", "props": { "style": { "padding": 40 } } },
                    "plain text"
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(node.kind, "adw-application-window");
        assert_eq!(node.props["title"].as_str(), Some("Counter"));
        match &node.children[0] {
            VirtualChild::Element(child) => {
                assert_eq!(child.kind, "gtk-box");
                assert!(child.children.is_empty());
                assert!(child.props["style"].as_map().is_some());
            }
            other => panic!("expected element, got {:?}", other),
        }
        assert!(matches!(&node.children[1], VirtualChild::Text(t) if t == "plain text"));
    }
}
