use crate::names::to_kebab_case;
use crate::value::{Name, PropMap, PropValue};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_LENGTH_UNIT: &str = "px";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    #[error("style must be a map, got {0}")]
    NotAMap(&'static str),

    #[error("style property name is empty")]
    EmptyName,

    #[error("unsupported {kind} value for style property `{property}`")]
    UnsupportedValue { property: Name, kind: &'static str },

    #[error("non-finite length for style property `{0}`")]
    NonFiniteLength(Name),
}

/// Stylesheet fragment scoped to a single native object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    source: String,
}

impl Stylesheet {
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// `name: value;` lines between the selector braces.
    pub fn declarations(&self) -> impl Iterator<Item = &str> {
        self.source
            .lines()
            .map(str::trim)
            .filter(|line| line.ends_with(';'))
    }

    pub fn is_empty(&self) -> bool {
        self.declarations().next().is_none()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Turns a style map into a stylesheet. Must be pure and deterministic.
pub trait StyleCompiler {
    fn compile(&self, style: &PropMap) -> Result<Stylesheet, StyleError>;
}

/// Compiles `{ fontSize: 18, color: "red" }` into
///
/// ```text
/// * {
/// font-size: 18px;
/// color: red;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CssStyleCompiler {
    length_unit: Name,
}

impl CssStyleCompiler {
    pub fn new() -> Self {
        Self::with_length_unit(DEFAULT_LENGTH_UNIT)
    }

    pub fn with_length_unit(unit: impl Into<Name>) -> Self {
        Self {
            length_unit: unit.into(),
        }
    }

    fn render_value(&self, property: &str, value: &PropValue) -> Result<String, StyleError> {
        match value {
            PropValue::Int(n) => Ok(format!("{}{}", n, self.length_unit)),
            PropValue::Float(n) if n.is_finite() => Ok(format!("{}{}", n, self.length_unit)),
            PropValue::Float(_) => Err(StyleError::NonFiniteLength(property.into())),
            PropValue::Null => Ok("none".to_string()),
            PropValue::String(s) => Ok(s.to_string()),
            PropValue::Bool(b) => Ok(b.to_string()),
            other => Err(StyleError::UnsupportedValue {
                property: property.into(),
                kind: other.kind(),
            }),
        }
    }
}

impl Default for CssStyleCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleCompiler for CssStyleCompiler {
    fn compile(&self, style: &PropMap) -> Result<Stylesheet, StyleError> {
        let mut lines = Vec::with_capacity(style.len() + 2);
        lines.push("* {".to_string());
        for (name, value) in style {
            if name.is_empty() {
                return Err(StyleError::EmptyName);
            }
            let value = self.render_value(name, value)?;
            lines.push(format!("{}: {};", to_kebab_case(name), value));
        }
        lines.push("}".to_string());

        Ok(Stylesheet {
            source: lines.join("\n"),
        })
    }
}

/// Compile a `style` prop, which must be a map or null (no declarations).
pub fn compile_style_prop<C: StyleCompiler + ?Sized>(
    compiler: &C,
    value: &PropValue,
) -> Result<Stylesheet, StyleError> {
    if let Some(map) = value.as_map() {
        return compiler.compile(map);
    }
    if value.is_null() {
        return compiler.compile(&PropMap::new());
    }
    Err(StyleError::NotAMap(value.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::props;

    #[test]
    fn test_compile_units_and_names() {
        let sheet = CssStyleCompiler::new()
            .compile(&props([
                ("padding", PropValue::Int(40)),
                ("fontSize", PropValue::Float(18.5)),
                ("color", "red".into()),
                ("border", PropValue::Null),
            ]))
            .unwrap();

        assert_eq!(
            sheet.as_str(),
            "* {\npadding: 40px;\nfont-size: 18.5px;\ncolor: red;\nborder: none;\n}"
        );
        assert_eq!(sheet.declarations().count(), 4);
    }

    #[test]
    fn test_empty_map_has_no_declarations() {
        let sheet = CssStyleCompiler::new().compile(&PropMap::new()).unwrap();
        assert_eq!(sheet.as_str(), "* {\n}");
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_custom_length_unit() {
        let sheet = CssStyleCompiler::with_length_unit("pt")
            .compile(&props([("margin", 4)]))
            .unwrap();
        assert_eq!(sheet.declarations().collect::<Vec<_>>(), vec!["margin: 4pt;"]);
    }

    #[test]
    fn test_malformed_values() {
        let compiler = CssStyleCompiler::new();
        let nested = props([("inner", PropValue::from(props([("a", 1)])))]);
        assert_eq!(
            compiler.compile(&nested),
            Err(StyleError::UnsupportedValue {
                property: "inner".into(),
                kind: "map",
            })
        );
        assert_eq!(
            compiler.compile(&props([("width", f64::INFINITY)])),
            Err(StyleError::NonFiniteLength("width".into()))
        );
    }

    #[test]
    fn test_style_prop_must_be_map() {
        let compiler = CssStyleCompiler::new();
        assert_eq!(
            compile_style_prop(&compiler, &PropValue::from("color: red")),
            Err(StyleError::NotAMap("string"))
        );
        assert!(compile_style_prop(&compiler, &PropValue::Null).unwrap().is_empty());
    }
}
