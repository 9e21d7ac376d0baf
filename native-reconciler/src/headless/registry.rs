use crate::class::{ClassDescriptor, TypeResolver, UnknownType};
use crate::names::class_name_for_tag;
use crate::value::{Name, PropMap, PropValue};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::rc::Rc;

/// How a class holds children.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// No children.
    Leaf,
    /// Ordered children.
    Linear,
    /// One child; adding another replaces it.
    Single,
    /// Top-level surface holding one child. Hidden until presented.
    Window,
    /// Ordered children, each placed inside a fresh `wrapper` object unless
    /// it already is one.
    Wrapped { wrapper: Name },
    /// Children go to the slot named by their role, or `default`.
    Slotted {
        slots: SmallVec<[Name; 4]>,
        default: Option<Name>,
    },
}

impl Layout {
    pub fn slotted<I, S>(slots: I, default: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        Layout::Slotted {
            slots: slots.into_iter().map(Into::into).collect(),
            default: default.map(Into::into),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassSpec {
    pub descriptor: Rc<ClassDescriptor>,
    /// Unset values. Properties without an entry reset to null.
    pub defaults: PropMap,
    pub layout: Layout,
}

impl ClassSpec {
    pub fn default_value(&self, property: &str) -> PropValue {
        self.defaults
            .get(property)
            .cloned()
            .unwrap_or(PropValue::Null)
    }
}

/// In-memory class registry. Resolves kebab-case tags to PascalCase classes.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<Name, ClassSpec>,
}

const WIDGET_PROPERTIES: &[&str] = &[
    "name",
    "cssClasses",
    "sensitive",
    "tooltipText",
    "hexpand",
    "vexpand",
    "halign",
    "valign",
    "marginTop",
    "marginBottom",
    "marginStart",
    "marginEnd",
];

const WIDGET_SIGNALS: &[&str] = &["notify", "destroy", "realize", "map", "unmap"];

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        descriptor: ClassDescriptor,
        defaults: PropMap,
        layout: Layout,
    ) -> &mut Self {
        let name: Name = descriptor.name().into();
        self.classes.insert(
            name,
            ClassSpec {
                descriptor: Rc::new(descriptor),
                defaults,
                layout,
            },
        );
        self
    }

    pub fn get(&self, class: &str) -> Option<&ClassSpec> {
        self.classes.get(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// A widget class carrying the common widget properties and signals.
    pub fn widget(name: &str) -> ClassDescriptor {
        ClassDescriptor::new(name)
            .with_properties(WIDGET_PROPERTIES.iter().copied())
            .with_signals(WIDGET_SIGNALS.iter().copied())
    }

    /// A small GTK/Adwaita-shaped class set.
    pub fn gtk() -> Self {
        let widget_defaults = || -> PropMap {
            [
                ("sensitive", PropValue::Bool(true)),
                ("hexpand", PropValue::Bool(false)),
                ("vexpand", PropValue::Bool(false)),
                ("halign", PropValue::from("fill")),
                ("valign", PropValue::from("fill")),
                ("marginTop", PropValue::Int(0)),
                ("marginBottom", PropValue::Int(0)),
                ("marginStart", PropValue::Int(0)),
                ("marginEnd", PropValue::Int(0)),
            ]
            .into_iter()
            .map(|(k, v)| (Name::from(k), v))
            .collect()
        };
        let with = |mut defaults: PropMap, extra: &[(&str, PropValue)]| {
            for (name, value) in extra {
                defaults.insert((*name).into(), value.clone());
            }
            defaults
        };

        let mut registry = Self::new();
        registry
            .register(
                Self::widget("GtkBox").with_properties(["orientation", "spacing", "homogeneous"]),
                with(
                    widget_defaults(),
                    &[
                        ("orientation", "horizontal".into()),
                        ("spacing", PropValue::Int(0)),
                        ("homogeneous", PropValue::Bool(false)),
                    ],
                ),
                Layout::Linear,
            )
            .register(
                Self::widget("GtkButton")
                    .with_properties(["label", "iconName", "hasFrame"])
                    .with_signals(["clicked", "activate"]),
                with(widget_defaults(), &[("hasFrame", PropValue::Bool(true))]),
                Layout::Single,
            )
            .register(
                Self::widget("GtkLabel").with_properties(["label", "wrap", "selectable", "xalign"]),
                with(
                    widget_defaults(),
                    &[
                        ("label", "".into()),
                        ("wrap", PropValue::Bool(false)),
                        ("selectable", PropValue::Bool(false)),
                        ("xalign", PropValue::Float(0.5)),
                    ],
                ),
                Layout::Leaf,
            )
            .register(Self::widget("GtkWindowHandle"), widget_defaults(), Layout::Single)
            .register(
                Self::widget("AdwApplicationWindow")
                    .with_properties(["title", "defaultWidth", "defaultHeight", "resizable"])
                    .with_signals(["close-request", "activate-default"]),
                with(
                    widget_defaults(),
                    &[
                        ("defaultWidth", PropValue::Int(-1)),
                        ("defaultHeight", PropValue::Int(-1)),
                        ("resizable", PropValue::Bool(true)),
                    ],
                ),
                Layout::Window,
            )
            .register(
                Self::widget("AdwHeaderBar")
                    .with_properties(["showStartTitleButtons", "showEndTitleButtons"]),
                with(
                    widget_defaults(),
                    &[
                        ("showStartTitleButtons", PropValue::Bool(true)),
                        ("showEndTitleButtons", PropValue::Bool(true)),
                    ],
                ),
                Layout::slotted(["start", "end", "title"], Some("start")),
            )
            .register(
                Self::widget("GtkListBox")
                    .with_properties(["selectionMode", "showSeparators"])
                    .with_signals(["row-activated", "row-selected"]),
                with(
                    widget_defaults(),
                    &[
                        ("selectionMode", "single".into()),
                        ("showSeparators", PropValue::Bool(false)),
                    ],
                ),
                Layout::Wrapped {
                    wrapper: "GtkListBoxRow".into(),
                },
            )
            .register(
                Self::widget("GtkListBoxRow")
                    .with_properties(["activatable", "selectable"])
                    .with_signals(["activate"]),
                with(
                    widget_defaults(),
                    &[
                        ("activatable", PropValue::Bool(true)),
                        ("selectable", PropValue::Bool(true)),
                    ],
                ),
                Layout::Single,
            );
        registry
    }
}

impl TypeResolver for ClassRegistry {
    fn resolve(&self, tag: &str) -> Result<Rc<ClassDescriptor>, UnknownType> {
        let class = class_name_for_tag(tag);
        match self.classes.get(&class) {
            Some(spec) => Ok(Rc::clone(&spec.descriptor)),
            None => Err(UnknownType {
                tag: tag.into(),
                class,
            }),
        }
    }
}
