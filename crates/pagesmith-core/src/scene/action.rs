//! Step actions and the DOM mutations they compile to

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::scene::model::CssValue;

/// Delay before the context pan starts, so the layer transition can begin first
pub const PAN_DELAY_MS: u64 = 100;

pub const INTRO_LAYER: &str = "layer-intro";
pub const TEXT_LAYER: &str = "layer-text";
pub const CONTEXT_IMAGE: &str = "img-context";
pub const CONTEXT_OVERLAY: &str = "txt-context";

/// Layers other than the intro, hidden on reset
pub const SECONDARY_LAYERS: [&str; 3] = ["context", "text", "outro"];

/// The closed set of authored actions
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    ShowLayer {
        target: String,
    },
    HideLayer {
        target: String,
    },
    PanImage {},
    ShowOverlay {},
    ShowHighlight {
        target: String,
    },
    ShowLabel {
        target: String,
    },
    ZoomText {
        transform: String,
    },
    FadeElement {
        target: String,
        opacity: CssValue,
    },
    HideElement {
        target: String,
    },
    AddClass {
        target: String,
        #[serde(rename = "class")]
        class_name: String,
    },
    RemoveClass {
        target: String,
        #[serde(rename = "class")]
        class_name: String,
    },
}

impl Action {
    /// Authored `type` tags, in declaration order
    pub const KINDS: [&'static str; 11] = [
        "showLayer",
        "hideLayer",
        "panImage",
        "showOverlay",
        "showHighlight",
        "showLabel",
        "zoomText",
        "fadeElement",
        "hideElement",
        "addClass",
        "removeClass",
    ];

    pub fn to_mutation(&self) -> Mutation {
        match self {
            Action::ShowLayer { target } => Mutation::add_class(layer_id(target), "active"),
            Action::HideLayer { target } => Mutation::remove_class(layer_id(target), "active"),
            Action::PanImage {} => Mutation::Deferred {
                delay_ms: PAN_DELAY_MS,
                mutation: Box::new(Mutation::add_class(CONTEXT_IMAGE, "context-pan")),
            },
            Action::ShowOverlay {} => Mutation::add_class(CONTEXT_OVERLAY, "show"),
            Action::ShowHighlight { target } => Mutation::add_class(target, "draw-stroke"),
            Action::ShowLabel { target } => Mutation::add_class(target, "show"),
            Action::ZoomText { transform } => {
                Mutation::set_style(TEXT_LAYER, StyleProperty::Transform, transform)
            }
            Action::FadeElement { target, opacity } => {
                Mutation::set_style(target, StyleProperty::Opacity, opacity.to_string())
            }
            Action::HideElement { target } => {
                Mutation::set_style(target, StyleProperty::Opacity, "0")
            }
            Action::AddClass { target, class_name } => Mutation::add_class(target, class_name),
            Action::RemoveClass { target, class_name } => {
                Mutation::remove_class(target, class_name)
            }
        }
    }
}

/// An authored action; kinds outside the closed set are kept for diagnostics
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    Known(Action),
    Unknown { kind: String },
}

impl StepAction {
    pub fn to_mutation(&self) -> Mutation {
        match self {
            StepAction::Known(action) => action.to_mutation(),
            StepAction::Unknown { kind } => Mutation::Comment {
                text: format!("Unknown action: {}", kind),
            },
        }
    }
}

impl<'de> Deserialize<'de> for StepAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => other.to_string(),
            None => "undefined".to_string(),
        };

        if Action::KINDS.contains(&kind.as_str()) {
            Action::deserialize(value)
                .map(StepAction::Known)
                .map_err(|e| de::Error::custom(format!("invalid '{}' action: {}", kind, e)))
        } else {
            Ok(StepAction::Unknown { kind })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleProperty {
    Transform,
    Opacity,
}

impl StyleProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleProperty::Transform => "transform",
            StyleProperty::Opacity => "opacity",
        }
    }
}

/// A symbolic DOM mutation on an element looked up by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddClass {
        element: String,
        class: String,
    },
    RemoveClass {
        element: String,
        class: String,
    },
    /// An empty value clears the inline style
    SetStyle {
        element: String,
        property: StyleProperty,
        value: String,
    },
    /// Runs after `delay_ms` unless a reset cancels it first
    Deferred {
        delay_ms: u64,
        mutation: Box<Mutation>,
    },
    /// Drops every deferred mutation still waiting to run
    CancelDeferred,
    /// Emitted as a script comment; no effect
    Comment {
        text: String,
    },
}

impl Mutation {
    pub fn add_class(element: impl Into<String>, class: impl Into<String>) -> Self {
        Mutation::AddClass {
            element: element.into(),
            class: class.into(),
        }
    }

    pub fn remove_class(element: impl Into<String>, class: impl Into<String>) -> Self {
        Mutation::RemoveClass {
            element: element.into(),
            class: class.into(),
        }
    }

    pub fn set_style(
        element: impl Into<String>,
        property: StyleProperty,
        value: impl Into<String>,
    ) -> Self {
        Mutation::SetStyle {
            element: element.into(),
            property,
            value: value.into(),
        }
    }
}

pub fn layer_id(name: &str) -> String {
    format!("layer-{}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> StepAction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_known_actions_deserialize() {
        assert_eq!(
            parse(json!({ "type": "showLayer", "target": "context" })),
            StepAction::Known(Action::ShowLayer {
                target: "context".to_string()
            })
        );
        assert_eq!(
            parse(json!({ "type": "panImage" })),
            StepAction::Known(Action::PanImage {})
        );
        assert_eq!(
            parse(json!({ "type": "addClass", "target": "hl-1", "class": "pulse" })),
            StepAction::Known(Action::AddClass {
                target: "hl-1".to_string(),
                class_name: "pulse".to_string()
            })
        );
        assert_eq!(
            parse(json!({ "type": "fadeElement", "target": "lbl", "opacity": 0.5 })),
            StepAction::Known(Action::FadeElement {
                target: "lbl".to_string(),
                opacity: CssValue::Number(0.5)
            })
        );
    }

    #[test]
    fn test_unknown_kind_is_kept() {
        assert_eq!(
            parse(json!({ "type": "spin", "target": "x" })),
            StepAction::Unknown {
                kind: "spin".to_string()
            }
        );
        assert_eq!(
            parse(json!({ "target": "x" })),
            StepAction::Unknown {
                kind: "undefined".to_string()
            }
        );
    }

    #[test]
    fn test_known_kind_with_bad_fields_is_an_error() {
        let result = serde_json::from_value::<StepAction>(json!({ "type": "showLabel" }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid 'showLabel' action"), "{err}");
    }

    #[test]
    fn test_action_mapping() {
        let pan = Action::PanImage {}.to_mutation();
        assert_eq!(
            pan,
            Mutation::Deferred {
                delay_ms: 100,
                mutation: Box::new(Mutation::add_class("img-context", "context-pan"))
            }
        );
        assert_eq!(
            Action::HideElement {
                target: "lbl-1".to_string()
            }
            .to_mutation(),
            Mutation::set_style("lbl-1", StyleProperty::Opacity, "0")
        );
        assert_eq!(
            Action::ZoomText {
                transform: "scale(1.5)".to_string()
            }
            .to_mutation(),
            Mutation::set_style("layer-text", StyleProperty::Transform, "scale(1.5)")
        );
        assert_eq!(
            StepAction::Unknown {
                kind: "spin".to_string()
            }
            .to_mutation(),
            Mutation::Comment {
                text: "Unknown action: spin".to_string()
            }
        );
    }

    #[test]
    fn test_kind_list_matches_variants() {
        for kind in Action::KINDS {
            let value = json!({
                "type": kind,
                "target": "t",
                "transform": "none",
                "opacity": 1,
                "class": "c"
            });
            let action: StepAction = serde_json::from_value(value).unwrap();
            assert!(matches!(action, StepAction::Known(_)), "{kind} should be known");
        }
    }
}
