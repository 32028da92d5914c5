//! Scene plans replayed against a small DOM model

use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;

use super::*;

#[derive(Debug, Clone, Default, PartialEq)]
struct Element {
    classes: BTreeSet<String>,
    styles: BTreeMap<&'static str, String>,
}

/// Elements by id; lookups of absent ids are no-ops, like the generated script
#[derive(Debug, Clone, Default, PartialEq)]
struct Dom {
    elements: BTreeMap<String, Element>,
    /// Mutations applied, in order, as (element, description)
    log: Vec<String>,
    /// Deferred mutations whose timers have not fired
    pending: Vec<Mutation>,
}

impl Dom {
    fn with_ids(ids: &[&str]) -> Self {
        let mut dom = Dom::default();
        for id in ids {
            dom.elements.insert(id.to_string(), Element::default());
        }
        dom
    }

    /// Deferred mutations wait until [`Dom::fire_timers`]
    fn run(&mut self, mutations: &[Mutation]) {
        for mutation in mutations {
            self.apply(mutation);
        }
    }

    fn fire_timers(&mut self) {
        for mutation in std::mem::take(&mut self.pending) {
            self.apply(&mutation);
        }
    }

    fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::AddClass { element, class } => {
                if let Some(el) = self.elements.get_mut(element) {
                    el.classes.insert(class.clone());
                    self.log.push(format!("{}+{}", element, class));
                }
            }
            Mutation::RemoveClass { element, class } => {
                if let Some(el) = self.elements.get_mut(element) {
                    el.classes.remove(class);
                    self.log.push(format!("{}-{}", element, class));
                }
            }
            Mutation::SetStyle {
                element,
                property,
                value,
            } => {
                if let Some(el) = self.elements.get_mut(element) {
                    if value.is_empty() {
                        el.styles.remove(property.as_str());
                    } else {
                        el.styles.insert(property.as_str(), value.clone());
                    }
                    self.log
                        .push(format!("{}.{}={}", element, property.as_str(), value));
                }
            }
            Mutation::Deferred { mutation, .. } => self.pending.push(mutation.as_ref().clone()),
            Mutation::CancelDeferred => self.pending.clear(),
            Mutation::Comment { .. } => {}
        }
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|el| el.classes.contains(class))
    }
}

fn tulsa_scene() -> SceneConfig {
    SceneConfig::from_value(json!({
        "slug": "tulsa",
        "sceneTitle": "Tulsa",
        "assets": { "coverImage": "cover.png", "contextImage": "street.jpg" },
        "layers": { "context": { "overlayText": "Tulsa, 1965" } },
        "highlights": [{ "id": "hl-gold" }, { "id": "hl-sunset", "type": "underline" }],
        "labels": [{ "id": "lbl-mood", "title": "Mood", "body": "Wistful" }],
        "steps": [
            {
                "duration": 3000,
                "subtitle": "Ponyboy walks home.",
                "actions": [
                    { "type": "hideLayer", "target": "intro" },
                    { "type": "showLayer", "target": "context" },
                    { "type": "panImage" },
                    { "type": "showOverlay" }
                ]
            },
            {
                "duration": 2500,
                "actions": [
                    { "type": "hideLayer", "target": "context" },
                    { "type": "showLayer", "target": "text" },
                    { "type": "showHighlight", "target": "hl-gold" },
                    { "type": "zoomText", "transform": "scale(1.4) translate(-10%, -5%)" },
                    { "type": "teleport", "target": "hl-gold" },
                    { "type": "fadeElement", "target": "hl-sunset", "opacity": 0.4 },
                    { "type": "showLabel", "target": "lbl-mood" }
                ]
            },
            {
                "duration": 2000,
                "actions": [
                    { "type": "hideElement", "target": "lbl-mood" },
                    { "type": "addClass", "target": "hl-gold", "class": "pulse" },
                    { "type": "removeClass", "target": "hl-gold", "class": "draw-stroke" }
                ]
            }
        ]
    }))
    .unwrap()
}

fn full_dom() -> Dom {
    Dom::with_ids(&[
        "layer-intro",
        "layer-context",
        "layer-text",
        "layer-outro",
        "img-context",
        "txt-context",
        "hl-gold",
        "hl-sunset",
        "lbl-mood",
    ])
}

#[test]
fn test_reset_is_idempotent() {
    let plan = ScenePlan::from_scene(&tulsa_scene());
    let mut dom = full_dom();

    for step in 1..=3 {
        dom.run(plan.mutations_for(step));
        dom.fire_timers();
    }
    dom.run(plan.mutations_for(0));
    let once = dom.elements.clone();
    dom.run(plan.mutations_for(0));

    assert_eq!(dom.elements, once);
    assert!(dom.has_class("layer-intro", "active"));
    for layer in ["layer-context", "layer-text", "layer-outro"] {
        assert!(!dom.has_class(layer, "active"), "{layer} still active");
    }
    assert!(!dom.has_class("hl-gold", "draw-stroke"));
    assert!(!dom.has_class("img-context", "context-pan"));
    assert!(dom.elements["lbl-mood"].styles.is_empty());
    assert!(dom.elements["layer-text"].styles.is_empty());
}

#[test]
fn test_reset_tolerates_missing_elements() {
    let plan = ScenePlan::from_scene(&tulsa_scene());
    // A page without the context and outro layers
    let mut dom = Dom::with_ids(&["layer-intro", "layer-text", "hl-gold"]);
    dom.run(plan.mutations_for(0));
    dom.run(plan.mutations_for(0));
    assert!(dom.has_class("layer-intro", "active"));
    assert_eq!(dom.elements.len(), 3);
}

#[test]
fn test_actions_apply_in_authored_order() {
    let plan = ScenePlan::from_scene(&tulsa_scene());
    let mut dom = full_dom();

    dom.run(plan.mutations_for(2));
    assert_eq!(
        dom.log,
        vec![
            "layer-context-active",
            "layer-text+active",
            "hl-gold+draw-stroke",
            "layer-text.transform=scale(1.4) translate(-10%, -5%)",
            "hl-sunset.opacity=0.4",
            "lbl-mood+show",
        ]
    );

    dom.log.clear();
    dom.run(plan.mutations_for(3));
    assert_eq!(
        dom.log,
        vec!["lbl-mood.opacity=0", "hl-gold+pulse", "hl-gold-draw-stroke"]
    );
    assert!(dom.has_class("hl-gold", "pulse"));
    assert!(!dom.has_class("hl-gold", "draw-stroke"));
}

#[test]
fn test_pan_is_deferred_within_its_step() {
    let plan = ScenePlan::from_scene(&tulsa_scene());
    let mut dom = full_dom();
    dom.run(plan.mutations_for(1));
    assert!(dom.has_class("txt-context", "show"));
    assert!(!dom.has_class("img-context", "context-pan"));

    dom.fire_timers();
    assert_eq!(dom.log.last().map(String::as_str), Some("img-context+context-pan"));
}

#[test]
fn test_reset_cancels_pending_pan() {
    let plan = ScenePlan::from_scene(&tulsa_scene());
    let mut fresh = full_dom();
    fresh.run(plan.mutations_for(0));

    let mut dom = full_dom();
    dom.run(plan.mutations_for(1));
    // Reset arrives before the pan timer fires
    dom.run(plan.mutations_for(0));
    dom.fire_timers();

    assert!(!dom.has_class("img-context", "context-pan"));
    assert_eq!(dom.elements, fresh.elements);
}

#[test]
fn test_unknown_action_becomes_comment() {
    let artifacts = build_scene_artifacts(&tulsa_scene());
    assert!(artifacts.control_script.contains("// Unknown action: teleport"));
    // Generation continued past the unknown action
    assert!(artifacts
        .control_script
        .contains("withEl('lbl-mood', function(el) { el.classList.add('show'); });"));
}

#[test]
fn test_step_metadata_preserves_order() {
    let artifacts = build_scene_artifacts(&tulsa_scene());
    let metadata: Vec<StepMetadata> = serde_json::from_str(&artifacts.step_metadata_json).unwrap();
    assert_eq!(
        metadata,
        vec![
            StepMetadata::new(3000, "Ponyboy walks home."),
            StepMetadata {
                duration: 2500,
                text: None
            },
            StepMetadata {
                duration: 2000,
                text: None
            },
        ]
    );
}
