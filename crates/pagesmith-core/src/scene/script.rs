//! Step control script
//!
//! A scene compiles to a [`ScenePlan`]: the step-0 reset followed by each
//! step's mutations in authored order. The plan renders to a script that
//! listens for the player's step event. Every element lookup is null-guarded,
//! so a reset against a partially built page is harmless and can repeat.
//! Deferred mutations are tracked while they wait; the reset cancels them
//! before touching any element.

use crate::config::consts::scenes::STEP_EVENT;
use crate::scene::action::{
    layer_id, Mutation, StepAction, StyleProperty, CONTEXT_IMAGE, CONTEXT_OVERLAY, INTRO_LAYER,
    SECONDARY_LAYERS, TEXT_LAYER,
};
use crate::scene::model::SceneConfig;

const INDENT: &str = "                ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenePlan {
    pub reset: Vec<Mutation>,
    /// `steps[0]` runs on step 1
    pub steps: Vec<Vec<Mutation>>,
}

impl ScenePlan {
    pub fn from_scene(scene: &SceneConfig) -> Self {
        let steps = scene
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                step.actions
                    .iter()
                    .map(|action| {
                        if let StepAction::Unknown { kind } = action {
                            tracing::warn!(
                                scene = %scene.slug,
                                step = index + 1,
                                kind = %kind,
                                "unknown scene action"
                            );
                        }
                        action.to_mutation()
                    })
                    .collect()
            })
            .collect();

        Self {
            reset: reset_mutations(scene),
            steps,
        }
    }

    /// Mutations for a player step; empty past the last authored step
    pub fn mutations_for(&self, step: usize) -> &[Mutation] {
        match step {
            0 => &self.reset,
            n => self.steps.get(n - 1).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn render(&self) -> String {
        let mut js = String::new();
        js.push_str("        (function() {\n");
        js.push_str("            var pending = [];\n");
        js.push_str("            function withEl(id, fn) {\n");
        js.push_str("                var el = document.getElementById(id);\n");
        js.push_str("                if (el) fn(el);\n");
        js.push_str("            }\n\n");
        js.push_str(&format!(
            "            window.addEventListener({}, function(e) {{\n",
            js_string(STEP_EVENT)
        ));
        js.push_str("                var step = e.detail.step;\n\n");

        js.push_str("                // RESET\n");
        render_block(&mut js, 0, &self.reset);

        for (index, mutations) in self.steps.iter().enumerate() {
            js.push_str(&format!("\n                // Step {}\n", index + 1));
            render_block(&mut js, index + 1, mutations);
        }

        js.push_str("            });\n");
        js.push_str("        })();\n");
        js
    }
}

fn reset_mutations(scene: &SceneConfig) -> Vec<Mutation> {
    let mut reset = vec![
        Mutation::CancelDeferred,
        Mutation::add_class(INTRO_LAYER, "active"),
    ];
    reset.extend(
        SECONDARY_LAYERS
            .iter()
            .map(|layer| Mutation::remove_class(layer_id(layer), "active")),
    );
    for highlight in &scene.highlights {
        reset.push(Mutation::remove_class(&highlight.id, "draw-stroke"));
        reset.push(Mutation::set_style(&highlight.id, StyleProperty::Opacity, ""));
    }
    for label in &scene.labels {
        reset.push(Mutation::remove_class(&label.id, "show"));
        reset.push(Mutation::set_style(&label.id, StyleProperty::Opacity, ""));
    }
    reset.push(Mutation::set_style(TEXT_LAYER, StyleProperty::Transform, ""));
    reset.push(Mutation::remove_class(CONTEXT_IMAGE, "context-pan"));
    reset.push(Mutation::remove_class(CONTEXT_OVERLAY, "show"));
    reset
}

fn render_block(js: &mut String, step: usize, mutations: &[Mutation]) {
    js.push_str(&format!("{}if (step === {}) {{\n", INDENT, step));
    for mutation in mutations {
        js.push_str(&format!("{}    {}\n", INDENT, render_mutation(mutation)));
    }
    js.push_str(&format!("{}}}\n", INDENT));
}

fn render_mutation(mutation: &Mutation) -> String {
    match mutation {
        Mutation::AddClass { element, class } => format!(
            "withEl({}, function(el) {{ el.classList.add({}); }});",
            js_string(element),
            js_string(class)
        ),
        Mutation::RemoveClass { element, class } => format!(
            "withEl({}, function(el) {{ el.classList.remove({}); }});",
            js_string(element),
            js_string(class)
        ),
        Mutation::SetStyle {
            element,
            property,
            value,
        } => format!(
            "withEl({}, function(el) {{ el.style.{} = {}; }});",
            js_string(element),
            property.as_str(),
            js_string(value)
        ),
        Mutation::Deferred { delay_ms, mutation } => format!(
            "pending.push(setTimeout(function() {{ {} }}, {}));",
            render_mutation(mutation),
            delay_ms
        ),
        Mutation::CancelDeferred => {
            "pending.forEach(clearTimeout); pending.length = 0;".to_string()
        }
        Mutation::Comment { text } => format!("// {}", text.replace(['\n', '\r'], " ")),
    }
}

/// Single-quoted script literal, safe inside an inline `<script>` element
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3C"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scene() -> SceneConfig {
        SceneConfig::from_value(json!({
            "slug": "opening",
            "sceneTitle": "Opening",
            "assets": { "coverImage": "cover.png" },
            "highlights": [{ "id": "hl-1" }],
            "labels": [{ "id": "lbl-1" }],
            "steps": [
                { "duration": 1000, "actions": [{ "type": "showLayer", "target": "text" }] },
                { "duration": 500, "actions": [{ "type": "wobble" }] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_reset_covers_declared_elements() {
        let plan = ScenePlan::from_scene(&scene());
        assert_eq!(plan.reset.first(), Some(&Mutation::CancelDeferred));
        assert_eq!(plan.reset[1], Mutation::add_class("layer-intro", "active"));
        assert!(plan
            .reset
            .contains(&Mutation::remove_class("hl-1", "draw-stroke")));
        assert!(plan
            .reset
            .contains(&Mutation::set_style("lbl-1", StyleProperty::Opacity, "")));
        assert_eq!(plan.reset.len(), 1 + 1 + 3 + 2 + 2 + 3);
    }

    #[test]
    fn test_mutations_for_step_index() {
        let plan = ScenePlan::from_scene(&scene());
        assert_eq!(plan.mutations_for(0), plan.reset.as_slice());
        assert_eq!(
            plan.mutations_for(1),
            &[Mutation::add_class("layer-text", "active")]
        );
        assert!(plan.mutations_for(3).is_empty());
    }

    #[test]
    fn test_render_structure() {
        let js = ScenePlan::from_scene(&scene()).render();
        assert!(js.contains("window.addEventListener('studio-step', function(e) {"));
        assert!(js.contains("if (step === 0) {"));
        assert!(js.contains("// Step 2\n                if (step === 2) {"));
        assert!(js.contains(
            "withEl('layer-text', function(el) { el.classList.add('active'); });"
        ));
        assert!(js.contains("withEl('layer-text', function(el) { el.style.transform = ''; });"));
        assert!(js.contains("// Unknown action: wobble"));
        assert!(!js.contains("if (step === 3)"));
        assert_eq!(js.matches('{').count(), js.matches('}').count());
    }

    #[test]
    fn test_deferred_renders_timeout() {
        let pan = Mutation::Deferred {
            delay_ms: 100,
            mutation: Box::new(Mutation::add_class("img-context", "context-pan")),
        };
        assert_eq!(
            render_mutation(&pan),
            "pending.push(setTimeout(function() { withEl('img-context', function(el) { el.classList.add('context-pan'); }); }, 100));"
        );
    }

    #[test]
    fn test_reset_clears_pending_timeouts_first() {
        let js = ScenePlan::from_scene(&scene()).render();
        assert!(js.contains("var pending = [];"));
        assert!(js.contains(
            "if (step === 0) {\n                    pending.forEach(clearTimeout); pending.length = 0;\n"
        ));
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("it's"), "'it\\'s'");
        assert_eq!(js_string("a\\b"), "'a\\\\b'");
        assert_eq!(js_string("</script>"), "'\\x3C/script>'");
        assert_eq!(js_string("a\nb"), "'a\\nb'");
    }
}
