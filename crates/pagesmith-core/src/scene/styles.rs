//! Scene stylesheet generation
//!
//! The stylesheet is a pure function of the scene's layers and assets. The
//! context block only appears when a context image is present.

use crate::scene::model::SceneConfig;

const LAYER_RULES: &str = r#"
        /* LAYER MANAGEMENT */
        .stage-layer {
            position: absolute;
            top: 0; left: 0;
            width: 100%; height: 100%;
            opacity: 0;
            transition: opacity 0.8s ease;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .stage-layer.active {
            opacity: 1;
            z-index: 10;
        }
"#;

const OVERLAY_RULES: &str = r#"
            color: white;
            font-family: 'Helvetica Neue', sans-serif;
            text-transform: uppercase;
            font-weight: 800;
            font-size: 4rem;
            text-shadow: 0 2px 10px black;
            opacity: 0;
            transform: translateY(20px);
            transition: all 0.5s ease;
        }
        .context-overlay.show {
            opacity: 1;
            transform: translateY(0);
        }
"#;

const HIGHLIGHT_RULES: &str = r#"
        /* HIGHLIGHTS */
        .highlight-mark {
            position: absolute;
            pointer-events: none;
            z-index: 20;
            border-radius: 2px;
            opacity: 0;
            transition: opacity 0.6s ease;
        }
        .highlight-mark.type-yellow {
            mix-blend-mode: multiply;
        }
        .highlight-mark.type-yellow.draw-stroke { opacity: 0.6; }
        .highlight-mark.type-underline.draw-stroke { opacity: 1; }
"#;

const LABEL_RULES: &str = r#"
        /* LABELS (scene overrides) */
        .annotation-label {
            border-left: 4px solid #3498db;
            box-shadow: 0 4px 15px rgba(0,0,0,0.15);
            font-family: sans-serif;
            font-size: 1rem;
            z-index: 30;
        }
"#;

const SUBTITLE_RULES: &str = r#"
        /* SUBTITLES */
        .subtitle-layer {
            position: absolute;
            bottom: 8%; left: 50%;
            transform: translateX(-50%);
            width: 80%;
            text-align: center;
            font-family: 'DM Sans', sans-serif;
            font-size: 1.8rem;
            font-weight: 600;
            color: white;
            text-shadow: 0 2px 4px rgba(0,0,0,0.8);
            z-index: 100;
            pointer-events: none;
            opacity: 0;
            transition: opacity 0.3s ease;
        }
        .subtitle-layer.show { opacity: 1; }
"#;

pub fn scene_stylesheet(scene: &SceneConfig) -> String {
    let mut css = String::from(LAYER_RULES);
    let intro = &scene.layers.intro;

    css.push_str(&format!(
        "\n        /* INTRO */\n        #layer-intro {{ background: {}; }}\n        #layer-intro img {{ {} }}\n",
        intro.background, intro.image_style
    ));

    if scene.assets.context_image.is_some() {
        context_rules(scene, &mut css);
    }

    let text = &scene.layers.text;
    let background = match &scene.assets.paper_texture {
        Some(texture) => format!(
            "background: url('../assets/{}'), {};",
            texture, text.background
        ),
        None => format!("background: {};", text.background),
    };
    css.push_str(&format!(
        r#"
        /* TEXT */
        #layer-text {{
            font-family: {};
            font-size: {};
            line-height: {};
            color: {};
            padding: {};
            box-sizing: border-box;
            {}
            transform-origin: top left;
            transition: transform 1.5s cubic-bezier(0.25, 0.1, 0.25, 1);
        }}
        .book-text {{ max-width: 800px; margin: 0 auto; }}
"#,
        text.font_family, text.font_size, text.line_height, text.text_color, text.padding, background
    ));

    css.push_str(HIGHLIGHT_RULES);
    css.push_str(LABEL_RULES);
    css.push_str(SUBTITLE_RULES);
    css
}

fn context_rules(scene: &SceneConfig, css: &mut String) {
    let ctx = &scene.layers.context;
    let (pan_transition, pan_rule) = if ctx.pan_effect {
        (
            format!(
                "transition: transform {} ease-out; transform: scale(1.1);",
                ctx.pan_duration
            ),
            ".context-pan { transform: scale(1.0) !important; }",
        )
    } else {
        (String::new(), "")
    };

    css.push_str(&format!(
        r#"
        /* CONTEXT */
        #layer-context {{ background: {}; }}
        #layer-context img {{
            width: 100%; height: 100%;
            object-fit: cover;
            opacity: {};
            {}
        }}
        {}
"#,
        ctx.background, ctx.image_opacity, pan_transition, pan_rule
    ));

    if ctx.overlay_text.is_some() {
        let position: Vec<String> = ctx
            .overlay_position
            .iter()
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect();
        css.push_str(&format!(
            "\n        .context-overlay {{\n            position: absolute;\n            {}",
            position.join(" ")
        ));
        css.push_str(OVERLAY_RULES);
    }
}
