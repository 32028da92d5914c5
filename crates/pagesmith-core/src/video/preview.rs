//! Preview page fallback
//!
//! When frames cannot be recorded, the scene page is copied with the measured
//! narration timeline injected, so the synced animation can still be checked
//! in a browser.

use std::path::{Path, PathBuf};

use crate::video::timeline::Timeline;

const BODY_CLOSE: &str = "</body>";

/// `<dir>/<stem>-PREVIEW.html` next to the scene
pub fn preview_path(scene: &Path) -> PathBuf {
    let stem = scene
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scene".to_string());
    scene.with_file_name(format!("{}-PREVIEW.html", stem))
}

/// Script that overrides the scene's step durations with the measured ones
pub fn timeline_script(timeline: &Timeline) -> String {
    let json = timeline.to_json().replace("</", "<\\/");
    format!(
        r#"
        <script>
            window.addEventListener('DOMContentLoaded', function() {{
                var timeline = {json};
                var steps = window.sceneSteps || window.sequence;
                if (steps) {{
                    timeline.forEach(function(item, index) {{
                        if (steps[index]) steps[index].duration = item.duration;
                    }});
                    console.log('Injected narration timeline');
                }}
            }});
        </script>
        "#
    )
}

/// Insert the timeline script before the first `</body>`, or append it
pub fn inject_timeline(html: &str, timeline: &Timeline) -> String {
    let script = timeline_script(timeline);
    match html.find(BODY_CLOSE) {
        Some(index) => {
            let mut out = String::with_capacity(html.len() + script.len());
            out.push_str(&html[..index]);
            out.push_str(&script);
            out.push_str(&html[index..]);
            out
        }
        None => format!("{}{}", html, script),
    }
}
