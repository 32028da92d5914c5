//! Constants shared across the build

/// Site configuration file at the site root
pub const CONFIG_FILE: &str = "pagesmith.toml";

/// Site definition (pages, contact and course details) at the site root
pub const SITE_DEFINITION_FILE: &str = "site-config.json";

/// Extension of data record files
pub const DATA_EXTENSION: &str = "json";

/// File name written inside each page directory
pub const PAGE_FILE: &str = "index.html";

/// Scene families
pub mod scenes {
    /// Browser player runtime written next to the scene pages
    pub const PLAYER_SCRIPT: &str = "studio-player.js";

    /// Event dispatched on `window` when the step changes
    pub const STEP_EVENT: &str = "studio-step";
}

/// Video assembly
pub mod video {
    /// Frame file pattern understood by ffmpeg (`frame-00000.png`, ...)
    pub const FRAME_PATTERN: &str = "frame-%05d.png";

    /// Prefix mixed into mock audio cache keys
    pub const MOCK_PREFIX: &str = "MOCK";

    /// Spoken characters per second assumed for mock audio
    pub const MOCK_CHARS_PER_SECOND: f64 = 15.0;

    /// Shortest mock audio clip in seconds
    pub const MOCK_MIN_SECONDS: f64 = 2.0;

    /// Audio concat list file, written in the audio cache
    pub const CONCAT_LIST: &str = "list.txt";

    /// Silent intermediate video next to the output file
    pub const TEMP_VISUAL: &str = "temp_visual.mp4";
}
