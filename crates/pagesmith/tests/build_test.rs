//! Integration tests for `pagesmith build` (families and site pages) and `pagesmith scenes`

#![allow(deprecated)] // cargo_bin is deprecated in favour of the cargo_bin! macro

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use pagesmith_testkit::{SiteFixture, temp_dir_in_workspace};
use predicates::prelude::*;
use std::process::Command;

fn pagesmith(site: &SiteFixture) -> Command {
    let mut cmd = Command::cargo_bin("pagesmith").unwrap();
    cmd.current_dir(site.root()).env_remove("PAGESMITH_ROOT");
    cmd
}

fn annotation_site(site: &SiteFixture) {
    site.template(
        "_annotation-guide-template.html",
        "<html><body>{{>nav.html}}<h1>{{TEXT_TITLE}}</h1></body></html>",
    )
    .partial("nav.html", "<nav>Guides</nav>")
    .data(
        "annotation-guides",
        "macbeth.json",
        r#"{ "slug": "macbeth", "title": "Macbeth" }"#,
    )
    .data(
        "annotation-guides",
        "hamlet.json",
        r#"{ "slug": "hamlet", "title": "Hamlet" }"#,
    );
}

const SCENE: &str = r#"{
  "slug": "opening",
  "sceneTitle": "Opening <Scene>",
  "assets": { "coverImage": "cover.jpg" },
  "highlights": [ { "id": "hl-1", "type": "underline", "top": "10%", "left": "5%", "width": "40%" } ],
  "steps": [
    { "duration": 100, "subtitle": "Look at the cover", "actions": [ { "type": "showLayer", "target": "text" } ] },
    { "duration": 50, "actions": [ { "type": "showHighlight", "target": "hl-1" } ] }
  ]
}"#;

#[test]
fn test_build_single_family() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    annotation_site(&site);

    pagesmith(&site)
        .args(["build", "annotations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 2 annotations page(s)"));

    assert!(site.read("annotations/macbeth/index.html").contains("<nav>Guides</nav>"));
    assert!(site.exists("annotations/hamlet/index.html"));
    assert!(site.exists("annotations/index.html"));
}

#[test]
fn test_build_skipped_record_exits_with_warning_code() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    annotation_site(&site);
    site.data("annotation-guides", "zz-broken.json", "not json");

    pagesmith(&site)
        .args(["build", "annotations"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("zz-broken.json"))
        .stderr(predicate::str::contains("1 record(s) skipped"));

    assert!(site.exists("annotations/macbeth/index.html"));
    assert!(site.exists("annotations/hamlet/index.html"));
}

#[test]
fn test_build_without_family_uses_existing_data_dirs() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    annotation_site(&site);

    pagesmith(&site)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("annotations"))
        .stdout(predicate::str::contains("schools").not());
}

#[test]
fn test_build_with_nothing_to_build_fails() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());

    pagesmith(&site)
        .arg("build")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nothing to build"));
}

#[test]
fn test_build_missing_template_is_fatal() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    site.data(
        "annotation-guides",
        "macbeth.json",
        r#"{ "slug": "macbeth", "title": "Macbeth" }"#,
    );

    pagesmith(&site)
        .args(["build", "annotations"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_root_flag() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    annotation_site(&site);

    let mut cmd = Command::cargo_bin("pagesmith").unwrap();
    cmd.env_remove("PAGESMITH_ROOT")
        .args(["build", "annotations", "--root"])
        .arg(site.root())
        .assert()
        .success();

    assert!(site.exists("annotations/index.html"));
}

#[test]
fn test_scenes_alias_builds_scene_pages() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    site.template(
        "_video-scene-template.html",
        r#"<html><head><title>{{SCENE_TITLE}}</title><style>{{SCENE_STYLES}}</style></head>
<body>{{HIGHLIGHTS_HTML}}
<script>window.sceneSteps = {{SCENE_STEPS_JSON}};</script>
<script>{{STEP_HANDLER_JS}}</script>
</body></html>"#,
    )
    .write("data/video-scenes/opening.json", SCENE);

    pagesmith(&site).arg("scenes").assert().success();

    let page = site.read("studio/scenes/opening.html");
    assert!(page.contains("<title>Opening &lt;Scene&gt;</title>"));
    assert!(page.contains("hl-1"));
    assert!(page.contains("studio-step"));
    assert!(page.contains("\"duration\": 100"));
    assert!(site.exists("studio/scenes/studio-player.js"));
}

const SITE_DEFINITION: &str = r#"{
  "site": { "name": "LuminAIT", "contact": { "phone": "0400 000 000" } },
  "pages": [
    { "id": "home", "file": "index.html", "template": "home.html",
      "navTitle": { "en": "Home", "zh": "首页" }, "title": { "en": "Home" } },
    { "id": "about", "file": "about.html", "template": "about.html",
      "navTitle": { "en": "About", "zh": "关于" }, "title": { "en": "About" } }
  ]
}"#;

fn site_pages(site: &SiteFixture) {
    site.site_definition(SITE_DEFINITION)
        .template("home.html", "<body>{{>nav.html}}<h1>{{PAGE_TITLE}}</h1></body>")
        .template("about.html", "<body>{{>nav.html}}<h1>{{PAGE_TITLE}}</h1></body>")
        .partial("nav.html", "<nav>{{NAV_LINKS}}</nav>");
}

#[test]
fn test_build_site_pages() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    site_pages(&site);

    pagesmith(&site)
        .args(["build", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 2 site page(s)"));

    let about = site.read("about.html");
    assert!(about.contains("<h1>About | LuminAIT</h1>"));
    assert!(about.contains("<a href=\"about.html\" class=\"nav-link active\">"));
    assert!(site.read("index.html").contains("<a href=\"index.html\" class=\"nav-link active\">"));
}

#[test]
fn test_build_without_family_includes_site_pages() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    site_pages(&site);
    annotation_site(&site);

    pagesmith(&site)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 2 site page(s)"))
        .stdout(predicate::str::contains("Built 2 annotations page(s)"));

    assert!(site.exists("about.html"));
    assert!(site.exists("annotations/macbeth/index.html"));
}

#[test]
fn test_build_site_missing_template_exits_with_warning_code() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    site.site_definition(SITE_DEFINITION)
        .template("home.html", "<p>{{SITE_NAME}}</p>");

    pagesmith(&site)
        .args(["build", "site"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Skipped about"))
        .stderr(predicate::str::contains("1 record(s) skipped"));

    assert_eq!(site.read("index.html"), "<p>LuminAIT</p>");
}

#[test]
fn test_build_site_prints_style_notes() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());
    site_pages(&site);
    site.template(
        "home.html",
        "<style>.a { color: #111; }</style><p>{{PAGE_TITLE}}</p>",
    );

    pagesmith(&site)
        .args(["build", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "home: consider importing /components/page-components.css",
        ));
}

#[test]
fn test_build_site_without_definition_fails() {
    let temp = temp_dir_in_workspace();
    let site = SiteFixture::new(temp.path());

    pagesmith(&site)
        .args(["build", "site"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("SITE_DEFINITION_NOT_FOUND"));
}
