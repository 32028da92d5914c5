//! Build command - stamp site pages and page families from data files

use anyhow::{Result, bail};
use colored::Colorize;
use pagesmith_core::pages::{FamilyKind, build_site_pages};
use pagesmith_core::site::{BatchReport, FsSiteIo, build_family};

use crate::cli::Family;
use crate::commands::Completion;
use crate::context::Context;
use crate::output;

/// Build one target, or everything the site has sources for
///
/// Without a target, the site pages are built when the site definition
/// exists, followed by every family whose data directory exists. Skipped
/// records do not fail the build; they are listed and the command completes
/// with warnings.
pub fn run(ctx: &Context, family: Option<Family>) -> Result<Completion> {
    let targets: Vec<Family> = match family {
        Some(family) => vec![family],
        None => {
            let site = ctx.root.join(&ctx.config.pages.definition).is_file();
            let available: Vec<Family> = site
                .then_some(Family::Site)
                .into_iter()
                .chain(
                    FamilyKind::ALL
                        .into_iter()
                        .filter(|kind| {
                            let family = kind.create(&ctx.config);
                            ctx.root.join(&family.settings().data_dir).is_dir()
                        })
                        .map(family_target),
                )
                .collect();
            if available.is_empty() {
                bail!(
                    "No site definition or data directories found in '{}'; nothing to build",
                    ctx.root.display()
                );
            }
            available
        }
    };

    let mut completion = Completion::Clean;
    for target in targets {
        let report = match target.kind() {
            Some(kind) => {
                output::step(ctx.verbose, &format!("Building {}", kind));
                let family = kind.create(&ctx.config);
                build_family(family.as_ref(), &FsSiteIo, &ctx.root, &ctx.config.paths)?
            }
            None => {
                output::step(ctx.verbose, "Building site pages");
                build_site_pages(&FsSiteIo, &ctx.root, &ctx.config)?
            }
        };
        print_report(ctx, &report);

        if report.has_warnings() {
            completion = Completion::WithWarnings;
        }
    }

    Ok(completion)
}

fn family_target(kind: FamilyKind) -> Family {
    match kind {
        FamilyKind::Annotations => Family::Annotations,
        FamilyKind::Curriculum => Family::Curriculum,
        FamilyKind::Homepage => Family::Homepage,
        FamilyKind::Schools => Family::Schools,
        FamilyKind::Scenes => Family::Scenes,
    }
}

fn print_report(ctx: &Context, report: &BatchReport) {
    if ctx.verbose {
        for page in &report.built {
            println!(
                "  {} {}",
                "•".dimmed(),
                output::display_path(&ctx.root, &page.path)
            );
        }
        for asset in &report.assets {
            println!(
                "  {} {}",
                "•".dimmed(),
                output::display_path(&ctx.root, asset)
            );
        }
    }

    for name in &report.missing_partials {
        output::warning(&format!("Partial '{}' not found, left empty", name));
    }

    for note in &report.notes {
        output::note(note);
    }

    for failure in &report.failures {
        output::failure(&format!("Skipped {}: {}", failure.file, failure.error));
    }

    let index = match &report.index {
        Some(path) => format!(" + index {}", output::display_path(&ctx.root, path)),
        None => String::new(),
    };
    let summary = format!(
        "Built {} {} page(s){}",
        report.built.len(),
        report.family,
        index
    );

    if report.has_warnings() {
        output::warning(&format!(
            "{} ({} record(s) skipped)",
            summary,
            report.failures.len()
        ));
    } else {
        output::success(&summary);
    }
}
