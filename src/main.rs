use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use fontdiff_config::{Direction, FontDiffConfig};
use fontdiff_text::bidi::BaseDirection;
use fontdiff_text::{
    DiffOptions, Document, FontCollection, FontFeature, FontSet, Language, LayoutOptions,
    PageGeometry, Paragraph, Style,
};

mod render;
mod specimen;

const USAGE: &str = "usage: fontdiff --before FONT [--before FONT ...] --after FONT \
                     [--after FONT ...] --specimen FILE [--out DIR] [--config FILE]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    before: Vec<PathBuf>,
    after: Vec<PathBuf>,
    specimen: Option<PathBuf>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg.clone(), None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| args.next())
                .map(PathBuf::from)
                .with_context(|| format!("{flag} needs a value\n{USAGE}"))
        };
        match flag.as_str() {
            "--before" => parsed.before.push(value()?),
            "--after" => parsed.after.push(value()?),
            "--specimen" => parsed.specimen = Some(value()?),
            "--out" => parsed.out = Some(value()?),
            "--config" => parsed.config = Some(value()?),
            "-h" | "--help" => bail!("{USAGE}"),
            other => bail!("unknown argument {other:?}\n{USAGE}"),
        }
    }
    if parsed.before.is_empty() || parsed.after.is_empty() {
        bail!("both --before and --after fonts are required\n{USAGE}");
    }
    if parsed.specimen.is_none() {
        bail!("--specimen is required\n{USAGE}");
    }
    Ok(parsed)
}

/// Parse `tag`, `tag=value`, `+tag` or `-tag`.
fn parse_feature(setting: &str) -> Result<FontFeature> {
    let (tag, value) = match setting.split_once('=') {
        Some((tag, value)) => (
            tag,
            value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid value in feature {setting:?}"))?,
        ),
        None => match setting.strip_prefix('-') {
            Some(tag) => (tag, 0),
            None => (setting.strip_prefix('+').unwrap_or(setting), 1),
        },
    };
    let tag: [u8; 4] = tag
        .trim()
        .as_bytes()
        .try_into()
        .ok()
        .filter(|tag: &[u8; 4]| tag.is_ascii())
        .with_context(|| format!("feature tag in {setting:?} must be four ASCII characters"))?;
    Ok(FontFeature::new(&tag, value))
}

fn text_style(config: &FontDiffConfig) -> Result<Style> {
    let mut style = Style::new(config.text.font_size).with_weight(config.text.weight);
    if let Some(tag) = &config.text.language {
        style = style.with_language(Language::new(tag.as_str()));
    }
    for feature in &config.text.features {
        style = style.with_feature(parse_feature(feature)?);
    }
    Ok(style)
}

fn layout_options(config: &FontDiffConfig) -> LayoutOptions {
    LayoutOptions {
        base_direction: match config.text.direction {
            Direction::Auto => BaseDirection::Auto,
            Direction::Ltr => BaseDirection::Ltr,
            Direction::Rtl => BaseDirection::Rtl,
        },
        diff: DiffOptions {
            oversample: config.diff.oversample,
            merge_threshold: config.diff.merge_threshold,
            max_edit_distance: config.diff.max_edit_distance,
        },
        removal_color: config.diff.removal_color,
    }
}

fn load_fonts(paths: &[PathBuf], label: &str) -> Result<Arc<dyn FontCollection>> {
    let fonts = FontSet::load(paths).with_context(|| format!("loading {label} fonts"))?;
    if fonts.is_empty() {
        bail!("no {label} fonts loaded");
    }
    log::info!("loaded {} {label} font faces", fonts.len());
    Ok(Arc::new(fonts))
}

/// Run the comparison; returns whether any difference was found.
fn run(args: Args) -> Result<bool> {
    let config = FontDiffConfig::load(args.config.as_deref()).context("loading configuration")?;
    let before = load_fonts(&args.before, "before")?;
    let after = load_fonts(&args.after, "after")?;

    let specimen_path = args.specimen.context("--specimen is required")?;
    let specimen = std::fs::read_to_string(&specimen_path)
        .with_context(|| format!("reading specimen {}", specimen_path.display()))?;
    let paragraphs = specimen::paragraphs(&specimen);

    let style = Arc::new(text_style(&config)?);
    let options = layout_options(&config);
    let mut document = Document::new(PageGeometry {
        width: config.page.width,
        height: config.page.height,
        margin: config.page.margin,
    });

    for (index, text) in paragraphs.iter().enumerate() {
        let mut paragraph = Paragraph::new(before.clone(), after.clone()).with_options(options);
        paragraph.append_span(text, style.clone());
        paragraph
            .layout(document.content_width(), &mut document)
            .with_context(|| format!("laying out paragraph {}", index + 1))?;
    }

    let out_dir = args.out.unwrap_or_else(|| config.output.dir.clone());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    for (index, page) in document.pages().iter().enumerate() {
        let path = out_dir.join(format!("page-{:03}.png", index + 1));
        render::render_page(page, document.geometry(), config.output.scale, &path)?;
        log::debug!("wrote {}", path.display());
    }

    log::info!(
        "{} paragraphs, {} lines on {} pages written to {}",
        paragraphs.len(),
        document.line_count(),
        document.pages().len(),
        out_dir.display()
    );
    if document.has_diffs() {
        println!("fontdiff: differences found, see {}", out_dir.display());
    } else {
        println!("fontdiff: no differences");
    }
    Ok(document.has_diffs())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = parse_args(std::env::args().skip(1)).and_then(run);
    match result {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_repeated_and_inline_flags() {
        let parsed = parse_args(args(&[
            "--before",
            "old.ttf",
            "--before=old-bold.ttf",
            "--after",
            "new.ttf",
            "--specimen",
            "text.txt",
            "--out=report",
        ]))
        .unwrap();
        assert_eq!(
            parsed.before,
            vec![PathBuf::from("old.ttf"), PathBuf::from("old-bold.ttf")]
        );
        assert_eq!(parsed.after, vec![PathBuf::from("new.ttf")]);
        assert_eq!(parsed.specimen, Some(PathBuf::from("text.txt")));
        assert_eq!(parsed.out, Some(PathBuf::from("report")));
        assert_eq!(parsed.config, None);
    }

    #[test]
    fn rejects_incomplete_invocations() {
        assert!(parse_args(args(&["--before", "a.ttf", "--specimen", "t"])).is_err());
        assert!(parse_args(args(&["--before", "a.ttf", "--after", "b.ttf"])).is_err());
        assert!(parse_args(args(&["--before"])).is_err());
        assert!(parse_args(args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn parses_feature_settings() {
        assert_eq!(parse_feature("liga=0").unwrap(), FontFeature::new(b"liga", 0));
        assert_eq!(parse_feature("ss01").unwrap(), FontFeature::new(b"ss01", 1));
        assert_eq!(parse_feature("-kern").unwrap(), FontFeature::new(b"kern", 0));
        assert_eq!(parse_feature("+smcp").unwrap(), FontFeature::new(b"smcp", 1));
        assert!(parse_feature("toolong").is_err());
        assert!(parse_feature("liga=x").is_err());
    }

    #[test]
    fn config_maps_onto_layout_options() {
        let mut config = FontDiffConfig::default();
        config.text.direction = Direction::Rtl;
        config.diff.removal_color = 0xffcccc;
        let options = layout_options(&config);
        assert_eq!(options.base_direction, BaseDirection::Rtl);
        assert_eq!(options.removal_color, 0xffcccc);
        assert_eq!(options.diff.oversample, 8);

        let style = text_style(&config).unwrap();
        assert_eq!(style.font_size, 16.0);
        assert_eq!(style.language().map(Language::tag), Some("en"));
    }
}
