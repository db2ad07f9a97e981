use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const USAGE: &str = "\
usage: simcanvas-viewer <frames.jsonl> [options]

options:
  --assets <dir>   directory served as local/custom/ (default: next to the frames file)
  --size <px>      canvas width and height (default: 500)
  --width <px>     canvas width
  --height <px>    canvas height
  --fps <n>        simulation steps replayed per second (default: 10)
  --paused         start paused
  -h, --help       print this help

keys: Space pause/resume, R restart, Esc quit";

/// Viewer options, from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub frames: PathBuf,
    pub assets: PathBuf,
    pub width: u32,
    pub height: u32,
    pub steps_per_second: f32,
    pub start_paused: bool,
}

impl ViewerConfig {
    pub fn new(frames: impl Into<PathBuf>) -> Self {
        let frames = frames.into();
        let assets = frames
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            frames,
            assets,
            width: 500,
            height: 500,
            steps_per_second: 10.0,
            start_paused: false,
        }
    }

    /// Parses arguments (without the program name). `Ok(None)` means help was requested.
    pub fn from_args<I>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut frames: Option<PathBuf> = None;
        let mut assets: Option<PathBuf> = None;
        let mut width: Option<u32> = None;
        let mut height: Option<u32> = None;
        let mut fps: Option<f32> = None;
        let mut start_paused = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--assets" => assets = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--size" => {
                    let n = parse_px(&value(&mut args, &arg)?, &arg)?;
                    width = Some(n);
                    height = Some(n);
                }
                "--width" => width = Some(parse_px(&value(&mut args, &arg)?, &arg)?),
                "--height" => height = Some(parse_px(&value(&mut args, &arg)?, &arg)?),
                "--fps" => {
                    let raw = value(&mut args, &arg)?;
                    let n: f32 = raw
                        .parse()
                        .with_context(|| format!("--fps expects a number, got `{raw}`"))?;
                    if !(n.is_finite() && n > 0.0) {
                        bail!("--fps must be positive, got {n}");
                    }
                    fps = Some(n);
                }
                "--paused" => start_paused = true,
                flag if flag.starts_with("--") => bail!("unknown option `{flag}`\n\n{USAGE}"),
                path => {
                    if frames.replace(PathBuf::from(path)).is_some() {
                        bail!("only one frames file may be given\n\n{USAGE}");
                    }
                }
            }
        }

        let Some(frames) = frames else {
            bail!("missing frames file\n\n{USAGE}");
        };
        let mut cfg = ViewerConfig::new(frames);
        if let Some(a) = assets {
            cfg.assets = a;
        }
        cfg.width = width.unwrap_or(cfg.width);
        cfg.height = height.unwrap_or(cfg.height);
        cfg.steps_per_second = fps.unwrap_or(cfg.steps_per_second);
        cfg.start_paused = start_paused;
        Ok(Some(cfg))
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().with_context(|| format!("{flag} expects a value"))
}

fn parse_px(raw: &str, flag: &str) -> Result<u32> {
    let n: u32 = raw
        .parse()
        .with_context(|| format!("{flag} expects a pixel count, got `{raw}`"))?;
    if n == 0 || n > 8192 {
        bail!("{flag} must be within 1..=8192, got {n}");
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<ViewerConfig>> {
        ViewerConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_put_assets_next_to_frames() {
        let cfg = parse(&["runs/boids.jsonl"]).unwrap().unwrap();
        assert_eq!(cfg.assets, PathBuf::from("runs"));
        assert_eq!((cfg.width, cfg.height), (500, 500));
        assert_eq!(cfg.steps_per_second, 10.0);
        assert!(!cfg.start_paused);
    }

    #[test]
    fn options_override_defaults() {
        let cfg = parse(&["--size", "900", "f.jsonl", "--assets", "static", "--fps", "2.5", "--height", "600", "--paused"])
            .unwrap()
            .unwrap();
        assert_eq!(cfg.frames, PathBuf::from("f.jsonl"));
        assert_eq!(cfg.assets, PathBuf::from("static"));
        assert_eq!((cfg.width, cfg.height), (900, 600));
        assert_eq!(cfg.steps_per_second, 2.5);
        assert!(cfg.start_paused);
    }

    #[test]
    fn help_and_errors() {
        assert!(parse(&["--help"]).unwrap().is_none());
        assert!(parse(&[]).is_err());
        assert!(parse(&["a", "b"]).is_err());
        assert!(parse(&["a", "--size"]).is_err());
        assert!(parse(&["a", "--size", "0"]).is_err());
        assert!(parse(&["a", "--fps", "-1"]).is_err());
        assert!(parse(&["a", "--bogus"]).is_err());
    }
}
