use std::path::PathBuf;

use anyhow::Result;
use clap::{arg, command, value_parser, ArgMatches, Command};
use polygon::MAX_VERTEX_COUNT;
use renderer::{Options, Renderer};
use winit::event_loop::EventLoop;

mod buffer;
mod context;
mod debug;
mod polygon;
mod renderer;
mod shader;
mod utils;

fn cli() -> Command {
    let defaults = Options::default();

    command!()
        .arg(
            arg!([COUNT] "Number of vertices on the fan perimeter")
                .value_parser(value_parser!(u32).range(3..=MAX_VERTEX_COUNT as i64))
                .default_value(defaults.vertex_count.to_string()),
        )
        .arg(
            arg!(-r --radius <VALUE> "Fan radius in clip space")
                .value_parser(parse_radius)
                .allow_negative_numbers(true)
                .default_value(defaults.radius.to_string()),
        )
        .arg(
            arg!(-S --speed <VALUE> "Multiplier applied to elapsed seconds for the time uniform")
                .value_parser(parse_speed)
                .allow_negative_numbers(true)
                .default_value(defaults.speed.to_string()),
        )
        .arg(
            arg!(--shaders <DIR> "Load triangle-vs.glsl and triangle-fs.glsl from DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(--"no-vsync" "Present without waiting for vertical blank"))
}

fn parse_radius(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(r) if r.is_finite() && r > 0. => Ok(r),
        Ok(r) => Err(format!("radius must be a positive number, got {r}")),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_speed(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(v) => Err(format!("speed must be finite, got {v}")),
        Err(e) => Err(e.to_string()),
    }
}

fn options(matches: &ArgMatches) -> Options {
    let defaults = Options::default();

    Options {
        vertex_count: matches
            .get_one::<u32>("COUNT")
            .map_or(defaults.vertex_count, |&n| n as _),
        radius: matches.get_one("radius").copied().unwrap_or(defaults.radius),
        speed: matches.get_one("speed").copied().unwrap_or(defaults.speed),
        shader_dir: matches.get_one::<PathBuf>("shaders").cloned(),
        vsync: !matches.get_flag("no-vsync"),
    }
}

fn init_logging() {
    let mut builder = env_logger::Builder::new();

    match std::env::var("RUST_LOG") {
        Ok(filter) => builder.parse_filters(&filter),
        Err(_) => builder.filter_level(log::LevelFilter::Info),
    };

    builder.init();
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging();

    let mut renderer = Renderer::new(options(&matches));

    EventLoop::new()?.run_app(&mut renderer)?;

    match renderer.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        let argv = std::iter::once("fan").chain(args.iter().copied());
        cli().try_get_matches_from(argv).map(|m| options(&m))
    }

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn defaults() {
        let options = parse(&[]).unwrap();
        let defaults = Options::default();

        assert_eq!(options.vertex_count, defaults.vertex_count);
        assert_eq!(options.radius, defaults.radius);
        assert_eq!(options.speed, defaults.speed);
        assert!(options.shader_dir.is_none());
        assert!(options.vsync);
    }

    #[test]
    fn all_options() {
        let options = parse(&[
            "64",
            "--radius",
            "0.9",
            "-S",
            "-1.5",
            "--shaders",
            "assets",
            "--no-vsync",
        ])
        .unwrap();

        assert_eq!(options.vertex_count, 64);
        assert_eq!(options.radius, 0.9);
        assert_eq!(options.speed, -1.5);
        assert_eq!(options.shader_dir, Some(PathBuf::from("assets")));
        assert!(!options.vsync);
    }

    #[test]
    fn rejects_too_few_vertices() {
        assert!(parse(&["2"]).is_err());
        assert!(parse(&["3"]).is_ok());
    }

    #[test]
    fn rejects_undrawable_vertex_counts() {
        let max = MAX_VERTEX_COUNT.to_string();
        let over = (MAX_VERTEX_COUNT + 1).to_string();

        assert_eq!(parse(&[max.as_str()]).unwrap().vertex_count, MAX_VERTEX_COUNT);
        assert!(parse(&[over.as_str()]).is_err());
        assert!(parse(&["1000000000"]).is_err());
    }

    #[test]
    fn negative_radius_reports_why() {
        let err = parse(&["-r", "-1"]).err().unwrap();

        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("radius must be a positive number"));
    }

    #[test]
    fn rejects_bad_radius() {
        assert!(parse(&["-r", "0"]).is_err());
        assert!(parse(&["-r", "-1"]).is_err());
        assert!(parse(&["-r", "inf"]).is_err());
        assert!(parse(&["-r", "wide"]).is_err());
    }

    #[test]
    fn rejects_non_finite_speed() {
        assert!(parse(&["--speed", "NaN"]).is_err());
    }
}
