use std::path::PathBuf;
use std::process::ExitCode;

use postfx::{format_shader_error, CodeEncoding, Effect, EffectSettings, FrameGeometry};

const USAGE: &str = "usage: postfx <shader-file> [--config <string>] [--settings <path>] \
[--size WxH] [--window WxH] [--time T] [--export <out.json>]";

// Default frame geometry when none is given
const DEFAULT_SIZE: (u32, u32) = (640, 480);

struct Args {
    shader: PathBuf,
    config: Option<String>,
    settings: Option<PathBuf>,
    size: (u32, u32),
    window: Option<(u32, u32)>,
    time: f32,
    export: Option<PathBuf>,
}

fn parse_dims(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{}'", s))?;
    let w = w.trim().parse().map_err(|_| format!("bad width in '{}'", s))?;
    let h = h.trim().parse().map_err(|_| format!("bad height in '{}'", s))?;
    Ok((w, h))
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut shader = None;
    let mut parsed = Args {
        shader: PathBuf::new(),
        config: None,
        settings: None,
        size: DEFAULT_SIZE,
        window: None,
        time: 0.0,
        export: None,
    };

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("{} needs a value", flag));
        match arg.as_str() {
            "--config" => parsed.config = Some(value(&arg)?),
            "--settings" => parsed.settings = Some(value(&arg)?.into()),
            "--size" => parsed.size = parse_dims(&value(&arg)?)?,
            "--window" => parsed.window = Some(parse_dims(&value(&arg)?)?),
            "--time" => {
                let v = value(&arg)?;
                parsed.time = v.parse().map_err(|_| format!("bad time '{}'", v))?;
            }
            "--export" => parsed.export = Some(value(&arg)?.into()),
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}\n{}", flag, USAGE)),
            path => shader = Some(PathBuf::from(path)),
        }
    }

    parsed.shader = shader.ok_or_else(|| USAGE.to_string())?;
    Ok(parsed)
}

fn hex_dump(bytes: &[u8]) {
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let words: Vec<String> = chunk
            .chunks(4)
            .map(|w| w.iter().map(|b| format!("{:02x}", b)).collect())
            .collect();
        println!("  {:04x}: {}", row * 16, words.join(" "));
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    let name = args
        .shader
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut effect = Effect::default();
    if let Err(err) = effect.try_load_from_file(name, &args.shader) {
        eprintln!("{}", format_shader_error(&err));
        return ExitCode::from(1);
    }

    if let Some(config) = &args.config {
        effect.set_config_string(config);
    } else {
        let path = args.settings.clone().unwrap_or_else(EffectSettings::default_path);
        match EffectSettings::load(&path) {
            Ok(settings) => {
                if settings.apply_to(&mut effect) {
                    log::info!("[Inspector] Applied saved options from {}", path.display());
                }
            }
            Err(err) => log::warn!("[Inspector] Ignoring settings: {}", err),
        }
    }

    println!("shader: {} ({})", effect.name(), if effect.is_legacy() { "legacy" } else { "pass file" });
    for (i, pass) in effect.passes().iter().enumerate() {
        println!(
            "  pass {}: scale {} filter {} ({} bytes of code)",
            i,
            pass.output_scale,
            pass.texture_filter.as_str(),
            pass.code.len()
        );
    }
    for option in effect.options() {
        let state = if effect.is_option_active(option) { "" } else { " [inactive]" };
        println!(
            "  option {} \"{}\": {}{} = {:?}{}",
            option.name,
            option.ui_name,
            option.ty.as_str(),
            option.vector_size,
            option.current(),
            state
        );
    }
    println!("config: {}", effect.config_string());
    println!(
        "uniforms: {} bytes via {}",
        effect.uniforms_size(),
        if effect.use_push_constants() { "push constants" } else { "uniform buffer" }
    );

    let (window_width, window_height) = args.window.unwrap_or(args.size);
    let geometry = FrameGeometry {
        window_width,
        window_height,
        ..FrameGeometry::full(args.size.0, args.size.1, args.time)
    };
    hex_dump(&effect.uniform_buffer(&geometry));

    if let Some(out) = &args.export {
        let written = effect
            .to_pass_file(CodeEncoding::Plain)
            .and_then(|json| {
                std::fs::write(out, json).map_err(|source| postfx::ShaderError::Io {
                    path: out.clone(),
                    source,
                })
            });
        match written {
            Ok(()) => log::info!("[Inspector] Exported pass file to {}", out.display()),
            Err(err) => {
                eprintln!("{}", format_shader_error(&err));
                return ExitCode::from(1);
            }
        }
    }

    ExitCode::SUCCESS
}
