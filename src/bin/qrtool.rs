use clap::{Parser, Subcommand};
use qr_reveal::app::{GeneratorView, ScanOutcome, ScannerView, ThemeStore};
use qr_reveal::config::{self, GeneratorSettings, RevealTiming};
use qr_reveal::reveal::{MotionPlan, compose_frame, sample_particles};
use qr_reveal::tools::{ExportFormat, SystemClipboard};
use qr_reveal::{ECLevel, GridDecoder, QrEncoder, QrError, QrcodeEncoder, Rgb, render_bitmap};
use qr_reveal::{RevealOrchestrator, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR generator, scanner and reveal animator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text and write qrcode.<ext> files
    Generate {
        /// Text to encode
        #[arg(default_value = config::DEFAULT_PAYLOAD)]
        payload: String,
        /// Export size in pixels (128-1024, step 32)
        #[arg(long, env = "QR_DEFAULT_SIZE", default_value_t = config::DEFAULT_SIZE)]
        size: u32,
        #[arg(long, default_value = "#000000")]
        fg: Rgb,
        #[arg(long, default_value = "#ffffff")]
        bg: Rgb,
        #[arg(long, default_value = "H")]
        ec: ECLevel,
        /// Output formats: png, jpg, svg
        #[arg(long = "format", default_value = "png")]
        formats: Vec<ExportFormat>,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Decode a QR code from an image
    Scan {
        image: PathBuf,
        /// Copy the decoded text to the clipboard
        #[arg(long)]
        copy: bool,
        /// Downscale large images so neither side exceeds this (0 = never)
        #[arg(long, env = "QR_MAX_DIM", default_value_t = 0)]
        max_dim: u32,
    },
    /// Print the particle field sampled from a render
    Particles {
        #[arg(default_value = config::DEFAULT_PAYLOAD)]
        payload: String,
        /// Preview size in pixels
        #[arg(long, default_value_t = config::DEFAULT_SIZE)]
        display: u32,
        /// Module grid to sample with; defaults to the symbol's own width
        #[arg(long)]
        grid: Option<usize>,
        #[arg(long, default_value = "H")]
        ec: ECLevel,
    },
    /// Render the reveal animation to numbered PNG frames
    Animate {
        #[arg(default_value = config::DEFAULT_PAYLOAD)]
        payload: String,
        #[arg(long, default_value_t = config::DEFAULT_SIZE)]
        display: u32,
        #[arg(long, default_value_t = 30)]
        fps: u32,
        /// Seed for the scatter offsets
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value = "#000000")]
        fg: Rgb,
        #[arg(long, default_value = "#ffffff")]
        bg: Rgb,
        #[arg(long, default_value = "frames")]
        out: PathBuf,
    },
    /// Show the theme cycle
    Themes {
        #[arg(long, default_value_t = 3)]
        steps: usize,
    },
}

fn main() -> ExitCode {
    let default_level = if config::debug_from_env() { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate {
            payload,
            size,
            fg,
            bg,
            ec,
            formats,
            out,
        } => generate_cmd(payload, size, fg, bg, ec, &formats, &out),
        Command::Scan {
            image,
            copy,
            max_dim,
        } => scan_cmd(&image, copy, (max_dim > 0).then_some(max_dim)),
        Command::Particles {
            payload,
            display,
            grid,
            ec,
        } => particles_cmd(&payload, display, grid, ec),
        Command::Animate {
            payload,
            display,
            fps,
            seed,
            fg,
            bg,
            out,
        } => animate_cmd(&payload, display, fps, seed, (fg, bg), &out),
        Command::Themes { steps } => {
            themes_cmd(steps);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn generate_cmd(
    payload: String,
    size: u32,
    foreground: Rgb,
    background: Rgb,
    ec_level: ECLevel,
    formats: &[ExportFormat],
    out: &Path,
) -> Result<()> {
    let settings = GeneratorSettings {
        payload,
        size: config::snap_size(size)?,
        foreground,
        background,
        ec_level,
    };
    let view = GeneratorView::new(
        settings,
        QrcodeEncoder,
        RevealOrchestrator::new(RevealTiming::default()),
    );
    if let Some(err) = view.error() {
        return Err(QrError::Encode(err.to_string()));
    }
    if let Some(symbol) = view.symbol() {
        println!(
            "version {} ({}x{} modules), EC {:?}",
            symbol.version().number(),
            symbol.width(),
            symbol.width(),
            symbol.ec_level()
        );
    }
    if view.shows_size_notice() {
        println!(
            "preview is capped at {}px; files use {}px",
            config::MAX_DISPLAY_SIZE,
            view.settings().size
        );
    }
    std::fs::create_dir_all(out)?;
    for &format in formats {
        let path = view.export(format, out)?;
        println!("{}", path.display());
    }
    Ok(())
}

fn scan_cmd(image: &Path, copy: bool, max_dim: Option<u32>) -> Result<()> {
    let start = Instant::now();
    let mut view = ScannerView::default();
    let outcome = view.scan_file(image, &GridDecoder, max_dim)?.clone();
    log::debug!("scanned {} in {:?}", image.display(), start.elapsed());

    match &outcome {
        ScanOutcome::Found { text, kind } => {
            println!("{text}");
            println!("({})", if kind.is_link() { "link" } else { "text" });
            if copy {
                let mut clipboard = SystemClipboard::new()?;
                view.copy_result(&mut clipboard)?;
                println!("copied to clipboard");
            }
        }
        ScanOutcome::NotFound => println!("{}", outcome.message()),
    }
    Ok(())
}

fn particles_cmd(
    payload: &str,
    display: u32,
    grid: Option<usize>,
    ec_level: ECLevel,
) -> Result<()> {
    let symbol = QrcodeEncoder.encode(payload, ec_level)?;
    let bitmap = render_bitmap(&symbol, display, Rgb::BLACK, Rgb::WHITE)?;
    let grid_size = grid.unwrap_or(symbol.width());
    let field = sample_particles(&bitmap, grid_size, display as f32)?;

    println!(
        "grid {}x{}, module {:.3}px, {} particles",
        field.grid_size,
        field.grid_size,
        field.module_size,
        field.len()
    );
    for p in &field.particles {
        println!(
            "{:>6} col {:>3} row {:>3} at ({:>7.2}, {:>7.2}) delay {:.3}s",
            p.id, p.col, p.row, p.position.x, p.position.y, p.delay
        );
    }
    Ok(())
}

fn animate_cmd(
    payload: &str,
    display: u32,
    fps: u32,
    seed: u64,
    (foreground, background): (Rgb, Rgb),
    out: &Path,
) -> Result<()> {
    if fps == 0 {
        return Err(QrError::InvalidSize(fps));
    }
    let symbol = QrcodeEncoder.encode(payload, ECLevel::H)?;
    let plain = render_bitmap(&symbol, display, Rgb::BLACK, Rgb::WHITE)?;
    let field = sample_particles(&plain, symbol.width(), display as f32)?;
    let viewport = (display as f32 * 2.0, display as f32 * 2.0);
    let plan = MotionPlan::new(&field, viewport, seed);

    let total = RevealTiming::default().settle_after();
    let step = Duration::from_secs(1) / fps;
    let frames = (total.as_secs_f64() * fps as f64).ceil() as u32;
    std::fs::create_dir_all(out)?;

    for i in 0..=frames {
        let elapsed = (step * i).as_secs_f32();
        let frame = if plan.is_finished(&field, elapsed) {
            render_bitmap(&symbol, display, foreground, background)?
        } else {
            compose_frame(&field, &plan, elapsed, display as usize, foreground, background)
        };
        let path = out.join(format!("frame_{i:04}.png"));
        frame.into_image().save(&path)?;
        log::debug!("wrote {}", path.display());
    }
    println!("{} frames in {}", frames + 1, out.display());
    Ok(())
}

fn themes_cmd(steps: usize) {
    let mut store = ThemeStore::default();
    println!("{} (class: none)", store.current());
    for _ in 0..steps {
        let theme = store.cycle();
        println!("{} (class: {})", theme, theme.class().unwrap_or("none"));
    }
}
